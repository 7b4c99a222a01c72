// src/graph/builder.rs
//! Incremental construction: consumes the parser's record stream in file
//! order and feeds the entity store and adjacency graph together.

use crate::graph::adjacency::AdjacencyGraph;
use crate::parser::RecordReader;
use crate::progress::ProgressSink;
use crate::store::{Product, Review, Store};
use serde::Serialize;
use std::io::BufRead;

/// Entity counts reported after a build.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BuildResult {
    pub review_count: usize,
    pub reviewer_count: usize,
    pub product_count: usize,
    /// Records rejected by the parser's error-recovery policy.
    pub dropped_records: usize,
}

/// Drains `reader` into `store` and `graph`, emitting progress every
/// `progress_batch` consumed records.
///
/// Co-review edges come from runs of consecutive records sharing a
/// product. The dataset is product-grouped in file order, so a run covers
/// a product's reviews; a product whose reviews are split by another
/// product's records yields no cross-gap edges. Known limitation,
/// preserved deliberately: downstream consumers may depend on the
/// narrower behavior.
pub fn build<R: BufRead>(
    reader: &mut RecordReader<R>,
    store: &mut Store,
    graph: &mut AdjacencyGraph,
    progress_batch: usize,
    sink: &mut dyn ProgressSink,
) -> BuildResult {
    let batch = progress_batch.max(1);
    let mut last_emitted = 0usize;

    let mut run_product: Option<String> = None;
    let mut run_members: Vec<String> = Vec::new();

    while let Some(record) = reader.next_record() {
        // Reviewer accuracy uses the product mean as it stands before this
        // record's score is folded in. The first review of a product is
        // measured against a mean of 0.
        let mean_before = store
            .product(&record.product_id)
            .map_or(0.0, Product::mean_score);
        let review_id = store.review_count();
        let accuracy_now = (f64::from(record.score) - mean_before).abs();

        store.attach_to_reviewer(
            &record.user_id,
            &record.profile_name,
            review_id,
            accuracy_now,
        );
        store.fold_product_score(&record.product_id, record.score);

        graph.ensure_node(&record.user_id);
        if run_product.as_deref() == Some(record.product_id.as_str()) {
            for member in &run_members {
                graph.increment_edge(member, &record.user_id);
            }
            run_members.push(record.user_id.clone());
        } else {
            run_product = Some(record.product_id.clone());
            run_members.clear();
            run_members.push(record.user_id.clone());
        }

        store.push_review(Review::from(record));

        if reader.records_seen() - last_emitted >= batch {
            last_emitted = reader.records_seen();
            sink.progress(reader.fraction());
        }
    }

    BuildResult {
        review_count: store.review_count(),
        reviewer_count: store.reviewer_count(),
        product_count: store.product_count(),
        dropped_records: reader.dropped(),
    }
}
