// src/engine.rs
//! Facade over the store, adjacency graph, parser, and rater: the surface
//! the front end calls into.

use crate::config::{Config, RaterConfig};
use crate::error::Result;
use crate::graph::adjacency::AdjacencyGraph;
use crate::graph::builder::{self, BuildResult};
use crate::graph::queries;
use crate::parser::RecordReader;
use crate::progress::ProgressSink;
use crate::store::{Review, Reviewer, Store};
use std::path::Path;

/// The analytical engine: an entity store plus a reviewer-adjacency
/// graph, built once from a dataset file and queried read-only after.
#[derive(Debug, Default)]
pub struct Engine {
    store: Store,
    graph: AdjacencyGraph,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingests the dataset at `path`, building the store and graph
    /// together as records stream in.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::SourceUnavailable` when the file cannot be
    /// opened; the engine is left empty and every query stays valid.
    /// Malformed records never error: they are dropped and counted in
    /// `BuildResult::dropped_records`.
    pub fn build_from_source(
        &mut self,
        path: &Path,
        config: &Config,
        sink: &mut dyn ProgressSink,
    ) -> Result<BuildResult> {
        let mut reader = RecordReader::open(path, config.max_records)?;
        Ok(builder::build(
            &mut reader,
            &mut self.store,
            &mut self.graph,
            config.progress_batch,
            sink,
        ))
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub fn graph(&self) -> &AdjacencyGraph {
        &self.graph
    }

    #[must_use]
    pub fn reviewer_by_id(&self, user_id: &str) -> Option<&Reviewer> {
        queries::reviewer_by_id(&self.store, user_id)
    }

    #[must_use]
    pub fn reviewer_by_name(&self, name: &str) -> Option<&Reviewer> {
        queries::reviewer_by_name(&self.store, name)
    }

    #[must_use]
    pub fn reviews_for_product(&self, product_id: &str) -> Vec<&Review> {
        queries::reviews_for_product(&self.store, product_id)
    }

    #[must_use]
    pub fn top_percentile(&self, percentile: u32) -> Vec<&Reviewer> {
        queries::top_percentile(&self.store, percentile)
    }

    #[must_use]
    pub fn bottom_percentile(&self, percentile: u32) -> Vec<&Reviewer> {
        queries::bottom_percentile(&self.store, percentile)
    }

    #[must_use]
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<u32> {
        queries::edge_weight(&self.graph, a, b)
    }

    #[must_use]
    pub fn shortest_path_len(&self, a: &str, b: &str) -> Option<u32> {
        queries::shortest_path_len(&self.graph, a, b)
    }

    #[must_use]
    pub fn connection_count(&self, user_id: &str) -> Option<usize> {
        queries::connection_count(&self.graph, user_id)
    }

    #[must_use]
    pub fn time_into_product_life(&self, review: &Review) -> i64 {
        queries::time_into_product_life(&self.store, review)
    }

    #[must_use]
    pub fn time_into_reviewer_life(&self, review: &Review) -> i64 {
        queries::time_into_reviewer_life(&self.store, review)
    }

    #[must_use]
    pub fn filter_by_product_amount(&self, min_reviews: u32) -> Vec<&Review> {
        queries::filter_by_product_amount(&self.store, min_reviews)
    }

    #[must_use]
    pub fn search_text(&self, substring: &str) -> Vec<&Review> {
        queries::search_text(&self.store, substring)
    }

    #[must_use]
    pub fn search_summary(&self, substring: &str) -> Vec<&Review> {
        queries::search_summary(&self.store, substring)
    }

    /// Rates an existing review. Always in [0, 1].
    #[must_use]
    pub fn rate_review(&self, config: &RaterConfig, review: &Review) -> f64 {
        crate::rater::rate_review(&self.store, &self.graph, config, review)
    }

    /// Rates a candidate synthesized from raw fields. Always in [0, 1].
    #[must_use]
    pub fn rate_fields(
        &self,
        config: &RaterConfig,
        user_id: &str,
        helpfulness: Option<f64>,
        summary: Option<String>,
        body: Option<String>,
    ) -> f64 {
        crate::rater::rate_fields(
            &self.store,
            &self.graph,
            config,
            user_id,
            helpfulness,
            summary,
            body,
        )
    }
}
