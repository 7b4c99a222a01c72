// src/rater.rs
//! Heuristic authenticity rating. Each applicable attribute of a review
//! maps to an observed value in [0, 1] and a weight; the rating is the
//! weighted mean of the observed values.
//!
//! Three attribute shapes exist:
//! - closeness to a finite ideal: `max(0, 1 - |value - ideal| / ideal)`
//! - presence-is-bad: any positive value observes 0, absence observes 1
//! - presence-is-good: any positive value observes 1, absence observes 0

use crate::config::RaterConfig;
use crate::graph::adjacency::AdjacencyGraph;
use crate::graph::queries;
use crate::store::{Review, Reviewer, Store};

/// Accumulates (observed, weight) pairs for one rating.
#[derive(Debug, Default)]
struct Tally {
    weighted_sum: f64,
    total_weight: f64,
}

impl Tally {
    fn add(&mut self, observed: f64, weight: f64) {
        self.weighted_sum += observed * weight;
        self.total_weight += weight;
    }

    fn closeness(&mut self, value: f64, ideal: f64, weight: f64) {
        let observed = (1.0 - (value - ideal).abs() / ideal).max(0.0);
        self.add(observed, weight);
    }

    fn presence_bad(&mut self, value: f64, weight: f64) {
        self.add(if value > 0.0 { 0.0 } else { 1.0 }, weight);
    }

    fn presence_good(&mut self, value: f64, weight: f64) {
        self.add(if value > 0.0 { 1.0 } else { 0.0 }, weight);
    }

    /// Weighted mean of everything added. Zero applicable attributes is an
    /// undefined rating; the documented policy resolves it to 0.
    fn rating(&self) -> f64 {
        if self.total_weight == 0.0 {
            return 0.0;
        }
        (self.weighted_sum / self.total_weight).clamp(0.0, 1.0)
    }
}

/// Rates a review against the built store and graph. Attributes whose
/// underlying field is absent (no body text, unrated helpfulness, an
/// author the graph has never seen) are skipped entirely, weight and all.
#[must_use]
pub fn rate_review(
    store: &Store,
    graph: &AdjacencyGraph,
    config: &RaterConfig,
    review: &Review,
) -> f64 {
    let mut tally = Tally::default();

    if let Some(summary) = review.summary.as_deref() {
        tally.closeness(
            crate::store::word_count(summary) as f64,
            config.ideal_summary_words,
            config.weight_summary,
        );
    }

    if let Some(text) = review.text.as_deref() {
        tally.closeness(
            crate::store::word_count(text) as f64,
            config.ideal_text_words,
            config.weight_text,
        );
        tally.presence_bad(capital_word_count(text) as f64, config.weight_capitals);

        let lowered = text.to_lowercase();
        for word in &config.positive_keywords {
            if lowered.contains(&word.to_lowercase()) {
                tally.presence_good(1.0, config.weight_keyword);
            }
        }
        for word in &config.negative_keywords {
            if lowered.contains(&word.to_lowercase()) {
                tally.presence_bad(1.0, config.weight_keyword);
            }
        }
    }

    if let Some(helpfulness) = review.helpfulness {
        tally.closeness(helpfulness, config.ideal_helpfulness, config.weight_helpfulness);
    }

    if let Some(reviewer) = store.reviewer(&review.user_id) {
        tally.closeness(reviewer.accuracy(), config.ideal_accuracy, config.weight_accuracy);
        tally.closeness(
            connection_percentile(store, graph, reviewer),
            config.ideal_connections,
            config.weight_connections,
        );
        tally.presence_bad(
            queries::time_into_product_life(store, review) as f64,
            config.weight_product_life,
        );
        tally.closeness(
            queries::time_into_reviewer_life(store, review) as f64,
            config.ideal_reviewer_life,
            config.weight_reviewer_life,
        );
    }

    tally.rating()
}

/// Rates a candidate synthesized from raw form fields, with no backing
/// product or timestamp. Used for preview scoring before a review exists.
#[must_use]
pub fn rate_fields(
    store: &Store,
    graph: &AdjacencyGraph,
    config: &RaterConfig,
    user_id: &str,
    helpfulness: Option<f64>,
    summary: Option<String>,
    body: Option<String>,
) -> f64 {
    let candidate = Review::candidate(user_id, helpfulness, summary, body);
    rate_review(store, graph, config, &candidate)
}

/// Local standing of a reviewer among its graph neighborhood: the
/// reviewer and all adjacent reviewers are ranked by descending running
/// accuracy (ties broken by ascending id), and the percentile counts the
/// reviewer's position from the bottom, inclusive. The top-ranked
/// reviewer scores 100; an isolated reviewer also scores 100.
#[must_use]
pub fn connection_percentile(
    store: &Store,
    graph: &AdjacencyGraph,
    reviewer: &Reviewer,
) -> f64 {
    let mut ranked: Vec<(f64, &str)> = vec![(reviewer.accuracy(), reviewer.user_id.as_str())];
    if let Some(node) = graph.node(&reviewer.user_id) {
        for (neighbor_id, _weight) in node.neighbors() {
            let accuracy = store.reviewer(neighbor_id).map_or(0.0, Reviewer::accuracy);
            ranked.push((accuracy, neighbor_id));
        }
    }
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));

    let total = ranked.len();
    let position = ranked
        .iter()
        .position(|(_, id)| *id == reviewer.user_id)
        .unwrap_or(0);
    100.0 * (total - position) as f64 / total as f64
}

/// Counts whitespace-delimited tokens that contain at least one letter
/// and no lowercase letters ("FULLY CAPITALIZED" words).
#[must_use]
pub fn capital_word_count(text: &str) -> usize {
    text.split_whitespace()
        .filter(|word| {
            word.chars().any(char::is_alphabetic) && !word.chars().any(char::is_lowercase)
        })
        .count()
}
