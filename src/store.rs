// src/store.rs
//! Canonical owners of products, reviewers, and the review sequence.
//!
//! Entities live for the process lifetime once created; there is no
//! deletion. Keyed maps are `BTreeMap` so that iteration order (and
//! therefore name lookup and tie-breaking) is deterministic by identifier.

use crate::parser::RawRecord;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// A product listing, tracking a running mean of the scores given to it.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub product_id: String,
    score_sum: i64,
    review_count: u32,
}

impl Product {
    #[must_use]
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            score_sum: 0,
            review_count: 0,
        }
    }

    /// Folds one more score into the running mean.
    pub fn add_score(&mut self, score: i32) {
        self.score_sum += i64::from(score);
        self.review_count += 1;
    }

    /// Mean score over all reviews folded in so far; 0 before any.
    #[must_use]
    pub fn mean_score(&self) -> f64 {
        if self.review_count == 0 {
            return 0.0;
        }
        self.score_sum as f64 / f64::from(self.review_count)
    }

    #[must_use]
    pub fn review_count(&self) -> u32 {
        self.review_count
    }
}

/// A user of the reviewing system. `user_id` doubles as the graph key.
#[derive(Debug, Clone, Serialize)]
pub struct Reviewer {
    pub user_id: String,
    pub profile_name: String,
    review_ids: Vec<usize>,
    accuracy: f64,
}

impl Reviewer {
    #[must_use]
    pub fn new(user_id: impl Into<String>, profile_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            profile_name: profile_name.into(),
            review_ids: Vec::new(),
            accuracy: 0.0,
        }
    }

    /// Attaches a review (by index into the global sequence), folding its
    /// accuracy-at-this-moment into the running mean.
    pub fn attach_review(&mut self, review_id: usize, accuracy_now: f64) {
        let n = self.review_ids.len() as f64;
        self.accuracy = (self.accuracy * n + accuracy_now) / (n + 1.0);
        self.review_ids.push(review_id);
    }

    /// Running mean accuracy, using product means as they stood when each
    /// review was attached. Never recomputed retroactively.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Indices into the store's review sequence, in ingestion order.
    #[must_use]
    pub fn review_ids(&self) -> &[usize] {
        &self.review_ids
    }

    #[must_use]
    pub fn review_count(&self) -> usize {
        self.review_ids.len()
    }
}

/// An immutable review record. `product_id` and `time` are optional so
/// that the rater can score a candidate synthesized from raw form fields
/// with no backing product.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub product_id: Option<String>,
    pub user_id: String,
    pub helpfulness: Option<f64>,
    pub score: i32,
    pub time: Option<i64>,
    pub summary: Option<String>,
    pub text: Option<String>,
}

impl Review {
    /// A candidate review for preview scoring: no product, no timestamp.
    #[must_use]
    pub fn candidate(
        user_id: impl Into<String>,
        helpfulness: Option<f64>,
        summary: Option<String>,
        text: Option<String>,
    ) -> Self {
        Self {
            product_id: None,
            user_id: user_id.into(),
            helpfulness,
            score: 0,
            time: None,
            summary,
            text,
        }
    }

    /// Accuracy against the given product mean: the absolute distance
    /// between the star score and the mean. Evaluated at query time, so
    /// repeated calls may differ as the product accrues reviews.
    #[must_use]
    pub fn accuracy_against(&self, product_mean: f64) -> f64 {
        (f64::from(self.score) - product_mean).abs()
    }

    #[must_use]
    pub fn summary_word_count(&self) -> usize {
        self.summary.as_deref().map_or(0, word_count)
    }

    #[must_use]
    pub fn text_word_count(&self) -> usize {
        self.text.as_deref().map_or(0, word_count)
    }
}

impl From<RawRecord> for Review {
    fn from(r: RawRecord) -> Self {
        Self {
            product_id: Some(r.product_id),
            user_id: r.user_id,
            helpfulness: r.helpfulness,
            score: r.score,
            time: Some(r.time),
            summary: Some(r.summary),
            text: Some(r.text),
        }
    }
}

/// Counts `\w+` matches, the same word definition the scoring model was
/// tuned against.
#[must_use]
pub fn word_count(text: &str) -> usize {
    WORD_RE.find_iter(text).count()
}

/// Exclusive owner of all products, reviewers, and reviews.
#[derive(Debug, Default)]
pub struct Store {
    products: BTreeMap<String, Product>,
    reviewers: BTreeMap<String, Reviewer>,
    reviews: Vec<Review>,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products.get(product_id)
    }

    #[must_use]
    pub fn reviewer(&self, user_id: &str) -> Option<&Reviewer> {
        self.reviewers.get(user_id)
    }

    /// All reviews in ingestion order.
    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// Reviewers in key-sorted order.
    pub fn reviewers(&self) -> impl Iterator<Item = &Reviewer> {
        self.reviewers.values()
    }

    /// Products in key-sorted order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    #[must_use]
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn reviewer_count(&self) -> usize {
        self.reviewers.len()
    }

    #[must_use]
    pub fn review_count(&self) -> usize {
        self.reviews.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    /// Accuracy of a review against its product's mean as of now.
    /// 0 for candidates with no backing product.
    #[must_use]
    pub fn review_accuracy(&self, review: &Review) -> f64 {
        let mean = review
            .product_id
            .as_deref()
            .and_then(|id| self.products.get(id))
            .map_or(0.0, Product::mean_score);
        review.accuracy_against(mean)
    }

    /// Idempotent get-or-create, then folds the score into the mean.
    pub(crate) fn fold_product_score(&mut self, product_id: &str, score: i32) {
        self.products
            .entry(product_id.to_string())
            .or_insert_with(|| Product::new(product_id))
            .add_score(score);
    }

    /// Idempotent get-or-create, then attaches the review index. The
    /// profile name seen first wins; later sightings do not rename.
    pub(crate) fn attach_to_reviewer(
        &mut self,
        user_id: &str,
        profile_name: &str,
        review_id: usize,
        accuracy_now: f64,
    ) {
        self.reviewers
            .entry(user_id.to_string())
            .or_insert_with(|| Reviewer::new(user_id, profile_name))
            .attach_review(review_id, accuracy_now);
    }

    pub(crate) fn push_review(&mut self, review: Review) {
        self.reviews.push(review);
    }
}
