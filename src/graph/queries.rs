// src/graph/queries.rs
//! Ad hoc queries over the built store and adjacency graph. All of these
//! are read-only and safe on an empty build: they return `None` or empty
//! collections rather than failing.

use crate::graph::adjacency::{AdjacencyGraph, Node};
use crate::store::{Review, Reviewer, Store};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, VecDeque};

/// Lookup by unique reviewer id.
#[must_use]
pub fn reviewer_by_id<'a>(store: &'a Store, user_id: &str) -> Option<&'a Reviewer> {
    store.reviewer(user_id)
}

/// Case-insensitive lookup by display name. Names are not unique; the
/// first match in key-sorted (id) iteration order wins, which makes
/// duplicates resolve deterministically by identifier, not arrival order.
#[must_use]
pub fn reviewer_by_name<'a>(store: &'a Store, name: &str) -> Option<&'a Reviewer> {
    let wanted = name.to_lowercase();
    store
        .reviewers()
        .find(|r| r.profile_name.to_lowercase() == wanted)
}

/// Accuracy plus id, ordered so that heap eviction is deterministic even
/// when accuracies tie.
#[derive(Debug, PartialEq)]
struct RankKey {
    accuracy: f64,
    user_id: String,
}

impl Eq for RankKey {}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.accuracy
            .total_cmp(&other.accuracy)
            .then_with(|| self.user_id.cmp(&other.user_id))
    }
}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

fn percentile_size(store: &Store, percentile: u32) -> usize {
    store.reviewer_count() * percentile as usize / 100
}

/// The `floor(N * p / 100)` reviewers with the *lowest* running accuracy
/// (closest to their products' means). Unordered.
#[must_use]
pub fn top_percentile<'a>(store: &'a Store, percentile: u32) -> Vec<&'a Reviewer> {
    let size = percentile_size(store, percentile);
    if size == 0 {
        return Vec::new();
    }
    // Max-heap of the k smallest: evict the largest when over capacity.
    let mut heap: BinaryHeap<RankKey> = BinaryHeap::with_capacity(size + 1);
    for reviewer in store.reviewers() {
        heap.push(RankKey {
            accuracy: reviewer.accuracy(),
            user_id: reviewer.user_id.clone(),
        });
        if heap.len() > size {
            heap.pop();
        }
    }
    resolve(store, heap.into_iter())
}

/// The `floor(N * p / 100)` reviewers with the *highest* running accuracy.
/// Unordered.
#[must_use]
pub fn bottom_percentile<'a>(store: &'a Store, percentile: u32) -> Vec<&'a Reviewer> {
    let size = percentile_size(store, percentile);
    if size == 0 {
        return Vec::new();
    }
    let mut heap: BinaryHeap<Reverse<RankKey>> = BinaryHeap::with_capacity(size + 1);
    for reviewer in store.reviewers() {
        heap.push(Reverse(RankKey {
            accuracy: reviewer.accuracy(),
            user_id: reviewer.user_id.clone(),
        }));
        if heap.len() > size {
            heap.pop();
        }
    }
    resolve(store, heap.into_iter().map(|r| r.0))
}

fn resolve<'a>(store: &'a Store, keys: impl Iterator<Item = RankKey>) -> Vec<&'a Reviewer> {
    keys.filter_map(|k| store.reviewer(&k.user_id)).collect()
}

/// Weight of the edge between two reviewers: `None` when either id does
/// not resolve to a node, `Some(0)` for two known reviewers with no edge.
#[must_use]
pub fn edge_weight(graph: &AdjacencyGraph, a: &str, b: &str) -> Option<u32> {
    let node_a = graph.node(a)?;
    graph.node(b)?;
    Some(node_a.weight_to(b))
}

/// Number of reviewers adjacent to `user_id`, ignoring edge weight.
/// `None` for an unknown reviewer.
#[must_use]
pub fn connection_count(graph: &AdjacencyGraph, user_id: &str) -> Option<usize> {
    graph.node(user_id).map(Node::degree)
}

/// Hop count of the shortest unweighted path between two reviewers, via
/// BFS. `Some(0)` when `a == b`, `None` when either id is unknown or the
/// pair is unreachable. Visited marks live in a map allocated fresh per
/// call, so concurrent read-only queries never interfere, and re-enqueue
/// guards make termination immediate on cyclic graphs.
#[must_use]
pub fn shortest_path_len(graph: &AdjacencyGraph, a: &str, b: &str) -> Option<u32> {
    if !graph.contains(a) || !graph.contains(b) {
        return None;
    }
    if a == b {
        return Some(0);
    }

    let mut marks: HashMap<&str, u32> = HashMap::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    marks.insert(a, 0);
    queue.push_back(a);

    while let Some(current) = queue.pop_front() {
        let depth = marks[current];
        let node = graph.node(current)?;
        for (neighbor, _weight) in node.neighbors() {
            if marks.contains_key(neighbor) {
                continue;
            }
            if neighbor == b {
                return Some(depth + 1);
            }
            marks.insert(neighbor, depth + 1);
            queue.push_back(neighbor);
        }
    }
    None
}

/// All reviews of the product, in ingestion order; empty for an unknown
/// id. Calling twice returns the same sequence.
#[must_use]
pub fn reviews_for_product<'a>(store: &'a Store, product_id: &str) -> Vec<&'a Review> {
    if store.product(product_id).is_none() {
        return Vec::new();
    }
    store
        .reviews()
        .iter()
        .filter(|r| r.product_id.as_deref() == Some(product_id))
        .collect()
}

/// All reviews whose product has at least `min_reviews` reviews.
#[must_use]
pub fn filter_by_product_amount(store: &Store, min_reviews: u32) -> Vec<&Review> {
    store
        .reviews()
        .iter()
        .filter(|r| {
            r.product_id
                .as_deref()
                .and_then(|id| store.product(id))
                .is_some_and(|p| p.review_count() >= min_reviews)
        })
        .collect()
}

/// All reviews whose body contains `substring` (not a regex).
#[must_use]
pub fn search_text<'a>(store: &'a Store, substring: &str) -> Vec<&'a Review> {
    store
        .reviews()
        .iter()
        .filter(|r| r.text.as_deref().is_some_and(|t| t.contains(substring)))
        .collect()
}

/// All reviews whose summary contains `substring` (not a regex).
#[must_use]
pub fn search_summary<'a>(store: &'a Store, substring: &str) -> Vec<&'a Review> {
    store
        .reviews()
        .iter()
        .filter(|r| r.summary.as_deref().is_some_and(|s| s.contains(substring)))
        .collect()
}

/// Seconds between this review and the earliest review of the same
/// product, itself included. Always >= 0; 0 for a candidate with no
/// product or timestamp. Linear scan over the review sequence.
#[must_use]
pub fn time_into_product_life(store: &Store, review: &Review) -> i64 {
    let Some(time) = review.time else { return 0 };
    let mut first = time;
    if let Some(product_id) = review.product_id.as_deref() {
        for r in store.reviews() {
            if r.product_id.as_deref() == Some(product_id) {
                if let Some(t) = r.time {
                    first = first.min(t);
                }
            }
        }
    }
    time - first
}

/// Seconds between this review and the author's earliest review. 0 when
/// the author is unknown to the store or has no recorded reviews.
#[must_use]
pub fn time_into_reviewer_life(store: &Store, review: &Review) -> i64 {
    let Some(time) = review.time else { return 0 };
    let Some(reviewer) = store.reviewer(&review.user_id) else {
        return 0;
    };
    let mut first = time;
    for &id in reviewer.review_ids() {
        if let Some(t) = store.reviews()[id].time {
            first = first.min(t);
        }
    }
    time - first
}
