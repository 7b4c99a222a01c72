// tests/unit_rater.rs
//! Tests for the heuristic rater: bounds, attribute skipping, keyword
//! correlation, and the connection-percentile sub-algorithm.

use reviewnet_core::config::RaterConfig;
use reviewnet_core::graph::builder;
use reviewnet_core::graph::AdjacencyGraph;
use reviewnet_core::parser::RecordReader;
use reviewnet_core::progress::NullSink;
use reviewnet_core::rater::{capital_word_count, connection_percentile, rate_fields, rate_review};
use reviewnet_core::store::{Review, Store};
use std::io::Cursor;

fn block(product: &str, user: &str, score: i32, time: i64, summary: &str, text: &str) -> String {
    format!(
        "product/productId: {product}\n\
         review/userId: {user}\n\
         review/profileName: {user}-name\n\
         review/helpfulness: 3/4\n\
         review/score: {score}\n\
         review/time: {time}\n\
         review/summary: {summary}\n\
         review/text: {text}\n\n"
    )
}

fn build_from(data: &str) -> (Store, AdjacencyGraph) {
    let mut reader = RecordReader::new(Cursor::new(data.to_string()), 10_000);
    let mut store = Store::new();
    let mut graph = AdjacencyGraph::new();
    builder::build(&mut reader, &mut store, &mut graph, 1, &mut NullSink);
    (store, graph)
}

fn empty() -> (Store, AdjacencyGraph) {
    (Store::new(), AdjacencyGraph::new())
}

#[test]
fn test_all_absent_rates_zero() {
    let (store, graph) = empty();
    let cfg = RaterConfig::default();
    let rating = rate_fields(&store, &graph, &cfg, "nobody", None, None, None);
    assert_eq!(rating, 0.0);
}

#[test]
fn test_rating_bounds_across_field_combinations() {
    let (store, graph) = empty();
    let cfg = RaterConfig::default();
    let summaries = [None, Some(String::new()), Some("short".to_string())];
    let bodies = [
        None,
        Some("SHOUTING ONLY".to_string()),
        Some("the worst and the best of bodies with quite a few plain words".to_string()),
    ];
    let helps = [None, Some(0.0), Some(0.5), Some(1.0)];

    for summary in &summaries {
        for body in &bodies {
            for help in helps {
                let r = rate_fields(&store, &graph, &cfg, "U1", help, summary.clone(), body.clone());
                assert!((0.0..=1.0).contains(&r), "rating {r} out of bounds");
            }
        }
    }
}

#[test]
fn test_perfect_helpfulness_alone_rates_one() {
    let (store, graph) = empty();
    let cfg = RaterConfig::default();
    let rating = rate_fields(&store, &graph, &cfg, "nobody", Some(1.0), None, None);
    assert!((rating - 1.0).abs() < 1e-12);
}

#[test]
fn test_negative_keyword_lowers_rating() {
    let (store, graph) = empty();
    let cfg = RaterConfig::default();
    // Same word count, same capitals; only the marker word differs.
    let neutral = rate_fields(
        &store, &graph, &cfg, "U1", None, None,
        Some("this is a plain review body".to_string()),
    );
    let negative = rate_fields(
        &store, &graph, &cfg, "U1", None, None,
        Some("this is a worst review body".to_string()),
    );
    let positive = rate_fields(
        &store, &graph, &cfg, "U1", None, None,
        Some("this is a nice review body".to_string()),
    );
    assert!(negative < neutral);
    assert!(positive > neutral);
}

#[test]
fn test_keyword_match_is_case_insensitive() {
    let (store, graph) = empty();
    let cfg = RaterConfig::default();
    let upper = rate_fields(
        &store, &graph, &cfg, "U1", None, None,
        Some("simply the BEST thing ever really".to_string()),
    );
    let lower = rate_fields(
        &store, &graph, &cfg, "U1", None, None,
        Some("simply the best thing ever really".to_string()),
    );
    // BEST is also a fully capitalized word, so the capitals attribute
    // drags the upper-case variant down; the keyword still fires for both.
    let no_keyword = rate_fields(
        &store, &graph, &cfg, "U1", None, None,
        Some("simply the BIG thing ever really".to_string()),
    );
    assert!(lower > upper);
    assert!(upper > no_keyword);
}

#[test]
fn test_capitals_penalize_body() {
    let (store, graph) = empty();
    let cfg = RaterConfig::default();
    let calm = rate_fields(
        &store, &graph, &cfg, "U1", None, None,
        Some("a perfectly calm review body".to_string()),
    );
    let loud = rate_fields(
        &store, &graph, &cfg, "U1", None, None,
        Some("a perfectly CALM review body".to_string()),
    );
    assert!(loud < calm);
}

#[test]
fn test_capital_word_count_rules() {
    assert_eq!(capital_word_count("GREAT product, A+ would BUY"), 3);
    assert_eq!(capital_word_count("1234 !!! ..."), 0);
    assert_eq!(capital_word_count("MiXeD Case words"), 0);
}

#[test]
fn test_connection_percentile_ranks_descending_accuracy() {
    // One run over P1: U1 scores 5 against mean 0 (accuracy 5), U2 scores
    // 5 against mean 5 (accuracy 0), U3 scores 1 against mean 5
    // (accuracy 4). All three are mutually adjacent.
    let data = block("P1", "U1", 5, 1, "s", "t")
        + &block("P1", "U2", 5, 2, "s", "t")
        + &block("P1", "U3", 1, 3, "s", "t");
    let (store, graph) = build_from(&data);

    let u1 = store.reviewer("U1").unwrap();
    let u2 = store.reviewer("U2").unwrap();
    let u3 = store.reviewer("U3").unwrap();

    // Descending accuracy: U1 (5), U3 (4), U2 (0).
    assert!((connection_percentile(&store, &graph, u1) - 100.0).abs() < 1e-9);
    let p3 = connection_percentile(&store, &graph, u3);
    assert!((p3 - 200.0 / 3.0).abs() < 1e-9);
    let p2 = connection_percentile(&store, &graph, u2);
    assert!((p2 - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_connection_percentile_isolated_reviewer_is_100() {
    let data = block("P1", "U1", 5, 1, "s", "t");
    let (store, graph) = build_from(&data);
    let u1 = store.reviewer("U1").unwrap();
    assert!((connection_percentile(&store, &graph, u1) - 100.0).abs() < 1e-9);
}

#[test]
fn test_connection_percentile_ties_break_by_id() {
    // One run over P1: UA scores against mean 0 (accuracy 5), then UB and
    // UC both score against mean 5 and tie at accuracy 0.
    let data = block("P1", "UA", 5, 1, "s", "t")
        + &block("P1", "UB", 5, 2, "s", "t")
        + &block("P1", "UC", 5, 3, "s", "t");
    let (store, graph) = build_from(&data);

    let ub = store.reviewer("UB").unwrap();
    let uc = store.reviewer("UC").unwrap();
    assert_eq!(ub.accuracy(), uc.accuracy());

    // Ranked: UA (5), then the tie UB before UC by id.
    // UB: position 1 of 3 -> 100 * 2/3; UC: position 2 -> 100 * 1/3.
    assert!((connection_percentile(&store, &graph, ub) - 200.0 / 3.0).abs() < 1e-9);
    assert!((connection_percentile(&store, &graph, uc) - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_rate_existing_review_in_bounds() {
    let data = block("P1", "U1", 5, 100, "Great snack", "I love this nice snack quite a lot")
        + &block("P1", "U2", 4, 200, "Good", "decent snack overall I suppose");
    let (store, graph) = build_from(&data);
    let cfg = RaterConfig::default();

    for review in store.reviews() {
        let r = rate_review(&store, &graph, &cfg, review);
        assert!((0.0..=1.0).contains(&r), "rating {r} out of bounds");
    }
}

#[test]
fn test_unknown_reviewer_skips_graph_attributes() {
    let data = block("P1", "U1", 5, 100, "s", "t");
    let (store, graph) = build_from(&data);
    let cfg = RaterConfig::default();

    // Identical textual fields; only the author differs. The known author
    // picks up graph-derived attributes, so ratings must differ.
    let known = Review::candidate("U1", Some(1.0), None, None);
    let unknown = Review::candidate("ghost", Some(1.0), None, None);
    let r_known = rate_review(&store, &graph, &cfg, &known);
    let r_unknown = rate_review(&store, &graph, &cfg, &unknown);

    assert!((r_unknown - 1.0).abs() < 1e-12);
    assert!(r_known < r_unknown);
}
