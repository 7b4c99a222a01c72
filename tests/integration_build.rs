// tests/integration_build.rs
//! End-to-end tests over real dataset files on disk: build, query, rate.

use reviewnet_core::config::Config;
use reviewnet_core::error::EngineError;
use reviewnet_core::progress::{FnSink, NullSink};
use reviewnet_core::Engine;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn block(product: &str, user: &str, name: &str, help: &str, score: &str, time: i64) -> String {
    format!(
        "product/productId: {product}\n\
         review/userId: {user}\n\
         review/profileName: {name}\n\
         review/helpfulness: {help}\n\
         review/score: {score}\n\
         review/time: {time}\n\
         review/summary: Quality item\n\
         review/text: I love this nice item and would buy it again\n\n"
    )
}

fn write_dataset(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("foods.txt");
    fs::write(&path, content).expect("write dataset");
    path
}

#[test]
fn test_build_and_query_end_to_end() {
    let dir = TempDir::new().unwrap();
    let data = block("B001", "U1", "Alice", "3/4", "5.0", 100)
        + &block("B001", "U2", "Bob", "3/0", "4", 200)
        + &block("B002", "U1", "Alice", "1/1", "2", 300);
    let path = write_dataset(&dir, &data);

    let config = Config::new();
    let mut engine = Engine::new();
    let mut fractions = Vec::new();
    let result = {
        let mut sink = FnSink(|f| fractions.push(f));
        engine.build_from_source(&path, &config, &mut sink).expect("build")
    };

    assert_eq!(result.review_count, 3);
    assert_eq!(result.reviewer_count, 2);
    assert_eq!(result.product_count, 2);
    assert_eq!(result.dropped_records, 0);

    assert!(!fractions.is_empty());
    assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
    assert!(fractions.iter().all(|f| (0.0..=1.0).contains(f)));

    // The 3/0 helpfulness token parsed to unrated, not a crash.
    let b001 = engine.reviews_for_product("B001");
    assert_eq!(b001.len(), 2);
    assert_eq!(b001[1].helpfulness, None);

    assert_eq!(engine.reviewer_by_name("alice").unwrap().user_id, "U1");
    assert_eq!(engine.edge_weight("U1", "U2"), Some(1));
    assert_eq!(engine.shortest_path_len("U1", "U2"), Some(1));
    assert_eq!(engine.connection_count("U2"), Some(1));

    let rating = engine.rate_review(&config.rater, b001[0]);
    assert!((0.0..=1.0).contains(&rating));

    let preview = engine.rate_fields(
        &config.rater,
        "U1",
        Some(0.9),
        Some("Quality item".to_string()),
        Some("decent enough".to_string()),
    );
    assert!((0.0..=1.0).contains(&preview));
}

#[test]
fn test_missing_source_leaves_engine_empty() {
    let config = Config::new();
    let mut engine = Engine::new();
    let err = engine
        .build_from_source(&PathBuf::from("definitely/not/here.txt"), &config, &mut NullSink)
        .err()
        .expect("should fail");
    assert!(matches!(err, EngineError::SourceUnavailable { .. }));

    // Empty state stays queryable.
    assert!(engine.reviews_for_product("B001").is_empty());
    assert!(engine.reviewer_by_id("U1").is_none());
    assert!(engine.top_percentile(100).is_empty());
    assert_eq!(engine.shortest_path_len("U1", "U2"), None);
    assert_eq!(engine.rate_fields(&config.rater, "U1", None, None, None), 0.0);
}

#[test]
fn test_corrupt_record_mid_file() {
    let dir = TempDir::new().unwrap();
    let mut data = String::new();
    for i in 0..10 {
        let score = if i == 4 { "five" } else { "5" };
        data += &block("B001", &format!("U{i}"), "Name", "1/2", score, 100 + i);
    }
    let path = write_dataset(&dir, &data);

    let config = Config::new();
    let mut engine = Engine::new();
    let result = engine
        .build_from_source(&path, &config, &mut NullSink)
        .expect("build survives corrupt record");

    assert_eq!(result.review_count, 9);
    assert_eq!(result.dropped_records, 1);
    assert!(engine.reviewer_by_id("U4").is_none());
}

#[test]
fn test_max_records_caps_ingestion() {
    let dir = TempDir::new().unwrap();
    let mut data = String::new();
    for i in 0..20 {
        data += &block(&format!("B{i}"), &format!("U{i}"), "Name", "1/2", "5", 100);
    }
    let path = write_dataset(&dir, &data);

    let mut config = Config::new();
    config.max_records = 7;
    let mut engine = Engine::new();
    let result = engine
        .build_from_source(&path, &config, &mut NullSink)
        .expect("build");
    assert_eq!(result.review_count, 7);
}

#[test]
fn test_build_result_serializes_to_json() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir, &block("B001", "U1", "Alice", "1/2", "5", 100));

    let config = Config::new();
    let mut engine = Engine::new();
    let result = engine
        .build_from_source(&path, &config, &mut NullSink)
        .expect("build");

    let json = serde_json::to_string(&result).expect("serialize");
    assert!(json.contains("\"review_count\":1"));
    assert!(json.contains("\"dropped_records\":0"));

    let reviews = engine.reviews_for_product("B001");
    let json = serde_json::to_string(&reviews).expect("serialize reviews");
    assert!(json.contains("\"user_id\":\"U1\""));
}
