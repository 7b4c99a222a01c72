// src/config.rs
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Local override file, read from the working directory if present.
pub const CONFIG_FILE: &str = "reviewnet.toml";

/// Records ingested before the stream is cut off. The stock Amazon
/// fine-foods dump holds 568,454 records; the default cap keeps a full
/// build under a few seconds.
pub const DEFAULT_MAX_RECORDS: usize = 100_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hard cap on records consumed from the dataset (valid or dropped).
    pub max_records: usize,
    /// Emit a progress callback every this many consumed records.
    pub progress_batch: usize,
    #[serde(skip)]
    pub verbose: bool,
    pub rater: RaterConfig,
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new config and applies local overrides (`reviewnet.toml`).
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::new();
        config.load_local_config();
        config
    }

    pub fn load_local_config(&mut self) {
        if let Ok(content) = fs::read_to_string(Path::new(CONFIG_FILE)) {
            self.parse_toml(&content);
        }
    }

    pub fn parse_toml(&mut self, content: &str) {
        match toml::from_str::<Config>(content) {
            Ok(parsed) => *self = parsed,
            Err(e) => eprintln!("Ignoring malformed {CONFIG_FILE}: {e}"),
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a record cap of zero or a negative rater weight
    /// slipped in through an override file.
    pub fn validate(&self) -> Result<()> {
        if self.max_records == 0 {
            return Err(EngineError::Config("max_records must be at least 1".into()));
        }
        if self.progress_batch == 0 {
            return Err(EngineError::Config("progress_batch must be at least 1".into()));
        }
        self.rater.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_records: DEFAULT_MAX_RECORDS,
            progress_batch: 1,
            verbose: false,
            rater: RaterConfig::default(),
        }
    }
}

/// Ideal values and weights for the heuristic rater, plus the
/// keyword-correlation table. Built once at startup and treated as
/// immutable from then on; the rater takes it by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RaterConfig {
    pub ideal_summary_words: f64,
    pub ideal_text_words: f64,
    pub ideal_helpfulness: f64,
    pub ideal_accuracy: f64,
    pub ideal_connections: f64,
    /// Seconds of reviewer tenure considered ideal (one year).
    pub ideal_reviewer_life: f64,

    pub weight_summary: f64,
    pub weight_text: f64,
    pub weight_capitals: f64,
    /// Applied per keyword actually found in the body.
    pub weight_keyword: f64,
    pub weight_helpfulness: f64,
    pub weight_accuracy: f64,
    pub weight_connections: f64,
    pub weight_product_life: f64,
    pub weight_reviewer_life: f64,

    /// Marker words whose presence correlates with an accurate review.
    pub positive_keywords: Vec<String>,
    /// Marker words whose presence correlates with an inaccurate review.
    pub negative_keywords: Vec<String>,
}

impl RaterConfig {
    fn validate(&self) -> Result<()> {
        let weights = [
            self.weight_summary,
            self.weight_text,
            self.weight_capitals,
            self.weight_keyword,
            self.weight_helpfulness,
            self.weight_accuracy,
            self.weight_connections,
            self.weight_product_life,
            self.weight_reviewer_life,
        ];
        if weights.iter().any(|w| *w < 0.0 || !w.is_finite()) {
            return Err(EngineError::Config(
                "rater weights must be finite and non-negative".into(),
            ));
        }
        Ok(())
    }
}

impl Default for RaterConfig {
    fn default() -> Self {
        Self {
            ideal_summary_words: 5.0,
            ideal_text_words: 35.0,
            ideal_helpfulness: 1.0,
            ideal_accuracy: 1.0,
            ideal_connections: 100.0,
            ideal_reviewer_life: 365.0 * 24.0 * 3600.0,

            weight_summary: 0.10,
            weight_text: 0.40,
            weight_capitals: 0.15,
            weight_keyword: 0.20,
            weight_helpfulness: 1.00,
            weight_accuracy: 1.00,
            weight_connections: 0.50,
            weight_product_life: 0.05,
            weight_reviewer_life: 0.01,

            positive_keywords: ["best", "nice", "sucks", "love"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            negative_keywords: vec!["worst".to_string()],
        }
    }
}
