// src/parser.rs
//! Streaming parser for the labeled-block review dataset.
//!
//! One record is eight consecutive `Label: value` lines; blank lines
//! separate records. A parse failure in any field drops exactly that one
//! record: the reader skips forward to the next blank line and resumes.

use crate::error::{EngineError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Why a single field (and therefore its whole record) was rejected.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("missing `: ` label separator")]
    MissingSeparator,
    #[error("bad helpfulness token: {0:?}")]
    Helpfulness(String),
    #[error("bad numeric field: {0:?}")]
    Number(String),
    #[error("record truncated by end of input")]
    Truncated,
}

/// One fully parsed review record, fields in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub product_id: String,
    pub user_id: String,
    pub profile_name: String,
    /// `None` when the `N/D` token had a zero denominator (never rated).
    pub helpfulness: Option<f64>,
    /// Star score, rounded from a possibly fractional source token.
    pub score: i32,
    /// Unix timestamp of posting.
    pub time: i64,
    pub summary: String,
    pub text: String,
}

/// Pull-based record reader over any line-oriented source.
///
/// Restartable only by reopening the source; counters are monotone.
pub struct RecordReader<R: BufRead> {
    lines: std::io::Lines<R>,
    max_records: usize,
    seen: usize,
    dropped: usize,
}

impl RecordReader<BufReader<File>> {
    /// Opens the dataset file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::SourceUnavailable` if the file cannot be
    /// opened. This is the only error the parser ever surfaces; everything
    /// past open succeeds with possibly fewer records.
    pub fn open(path: &Path, max_records: usize) -> Result<Self> {
        let file = File::open(path).map_err(|source| EngineError::SourceUnavailable {
            source,
            path: path.to_path_buf(),
        })?;
        Ok(Self::new(BufReader::new(file), max_records))
    }
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R, max_records: usize) -> Self {
        Self {
            lines: reader.lines(),
            max_records,
            seen: 0,
            dropped: 0,
        }
    }

    /// Records consumed so far, valid and dropped alike.
    #[must_use]
    pub fn records_seen(&self) -> usize {
        self.seen
    }

    /// Records rejected by the error-recovery policy.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Fraction of the configured maximum consumed so far, in [0, 1].
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.max_records == 0 {
            return 1.0;
        }
        (self.seen as f64 / self.max_records as f64).min(1.0)
    }

    /// Yields the next valid record, silently dropping malformed ones.
    /// Returns `None` at end of input or once the record cap is reached.
    pub fn next_record(&mut self) -> Option<RawRecord> {
        while self.seen < self.max_records {
            let first = self.next_nonblank_line()?;
            self.seen += 1;
            match self.parse_block(&first) {
                Ok(record) => return Some(record),
                Err(_) => {
                    self.dropped += 1;
                    self.skip_to_boundary();
                }
            }
        }
        None
    }

    fn next_nonblank_line(&mut self) -> Option<String> {
        loop {
            let line = self.next_line()?;
            if !line.is_empty() {
                return Some(line);
            }
        }
    }

    // A mid-stream read error is treated as end of input, keeping the
    // parser's promise that nothing past open is fatal.
    fn next_line(&mut self) -> Option<String> {
        self.lines.next()?.ok()
    }

    fn field_line(&mut self) -> std::result::Result<String, FieldError> {
        self.next_line().ok_or(FieldError::Truncated)
    }

    fn parse_block(&mut self, first: &str) -> std::result::Result<RawRecord, FieldError> {
        let product_id = strip_label(first)?.to_string();
        let user_id = owned_value(&self.field_line()?)?;
        let profile_name = owned_value(&self.field_line()?)?;
        let helpfulness = parse_helpfulness(strip_label(&self.field_line()?)?)?;
        let score = parse_score(strip_label(&self.field_line()?)?)?;
        let time = parse_number(strip_label(&self.field_line()?)?)?;
        let summary = owned_value(&self.field_line()?)?;
        let text = owned_value(&self.field_line()?)?;

        Ok(RawRecord {
            product_id,
            user_id,
            profile_name,
            helpfulness,
            score,
            time,
            summary,
            text,
        })
    }

    fn skip_to_boundary(&mut self) {
        while let Some(line) = self.next_line() {
            if line.is_empty() {
                return;
            }
        }
    }
}

/// Returns the portion of `line` after the first occurrence of `": "`.
///
/// # Errors
///
/// Fails if the line carries no label separator.
pub fn strip_label(line: &str) -> std::result::Result<&str, FieldError> {
    line.find(": ")
        .map(|i| &line[i + 2..])
        .ok_or(FieldError::MissingSeparator)
}

fn owned_value(line: &str) -> std::result::Result<String, FieldError> {
    strip_label(line).map(ToString::to_string)
}

/// Parses an `N/D` helpfulness token. A zero denominator means the review
/// was never rated and maps to `None` rather than dividing by zero.
fn parse_helpfulness(token: &str) -> std::result::Result<Option<f64>, FieldError> {
    let (num, den) = token
        .split_once('/')
        .ok_or_else(|| FieldError::Helpfulness(token.to_string()))?;
    let num: f64 = num
        .parse()
        .map_err(|_| FieldError::Helpfulness(token.to_string()))?;
    let den: f64 = den
        .parse()
        .map_err(|_| FieldError::Helpfulness(token.to_string()))?;
    if den == 0.0 {
        Ok(None)
    } else {
        Ok(Some(num / den))
    }
}

// Some dumps write scores as "5.0"; round to the integer star count.
fn parse_score(value: &str) -> std::result::Result<i32, FieldError> {
    let score: f64 = value
        .parse()
        .map_err(|_| FieldError::Number(value.to_string()))?;
    Ok(score.round() as i32)
}

fn parse_number(value: &str) -> std::result::Result<i64, FieldError> {
    value.parse().map_err(|_| FieldError::Number(value.to_string()))
}
