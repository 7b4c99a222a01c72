// src/progress.rs
//! Progress reporting seam between the ingestion loop and its caller.
//! The engine only emits fractions; rendering belongs to the front end.

/// Receives a monotonically increasing fraction in [0, 1] of records
/// consumed toward the configured maximum.
pub trait ProgressSink {
    fn progress(&mut self, fraction: f64);
}

/// Discards all progress updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn progress(&mut self, _fraction: f64) {}
}

/// Adapts a closure into a sink.
pub struct FnSink<F: FnMut(f64)>(pub F);

impl<F: FnMut(f64)> ProgressSink for FnSink<F> {
    fn progress(&mut self, fraction: f64) {
        (self.0)(fraction);
    }
}
