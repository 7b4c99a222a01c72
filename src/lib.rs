pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod parser;
pub mod progress;
pub mod rater;
pub mod store;

pub use crate::engine::Engine;
pub use crate::graph::BuildResult;
