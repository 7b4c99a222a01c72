// src/graph/mod.rs
pub mod adjacency;
pub mod builder;
pub mod queries;

pub use self::adjacency::AdjacencyGraph;
pub use self::builder::BuildResult;
