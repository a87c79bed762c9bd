//! crucible-seed: Example dataset loader for the Crucible knowledge graph.
//!
//! Two classroom chemistry experiments, kept as declarative data and applied
//! through the public graph client operations.

pub mod dataset;
pub mod seed;
