//! Crucible Graph — Neo4j client for the chemistry knowledge graph.
//!
//! This crate is the single mutation point for the knowledge graph. All graph
//! reads and writes flow through [`GraphClient`] so that natural-key identity,
//! endpoint validation, and attribute allowlists hold everywhere.

pub mod client;
pub mod mutations;
pub mod queries;

pub use client::{GraphClient, GraphConfig, GraphError};
