//! crucible-core: Shared domain model for the Crucible chemistry knowledge graph.
//!
//! This crate provides the foundational types used across all Crucible components:
//! - Node kinds (Experiment, Substance, etc.) with their natural-key metadata
//! - Relationship kinds (UsesSubstance, HasStep, etc.) with endpoint constraints
//! - Sparse attribute maps carried by nodes and relationships
//! - Node references addressing nodes by natural key or surrogate id

pub mod types;

pub use types::{
    AttrValue, Attrs, CreationMode, NodeId, NodeKey, NodeKind, NodeRef, RelKind,
};
