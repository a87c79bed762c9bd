//! Core domain types for the Crucible chemistry knowledge graph.
//!
//! These types describe the shape of the graph: which node labels exist, how
//! each is keyed, and which relationships may connect them. The graph client
//! builds its Cypher from the tables encoded here. No I/O, no async.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Node Kinds ────────────────────────────────────────────────────

/// How nodes of a kind come into existence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CreationMode {
    /// Find-or-create keyed by the natural key; repeated upserts widen one node.
    Merge,
    /// Every creation call produces a fresh node carrying a generated surrogate id.
    AppendOnly,
}

/// The node labels of the chemistry knowledge graph.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Experiment,
    Substance,
    Equipment,
    ProcedureStep,
    SafetyMeasure,
    Hazard,
    Observation,
}

impl NodeKind {
    pub const ALL: [NodeKind; 7] = [
        NodeKind::Experiment,
        NodeKind::Substance,
        NodeKind::Equipment,
        NodeKind::ProcedureStep,
        NodeKind::SafetyMeasure,
        NodeKind::Hazard,
        NodeKind::Observation,
    ];

    /// The Cypher label for this kind.
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Experiment => "Experiment",
            NodeKind::Substance => "Substance",
            NodeKind::Equipment => "Equipment",
            NodeKind::ProcedureStep => "ProcedureStep",
            NodeKind::SafetyMeasure => "SafetyMeasure",
            NodeKind::Hazard => "Hazard",
            NodeKind::Observation => "Observation",
        }
    }

    /// The property holding this kind's natural key.
    pub fn key_property(self) -> &'static str {
        match self {
            NodeKind::Experiment | NodeKind::Substance | NodeKind::Equipment | NodeKind::Hazard => {
                "name"
            }
            NodeKind::ProcedureStep | NodeKind::SafetyMeasure | NodeKind::Observation => {
                "description"
            }
        }
    }

    pub fn creation_mode(self) -> CreationMode {
        match self {
            NodeKind::Experiment | NodeKind::Substance | NodeKind::Equipment | NodeKind::Hazard => {
                CreationMode::Merge
            }
            NodeKind::ProcedureStep | NodeKind::SafetyMeasure | NodeKind::Observation => {
                CreationMode::AppendOnly
            }
        }
    }

    /// Optional attributes writable on nodes of this kind.
    ///
    /// Attribute names outside this list are rejected before any Cypher is
    /// built, which also keeps dynamically assembled SET clauses safe.
    pub fn attributes(self) -> &'static [&'static str] {
        match self {
            NodeKind::Experiment => &["objective", "date", "description"],
            NodeKind::Substance => &["formula", "state", "cas_number", "molecular_weight"],
            NodeKind::Equipment => &["type", "description"],
            NodeKind::ProcedureStep => &["order"],
            NodeKind::SafetyMeasure => &["type"],
            NodeKind::Hazard => &["description", "level"],
            NodeKind::Observation => &[],
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Relationship Kinds ────────────────────────────────────────────

/// The typed, directed relationships between nodes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelKind {
    UsesSubstance,
    UsesEquipment,
    HasStep,
    NextStep,
    HasHazard,
    RequiresSafetyMeasure,
    ReactsTo,
    HasObservation,
}

impl RelKind {
    pub const ALL: [RelKind; 8] = [
        RelKind::UsesSubstance,
        RelKind::UsesEquipment,
        RelKind::HasStep,
        RelKind::NextStep,
        RelKind::HasHazard,
        RelKind::RequiresSafetyMeasure,
        RelKind::ReactsTo,
        RelKind::HasObservation,
    ];

    /// The Cypher relationship type for this kind.
    pub fn type_name(self) -> &'static str {
        match self {
            RelKind::UsesSubstance => "USES_SUBSTANCE",
            RelKind::UsesEquipment => "USES_EQUIPMENT",
            RelKind::HasStep => "HAS_STEP",
            RelKind::NextStep => "NEXT_STEP",
            RelKind::HasHazard => "HAS_HAZARD",
            RelKind::RequiresSafetyMeasure => "REQUIRES_SAFETY_MEASURE",
            RelKind::ReactsTo => "REACTS_TO",
            RelKind::HasObservation => "HAS_OBSERVATION",
        }
    }

    /// The node kinds a relationship of this type must connect, as (from, to).
    pub fn endpoints(self) -> (NodeKind, NodeKind) {
        match self {
            RelKind::UsesSubstance => (NodeKind::Experiment, NodeKind::Substance),
            RelKind::UsesEquipment => (NodeKind::Experiment, NodeKind::Equipment),
            RelKind::HasStep => (NodeKind::Experiment, NodeKind::ProcedureStep),
            RelKind::NextStep => (NodeKind::ProcedureStep, NodeKind::ProcedureStep),
            RelKind::HasHazard => (NodeKind::Substance, NodeKind::Hazard),
            RelKind::RequiresSafetyMeasure => (NodeKind::Experiment, NodeKind::SafetyMeasure),
            RelKind::ReactsTo => (NodeKind::Substance, NodeKind::Substance),
            RelKind::HasObservation => (NodeKind::Experiment, NodeKind::Observation),
        }
    }

    /// Optional attributes writable on relationships of this kind.
    pub fn attributes(self) -> &'static [&'static str] {
        match self {
            RelKind::UsesSubstance => &["role", "quantity"],
            RelKind::UsesEquipment => &["purpose"],
            RelKind::ReactsTo => &["reaction_type", "conditions"],
            RelKind::HasStep
            | RelKind::NextStep
            | RelKind::HasHazard
            | RelKind::RequiresSafetyMeasure
            | RelKind::HasObservation => &[],
        }
    }
}

impl fmt::Display for RelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

// ── Node References ───────────────────────────────────────────────

/// Surrogate identifier stamped on append-only nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How a node is addressed when matching it in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeKey {
    /// Match on the kind's natural-key property.
    ///
    /// For append-only kinds the natural key is free text that may legitimately
    /// repeat; when duplicates exist this addresses an arbitrary instance.
    Natural(String),
    /// Match on the generated surrogate id of an append-only node.
    Surrogate(NodeId),
}

/// A reference to one node: its kind plus how to find it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeRef {
    pub kind: NodeKind,
    pub key: NodeKey,
}

impl NodeRef {
    pub fn natural(kind: NodeKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: NodeKey::Natural(key.into()),
        }
    }

    pub fn surrogate(kind: NodeKind, id: NodeId) -> Self {
        Self {
            kind,
            key: NodeKey::Surrogate(id),
        }
    }

    /// The property a match clause binds against for this reference.
    pub fn match_property(&self) -> &'static str {
        match self.key {
            NodeKey::Natural(_) => self.kind.key_property(),
            NodeKey::Surrogate(_) => "id",
        }
    }

    /// The parameter value for the match clause.
    pub fn match_value(&self) -> String {
        match &self.key {
            NodeKey::Natural(key) => key.clone(),
            NodeKey::Surrogate(id) => id.to_string(),
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            NodeKey::Natural(key) => write!(f, "{} {:?}", self.kind.label(), key),
            NodeKey::Surrogate(id) => write!(f, "{} id {}", self.kind.label(), id),
        }
    }
}

// ── Attributes ────────────────────────────────────────────────────

/// A scalar attribute value: text, integer, or float.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Int(i64),
    Float(f64),
}

impl AttrValue {
    /// Empty text and zero numbers count as absent and are never written.
    pub fn is_blank(&self) -> bool {
        match self {
            AttrValue::Text(s) => s.is_empty(),
            AttrValue::Int(i) => *i == 0,
            AttrValue::Float(f) => *f == 0.0,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Int(v as i64)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

/// A sparse attribute map carried by a node or relationship.
///
/// Absent attributes are simply not present; blank values (see
/// [`AttrValue::is_blank`]) are dropped at write time rather than stored
/// as placeholders.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Attrs(BTreeMap<String, AttrValue>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The attributes that will actually be written: blank values dropped.
    pub fn present(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.iter().filter(|(_, v)| !v.is_blank())
    }
}
