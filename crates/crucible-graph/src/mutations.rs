//! Write operations for the chemistry knowledge graph.
//!
//! Merge-keyed kinds use MERGE so repeated upserts widen a single node;
//! append-only kinds use CREATE and carry a generated surrogate id so a
//! specific instance can be addressed afterwards. Relationships MERGE on
//! the bare edge: unique per endpoint pair and type, attributes updated
//! on every call.

use chrono::Utc;
use neo4rs::{query, Query};

use crucible_core::{AttrValue, Attrs, CreationMode, NodeId, NodeKind, NodeRef, RelKind};

use crate::client::{GraphClient, GraphError};

impl GraphClient {
    /// Delete every node and every relationship. Irreversible.
    pub async fn clear_database(&self) -> Result<(), GraphError> {
        tracing::warn!("Clearing all nodes and relationships");
        self.run("clear_database", query("MATCH (n) DETACH DELETE n"))
            .await
    }

    /// Find-or-create a node by natural key, widening it with the supplied
    /// attributes.
    ///
    /// On first creation the node is stamped with `created_at`. Blank
    /// attribute values (empty text, zero numbers) are treated as absent and
    /// skipped, never written as placeholders. Only merge-keyed kinds are
    /// accepted; append-only kinds go through [`GraphClient::create_node`].
    pub async fn upsert_node(
        &self,
        kind: NodeKind,
        key: &str,
        attrs: &Attrs,
    ) -> Result<NodeRef, GraphError> {
        if kind.creation_mode() != CreationMode::Merge {
            return Err(GraphError::AppendOnly(kind.label()));
        }
        if key.is_empty() {
            return Err(GraphError::EmptyKey);
        }
        validate_attrs(kind.label(), kind.attributes(), attrs)?;

        let key_prop = kind.key_property();
        let mut cypher = format!(
            "MERGE (n:{label} {{{key_prop}: $key}})\n ON CREATE SET n.created_at = $now",
            label = kind.label(),
        );
        if let Some(set) = set_clause("n", attrs) {
            cypher.push_str(&format!("\n {set}"));
        }
        cypher.push_str(&format!("\n RETURN n.{key_prop} AS key"));

        let q = bind_attrs(query(&cypher), attrs)
            .param("key", key.to_string())
            .param("now", Utc::now().to_rfc3339());

        let row = self.query_one("upsert_node", q).await?;
        let resolved = row
            .and_then(|r| r.get::<String>("key").ok())
            .unwrap_or_else(|| key.to_string());

        tracing::debug!(label = kind.label(), key = %resolved, "Upserted node");
        Ok(NodeRef::natural(kind, resolved))
    }

    /// Unconditionally create a new node of an append-only kind.
    ///
    /// Repeated calls with identical descriptions yield distinct nodes. The
    /// returned reference carries the generated surrogate id, which is the
    /// unambiguous way to link this instance afterwards; matching by
    /// description remains possible but picks an arbitrary duplicate.
    pub async fn create_node(
        &self,
        kind: NodeKind,
        description: &str,
        attrs: &Attrs,
    ) -> Result<NodeRef, GraphError> {
        if kind.creation_mode() != CreationMode::AppendOnly {
            return Err(GraphError::MergeKeyed(kind.label()));
        }
        if description.is_empty() {
            return Err(GraphError::EmptyKey);
        }
        validate_attrs(kind.label(), kind.attributes(), attrs)?;

        let id = NodeId::new();
        let mut cypher = format!(
            "CREATE (n:{label} {{id: $id, {key_prop}: $key, created_at: $now}})",
            label = kind.label(),
            key_prop = kind.key_property(),
        );
        if let Some(set) = set_clause("n", attrs) {
            cypher.push_str(&format!("\n {set}"));
        }
        cypher.push_str("\n RETURN n.id AS id");

        let q = bind_attrs(query(&cypher), attrs)
            .param("id", id.to_string())
            .param("key", description.to_string())
            .param("now", Utc::now().to_rfc3339());

        self.query_one("create_node", q).await?;
        tracing::debug!(label = kind.label(), id = %id, "Created node");
        Ok(NodeRef::surrogate(kind, id))
    }

    /// Find-or-create a typed relationship between two existing nodes.
    ///
    /// The edge is unique per endpoint pair and type; repeated calls update
    /// its attributes instead of duplicating it. A missing endpoint is an
    /// explicit [`GraphError::EndpointNotFound`], not a silent no-op.
    pub async fn link(
        &self,
        from: &NodeRef,
        rel: RelKind,
        to: &NodeRef,
        attrs: &Attrs,
    ) -> Result<(), GraphError> {
        let (want_from, want_to) = rel.endpoints();
        if from.kind != want_from || to.kind != want_to {
            return Err(GraphError::EndpointKind {
                rel: rel.type_name(),
                expected_from: want_from.label(),
                expected_to: want_to.label(),
                got_from: from.kind.label(),
                got_to: to.kind.label(),
            });
        }
        validate_attrs(rel.type_name(), rel.attributes(), attrs)?;

        let mut cypher = format!(
            "MATCH (a:{from_label} {{{from_prop}: $from}})\n \
             MATCH (b:{to_label} {{{to_prop}: $to}})\n \
             MERGE (a)-[r:{rel_type}]->(b)",
            from_label = from.kind.label(),
            from_prop = from.match_property(),
            to_label = to.kind.label(),
            to_prop = to.match_property(),
            rel_type = rel.type_name(),
        );
        if let Some(set) = set_clause("r", attrs) {
            cypher.push_str(&format!("\n {set}"));
        }
        cypher.push_str("\n RETURN type(r) AS rel_type");

        let q = bind_attrs(query(&cypher), attrs)
            .param("from", from.match_value())
            .param("to", to.match_value());

        match self.query_one("link", q).await? {
            Some(_) => {
                tracing::debug!(rel = rel.type_name(), %from, %to, "Linked nodes");
                Ok(())
            }
            // No row means a MATCH found nothing and the MERGE never ran.
            // Resolve each endpoint to report which side is missing.
            None => {
                for endpoint in [from, to] {
                    if !self.node_exists(endpoint).await? {
                        return Err(GraphError::EndpointNotFound {
                            label: endpoint.kind.label(),
                            key: endpoint.match_value(),
                        });
                    }
                }
                // Both resolve now, so an endpoint vanished between the merge
                // and the re-check. Attribute the failure to the from side.
                Err(GraphError::EndpointNotFound {
                    label: from.kind.label(),
                    key: from.match_value(),
                })
            }
        }
    }

    /// Whether a node matching the reference currently exists.
    pub async fn node_exists(&self, node: &NodeRef) -> Result<bool, GraphError> {
        let cypher = format!(
            "MATCH (n:{label} {{{prop}: $key}}) RETURN count(n) AS cnt",
            label = node.kind.label(),
            prop = node.match_property(),
        );
        let q = query(&cypher).param("key", node.match_value());

        match self.query_one("node_exists", q).await? {
            Some(row) => Ok(row.get::<i64>("cnt").unwrap_or(0) > 0),
            None => Ok(false),
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// Build `SET var.a = $a, var.b = $b` for the non-blank attributes.
///
/// Attribute names were validated against a static allowlist, so splicing
/// them into the statement text is safe.
fn set_clause(var: &str, attrs: &Attrs) -> Option<String> {
    let assignments: Vec<String> = attrs
        .present()
        .map(|(name, _)| format!("{var}.{name} = ${name}"))
        .collect();
    if assignments.is_empty() {
        None
    } else {
        Some(format!("SET {}", assignments.join(", ")))
    }
}

/// Bind the non-blank attributes as query parameters.
fn bind_attrs(q: Query, attrs: &Attrs) -> Query {
    attrs.present().fold(q, |q, (name, value)| match value {
        AttrValue::Text(s) => q.param(name, s.clone()),
        AttrValue::Int(i) => q.param(name, *i),
        AttrValue::Float(f) => q.param(name, *f),
    })
}

/// Reject attribute names outside the target's allowlist.
fn validate_attrs(
    target: &'static str,
    allowed: &'static [&'static str],
    attrs: &Attrs,
) -> Result<(), GraphError> {
    for (name, _) in attrs.iter() {
        if !allowed.iter().any(|a| *a == name) {
            return Err(GraphError::UnknownAttribute {
                target,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}
