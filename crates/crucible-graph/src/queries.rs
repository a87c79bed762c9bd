//! Read operations for the chemistry knowledge graph.
//!
//! All queries return typed records. Absence of matching data is an empty
//! result, never an error; errors mean the statement itself failed.

use neo4rs::query;
use serde::{Deserialize, Serialize};

use crucible_core::{NodeKind, NodeRef, RelKind};

use crate::client::{GraphClient, GraphError};

/// An experiment matched by a substance lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentHit {
    pub name: String,
    pub objective: Option<String>,
}

/// A substance matched by a state lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstanceHit {
    pub name: String,
    pub formula: Option<String>,
}

/// One procedure step of an experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub description: String,
    pub order: Option<i64>,
}

/// A substance together with the hazards attached to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardSummary {
    pub substance: String,
    pub hazards: Vec<String>,
}

/// One substance used by an experiment, with the role from the edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstanceUse {
    pub name: String,
    pub formula: Option<String>,
    pub role: Option<String>,
}

/// One piece of equipment used by an experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentUse {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// The full fan-out picture of one experiment.
///
/// Each related set is independently optional: an experiment with no
/// equipment still appears, with an empty equipment list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentInfo {
    pub name: String,
    pub objective: Option<String>,
    pub substances: Vec<SubstanceUse>,
    pub equipment: Vec<EquipmentUse>,
    pub steps: Vec<StepRecord>,
    pub safety_measures: Vec<String>,
}

/// A lightweight snapshot of one stored node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub label: String,
    pub key: String,
    pub properties: serde_json::Value,
}

impl GraphClient {
    /// Experiments that use the given substance.
    pub async fn find_experiments_using_substance(
        &self,
        substance: &str,
    ) -> Result<Vec<ExperimentHit>, GraphError> {
        let q = query(
            "MATCH (e:Experiment)-[:USES_SUBSTANCE]->(:Substance {name: $name})
             RETURN e.name AS name, e.objective AS objective",
        )
        .param("name", substance.to_string());

        let rows = self.query_rows("find_experiments_using_substance", q).await?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            results.push(ExperimentHit {
                name: row.get::<String>("name").unwrap_or_default(),
                objective: row.get::<Option<String>>("objective").ok().flatten(),
            });
        }
        Ok(results)
    }

    /// Substances in the given physical state.
    pub async fn find_substances_by_state(
        &self,
        state: &str,
    ) -> Result<Vec<SubstanceHit>, GraphError> {
        let q = query(
            "MATCH (s:Substance)
             WHERE s.state = $state
             RETURN s.name AS name, s.formula AS formula",
        )
        .param("state", state.to_string());

        let rows = self.query_rows("find_substances_by_state", q).await?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            results.push(SubstanceHit {
                name: row.get::<String>("name").unwrap_or_default(),
                formula: row.get::<Option<String>>("formula").ok().flatten(),
            });
        }
        Ok(results)
    }

    /// The procedure steps of an experiment, ordered by step number.
    pub async fn find_experiment_steps(
        &self,
        experiment: &str,
    ) -> Result<Vec<StepRecord>, GraphError> {
        let q = query(
            "MATCH (:Experiment {name: $name})-[:HAS_STEP]->(p:ProcedureStep)
             RETURN p.description AS description, p.order AS order
             ORDER BY p.order",
        )
        .param("name", experiment.to_string());

        let rows = self.query_rows("find_experiment_steps", q).await?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            results.push(StepRecord {
                description: row.get::<String>("description").unwrap_or_default(),
                order: row.get::<Option<i64>>("order").ok().flatten(),
            });
        }
        Ok(results)
    }

    /// Substances carrying at least one hazard, with the hazards grouped.
    pub async fn find_hazardous_substances(&self) -> Result<Vec<HazardSummary>, GraphError> {
        let q = query(
            "MATCH (s:Substance)-[:HAS_HAZARD]->(h:Hazard)
             RETURN s.name AS substance, collect(h.name) AS hazards",
        );

        let rows = self.query_rows("find_hazardous_substances", q).await?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            results.push(HazardSummary {
                substance: row.get::<String>("substance").unwrap_or_default(),
                hazards: row.get::<Vec<String>>("hazards").unwrap_or_default(),
            });
        }
        Ok(results)
    }

    /// Observations recorded for an experiment, oldest first.
    pub async fn find_experiment_observations(
        &self,
        experiment: &str,
    ) -> Result<Vec<String>, GraphError> {
        let q = query(
            "MATCH (:Experiment {name: $name})-[:HAS_OBSERVATION]->(o:Observation)
             RETURN o.description AS description
             ORDER BY o.created_at",
        )
        .param("name", experiment.to_string());

        let rows = self.query_rows("find_experiment_observations", q).await?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            results.push(row.get::<String>("description").unwrap_or_default());
        }
        Ok(results)
    }

    /// The complete picture of one experiment: substances, equipment, steps,
    /// and safety measures, each independently optional.
    ///
    /// Returns `None` when the experiment does not exist.
    pub async fn get_experiment_info(
        &self,
        experiment: &str,
    ) -> Result<Option<ExperimentInfo>, GraphError> {
        // The list comprehensions drop the null map that collect() produces
        // for a relation with no matches, so an absent relation becomes an
        // empty list.
        let q = query(
            "MATCH (e:Experiment {name: $name})
             OPTIONAL MATCH (e)-[us:USES_SUBSTANCE]->(s:Substance)
             OPTIONAL MATCH (e)-[:USES_EQUIPMENT]->(eq:Equipment)
             OPTIONAL MATCH (e)-[:HAS_STEP]->(p:ProcedureStep)
             OPTIONAL MATCH (e)-[:REQUIRES_SAFETY_MEASURE]->(sm:SafetyMeasure)
             RETURN
               e.name AS name,
               e.objective AS objective,
               [x IN collect(DISTINCT {name: s.name, formula: s.formula, role: us.role})
                  WHERE x.name IS NOT NULL] AS substances,
               [x IN collect(DISTINCT {name: eq.name, type: eq.type})
                  WHERE x.name IS NOT NULL] AS equipment,
               [x IN collect(DISTINCT {description: p.description, order: p.order})
                  WHERE x.description IS NOT NULL] AS steps,
               [x IN collect(DISTINCT sm.description) WHERE x IS NOT NULL] AS safety_measures",
        )
        .param("name", experiment.to_string());

        let Some(row) = self.query_one("get_experiment_info", q).await? else {
            return Ok(None);
        };

        let mut steps: Vec<StepRecord> = row.get("steps").map_err(|e| GraphError::Decode {
            op: "get_experiment_info",
            column: "steps",
            message: e.to_string(),
        })?;
        // collect() carries no ordering; restore the step sequence here.
        steps.sort_by_key(|s| s.order.unwrap_or(i64::MAX));

        Ok(Some(ExperimentInfo {
            name: row.get::<String>("name").unwrap_or_default(),
            objective: row.get::<Option<String>>("objective").ok().flatten(),
            substances: row.get("substances").map_err(|e| GraphError::Decode {
                op: "get_experiment_info",
                column: "substances",
                message: e.to_string(),
            })?,
            equipment: row.get("equipment").map_err(|e| GraphError::Decode {
                op: "get_experiment_info",
                column: "equipment",
                message: e.to_string(),
            })?,
            steps,
            safety_measures: row.get::<Vec<String>>("safety_measures").unwrap_or_default(),
        }))
    }

    /// Fetch one node as a snapshot of its key and allowlisted properties.
    pub async fn find_node(&self, node: &NodeRef) -> Result<Option<NodeSnapshot>, GraphError> {
        let cypher = format!(
            "MATCH (n:{label} {{{prop}: $key}}) RETURN n LIMIT 1",
            label = node.kind.label(),
            prop = node.match_property(),
        );
        let q = query(&cypher).param("key", node.match_value());

        match self.query_one("find_node", q).await? {
            Some(row) => {
                let neo_node: neo4rs::Node = row.get("n").map_err(|e| GraphError::Decode {
                    op: "find_node",
                    column: "n",
                    message: e.to_string(),
                })?;
                Ok(Some(node_snapshot(&neo_node, node.kind)))
            }
            None => Ok(None),
        }
    }

    /// Count nodes of a given kind.
    pub async fn count_nodes(&self, kind: NodeKind) -> Result<i64, GraphError> {
        let cypher = format!("MATCH (n:{}) RETURN count(n) AS cnt", kind.label());
        match self.query_one("count_nodes", query(&cypher)).await? {
            Some(row) => Ok(row.get::<i64>("cnt").unwrap_or(0)),
            None => Ok(0),
        }
    }

    /// Count relationships of a given kind.
    pub async fn count_relationships(&self, rel: RelKind) -> Result<i64, GraphError> {
        let cypher = format!("MATCH ()-[r:{}]->() RETURN count(r) AS cnt", rel.type_name());
        match self.query_one("count_relationships", query(&cypher)).await? {
            Some(row) => Ok(row.get::<i64>("cnt").unwrap_or(0)),
            None => Ok(0),
        }
    }
}

/// Convert a neo4rs node into our lightweight snapshot.
fn node_snapshot(node: &neo4rs::Node, kind: NodeKind) -> NodeSnapshot {
    let key: String = node.get(kind.key_property()).unwrap_or_default();

    let mut props = serde_json::Map::new();
    for attr in kind.attributes() {
        if let Ok(v) = node.get::<String>(attr) {
            props.insert((*attr).to_string(), serde_json::Value::String(v));
        } else if let Ok(v) = node.get::<i64>(attr) {
            props.insert((*attr).to_string(), serde_json::Value::from(v));
        } else if let Ok(v) = node.get::<f64>(attr) {
            props.insert((*attr).to_string(), serde_json::Value::from(v));
        }
    }

    NodeSnapshot {
        label: kind.label().to_string(),
        key,
        properties: serde_json::Value::Object(props),
    }
}
