//! Integration tests for crucible-graph against a live Neo4j instance.
//!
//! These tests require a running Neo4j reachable with the default GraphConfig.
//! Run with:
//! cargo test --package crucible-graph --test integration -- --ignored --test-threads=1
//!
//! Skipped automatically if Neo4j is not available.

use crucible_core::{Attrs, NodeId, NodeKind, NodeRef, RelKind};
use crucible_graph::{GraphClient, GraphConfig, GraphError};

use uuid::Uuid;

async fn connect_or_skip() -> Option<GraphClient> {
    let config = GraphConfig::default();
    match GraphClient::connect(&config).await {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Skipping integration test (Neo4j not available): {e}");
            None
        }
    }
}

/// Unique suffix so tests sharing a database never collide on natural keys.
fn tag() -> String {
    Uuid::new_v4().simple().to_string()
}

async fn cleanup(client: &GraphClient, tag: &str) {
    let q = neo4rs::query(
        "MATCH (n)
         WHERE any(p IN ['name', 'description'] WHERE n[p] CONTAINS $tag)
         DETACH DELETE n",
    )
    .param("tag", tag.to_string());
    let _ = client.run("cleanup", q).await;
}

async fn count_nodes_with_key(client: &GraphClient, kind: NodeKind, key: &str) -> i64 {
    let cypher = format!(
        "MATCH (n:{} {{{}: $key}}) RETURN count(n) AS cnt",
        kind.label(),
        kind.key_property()
    );
    let q = neo4rs::query(&cypher).param("key", key.to_string());
    client
        .query_one("count_nodes_with_key", q)
        .await
        .unwrap()
        .and_then(|row| row.get::<i64>("cnt").ok())
        .unwrap_or(0)
}

async fn count_rels_between(
    client: &GraphClient,
    from: &NodeRef,
    rel: RelKind,
    to: &NodeRef,
) -> i64 {
    let cypher = format!(
        "MATCH (a:{} {{{}: $from}})-[r:{}]->(b:{} {{{}: $to}}) RETURN count(r) AS cnt",
        from.kind.label(),
        from.match_property(),
        rel.type_name(),
        to.kind.label(),
        to.match_property(),
    );
    let q = neo4rs::query(&cypher)
        .param("from", from.match_value())
        .param("to", to.match_value());
    client
        .query_one("count_rels_between", q)
        .await
        .unwrap()
        .and_then(|row| row.get::<i64>("cnt").ok())
        .unwrap_or(0)
}

#[tokio::test]
#[ignore = "requires live Neo4j — run with: cargo test --package crucible-graph --test integration -- --ignored --test-threads=1"]
async fn upsert_node_is_idempotent() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let t = tag();
    let name = format!("Iron {t}");

    let attrs = Attrs::new().with("formula", "Fe");
    client
        .upsert_node(NodeKind::Substance, &name, &attrs)
        .await
        .unwrap();
    client
        .upsert_node(NodeKind::Substance, &name, &attrs)
        .await
        .unwrap();

    assert_eq!(count_nodes_with_key(&client, NodeKind::Substance, &name).await, 1);

    cleanup(&client, &t).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn upsert_widens_attributes_and_skips_blanks() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let t = tag();
    let name = format!("Iron {t}");

    client
        .upsert_node(
            NodeKind::Substance,
            &name,
            &Attrs::new().with("formula", "Fe").with("cas_number", ""),
        )
        .await
        .unwrap();
    client
        .upsert_node(NodeKind::Substance, &name, &Attrs::new().with("state", "solid"))
        .await
        .unwrap();

    let snapshot = client
        .find_node(&NodeRef::natural(NodeKind::Substance, name.clone()))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(snapshot.key, name);
    assert_eq!(
        snapshot.properties.get("formula").and_then(|v| v.as_str()),
        Some("Fe")
    );
    assert_eq!(
        snapshot.properties.get("state").and_then(|v| v.as_str()),
        Some("solid")
    );
    // Blank values are never written.
    assert!(snapshot.properties.get("cas_number").is_none());

    cleanup(&client, &t).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn create_node_duplicates_append_only_kinds() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let t = tag();
    let description = format!("Heat the tube {t}");

    let first = client
        .create_node(NodeKind::ProcedureStep, &description, &Attrs::new())
        .await
        .unwrap();
    let second = client
        .create_node(NodeKind::ProcedureStep, &description, &Attrs::new())
        .await
        .unwrap();

    assert_ne!(first, second);
    assert_eq!(
        count_nodes_with_key(&client, NodeKind::ProcedureStep, &description).await,
        2
    );

    cleanup(&client, &t).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn creation_mode_is_enforced() {
    let Some(client) = connect_or_skip().await else {
        return;
    };

    let err = client
        .upsert_node(NodeKind::ProcedureStep, "Heat the tube", &Attrs::new())
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::AppendOnly("ProcedureStep")));

    let err = client
        .create_node(NodeKind::Substance, "Iron", &Attrs::new())
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::MergeKeyed("Substance")));

    let err = client
        .upsert_node(NodeKind::Substance, "", &Attrs::new())
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::EmptyKey));
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn link_is_idempotent_and_updates_attributes() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let t = tag();
    let exp_name = format!("Oxygen preparation {t}");
    let sub_name = format!("Potassium permanganate {t}");

    let exp = client
        .upsert_node(NodeKind::Experiment, &exp_name, &Attrs::new())
        .await
        .unwrap();
    let sub = client
        .upsert_node(NodeKind::Substance, &sub_name, &Attrs::new())
        .await
        .unwrap();

    client
        .link(
            &exp,
            RelKind::UsesSubstance,
            &sub,
            &Attrs::new().with("role", "reactant"),
        )
        .await
        .unwrap();
    client
        .link(
            &exp,
            RelKind::UsesSubstance,
            &sub,
            &Attrs::new().with("role", "product"),
        )
        .await
        .unwrap();

    assert_eq!(
        count_rels_between(&client, &exp, RelKind::UsesSubstance, &sub).await,
        1
    );

    let info = client.get_experiment_info(&exp_name).await.unwrap().unwrap();
    assert_eq!(info.substances.len(), 1);
    assert_eq!(info.substances[0].role.as_deref(), Some("product"));

    cleanup(&client, &t).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn link_missing_endpoint_is_an_error() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let t = tag();
    let sub_name = format!("Iron {t}");
    let ghost_name = format!("Ghost {t}");

    let sub = client
        .upsert_node(NodeKind::Substance, &sub_name, &Attrs::new())
        .await
        .unwrap();
    let ghost = NodeRef::natural(NodeKind::Experiment, ghost_name.clone());

    let err = client
        .link(&ghost, RelKind::UsesSubstance, &sub, &Attrs::new())
        .await
        .unwrap_err();

    match err {
        GraphError::EndpointNotFound { label, key } => {
            assert_eq!(label, "Experiment");
            assert_eq!(key, ghost_name);
        }
        other => panic!("expected EndpointNotFound, got {other:?}"),
    }

    // Nothing was created as a side effect.
    assert_eq!(count_nodes_with_key(&client, NodeKind::Experiment, &ghost_name).await, 0);
    assert_eq!(
        count_rels_between(&client, &ghost, RelKind::UsesSubstance, &sub).await,
        0
    );

    cleanup(&client, &t).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn link_rejects_mismatched_endpoint_kinds() {
    let Some(client) = connect_or_skip().await else {
        return;
    };

    let exp = NodeRef::natural(NodeKind::Experiment, "E1");
    let eq = NodeRef::natural(NodeKind::Equipment, "Test tube");

    let err = client
        .link(&exp, RelKind::UsesSubstance, &eq, &Attrs::new())
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::EndpointKind { rel: "USES_SUBSTANCE", .. }));
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn surrogate_ids_address_a_specific_duplicate() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let t = tag();
    let exp_name = format!("Oxygen preparation {t}");
    let description = format!("Observe the reaction {t}");

    let exp = client
        .upsert_node(NodeKind::Experiment, &exp_name, &Attrs::new())
        .await
        .unwrap();
    let _decoy = client
        .create_node(NodeKind::ProcedureStep, &description, &Attrs::new().with("order", 1))
        .await
        .unwrap();
    let step = client
        .create_node(NodeKind::ProcedureStep, &description, &Attrs::new().with("order", 2))
        .await
        .unwrap();

    client
        .link(&exp, RelKind::HasStep, &step, &Attrs::new())
        .await
        .unwrap();

    // Exactly one HAS_STEP edge, attached to the chosen instance.
    assert_eq!(count_rels_between(&client, &exp, RelKind::HasStep, &step).await, 1);
    let steps = client.find_experiment_steps(&exp_name).await.unwrap();
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].order, Some(2));

    // A surrogate ref that matches nothing is still an explicit error.
    let missing = NodeRef::surrogate(NodeKind::ProcedureStep, NodeId::new());
    let err = client
        .link(&exp, RelKind::HasStep, &missing, &Attrs::new())
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::EndpointNotFound { label: "ProcedureStep", .. }));

    cleanup(&client, &t).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn step_chain_is_returned_in_order() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let t = tag();
    let exp_name = format!("Iron and acid {t}");

    let exp = client
        .upsert_node(NodeKind::Experiment, &exp_name, &Attrs::new())
        .await
        .unwrap();

    let descriptions = [
        format!("Place iron filings into a test tube {t}"),
        format!("Add dilute sulfuric acid {t}"),
        format!("Observe the reaction {t}"),
    ];
    let mut previous: Option<NodeRef> = None;
    for (i, description) in descriptions.iter().enumerate() {
        let step = client
            .create_node(
                NodeKind::ProcedureStep,
                description,
                &Attrs::new().with("order", (i + 1) as i64),
            )
            .await
            .unwrap();
        client.link(&exp, RelKind::HasStep, &step, &Attrs::new()).await.unwrap();
        if let Some(prev) = &previous {
            client.link(prev, RelKind::NextStep, &step, &Attrs::new()).await.unwrap();
        }
        previous = Some(step);
    }

    let steps = client.find_experiment_steps(&exp_name).await.unwrap();
    assert_eq!(steps.len(), 3);
    for (i, step) in steps.iter().enumerate() {
        assert_eq!(step.order, Some((i + 1) as i64));
        assert_eq!(step.description, descriptions[i]);
    }

    cleanup(&client, &t).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn fan_out_info_reports_empty_relations_as_empty_lists() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let t = tag();
    let exp_name = format!("Oxygen preparation {t}");

    let exp = client
        .upsert_node(
            NodeKind::Experiment,
            &exp_name,
            &Attrs::new().with("objective", "Study oxygen"),
        )
        .await
        .unwrap();

    for sub_name in [format!("Iron {t}"), format!("Water {t}")] {
        let sub = client
            .upsert_node(NodeKind::Substance, &sub_name, &Attrs::new())
            .await
            .unwrap();
        client
            .link(&exp, RelKind::UsesSubstance, &sub, &Attrs::new())
            .await
            .unwrap();
    }

    let info = client.get_experiment_info(&exp_name).await.unwrap().unwrap();
    assert_eq!(info.name, exp_name);
    assert_eq!(info.objective.as_deref(), Some("Study oxygen"));
    assert_eq!(info.substances.len(), 2);
    assert!(info.equipment.is_empty());
    assert!(info.steps.is_empty());
    assert!(info.safety_measures.is_empty());

    cleanup(&client, &t).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn hazards_are_grouped_per_substance() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let t = tag();
    let sub_name = format!("Potassium permanganate {t}");

    let sub = client
        .upsert_node(NodeKind::Substance, &sub_name, &Attrs::new())
        .await
        .unwrap();
    for hazard_name in [format!("Oxidizing {t}"), format!("Irritant {t}")] {
        let hazard = client
            .upsert_node(NodeKind::Hazard, &hazard_name, &Attrs::new().with("level", "high"))
            .await
            .unwrap();
        client
            .link(&sub, RelKind::HasHazard, &hazard, &Attrs::new())
            .await
            .unwrap();
    }

    let summaries = client.find_hazardous_substances().await.unwrap();
    let ours = summaries
        .iter()
        .find(|s| s.substance == sub_name)
        .expect("tagged substance missing from hazard summary");
    assert_eq!(ours.hazards.len(), 2);

    cleanup(&client, &t).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn observations_come_back_for_their_experiment() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let t = tag();
    let exp_name = format!("Iron and acid {t}");

    let exp = client
        .upsert_node(NodeKind::Experiment, &exp_name, &Attrs::new())
        .await
        .unwrap();
    for description in [
        format!("Bubbles form on the iron {t}"),
        format!("The solution turns pale green {t}"),
    ] {
        let obs = client
            .create_node(NodeKind::Observation, &description, &Attrs::new())
            .await
            .unwrap();
        client
            .link(&exp, RelKind::HasObservation, &obs, &Attrs::new())
            .await
            .unwrap();
    }

    let observations = client.find_experiment_observations(&exp_name).await.unwrap();
    assert_eq!(observations.len(), 2);

    cleanup(&client, &t).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn absent_data_yields_empty_results_not_errors() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let t = tag();
    let no_such = format!("NoSuchExperiment {t}");

    assert!(client.find_experiment_steps(&no_such).await.unwrap().is_empty());
    assert!(client
        .find_experiments_using_substance(&no_such)
        .await
        .unwrap()
        .is_empty());
    assert!(client
        .find_experiment_observations(&no_such)
        .await
        .unwrap()
        .is_empty());
    assert!(client.get_experiment_info(&no_such).await.unwrap().is_none());
    assert!(!client
        .node_exists(&NodeRef::natural(NodeKind::Experiment, no_such))
        .await
        .unwrap());
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn clear_database_removes_everything() {
    let Some(client) = connect_or_skip().await else {
        return;
    };
    let t = tag();

    let exp = client
        .upsert_node(NodeKind::Experiment, &format!("Oxygen preparation {t}"), &Attrs::new())
        .await
        .unwrap();
    let sub = client
        .upsert_node(NodeKind::Substance, &format!("Oxygen {t}"), &Attrs::new())
        .await
        .unwrap();
    client
        .link(&exp, RelKind::UsesSubstance, &sub, &Attrs::new())
        .await
        .unwrap();

    client.clear_database().await.unwrap();

    for kind in NodeKind::ALL {
        assert_eq!(client.count_nodes(kind).await.unwrap(), 0, "{kind}");
    }
    for rel in RelKind::ALL {
        assert_eq!(client.count_relationships(rel).await.unwrap(), 0, "{rel}");
    }
}
