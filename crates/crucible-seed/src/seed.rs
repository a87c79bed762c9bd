//! Applies the example dataset to a live graph and runs the demo queries.

use crucible_core::{Attrs, NodeKind, NodeRef, RelKind};
use crucible_graph::{GraphClient, GraphError};

use crate::dataset::{ExperimentSeed, SeedData};

/// Apply the dataset through the public client operations.
///
/// Shared catalogs (substances, equipment, hazards) are upserted by natural
/// key, so re-seeding widens rather than duplicates them. Steps, safety
/// measures, and observations are append-only: every run creates fresh
/// instances and links them through their surrogate references.
pub async fn apply(client: &GraphClient, data: &SeedData) -> Result<(), GraphError> {
    for substance in &data.substances {
        client
            .upsert_node(
                NodeKind::Substance,
                substance.name,
                &Attrs::new()
                    .with("formula", substance.formula)
                    .with("state", substance.state)
                    .with("cas_number", substance.cas_number)
                    .with("molecular_weight", substance.molecular_weight),
            )
            .await?;
    }

    for equipment in &data.equipment {
        client
            .upsert_node(
                NodeKind::Equipment,
                equipment.name,
                &Attrs::new()
                    .with("type", equipment.kind)
                    .with("description", equipment.description),
            )
            .await?;
    }

    for hazard in &data.hazards {
        client
            .upsert_node(
                NodeKind::Hazard,
                hazard.name,
                &Attrs::new()
                    .with("description", hazard.description)
                    .with("level", hazard.level),
            )
            .await?;
    }

    for experiment in &data.experiments {
        apply_experiment(client, experiment).await?;
    }

    for link in &data.substance_hazards {
        client
            .link(
                &NodeRef::natural(NodeKind::Substance, link.substance),
                RelKind::HasHazard,
                &NodeRef::natural(NodeKind::Hazard, link.hazard),
                &Attrs::new(),
            )
            .await?;
    }

    for reaction in &data.reactions {
        client
            .link(
                &NodeRef::natural(NodeKind::Substance, reaction.reactant),
                RelKind::ReactsTo,
                &NodeRef::natural(NodeKind::Substance, reaction.product),
                &Attrs::new()
                    .with("reaction_type", reaction.reaction_type)
                    .with("conditions", reaction.conditions),
            )
            .await?;
    }

    tracing::info!(
        experiments = data.experiments.len(),
        substances = data.substances.len(),
        "Seeded example dataset"
    );
    Ok(())
}

async fn apply_experiment(client: &GraphClient, exp: &ExperimentSeed) -> Result<(), GraphError> {
    let exp_ref = client
        .upsert_node(
            NodeKind::Experiment,
            exp.name,
            &Attrs::new()
                .with("objective", exp.objective)
                .with("date", exp.date)
                .with("description", exp.description),
        )
        .await?;

    for used in &exp.substances {
        client
            .link(
                &exp_ref,
                RelKind::UsesSubstance,
                &NodeRef::natural(NodeKind::Substance, used.substance),
                &Attrs::new()
                    .with("role", used.role)
                    .with("quantity", used.quantity),
            )
            .await?;
    }

    for used in &exp.equipment {
        client
            .link(
                &exp_ref,
                RelKind::UsesEquipment,
                &NodeRef::natural(NodeKind::Equipment, used.equipment),
                &Attrs::new().with("purpose", used.purpose),
            )
            .await?;
    }

    let mut previous: Option<NodeRef> = None;
    for (i, description) in exp.steps.iter().enumerate() {
        let step = client
            .create_node(
                NodeKind::ProcedureStep,
                description,
                &Attrs::new().with("order", (i + 1) as i64),
            )
            .await?;
        client.link(&exp_ref, RelKind::HasStep, &step, &Attrs::new()).await?;
        if let Some(prev) = &previous {
            client.link(prev, RelKind::NextStep, &step, &Attrs::new()).await?;
        }
        previous = Some(step);
    }

    for measure in &exp.safety_measures {
        let measure_ref = client
            .create_node(
                NodeKind::SafetyMeasure,
                measure.description,
                &Attrs::new().with("type", measure.kind),
            )
            .await?;
        client
            .link(&exp_ref, RelKind::RequiresSafetyMeasure, &measure_ref, &Attrs::new())
            .await?;
    }

    for description in &exp.observations {
        let obs_ref = client
            .create_node(NodeKind::Observation, description, &Attrs::new())
            .await?;
        client
            .link(&exp_ref, RelKind::HasObservation, &obs_ref, &Attrs::new())
            .await?;
    }

    tracing::info!(experiment = exp.name, steps = exp.steps.len(), "Seeded experiment");
    Ok(())
}

/// Print the walkthrough queries over the seeded data.
pub async fn report(client: &GraphClient) -> Result<(), GraphError> {
    println!("\nExperiments using potassium permanganate:");
    for hit in client
        .find_experiments_using_substance("Potassium permanganate")
        .await?
    {
        println!("- {}: {}", hit.name, hit.objective.as_deref().unwrap_or("-"));
    }

    println!("\nGaseous substances:");
    for substance in client.find_substances_by_state("gas").await? {
        println!(
            "- {} ({})",
            substance.name,
            substance.formula.as_deref().unwrap_or("N/A")
        );
    }

    let oxygen_prep = "Preparing oxygen by heating potassium permanganate";
    println!("\nSteps of {oxygen_prep:?}:");
    for step in client.find_experiment_steps(oxygen_prep).await? {
        match step.order {
            Some(n) => println!("{n}. {}", step.description),
            None => println!("-  {}", step.description),
        }
    }

    println!("\nHazardous substances:");
    for summary in client.find_hazardous_substances().await? {
        println!("- {}: {}", summary.substance, summary.hazards.join(", "));
    }

    let iron_acid = "Iron reacting with dilute sulfuric acid";
    if let Some(info) = client.get_experiment_info(iron_acid).await? {
        println!("\n{}:", info.name);
        println!("  objective: {}", info.objective.as_deref().unwrap_or("-"));
        println!(
            "  substances: {}",
            info.substances
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!(
            "  equipment: {}",
            info.equipment
                .iter()
                .map(|e| e.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!("  steps: {}", info.steps.len());
        println!("  safety measures: {}", info.safety_measures.len());
        for observation in client.find_experiment_observations(iron_acid).await? {
            println!("  observed: {observation}");
        }
    }

    Ok(())
}
