//! The example dataset: two classroom chemistry experiments.
//!
//! Kept declarative so its internal consistency can be checked without a
//! database. Substances, equipment, and hazards are shared catalogs keyed by
//! name; steps, safety measures, and observations belong to one experiment
//! each and are created append-only when the dataset is applied.

/// A substance in the shared catalog.
pub struct SubstanceSeed {
    pub name: &'static str,
    pub formula: &'static str,
    pub state: &'static str,
    pub cas_number: &'static str,
    pub molecular_weight: f64,
}

/// A piece of equipment in the shared catalog.
pub struct EquipmentSeed {
    pub name: &'static str,
    pub kind: &'static str,
    pub description: &'static str,
}

/// A hazard in the shared catalog.
pub struct HazardSeed {
    pub name: &'static str,
    pub description: &'static str,
    pub level: &'static str,
}

/// A substance used by an experiment. An empty quantity means unspecified.
pub struct SubstanceUseSeed {
    pub substance: &'static str,
    pub role: &'static str,
    pub quantity: &'static str,
}

/// Equipment used by an experiment, with its purpose there.
pub struct EquipmentUseSeed {
    pub equipment: &'static str,
    pub purpose: &'static str,
}

/// A safety measure required by an experiment.
pub struct SafetySeed {
    pub description: &'static str,
    pub kind: &'static str,
}

/// A hazard attached to a substance.
pub struct SubstanceHazardSeed {
    pub substance: &'static str,
    pub hazard: &'static str,
}

/// A reactant-to-product edge.
pub struct ReactionSeed {
    pub reactant: &'static str,
    pub product: &'static str,
    pub reaction_type: &'static str,
    pub conditions: &'static str,
}

/// One experiment: header attributes plus everything hanging off it.
/// Steps are ordered by position; the applier numbers them from 1 and
/// chains them with NEXT_STEP.
pub struct ExperimentSeed {
    pub name: &'static str,
    pub objective: &'static str,
    pub date: &'static str,
    pub description: &'static str,
    pub substances: Vec<SubstanceUseSeed>,
    pub equipment: Vec<EquipmentUseSeed>,
    pub steps: Vec<&'static str>,
    pub safety_measures: Vec<SafetySeed>,
    pub observations: Vec<&'static str>,
}

pub struct SeedData {
    pub substances: Vec<SubstanceSeed>,
    pub equipment: Vec<EquipmentSeed>,
    pub hazards: Vec<HazardSeed>,
    pub substance_hazards: Vec<SubstanceHazardSeed>,
    pub reactions: Vec<ReactionSeed>,
    pub experiments: Vec<ExperimentSeed>,
}

/// The two example experiments.
pub fn example_dataset() -> SeedData {
    SeedData {
        substances: vec![
            SubstanceSeed {
                name: "Potassium permanganate",
                formula: "KMnO₄",
                state: "solid",
                cas_number: "7722-64-7",
                molecular_weight: 158.034,
            },
            SubstanceSeed {
                name: "Manganese dioxide",
                formula: "MnO₂",
                state: "solid",
                cas_number: "1313-13-9",
                molecular_weight: 86.9368,
            },
            SubstanceSeed {
                name: "Oxygen",
                formula: "O₂",
                state: "gas",
                cas_number: "7782-44-7",
                molecular_weight: 31.9988,
            },
            SubstanceSeed {
                name: "Iron",
                formula: "Fe",
                state: "solid",
                cas_number: "7439-89-6",
                molecular_weight: 55.845,
            },
            SubstanceSeed {
                name: "Dilute sulfuric acid",
                formula: "H₂SO₄(aq)",
                state: "liquid",
                cas_number: "7664-93-9",
                molecular_weight: 98.079,
            },
            SubstanceSeed {
                name: "Iron(II) sulfate",
                formula: "FeSO₄",
                state: "solid",
                cas_number: "7720-78-7",
                molecular_weight: 151.908,
            },
            SubstanceSeed {
                name: "Hydrogen",
                formula: "H₂",
                state: "gas",
                cas_number: "1333-74-0",
                molecular_weight: 2.016,
            },
        ],
        equipment: vec![
            EquipmentSeed {
                name: "Test tube",
                kind: "Glassware",
                description: "Holds and heats the reactants",
            },
            EquipmentSeed {
                name: "Alcohol burner",
                kind: "Heating equipment",
                description: "Provides the heat source",
            },
            EquipmentSeed {
                name: "Delivery tube",
                kind: "Connector",
                description: "Guides the gas",
            },
            EquipmentSeed {
                name: "Gas collecting bottle",
                kind: "Collection vessel",
                description: "Collects the gas",
            },
            EquipmentSeed {
                name: "Wooden splint",
                kind: "Test tool",
                description: "Tests the properties of oxygen",
            },
        ],
        hazards: vec![
            HazardSeed {
                name: "Oxidizing",
                description: "Can ignite other materials",
                level: "high",
            },
            HazardSeed {
                name: "Irritant",
                description: "Irritates mucous membranes",
                level: "medium",
            },
            HazardSeed {
                name: "Corrosive",
                description: "Corrodes skin and eyes",
                level: "high",
            },
            HazardSeed {
                name: "Flammable",
                description: "Ignites easily in air",
                level: "high",
            },
        ],
        substance_hazards: vec![
            SubstanceHazardSeed {
                substance: "Potassium permanganate",
                hazard: "Oxidizing",
            },
            SubstanceHazardSeed {
                substance: "Potassium permanganate",
                hazard: "Irritant",
            },
            SubstanceHazardSeed {
                substance: "Dilute sulfuric acid",
                hazard: "Corrosive",
            },
            SubstanceHazardSeed {
                substance: "Hydrogen",
                hazard: "Flammable",
            },
        ],
        reactions: vec![
            ReactionSeed {
                reactant: "Potassium permanganate",
                product: "Manganese dioxide",
                reaction_type: "decomposition",
                conditions: "heated",
            },
            ReactionSeed {
                reactant: "Potassium permanganate",
                product: "Oxygen",
                reaction_type: "decomposition",
                conditions: "heated",
            },
            ReactionSeed {
                reactant: "Iron",
                product: "Iron(II) sulfate",
                reaction_type: "displacement",
                conditions: "room temperature",
            },
            ReactionSeed {
                reactant: "Iron",
                product: "Hydrogen",
                reaction_type: "displacement",
                conditions: "room temperature",
            },
        ],
        experiments: vec![
            ExperimentSeed {
                name: "Preparing oxygen by heating potassium permanganate",
                objective: "Learn how oxygen is prepared and study its properties",
                date: "2023-01-15",
                description: "Prepare oxygen by heating potassium permanganate and investigate its properties",
                substances: vec![
                    SubstanceUseSeed {
                        substance: "Potassium permanganate",
                        role: "reactant",
                        quantity: "a small amount",
                    },
                    SubstanceUseSeed {
                        substance: "Manganese dioxide",
                        role: "product",
                        quantity: "",
                    },
                    SubstanceUseSeed {
                        substance: "Oxygen",
                        role: "product",
                        quantity: "",
                    },
                ],
                equipment: vec![
                    EquipmentUseSeed {
                        equipment: "Test tube",
                        purpose: "Holds the reactants",
                    },
                    EquipmentUseSeed {
                        equipment: "Alcohol burner",
                        purpose: "Heats the reactants",
                    },
                    EquipmentUseSeed {
                        equipment: "Delivery tube",
                        purpose: "Leads the gas out",
                    },
                    EquipmentUseSeed {
                        equipment: "Gas collecting bottle",
                        purpose: "Collects the gas",
                    },
                    EquipmentUseSeed {
                        equipment: "Wooden splint",
                        purpose: "Tests the gas",
                    },
                ],
                steps: vec![
                    "Place a small amount of potassium permanganate into a test tube",
                    "Heat the bottom of the test tube with an alcohol burner",
                    "Observe the reaction",
                    "Lead the generated gas into a gas collecting bottle through the delivery tube",
                    "Insert a glowing wooden splint into the bottle and observe",
                ],
                safety_measures: vec![
                    SafetySeed {
                        description: "Wear safety goggles",
                        kind: "Personal protection",
                    },
                    SafetySeed {
                        description: "Never point the test tube mouth at anyone",
                        kind: "Operational safety",
                    },
                    SafetySeed {
                        description: "Heat the bottom of the test tube evenly",
                        kind: "Equipment safety",
                    },
                ],
                observations: vec![
                    "The potassium permanganate melts and releases bubbles when heated",
                    "The glowing splint reignites and burns vigorously in the gas",
                ],
            },
            ExperimentSeed {
                name: "Iron reacting with dilute sulfuric acid",
                objective: "Observe how metals react with acids",
                date: "2023-01-20",
                description: "Study the reaction of iron with dilute sulfuric acid producing iron(II) sulfate and hydrogen",
                substances: vec![
                    SubstanceUseSeed {
                        substance: "Iron",
                        role: "reactant",
                        quantity: "a small amount",
                    },
                    SubstanceUseSeed {
                        substance: "Dilute sulfuric acid",
                        role: "reactant",
                        quantity: "a moderate amount",
                    },
                    SubstanceUseSeed {
                        substance: "Iron(II) sulfate",
                        role: "product",
                        quantity: "",
                    },
                    SubstanceUseSeed {
                        substance: "Hydrogen",
                        role: "product",
                        quantity: "",
                    },
                ],
                equipment: vec![
                    EquipmentUseSeed {
                        equipment: "Test tube",
                        purpose: "Holds the reactants",
                    },
                    EquipmentUseSeed {
                        equipment: "Delivery tube",
                        purpose: "Leads the gas out",
                    },
                ],
                steps: vec![
                    "Place iron filings into a test tube",
                    "Add dilute sulfuric acid",
                    "Observe the reaction",
                    "Collect the gas through the delivery tube",
                    "Bring a lit match near the gas and observe",
                ],
                safety_measures: vec![
                    SafetySeed {
                        description: "Wear safety goggles",
                        kind: "Personal protection",
                    },
                    SafetySeed {
                        description: "Keep acid from splashing onto skin",
                        kind: "Operational safety",
                    },
                ],
                observations: vec![
                    "Bubbles form where the iron contacts the dilute sulfuric acid",
                    "The solution gradually turns pale green",
                    "The collected gas pops quietly when it meets a flame",
                ],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_link_endpoint_is_defined() {
        let data = example_dataset();
        let substances: Vec<&str> = data.substances.iter().map(|s| s.name).collect();
        let equipment: Vec<&str> = data.equipment.iter().map(|e| e.name).collect();
        let hazards: Vec<&str> = data.hazards.iter().map(|h| h.name).collect();

        for exp in &data.experiments {
            for used in &exp.substances {
                assert!(substances.contains(&used.substance), "{}", used.substance);
            }
            for used in &exp.equipment {
                assert!(equipment.contains(&used.equipment), "{}", used.equipment);
            }
        }
        for link in &data.substance_hazards {
            assert!(substances.contains(&link.substance), "{}", link.substance);
            assert!(hazards.contains(&link.hazard), "{}", link.hazard);
        }
        for reaction in &data.reactions {
            assert!(substances.contains(&reaction.reactant), "{}", reaction.reactant);
            assert!(substances.contains(&reaction.product), "{}", reaction.product);
        }
    }

    #[test]
    fn catalog_names_are_unique() {
        let mut names: Vec<&str> = example_dataset().substances.iter().map(|s| s.name).collect();
        names.sort();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
    }

    #[test]
    fn experiments_have_ordered_steps_and_observations() {
        let data = example_dataset();
        assert_eq!(data.experiments.len(), 2);
        for exp in &data.experiments {
            assert!(!exp.steps.is_empty(), "{}", exp.name);
            assert!(!exp.observations.is_empty(), "{}", exp.name);
            assert!(!exp.safety_measures.is_empty(), "{}", exp.name);
        }
    }
}
