#![allow(dead_code)]

use polars::prelude::*;

use pain_model::{Coupling, DatasetVariant, MetadataRegistry, VariableDefinition};

pub const DEPENDENTS: [&str; 4] = ["PN25", "PN34", "PN35", "PN36"];

pub fn registry() -> MetadataRegistry {
    let gated = |basename: &str| {
        VariableDefinition::new(
            basename,
            basename,
            [(-88, "N/A"), (-99, "Missing"), (0, "No"), (1, "Yes")]
                .into_iter()
                .collect(),
        )
    };
    let mut definitions = vec![VariableDefinition::new(
        "PN17",
        "Ever had back pain",
        [(-99, "Missing"), (0, "No"), (1, "Yes")].into_iter().collect(),
    )];
    definitions.extend(DEPENDENTS.iter().map(|name| gated(name)));
    MetadataRegistry::new(definitions).expect("registry")
}

/// Variant with no prefix so test frames can use basenames directly.
pub fn coupled_variant(coupling: Coupling) -> DatasetVariant {
    DatasetVariant::new("TEST", "", &["PN17", "PN25", "PN34", "PN35", "PN36"])
        .with_consistency(coupling)
}

pub fn coupling() -> Coupling {
    Coupling::new("PN17", &DEPENDENTS)
}

/// Build a frame from rows of (PN17, PN25, PN34, PN35, PN36).
pub fn frame(rows: &[[i64; 5]]) -> DataFrame {
    let column = |i: usize| rows.iter().map(|row| row[i]).collect::<Vec<i64>>();
    let ids: Vec<String> = (1..=rows.len()).map(|n| format!("R{n:03}")).collect();
    df! {
        "ID" => ids,
        "PN17" => column(0),
        "PN25" => column(1),
        "PN34" => column(2),
        "PN35" => column(3),
        "PN36" => column(4),
    }
    .expect("frame")
}
