//! Projection of canonical definitions onto prefixed dataset columns.
//!
//! Definitions are keyed by basename; datasets carry prefixed column names.
//! [`project`] renders definitions under a prefix, [`merge`] overlays them on
//! metadata loaded with the dataset, and [`align_to_columns`] trims the
//! result to the columns actually written.

use pain_model::{ColumnMetadata, MetadataMap, VariableDefinition};
use tracing::{debug, warn};

/// Render `definitions` as column metadata under `prefix`.
pub fn project(definitions: &[&VariableDefinition], prefix: &str) -> MetadataMap {
    definitions
        .iter()
        .map(|definition| {
            (
                definition.column_name(prefix),
                ColumnMetadata::from(*definition),
            )
        })
        .collect()
}

/// Overlay `projected` on `existing`. Projected entries win on collision;
/// entries only in `existing` pass through untouched.
pub fn merge(projected: &MetadataMap, existing: &MetadataMap) -> MetadataMap {
    let mut merged = existing.clone();
    for (column, metadata) in projected {
        if let Some(previous) = merged.insert(column.clone(), metadata.clone())
            && previous != *metadata
        {
            debug!(column = %column, "projected metadata replaces existing entry");
        }
    }
    merged
}

/// Two prefixes rendered the same column name with different metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataConflict {
    pub column: String,
    pub first_prefix: String,
    pub second_prefix: String,
}

impl std::fmt::Display for MetadataConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "column {} is defined differently under prefixes '{}' and '{}'",
            self.column, self.first_prefix, self.second_prefix
        )
    }
}

/// Result of projecting several prefixes into one namespace.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    pub entries: MetadataMap,
    pub conflicts: Vec<MetadataConflict>,
}

/// Project several `(prefix, definitions)` sets into one map.
///
/// A later set overwrites an earlier one on the same column. When the two
/// came from different prefixes and disagree, a conflict is recorded.
pub fn project_many(sets: &[(&str, Vec<&VariableDefinition>)]) -> Projection {
    let mut projection = Projection::default();
    let mut owners: std::collections::BTreeMap<String, String> = Default::default();

    for (prefix, definitions) in sets {
        for (column, metadata) in project(definitions, prefix) {
            if let Some(existing) = projection.entries.get(&column)
                && let Some(owner) = owners.get(&column)
                && owner.as_str() != *prefix
                && *existing != metadata
            {
                let conflict = MetadataConflict {
                    column: column.clone(),
                    first_prefix: owner.clone(),
                    second_prefix: (*prefix).to_string(),
                };
                warn!(%conflict, "metadata conflict between prefixes");
                projection.conflicts.push(conflict);
            }
            owners.insert(column.clone(), (*prefix).to_string());
            projection.entries.insert(column, metadata);
        }
    }
    projection
}

/// Keep exactly one entry per column in `columns`.
///
/// Entries for absent columns are pruned; present columns without metadata
/// get an empty record.
pub fn align_to_columns<S: AsRef<str>>(merged: &MetadataMap, columns: &[S]) -> MetadataMap {
    let mut aligned = MetadataMap::new();
    for column in columns {
        let column = column.as_ref();
        match merged.get(column) {
            Some(metadata) => {
                aligned.insert(column.to_string(), metadata.clone());
            }
            None => {
                warn!(column = %column, "no metadata for column; writing empty record");
                aligned.insert(column.to_string(), ColumnMetadata::default());
            }
        }
    }
    for column in merged.keys().filter(|key| !aligned.contains_key(*key)) {
        debug!(column = %column, "pruned metadata for absent column");
    }
    aligned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pn17() -> VariableDefinition {
        VariableDefinition::new(
            "PN17",
            "Ever had back pain",
            [(-99, "Missing"), (0, "No"), (1, "Yes")].into_iter().collect(),
        )
    }

    fn pn25() -> VariableDefinition {
        VariableDefinition::new(
            "PN25",
            "Sought professional advice/treatment",
            [(-88, "N/A"), (-99, "Missing"), (0, "No"), (1, "Yes")]
                .into_iter()
                .collect(),
        )
    }

    #[test]
    fn test_project_prefixes_every_basename() {
        let (a, b) = (pn17(), pn25());
        let projected = project(&[&a, &b], "G214_PQ_");

        let keys: Vec<&str> = projected.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["G214_PQ_PN17", "G214_PQ_PN25"]);
        assert_eq!(
            projected["G214_PQ_PN25"].label.as_deref(),
            Some("Sought professional advice/treatment")
        );
        assert_eq!(projected["G214_PQ_PN25"].value_labels.len(), 4);
    }

    #[test]
    fn test_merge_projected_wins_and_others_pass_through() {
        let a = pn17();
        let projected = project(&[&a], "G214_PQ_");
        let mut existing = MetadataMap::new();
        existing.insert("G214_PQ_PN17".to_string(), ColumnMetadata::labelled("stale"));
        existing.insert("ID".to_string(), ColumnMetadata::labelled("Respondent"));

        let merged = merge(&projected, &existing);

        assert_eq!(merged.len(), 2);
        assert_eq!(
            merged["G214_PQ_PN17"].label.as_deref(),
            Some("Ever had back pain")
        );
        assert_eq!(merged["ID"], existing["ID"]);
    }

    #[test]
    fn test_project_many_detects_prefix_collision() {
        let a = pn17();
        let mut other = pn17();
        other.basename = "14_PQ_PN17".to_string();
        other.label = "Different question".to_string();

        let projection = project_many(&[("G214_PQ_", vec![&a]), ("G2", vec![&other])]);

        assert_eq!(projection.entries.len(), 1);
        assert_eq!(projection.conflicts.len(), 1);
        let conflict = &projection.conflicts[0];
        assert_eq!(conflict.column, "G214_PQ_PN17");
        assert_eq!(conflict.first_prefix, "G214_PQ_");
        assert_eq!(conflict.second_prefix, "G2");
        assert_eq!(
            projection.entries["G214_PQ_PN17"].label.as_deref(),
            Some("Different question")
        );
    }

    #[test]
    fn test_project_many_distinct_prefixes_do_not_conflict() {
        let (a, b) = (pn17(), pn25());
        let projection = project_many(&[
            ("G214_PQ_", vec![&a, &b]),
            ("G217_SQ_", vec![&a, &b]),
        ]);
        assert_eq!(projection.entries.len(), 4);
        assert!(projection.conflicts.is_empty());
    }

    #[test]
    fn test_align_prunes_absent_and_fills_missing() {
        let a = pn17();
        let mut merged = project(&[&a], "G214_PQ_");
        merged.insert("SEX".to_string(), ColumnMetadata::labelled("Sex"));

        let aligned = align_to_columns(&merged, &["ID", "G214_PQ_PN17"]);

        let keys: Vec<&str> = aligned.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["G214_PQ_PN17", "ID"]);
        assert!(aligned["ID"].is_empty());
    }
}
