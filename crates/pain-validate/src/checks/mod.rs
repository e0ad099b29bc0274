//! Individual rule checks.

pub(crate) mod codes;
pub(crate) mod consistency;

use std::collections::BTreeMap;

use pain_model::{CellCode, DatasetVariant, VariableDefinition};

use crate::column_reader::ColumnReader;
use crate::violation::Violation;

/// A governed variable resolved against the dataset.
pub(crate) struct GovernedColumn<'a> {
    pub column: String,
    pub definition: &'a VariableDefinition,
    pub cells: Vec<CellCode>,
}

/// Read every governed column once. Absent columns are reported as
/// violations and left out of the returned map.
pub(crate) fn resolve<'a>(
    variant: &DatasetVariant,
    definitions: &[&'a VariableDefinition],
    reader: &ColumnReader<'_>,
    violations: &mut Vec<Violation>,
) -> BTreeMap<String, GovernedColumn<'a>> {
    let mut resolved = BTreeMap::new();
    for definition in definitions.iter().copied() {
        let column = variant.column(&definition.basename);
        match reader.codes(&column) {
            Some(cells) => {
                resolved.insert(
                    definition.basename.clone(),
                    GovernedColumn {
                        column,
                        definition,
                        cells,
                    },
                );
            }
            None => violations.push(Violation::MissingColumn { column }),
        }
    }
    resolved
}
