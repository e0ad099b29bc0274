//! Root/dependent coupling checks.
//!
//! Only `Code(0)` counts as a root of 0 and only the dependent's own N/A
//! code counts as N/A. Null or non-integer cells therefore fail whichever
//! direction inspects them, in addition to their per-column violation.

use std::collections::BTreeMap;

use pain_model::{CellCode, Coupling};

use super::GovernedColumn;
use crate::column_reader::ColumnReader;
use crate::violation::Violation;

fn is_zero(cell: &CellCode) -> bool {
    matches!(cell, CellCode::Code(0))
}

fn is_not_applicable(cell: &CellCode, not_applicable: i64) -> bool {
    matches!(cell, CellCode::Code(code) if *code == not_applicable)
}

/// Root = 0 implies every forward-checked dependent is N/A. One violation
/// per offending dependent column.
pub(crate) fn check_forward(
    coupling: &Coupling,
    columns: &BTreeMap<String, GovernedColumn<'_>>,
    reader: &ColumnReader<'_>,
) -> Vec<Violation> {
    let Some(root) = columns.get(&coupling.root) else {
        return Vec::new();
    };
    let gated: Vec<usize> = root
        .cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| is_zero(cell))
        .map(|(idx, _)| idx)
        .collect();
    if gated.is_empty() {
        return Vec::new();
    }

    let mut violations = Vec::new();
    for basename in coupling.forward_dependents() {
        let Some(dependent) = columns.get(basename) else {
            continue;
        };
        let not_applicable = dependent.definition.not_applicable;
        let offending: Vec<usize> = gated
            .iter()
            .copied()
            .filter(|idx| !is_not_applicable(&dependent.cells[*idx], not_applicable))
            .collect();
        if !offending.is_empty() {
            violations.push(Violation::ForwardConsistency {
                root: root.column.clone(),
                column: dependent.column.clone(),
                not_applicable,
                rows: reader.rows(offending),
            });
        }
    }
    violations
}

/// Any backward-checked dependent being N/A implies root = 0.
pub(crate) fn check_backward(
    coupling: &Coupling,
    columns: &BTreeMap<String, GovernedColumn<'_>>,
    reader: &ColumnReader<'_>,
) -> Option<Violation> {
    let root = columns.get(&coupling.root)?;
    let dependents: Vec<&GovernedColumn<'_>> = coupling
        .backward_dependents()
        .filter_map(|basename| columns.get(basename))
        .collect();
    if dependents.is_empty() {
        return None;
    }

    let offending: Vec<usize> = (0..reader.height())
        .filter(|idx| {
            !is_zero(&root.cells[*idx])
                && dependents.iter().any(|dependent| {
                    is_not_applicable(&dependent.cells[*idx], dependent.definition.not_applicable)
                })
        })
        .collect();
    if offending.is_empty() {
        return None;
    }

    Some(Violation::BackwardConsistency {
        root: root.column.clone(),
        dependents: dependents
            .iter()
            .map(|dependent| dependent.column.clone())
            .collect(),
        rows: reader.rows(offending),
    })
}
