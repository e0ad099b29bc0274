//! Per-column code checks: integer coercion, nullability and domain.

use pain_model::CellCode;

use super::GovernedColumn;
use crate::column_reader::ColumnReader;
use crate::violation::{MAX_SAMPLES, Violation};

pub(crate) fn check(governed: &GovernedColumn<'_>, reader: &ColumnReader<'_>) -> Vec<Violation> {
    let mut null_rows = Vec::new();
    let mut non_integer_rows = Vec::new();
    let mut non_integer_samples: Vec<String> = Vec::new();
    let mut out_of_domain_rows = Vec::new();
    let mut invalid_values: Vec<i64> = Vec::new();

    for (idx, cell) in governed.cells.iter().enumerate() {
        match cell {
            CellCode::Null => null_rows.push(idx),
            CellCode::Invalid(text) => {
                non_integer_rows.push(idx);
                if non_integer_samples.len() < MAX_SAMPLES && !non_integer_samples.contains(text) {
                    non_integer_samples.push(text.clone());
                }
            }
            CellCode::Code(code) => {
                if !governed.definition.allows(*code) {
                    out_of_domain_rows.push(idx);
                    if invalid_values.len() < MAX_SAMPLES && !invalid_values.contains(code) {
                        invalid_values.push(*code);
                    }
                }
            }
        }
    }

    let mut violations = Vec::new();
    if !non_integer_rows.is_empty() {
        violations.push(Violation::NonIntegerCode {
            column: governed.column.clone(),
            rows: reader.rows(non_integer_rows),
            samples: non_integer_samples,
        });
    }
    if !null_rows.is_empty() {
        violations.push(Violation::NullValue {
            column: governed.column.clone(),
            rows: reader.rows(null_rows),
        });
    }
    if !out_of_domain_rows.is_empty() {
        violations.push(Violation::OutOfDomain {
            column: governed.column.clone(),
            rows: reader.rows(out_of_domain_rows),
            invalid_values,
            allowed: governed.definition.value_codes.codes().collect(),
        });
    }
    violations
}
