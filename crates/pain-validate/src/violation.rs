//! Rule violation types.
//!
//! Each variant carries only the data its rule needs. Row references are
//! never truncated; value samples are capped at [`MAX_SAMPLES`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound on value samples kept per violation.
pub const MAX_SAMPLES: usize = 5;

/// Rule that produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    MissingColumn,
    NonIntegerCode,
    NullValue,
    OutOfDomain,
    ForwardConsistency,
    BackwardConsistency,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::MissingColumn => "missing_column",
            Rule::NonIntegerCode => "non_integer_code",
            Rule::NullValue => "null_value",
            Rule::OutOfDomain => "out_of_domain",
            Rule::ForwardConsistency => "forward_consistency",
            Rule::BackwardConsistency => "backward_consistency",
        }
    }

    /// Whether the rule relates two or more columns.
    pub fn is_cross_field(&self) -> bool {
        matches!(self, Rule::ForwardConsistency | Rule::BackwardConsistency)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row that broke a rule: zero-based position plus respondent id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRef {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "row {} (ID {id})", self.index),
            None => write!(f, "row {}", self.index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Violation {
    /// Governed column absent from the dataset.
    MissingColumn { column: String },

    /// Cells that are not integer codes.
    NonIntegerCode {
        column: String,
        rows: Vec<RowRef>,
        samples: Vec<String>,
    },

    /// Null cells in a governed column.
    NullValue { column: String, rows: Vec<RowRef> },

    /// Integer codes outside the variable's value codes.
    OutOfDomain {
        column: String,
        rows: Vec<RowRef>,
        /// Distinct offending codes, first seen first (up to 5).
        invalid_values: Vec<i64>,
        allowed: Vec<i64>,
    },

    /// Root is 0 but a checked dependent is not N/A.
    ForwardConsistency {
        root: String,
        column: String,
        not_applicable: i64,
        rows: Vec<RowRef>,
    },

    /// A checked dependent is N/A but the root is not 0.
    BackwardConsistency {
        root: String,
        dependents: Vec<String>,
        rows: Vec<RowRef>,
    },
}

impl Violation {
    pub fn rule(&self) -> Rule {
        match self {
            Violation::MissingColumn { .. } => Rule::MissingColumn,
            Violation::NonIntegerCode { .. } => Rule::NonIntegerCode,
            Violation::NullValue { .. } => Rule::NullValue,
            Violation::OutOfDomain { .. } => Rule::OutOfDomain,
            Violation::ForwardConsistency { .. } => Rule::ForwardConsistency,
            Violation::BackwardConsistency { .. } => Rule::BackwardConsistency,
        }
    }

    /// Column the violation is reported against. Backward violations are
    /// reported against the root.
    pub fn column(&self) -> &str {
        match self {
            Violation::MissingColumn { column } => column,
            Violation::NonIntegerCode { column, .. } => column,
            Violation::NullValue { column, .. } => column,
            Violation::OutOfDomain { column, .. } => column,
            Violation::ForwardConsistency { column, .. } => column,
            Violation::BackwardConsistency { root, .. } => root,
        }
    }

    pub fn rows(&self) -> &[RowRef] {
        match self {
            Violation::MissingColumn { .. } => &[],
            Violation::NonIntegerCode { rows, .. } => rows,
            Violation::NullValue { rows, .. } => rows,
            Violation::OutOfDomain { rows, .. } => rows,
            Violation::ForwardConsistency { rows, .. } => rows,
            Violation::BackwardConsistency { rows, .. } => rows,
        }
    }

    /// Number of offending rows; `None` for column-level violations.
    pub fn count(&self) -> Option<usize> {
        match self {
            Violation::MissingColumn { .. } => None,
            other => Some(other.rows().len()),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Violation::MissingColumn { column } => {
                format!("Column {column} is missing")
            }

            Violation::NonIntegerCode {
                column,
                rows,
                samples,
            } => {
                format!(
                    "Column {} has {} non-integer values{}",
                    column,
                    rows.len(),
                    sample_suffix(samples)
                )
            }

            Violation::NullValue { column, rows } => {
                format!("Column {} has {} null values", column, rows.len())
            }

            Violation::OutOfDomain {
                column,
                rows,
                invalid_values,
                allowed,
            } => {
                let invalid: Vec<String> = invalid_values.iter().map(i64::to_string).collect();
                let allowed: Vec<String> = allowed.iter().map(i64::to_string).collect();
                format!(
                    "Column {} has {} values outside {{{}}}{}",
                    column,
                    rows.len(),
                    allowed.join(", "),
                    sample_suffix(&invalid)
                )
            }

            Violation::ForwardConsistency {
                root,
                column,
                not_applicable,
                rows,
            } => {
                format!(
                    "{} rows have {root} = 0 but {column} != {not_applicable}",
                    rows.len()
                )
            }

            Violation::BackwardConsistency {
                root,
                dependents,
                rows,
            } => {
                format!(
                    "{} rows have N/A in one of {{{}}} but {root} != 0",
                    rows.len(),
                    dependents.join(", ")
                )
            }
        }
    }
}

fn sample_suffix(samples: &[String]) -> String {
    if samples.is_empty() {
        String::new()
    } else {
        format!(" (e.g., {})", samples.join(", "))
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.rule(), self.message())
    }
}
