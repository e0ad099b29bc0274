//! Consistency rule engine for harmonised survey variants.
//!
//! One parametrised engine covers every variant. The variant's governed
//! variables select the per-column checks and its optional coupling selects
//! the cross-field checks:
//!
//! - **Presence**: every governed column exists
//! - **Integer codes**: every non-null cell is an integer
//! - **Nullability**: governed columns carry no nulls
//! - **Domain**: every code belongs to the variable's value codes
//! - **Forward**: root = 0 implies each checked dependent is N/A
//! - **Backward**: any checked dependent N/A implies root = 0
//!
//! # Example
//!
//! ```ignore
//! use pain_validate::{Outcome, validate_variant};
//!
//! let report = validate_variant(&variant, &registry, &df)?;
//! if report.outcome() == Outcome::Invalid {
//!     for violation in &report.violations {
//!         println!("{violation}");
//!     }
//! }
//! ```

mod checks;
mod column_reader;
mod report;
mod violation;

use polars::prelude::DataFrame;

use pain_model::{DatasetVariant, MetadataRegistry};

pub use column_reader::ColumnReader;
pub use report::{Outcome, ValidationReport, write_validation_report_json};
pub use violation::{MAX_SAMPLES, Rule, RowRef, Violation};

/// Run every check for `variant` over `df` and collect all violations.
///
/// Fails only when the variant names a basename the registry lacks.
pub fn validate_variant(
    variant: &DatasetVariant,
    registry: &MetadataRegistry,
    df: &DataFrame,
) -> pain_model::Result<ValidationReport> {
    let definitions = registry.for_variant(variant)?;
    let reader = ColumnReader::new(df, &variant.id_column);
    let mut report = ValidationReport::new(&variant.name, df.height());

    let columns = checks::resolve(variant, &definitions, &reader, &mut report.violations);
    for definition in &definitions {
        if let Some(governed) = columns.get(&definition.basename) {
            report
                .violations
                .extend(checks::codes::check(governed, &reader));
        }
    }

    if let Some(coupling) = &variant.consistency {
        report
            .violations
            .extend(checks::consistency::check_forward(coupling, &columns, &reader));
        report
            .violations
            .extend(checks::consistency::check_backward(coupling, &columns, &reader));
    }

    tracing::debug!(
        variant = %variant.name,
        rows = report.rows_checked,
        violations = report.violations.len(),
        "validated variant"
    );
    Ok(report)
}
