use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use crate::violation::{Rule, Violation};

const REPORT_SCHEMA: &str = "pain-harmonise.validation-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

/// Overall result of validating one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Valid,
    Invalid,
}

/// Every violation found in one variant's batch.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub variant: String,
    pub rows_checked: usize,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new(variant: impl Into<String>, rows_checked: usize) -> Self {
        Self {
            variant: variant.into(),
            rows_checked,
            violations: Vec::new(),
        }
    }

    pub fn outcome(&self) -> Outcome {
        if self.violations.is_empty() {
            Outcome::Valid
        } else {
            Outcome::Invalid
        }
    }

    pub fn is_valid(&self) -> bool {
        self.outcome() == Outcome::Valid
    }

    pub fn by_rule(&self, rule: Rule) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(move |violation| violation.rule() == rule)
    }

    /// Violation count per rule, rules without violations omitted.
    pub fn rule_counts(&self) -> BTreeMap<Rule, usize> {
        let mut counts = BTreeMap::new();
        for violation in &self.violations {
            *counts.entry(violation.rule()).or_insert(0) += 1;
        }
        counts
    }

    /// Distinct rows named by any violation.
    pub fn affected_rows(&self) -> usize {
        let mut rows: Vec<usize> = self
            .violations
            .iter()
            .flat_map(|violation| violation.rows().iter().map(|row| row.index))
            .collect();
        rows.sort_unstable();
        rows.dedup();
        rows.len()
    }
}

#[derive(Debug, Serialize)]
struct ValidationReportPayload<'a> {
    schema: &'static str,
    schema_version: u32,
    generated_at: String,
    reports: Vec<ValidationReportJson<'a>>,
}

#[derive(Debug, Serialize)]
struct ValidationReportJson<'a> {
    variant: &'a str,
    outcome: Outcome,
    rows_checked: usize,
    violation_count: usize,
    violations: Vec<ViolationJson<'a>>,
}

#[derive(Debug, Serialize)]
struct ViolationJson<'a> {
    message: String,
    #[serde(flatten)]
    detail: &'a Violation,
}

/// Write `reports` as one JSON document to `path`, creating parent
/// directories as needed.
pub fn write_validation_report_json(path: &Path, reports: &[ValidationReport]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let payload = ValidationReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        reports: reports
            .iter()
            .map(|report| ValidationReportJson {
                variant: &report.variant,
                outcome: report.outcome(),
                rows_checked: report.rows_checked,
                violation_count: report.violations.len(),
                violations: report
                    .violations
                    .iter()
                    .map(|violation| ViolationJson {
                        message: violation.message(),
                        detail: violation,
                    })
                    .collect(),
            })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&payload)?;
    std::fs::write(path, format!("{json}\n"))
}
