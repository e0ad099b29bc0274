//! Dataset variant descriptors.
//!
//! A variant is one survey dataset (wave × questionnaire type). Everything
//! that differs between variants is declared here as data: the column
//! prefix, which variables are governed, how raw codes are recoded, the
//! structural clean-up steps and the root/dependent coupling checked by the
//! rule engine.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Replace raw code `from` with canonical code `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecodeRule {
    pub from: i64,
    pub to: i64,
}

/// Partial mapping from raw codes to canonical codes for one column.
///
/// Codes without a rule pass through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecodeMap(Vec<RecodeRule>);

impl RecodeMap {
    pub fn new(rules: Vec<RecodeRule>) -> Self {
        Self(rules)
    }

    /// Canonical code for `raw`, or `raw` itself when unmapped.
    pub fn apply(&self, raw: i64) -> i64 {
        self.get(raw).unwrap_or(raw)
    }

    pub fn get(&self, raw: i64) -> Option<i64> {
        self.0.iter().find(|rule| rule.from == raw).map(|rule| rule.to)
    }

    pub fn rules(&self) -> &[RecodeRule] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First raw code mapped more than once, if any.
    pub fn first_duplicate(&self) -> Option<i64> {
        let mut seen = BTreeSet::new();
        self.0
            .iter()
            .map(|rule| rule.from)
            .find(|from| !seen.insert(*from))
    }
}

impl FromIterator<(i64, i64)> for RecodeMap {
    fn from_iter<I: IntoIterator<Item = (i64, i64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(from, to)| RecodeRule { from, to })
                .collect(),
        )
    }
}

/// Structural clean-up applied after recoding, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StructuralOp {
    /// Remove a column.
    Drop { column: String },
    /// Sort rows ascending by a column.
    Sort { column: String },
    /// Remove rows where every column outside `exclude` is null.
    DropEmptyRows {
        #[serde(default)]
        exclude: Vec<String>,
    },
}

impl StructuralOp {
    pub fn name(&self) -> &'static str {
        match self {
            StructuralOp::Drop { .. } => "drop",
            StructuralOp::Sort { .. } => "sort",
            StructuralOp::DropEmptyRows { .. } => "drop_empty_rows",
        }
    }
}

/// Root/dependent coupling for a variant.
///
/// Exemptions are declared per direction because survey waves differ in
/// which dependents may legitimately break the coupling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupling {
    /// Gate question basename.
    pub root: String,
    /// Basenames conditioned on the gate, in declaration order.
    pub dependents: Vec<String>,
    #[serde(default)]
    pub forward_exempt: BTreeSet<String>,
    #[serde(default)]
    pub backward_exempt: BTreeSet<String>,
}

impl Coupling {
    pub fn new(root: impl Into<String>, dependents: &[&str]) -> Self {
        Self {
            root: root.into(),
            dependents: dependents.iter().map(|name| (*name).to_string()).collect(),
            forward_exempt: BTreeSet::new(),
            backward_exempt: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_forward_exempt(mut self, basenames: &[&str]) -> Self {
        self.forward_exempt = basenames.iter().map(|name| (*name).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_backward_exempt(mut self, basenames: &[&str]) -> Self {
        self.backward_exempt = basenames.iter().map(|name| (*name).to_string()).collect();
        self
    }

    /// Dependents checked when the root is 0.
    pub fn forward_dependents(&self) -> impl Iterator<Item = &str> {
        self.dependents
            .iter()
            .filter(|name| !self.forward_exempt.contains(*name))
            .map(String::as_str)
    }

    /// Dependents whose N/A code requires the root to be 0.
    pub fn backward_dependents(&self) -> impl Iterator<Item = &str> {
        self.dependents
            .iter()
            .filter(|name| !self.backward_exempt.contains(*name))
            .map(String::as_str)
    }
}

fn default_id_column() -> String {
    "ID".to_string()
}

/// One survey dataset and everything needed to harmonise it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetVariant {
    /// Variant name, e.g. `G214_PQ`.
    pub name: String,
    /// Source dataset stem. Defaults to the variant name.
    #[serde(default)]
    pub source: Option<String>,
    /// Prefix prepended to every basename to form column names.
    pub prefix: String,
    /// Column identifying respondents in violation reports.
    #[serde(default = "default_id_column")]
    pub id_column: String,
    /// Governed basenames, in column order.
    pub variables: Vec<String>,
    #[serde(default)]
    pub consistency: Option<Coupling>,
    /// Recode rules keyed by basename.
    #[serde(default)]
    pub recode: BTreeMap<String, RecodeMap>,
    #[serde(default)]
    pub ops: Vec<StructuralOp>,
}

impl DatasetVariant {
    pub fn new(name: impl Into<String>, prefix: impl Into<String>, variables: &[&str]) -> Self {
        Self {
            name: name.into(),
            source: None,
            prefix: prefix.into(),
            id_column: default_id_column(),
            variables: variables.iter().map(|name| (*name).to_string()).collect(),
            consistency: None,
            recode: BTreeMap::new(),
            ops: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_consistency(mut self, coupling: Coupling) -> Self {
        self.consistency = Some(coupling);
        self
    }

    #[must_use]
    pub fn with_recode(mut self, basename: impl Into<String>, map: RecodeMap) -> Self {
        self.recode.insert(basename.into(), map);
        self
    }

    #[must_use]
    pub fn with_op(mut self, op: StructuralOp) -> Self {
        self.ops.push(op);
        self
    }

    /// Name of the source dataset to load.
    pub fn source_name(&self) -> &str {
        self.source.as_deref().unwrap_or(&self.name)
    }

    /// Full column name for a basename.
    pub fn column(&self, basename: &str) -> String {
        format!("{}{basename}", self.prefix)
    }

    /// `(basename, column)` pairs for every governed variable.
    pub fn governed_columns(&self) -> Vec<(&str, String)> {
        self.variables
            .iter()
            .map(|basename| (basename.as_str(), self.column(basename)))
            .collect()
    }

    pub fn governs(&self, basename: &str) -> bool {
        self.variables.iter().any(|name| name == basename)
    }

    pub fn recode_for(&self, basename: &str) -> Option<&RecodeMap> {
        self.recode.get(basename)
    }
}
