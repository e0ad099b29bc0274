//! Canonical, prefix-free survey variable definitions.
//!
//! A [`VariableDefinition`] describes one question as it appears in every
//! wave of the survey: its label, the integer codes respondents may take and
//! the storage attributes written alongside the data. Dataset columns are
//! formed by prepending a wave-specific prefix to the basename.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Reserved code for a question that does not apply to the respondent.
pub const NOT_APPLICABLE: i64 = -88;

/// Reserved code for a missing response.
pub const MISSING: i64 = -99;

/// Storage type of a survey field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    #[default]
    #[serde(alias = "numeric")]
    Numeric,
    #[serde(alias = "string")]
    String,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Numeric => "Numeric",
            FieldType::String => "String",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measurement level of a survey field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasureLevel {
    #[default]
    #[serde(alias = "nominal")]
    Nominal,
    #[serde(alias = "ordinal")]
    Ordinal,
    #[serde(alias = "scale")]
    Scale,
}

impl MeasureLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasureLevel::Nominal => "Nominal",
            MeasureLevel::Ordinal => "Ordinal",
            MeasureLevel::Scale => "Scale",
        }
    }
}

impl fmt::Display for MeasureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One permitted code and its meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueCode {
    pub code: i64,
    pub label: String,
}

impl ValueCode {
    pub fn new(code: i64, label: impl Into<String>) -> Self {
        Self {
            code,
            label: label.into(),
        }
    }
}

/// Ordered list of value codes. Declaration order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueCodes(Vec<ValueCode>);

impl ValueCodes {
    pub fn new(codes: Vec<ValueCode>) -> Self {
        Self(codes)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValueCode> {
        self.0.iter()
    }

    /// Codes in display order.
    pub fn codes(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().map(|value| value.code)
    }

    pub fn contains(&self, code: i64) -> bool {
        self.0.iter().any(|value| value.code == code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First code declared more than once, if any.
    fn first_duplicate(&self) -> Option<i64> {
        let mut seen = BTreeSet::new();
        self.codes().find(|code| !seen.insert(*code))
    }
}

impl<S: Into<String>> FromIterator<(i64, S)> for ValueCodes {
    fn from_iter<I: IntoIterator<Item = (i64, S)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(code, label)| ValueCode::new(code, label))
                .collect(),
        )
    }
}

fn default_not_applicable() -> i64 {
    NOT_APPLICABLE
}

/// Canonical definition of a survey variable. Identity is the basename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDefinition {
    pub basename: String,
    pub label: String,
    pub value_codes: ValueCodes,
    #[serde(default)]
    pub field_type: FieldType,
    pub width: u32,
    #[serde(default)]
    pub decimals: u32,
    #[serde(default)]
    pub variable_type: MeasureLevel,
    /// Code used when the question does not apply.
    #[serde(default = "default_not_applicable")]
    pub not_applicable: i64,
}

impl VariableDefinition {
    /// Create a numeric nominal definition with the survey's usual storage
    /// attributes (width 3, no decimals).
    pub fn new(
        basename: impl Into<String>,
        label: impl Into<String>,
        value_codes: ValueCodes,
    ) -> Self {
        Self {
            basename: basename.into(),
            label: label.into(),
            value_codes,
            field_type: FieldType::Numeric,
            width: 3,
            decimals: 0,
            variable_type: MeasureLevel::Nominal,
            not_applicable: NOT_APPLICABLE,
        }
    }

    #[must_use]
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    #[must_use]
    pub fn with_variable_type(mut self, variable_type: MeasureLevel) -> Self {
        self.variable_type = variable_type;
        self
    }

    /// Whether `code` belongs to this variable's domain.
    pub fn allows(&self, code: i64) -> bool {
        self.value_codes.contains(code)
    }

    /// Full column name for this variable under `prefix`.
    pub fn column_name(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.basename)
    }

    /// Check the definition's own invariants.
    pub fn validate(&self) -> Result<()> {
        if self.basename.trim().is_empty() {
            return Err(ModelError::InvalidDefinition {
                basename: self.basename.clone(),
                reason: "basename is empty".to_string(),
            });
        }
        if self.width == 0 {
            return Err(ModelError::InvalidDefinition {
                basename: self.basename.clone(),
                reason: "width must be positive".to_string(),
            });
        }
        if let Some(code) = self.value_codes.first_duplicate() {
            return Err(ModelError::DuplicateValueCode {
                basename: self.basename.clone(),
                code,
            });
        }
        Ok(())
    }
}
