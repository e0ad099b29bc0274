//! On-disk layout of the standards tables.

use serde::{Deserialize, Serialize};

use pain_model::{
    DatasetVariant, FieldType, MeasureLevel, NOT_APPLICABLE, ValueCodes, VariableDefinition,
};

pub const VARIABLES_SCHEMA: &str = "pain-variables";
pub const VARIANTS_SCHEMA: &str = "pain-variants";
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableHeader {
    pub schema: String,
    pub schema_version: u32,
}

/// Storage attributes shared by every variable unless overridden.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDefaults {
    #[serde(default)]
    pub field_type: FieldType,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default)]
    pub decimals: u32,
    #[serde(default)]
    pub variable_type: MeasureLevel,
    #[serde(default = "default_not_applicable")]
    pub not_applicable: i64,
}

impl Default for VariableDefaults {
    fn default() -> Self {
        Self {
            field_type: FieldType::default(),
            width: default_width(),
            decimals: 0,
            variable_type: MeasureLevel::default(),
            not_applicable: NOT_APPLICABLE,
        }
    }
}

fn default_width() -> u32 {
    3
}

fn default_not_applicable() -> i64 {
    NOT_APPLICABLE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableEntry {
    pub basename: String,
    pub label: String,
    pub value_codes: ValueCodes,
    #[serde(default)]
    pub field_type: Option<FieldType>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub decimals: Option<u32>,
    #[serde(default)]
    pub variable_type: Option<MeasureLevel>,
    #[serde(default)]
    pub not_applicable: Option<i64>,
}

impl VariableEntry {
    pub fn into_definition(self, defaults: &VariableDefaults) -> VariableDefinition {
        VariableDefinition {
            basename: self.basename,
            label: self.label,
            value_codes: self.value_codes,
            field_type: self.field_type.unwrap_or(defaults.field_type),
            width: self.width.unwrap_or(defaults.width),
            decimals: self.decimals.unwrap_or(defaults.decimals),
            variable_type: self.variable_type.unwrap_or(defaults.variable_type),
            not_applicable: self.not_applicable.unwrap_or(defaults.not_applicable),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariablesTable {
    pub table: TableHeader,
    #[serde(default)]
    pub defaults: VariableDefaults,
    #[serde(default, rename = "variable")]
    pub variables: Vec<VariableEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantsTable {
    pub table: TableHeader,
    #[serde(default, rename = "variant")]
    pub variants: Vec<DatasetVariant>,
}
