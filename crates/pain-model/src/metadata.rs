//! Per-column metadata written alongside harmonised data.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::variable::{FieldType, MeasureLevel, ValueCodes, VariableDefinition};

/// Metadata attached to one dataset column.
///
/// Known attributes are typed; anything else found in pre-existing metadata
/// is kept verbatim in `extra` so it survives a load/write cycle. That
/// includes a known key whose value has a shape other than the typed one,
/// such as `value_labels` stored as a `{"1": "Male"}` map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "ValueCodes::is_empty")]
    pub value_labels: ValueCodes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measure: Option<MeasureLevel>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl<'de> Deserialize<'de> for ColumnMetadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let value_labels = take_typed::<ValueCodes>(&mut raw, "value_labels", |codes| {
            !codes.is_empty()
        })
        .unwrap_or_default();
        Ok(Self {
            label: take_typed(&mut raw, "label", |_| true),
            value_labels,
            field_type: take_typed(&mut raw, "field_type", |_| true),
            width: take_typed(&mut raw, "width", |_| true),
            decimals: take_typed(&mut raw, "decimals", |_| true),
            measure: take_typed(&mut raw, "measure", |_| true),
            extra: raw,
        })
    }
}

/// Move `key` out of `raw` when it parses as `T`, writes back unchanged
/// and passes `keep`. Otherwise the raw value stays in place.
fn take_typed<T: DeserializeOwned + Serialize>(
    raw: &mut BTreeMap<String, Value>,
    key: &str,
    keep: impl Fn(&T) -> bool,
) -> Option<T> {
    let original = raw.get(key)?;
    let parsed = serde_json::from_value::<T>(original.clone()).ok()?;
    let lossless = serde_json::to_value(&parsed).is_ok_and(|value| value == *original);
    if !lossless || !keep(&parsed) {
        return None;
    }
    raw.remove(key);
    Some(parsed)
}

/// Column name → metadata. One entry per column.
pub type MetadataMap = BTreeMap<String, ColumnMetadata>;
