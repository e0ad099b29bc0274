//! Reading survey codes out of Polars cells.

use polars::prelude::{AnyValue, Column};

/// Interpretation of a single governed cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellCode {
    Null,
    Code(i64),
    /// Present but not an integer code; holds the rendered value.
    Invalid(String),
}

impl CellCode {
    pub fn code(&self) -> Option<i64> {
        match self {
            CellCode::Code(code) => Some(*code),
            _ => None,
        }
    }
}

/// Render a cell the way it appears in reports. Null renders as "".
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_float(f64::from(v)),
        AnyValue::Float64(v) => format_float(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn format_float(v: f64) -> String {
    if v.fract() == 0.0 && v.is_finite() {
        format!("{v:.0}")
    } else {
        v.to_string()
    }
}

/// Classify a cell as a survey code.
///
/// Floats count as codes only when they carry no fractional part. Strings
/// are trimmed; an empty string is treated as null.
pub fn cell_code(value: AnyValue<'_>) -> CellCode {
    match value {
        AnyValue::Null => CellCode::Null,
        AnyValue::Int8(v) => CellCode::Code(i64::from(v)),
        AnyValue::Int16(v) => CellCode::Code(i64::from(v)),
        AnyValue::Int32(v) => CellCode::Code(i64::from(v)),
        AnyValue::Int64(v) => CellCode::Code(v),
        AnyValue::UInt8(v) => CellCode::Code(i64::from(v)),
        AnyValue::UInt16(v) => CellCode::Code(i64::from(v)),
        AnyValue::UInt32(v) => CellCode::Code(i64::from(v)),
        AnyValue::UInt64(v) => match i64::try_from(v) {
            Ok(code) => CellCode::Code(code),
            Err(_) => CellCode::Invalid(v.to_string()),
        },
        AnyValue::Float32(v) => float_code(f64::from(v)),
        AnyValue::Float64(v) => float_code(v),
        AnyValue::String(s) => str_code(s),
        AnyValue::StringOwned(ref s) => str_code(s.as_str()),
        other => CellCode::Invalid(any_to_string(other)),
    }
}

/// Classify every cell of a column, in row order.
pub fn column_codes(column: &Column) -> Vec<CellCode> {
    (0..column.len())
        .map(|idx| cell_code(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect()
}

#[allow(clippy::cast_possible_truncation)]
fn float_code(v: f64) -> CellCode {
    if v.is_nan() {
        return CellCode::Null;
    }
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 {
        CellCode::Code(v as i64)
    } else {
        CellCode::Invalid(format_float(v))
    }
}

fn str_code(s: &str) -> CellCode {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return CellCode::Null;
    }
    match trimmed.parse::<i64>() {
        Ok(code) => CellCode::Code(code),
        Err(_) => match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() && v.fract() == 0.0 => float_code(v),
            _ => CellCode::Invalid(trimmed.to_string()),
        },
    }
}
