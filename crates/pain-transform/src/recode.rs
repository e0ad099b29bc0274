//! Raw survey codes to canonical sentinel codes.

use polars::prelude::*;
use tracing::debug;

use pain_model::{CellCode, DatasetVariant, RecodeMap, column_codes};

use crate::error::Result;

/// Apply `map` to one column in place. Returns the number of cells changed.
///
/// Unmapped codes and nulls pass through. Cells that are not integer codes
/// are kept as text so the rule engine can report them; in that case the
/// column is stored as strings.
pub fn recode_column(df: &mut DataFrame, column: &str, map: &RecodeMap) -> Result<usize> {
    let codes = column_codes(df.column(column)?);
    let mut changed = 0usize;
    let recoded: Vec<CellCode> = codes
        .into_iter()
        .map(|cell| match cell {
            CellCode::Code(raw) => {
                let code = map.apply(raw);
                if code != raw {
                    changed += 1;
                }
                CellCode::Code(code)
            }
            other => other,
        })
        .collect();

    let all_integer = recoded
        .iter()
        .all(|cell| !matches!(cell, CellCode::Invalid(_)));
    let series = if all_integer {
        let values: Vec<Option<i64>> = recoded.iter().map(CellCode::code).collect();
        Series::new(column.into(), values)
    } else {
        let values: Vec<Option<String>> = recoded
            .into_iter()
            .map(|cell| match cell {
                CellCode::Null => None,
                CellCode::Code(code) => Some(code.to_string()),
                CellCode::Invalid(text) => Some(text),
            })
            .collect();
        Series::new(column.into(), values)
    };
    df.with_column(series)?;
    Ok(changed)
}

/// Apply every recode map declared by `variant` to its governed columns.
///
/// Columns absent from the dataset are skipped; presence is reported by
/// validation. Returns the total number of cells changed.
pub fn apply_recode(df: &mut DataFrame, variant: &DatasetVariant) -> Result<usize> {
    let mut total = 0usize;
    for (basename, column) in variant.governed_columns() {
        let Some(map) = variant.recode_for(basename) else {
            continue;
        };
        if map.is_empty() || df.column(&column).is_err() {
            continue;
        }
        let changed = recode_column(df, &column, map)?;
        if changed > 0 {
            debug!(variant = %variant.name, column = %column, changed, "recoded sentinel values");
        }
        total += changed;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> RecodeMap {
        [(9, -99), (8, -88)].into_iter().collect()
    }

    #[test]
    fn test_recodes_known_codes_only() {
        let mut df = df! { "PN25" => [Some(9i64), Some(8), Some(1), None] }.unwrap();
        let changed = recode_column(&mut df, "PN25", &map()).unwrap();

        assert_eq!(changed, 2);
        let values: Vec<Option<i64>> = df.column("PN25").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(-99), Some(-88), Some(1), None]);
    }

    #[test]
    fn test_float_codes_become_integers() {
        let mut df = df! { "PN17" => [9.0f64, 0.0] }.unwrap();
        recode_column(&mut df, "PN17", &map()).unwrap();

        assert_eq!(df.column("PN17").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_text_cells_are_kept() {
        let mut df = df! { "PN34" => ["9", "n/a", "1"] }.unwrap();
        let changed = recode_column(&mut df, "PN34", &map()).unwrap();

        assert_eq!(changed, 1);
        let column = df.column("PN34").unwrap();
        assert_eq!(column.dtype(), &DataType::String);
        let values: Vec<Option<&str>> = column.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("-99"), Some("n/a"), Some("1")]);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let mut df = df! { "ID" => [1i64] }.unwrap();
        assert!(recode_column(&mut df, "PN17", &map()).is_err());
    }

    #[test]
    fn test_apply_recode_uses_prefixed_columns() {
        let variant = DatasetVariant::new("G214_PQ", "G214_PQ_", &["PN17", "PN25"])
            .with_recode("PN17", [(9, -99)].into_iter().collect())
            .with_recode("PN25", map());
        let mut df = df! {
            "ID" => [1i64, 2],
            "G214_PQ_PN17" => [9i64, 0],
            "G214_PQ_PN25" => [8i64, 9],
        }
        .unwrap();

        let total = apply_recode(&mut df, &variant).unwrap();

        assert_eq!(total, 3);
        let pn25: Vec<Option<i64>> = df.column("G214_PQ_PN25").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(pn25, vec![Some(-88), Some(-99)]);
    }

    #[test]
    fn test_apply_recode_skips_absent_columns() {
        let variant = DatasetVariant::new("G217_SQ", "G217_SQ_", &["PN9"])
            .with_recode("PN9", [(9, -99)].into_iter().collect());
        let mut df = df! { "ID" => [1i64] }.unwrap();

        assert_eq!(apply_recode(&mut df, &variant).unwrap(), 0);
    }
}
