use polars::prelude::*;

use pain_model::{CellCode, DatasetVariant, column_codes};

use crate::error::{Result, TransformError};

/// Store one column as Int64. Nulls stay null; any non-integer cell fails.
pub fn coerce_to_codes(df: &mut DataFrame, column: &str) -> Result<()> {
    let codes = column_codes(df.column(column)?);
    let mut values = Vec::with_capacity(codes.len());
    for (row, cell) in codes.into_iter().enumerate() {
        match cell {
            CellCode::Null => values.push(None),
            CellCode::Code(code) => values.push(Some(code)),
            CellCode::Invalid(value) => {
                return Err(TransformError::NotAnIntegerCode {
                    column: column.to_string(),
                    row,
                    value,
                });
            }
        }
    }
    df.with_column(Series::new(column.into(), values))?;
    Ok(())
}

/// Coerce every governed column present in `df` to Int64.
pub fn coerce_governed(df: &mut DataFrame, variant: &DatasetVariant) -> Result<()> {
    for (_, column) in variant.governed_columns() {
        if df.column(&column).is_ok() {
            coerce_to_codes(df, &column)?;
        }
    }
    Ok(())
}
