//! Column access for the rule engine.
//!
//! Governed columns are read once into [`CellCode`]s so every check works
//! on the same interpretation of each cell. Row references pick up the
//! respondent identifier when the id column is present.

use polars::prelude::{AnyValue, Column, DataFrame};

use pain_model::{CellCode, any_to_string, column_codes};

use crate::violation::RowRef;

#[derive(Debug)]
pub struct ColumnReader<'a> {
    df: &'a DataFrame,
    id_column: Option<&'a Column>,
}

impl<'a> ColumnReader<'a> {
    pub fn new(df: &'a DataFrame, id_column: &str) -> Self {
        Self {
            df,
            id_column: df.column(id_column).ok(),
        }
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Every cell of `name` as a code, or `None` when the column is absent.
    pub fn codes(&self, name: &str) -> Option<Vec<CellCode>> {
        self.df.column(name).ok().map(column_codes)
    }

    /// Reference to row `index`, carrying the id value when available.
    pub fn row(&self, index: usize) -> RowRef {
        let id = self.id_column.and_then(|column| {
            let value = any_to_string(column.get(index).unwrap_or(AnyValue::Null));
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });
        RowRef { index, id }
    }

    pub fn rows(&self, indices: impl IntoIterator<Item = usize>) -> Vec<RowRef> {
        indices.into_iter().map(|index| self.row(index)).collect()
    }
}
