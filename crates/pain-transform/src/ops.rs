//! Structural clean-up steps.

use polars::prelude::*;
use tracing::debug;

use pain_model::StructuralOp;

use crate::error::{Result, TransformError};

/// What the structural steps removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpsSummary {
    pub rows_dropped: usize,
    pub columns_dropped: Vec<String>,
}

/// Apply `ops` in order.
pub fn apply_ops(df: &mut DataFrame, ops: &[StructuralOp]) -> Result<OpsSummary> {
    let mut summary = OpsSummary::default();
    for op in ops {
        match op {
            StructuralOp::Drop { column } => {
                drop_column(df, column)?;
                summary.columns_dropped.push(column.clone());
            }
            StructuralOp::Sort { column } => sort_by(df, column)?,
            StructuralOp::DropEmptyRows { exclude } => {
                summary.rows_dropped += drop_empty_rows(df, exclude)?;
            }
        }
        debug!(op = op.name(), rows = df.height(), columns = df.width(), "applied structural op");
    }
    Ok(summary)
}

pub fn drop_column(df: &mut DataFrame, column: &str) -> Result<()> {
    df.drop_in_place(column)
        .map_err(|_| TransformError::ColumnNotFound {
            op: "drop",
            column: column.to_string(),
        })?;
    Ok(())
}

/// Stable ascending sort by one column. Nulls sort first.
pub fn sort_by(df: &mut DataFrame, column: &str) -> Result<()> {
    if df.column(column).is_err() {
        return Err(TransformError::ColumnNotFound {
            op: "sort",
            column: column.to_string(),
        });
    }
    let options = SortMultipleOptions::default().with_maintain_order(true);
    *df = df.sort([column], options)?;
    Ok(())
}

/// Remove rows in which every column outside `exclude` is null.
///
/// Exclusions naming absent columns are ignored. When no column is left to
/// inspect, no row is removed. Returns the number of rows dropped.
pub fn drop_empty_rows(df: &mut DataFrame, exclude: &[String]) -> Result<usize> {
    let height = df.height();
    let mut keep = vec![false; height];
    let mut inspected = 0usize;

    for column in df.get_columns() {
        if exclude.iter().any(|name| name.as_str() == column.name().as_str()) {
            continue;
        }
        inspected += 1;
        for (idx, is_null) in column.is_null().into_iter().enumerate() {
            if is_null == Some(false) {
                keep[idx] = true;
            }
        }
    }

    if inspected == 0 {
        return Ok(0);
    }

    let dropped = keep.iter().filter(|kept| !**kept).count();
    if dropped > 0 {
        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        *df = df.filter(&mask)?;
    }
    Ok(dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df! {
            "ID" => [3i64, 1, 2, 4],
            "SEX" => [Some(1i64), Some(2), Some(1), Some(2)],
            "PN17" => [Some(0i64), None, Some(1), None],
            "PN25" => [Some(-88i64), None, Some(0), Some(1)],
        }
        .unwrap()
    }

    #[test]
    fn test_drop_removes_column() {
        let mut df = sample();
        drop_column(&mut df, "SEX").unwrap();
        assert!(df.column("SEX").is_err());
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn test_drop_missing_column_fails() {
        let mut df = sample();
        let err = drop_column(&mut df, "AGE").unwrap_err();
        assert_eq!(err.to_string(), "drop: column 'AGE' not found");
    }

    #[test]
    fn test_sort_ascending() {
        let mut df = sample();
        sort_by(&mut df, "ID").unwrap();
        let ids: Vec<Option<i64>> = df.column("ID").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3), Some(4)]);
    }

    #[test]
    fn test_sort_missing_column_fails() {
        let mut df = sample();
        assert!(matches!(
            sort_by(&mut df, "RESPID"),
            Err(TransformError::ColumnNotFound { op: "sort", .. })
        ));
    }

    #[test]
    fn test_drop_empty_rows_respects_exclusions() {
        let mut df = sample();
        let dropped = drop_empty_rows(&mut df, &["ID".to_string(), "SEX".to_string()]).unwrap();

        assert_eq!(dropped, 1);
        assert_eq!(df.height(), 3);
        let ids: Vec<Option<i64>> = df.column("ID").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(ids, vec![Some(3), Some(2), Some(4)]);
    }

    #[test]
    fn test_drop_empty_rows_without_exclusions_keeps_rows_with_ids() {
        let mut df = sample();
        assert_eq!(drop_empty_rows(&mut df, &[]).unwrap(), 0);
    }

    #[test]
    fn test_apply_ops_in_order() {
        let mut df = sample();
        let ops = vec![
            StructuralOp::Drop {
                column: "SEX".to_string(),
            },
            StructuralOp::Sort {
                column: "ID".to_string(),
            },
            StructuralOp::DropEmptyRows {
                exclude: vec!["ID".to_string(), "SEX".to_string()],
            },
        ];
        let summary = apply_ops(&mut df, &ops).unwrap();

        assert_eq!(summary.rows_dropped, 1);
        assert_eq!(summary.columns_dropped, vec!["SEX".to_string()]);
        let ids: Vec<Option<i64>> = df.column("ID").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(ids, vec![Some(2), Some(3), Some(4)]);
    }
}
