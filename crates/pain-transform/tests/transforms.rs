use polars::prelude::*;

use pain_model::{DatasetVariant, StructuralOp};
use pain_transform::{TransformError, apply_ops, apply_recode, coerce_governed};

fn g214_sq() -> DatasetVariant {
    DatasetVariant::new("G214_SQ", "G214_SQ_", &["PN17", "PN25"])
        .with_recode("PN17", [(9, -99)].into_iter().collect())
        .with_recode("PN25", [(8, -88), (9, -99)].into_iter().collect())
        .with_op(StructuralOp::Drop {
            column: "SEX".to_string(),
        })
        .with_op(StructuralOp::Sort {
            column: "ID".to_string(),
        })
        .with_op(StructuralOp::DropEmptyRows {
            exclude: vec!["ID".to_string(), "SEX".to_string()],
        })
}

#[test]
fn recode_then_ops_then_coerce() {
    let variant = g214_sq();
    let mut df = df! {
        "ID" => [30i64, 10, 20],
        "SEX" => [1i64, 2, 1],
        "G214_SQ_PN17" => [Some(9.0f64), None, Some(0.0)],
        "G214_SQ_PN25" => [Some(9.0f64), None, Some(8.0)],
    }
    .unwrap();

    let recoded = apply_recode(&mut df, &variant).unwrap();
    let summary = apply_ops(&mut df, &variant.ops).unwrap();
    coerce_governed(&mut df, &variant).unwrap();

    assert_eq!(recoded, 3);
    assert_eq!(summary.rows_dropped, 1);
    let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
    assert_eq!(names, vec!["ID", "G214_SQ_PN17", "G214_SQ_PN25"]);
    let pn25: Vec<Option<i64>> = df
        .column("G214_SQ_PN25")
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(pn25, vec![Some(-88), Some(-99)]);
}

#[test]
fn missing_structural_column_fails_the_variant() {
    let variant = g214_sq();
    let mut df = df! { "ID" => [1i64], "G214_SQ_PN17" => [0i64] }.unwrap();
    let err = apply_ops(&mut df, &variant.ops).unwrap_err();
    assert!(matches!(err, TransformError::ColumnNotFound { op: "drop", .. }));
}
