mod common;

use polars::prelude::*;

use common::{coupled_variant, coupling, frame, registry};
use pain_model::{Coupling, DatasetVariant};
use pain_validate::{Outcome, Rule, Violation, validate_variant, write_validation_report_json};

#[test]
fn gated_row_with_forward_exemption_is_valid() {
    let variant = coupled_variant(coupling().with_forward_exempt(&["PN35"]));
    let df = frame(&[[0, -88, -88, 1, -88]]);

    let report = validate_variant(&variant, &registry(), &df).unwrap();

    assert_eq!(report.outcome(), Outcome::Valid, "{:?}", report.violations);
}

#[test]
fn out_of_domain_dependent_fails_domain_check() {
    let variant = coupled_variant(coupling().with_forward_exempt(&["PN35"]));
    let df = frame(&[[0, 5, -88, 1, -88]]);

    let report = validate_variant(&variant, &registry(), &df).unwrap();

    assert_eq!(report.outcome(), Outcome::Invalid);
    let domain: Vec<&Violation> = report.by_rule(Rule::OutOfDomain).collect();
    assert_eq!(domain.len(), 1);
    assert_eq!(domain[0].column(), "PN25");
    match domain[0] {
        Violation::OutOfDomain { invalid_values, .. } => assert_eq!(invalid_values, &vec![5]),
        other => panic!("unexpected violation {other:?}"),
    }
}

#[test]
fn value_two_is_out_of_domain_regardless_of_root() {
    for root in [0, 1, -99] {
        let df = frame(&[[root, 2, -88, -88, -88]]);
        let variant = DatasetVariant::new("TEST", "", &["PN17", "PN25", "PN34", "PN35", "PN36"]);
        let report = validate_variant(&variant, &registry(), &df).unwrap();
        let columns: Vec<&str> = report
            .by_rule(Rule::OutOfDomain)
            .map(Violation::column)
            .collect();
        assert_eq!(columns, vec!["PN25"], "root = {root}");
    }
}

#[test]
fn forward_violation_per_dependent_with_row_ids() {
    let variant = coupled_variant(coupling());
    let df = frame(&[
        [0, -88, -88, -88, -88],
        [0, 1, -88, 0, -88],
        [1, 0, 1, 0, 1],
    ]);

    let report = validate_variant(&variant, &registry(), &df).unwrap();

    let forward: Vec<&Violation> = report.by_rule(Rule::ForwardConsistency).collect();
    let columns: Vec<&str> = forward.iter().map(|v| v.column()).collect();
    assert_eq!(columns, vec!["PN25", "PN35"]);
    let row = &forward[0].rows()[0];
    assert_eq!(row.index, 1);
    assert_eq!(row.id.as_deref(), Some("R002"));
    assert_eq!(report.by_rule(Rule::BackwardConsistency).count(), 0);
}

#[test]
fn backward_exemption_is_honoured() {
    let df = frame(&[[1, 0, 0, -88, 1]]);

    let strict = validate_variant(&coupled_variant(coupling()), &registry(), &df).unwrap();
    assert_eq!(strict.by_rule(Rule::BackwardConsistency).count(), 1);

    let exempt = coupled_variant(coupling().with_backward_exempt(&["PN35"]));
    let report = validate_variant(&exempt, &registry(), &df).unwrap();
    assert!(report.is_valid(), "{:?}", report.violations);
}

#[test]
fn backward_violation_lists_checked_dependents() {
    let variant = coupled_variant(coupling().with_backward_exempt(&["PN35"]));
    let df = frame(&[[1, -88, 0, 0, 0], [-99, 0, 0, 0, -88], [0, -88, -88, -88, -88]]);

    let report = validate_variant(&variant, &registry(), &df).unwrap();

    let backward: Vec<&Violation> = report.by_rule(Rule::BackwardConsistency).collect();
    assert_eq!(backward.len(), 1);
    match backward[0] {
        Violation::BackwardConsistency {
            root,
            dependents,
            rows,
        } => {
            assert_eq!(root, "PN17");
            assert_eq!(dependents, &vec!["PN25", "PN34", "PN36"]);
            let indices: Vec<usize> = rows.iter().map(|row| row.index).collect();
            assert_eq!(indices, vec![0, 1]);
        }
        other => panic!("unexpected violation {other:?}"),
    }
}

#[test]
fn variant_without_coupling_runs_column_checks_only() {
    let variant = DatasetVariant::new("G217_PQ", "", &["PN17", "PN25"]);
    let df = frame(&[[1, -88, 0, 0, 0]]);

    let report = validate_variant(&variant, &registry(), &df).unwrap();

    assert!(report.is_valid());
}

#[test]
fn missing_columns_are_reported_and_checks_continue() {
    let variant = coupled_variant(coupling());
    let df = df! {
        "ID" => ["R001"],
        "PN17" => [0i64],
        "PN25" => [1i64],
    }
    .unwrap();

    let report = validate_variant(&variant, &registry(), &df).unwrap();

    let missing: Vec<&str> = report
        .by_rule(Rule::MissingColumn)
        .map(Violation::column)
        .collect();
    assert_eq!(missing, vec!["PN34", "PN35", "PN36"]);
    assert_eq!(report.by_rule(Rule::ForwardConsistency).count(), 1);
}

#[test]
fn nulls_and_text_are_reported_separately() {
    let variant = DatasetVariant::new("TEST", "", &["PN17"]);
    let df = df! {
        "ID" => ["R001", "R002", "R003", "R004"],
        "PN17" => [Some("0"), None, Some("yes"), Some("1.5")],
    }
    .unwrap();

    let report = validate_variant(&variant, &registry(), &df).unwrap();

    let counts = report.rule_counts();
    assert_eq!(counts.get(&Rule::NullValue), Some(&1));
    assert_eq!(counts.get(&Rule::NonIntegerCode), Some(&1));
    match report.by_rule(Rule::NonIntegerCode).next() {
        Some(Violation::NonIntegerCode { rows, samples, .. }) => {
            assert_eq!(rows.len(), 2);
            assert_eq!(samples, &vec!["yes".to_string(), "1.5".to_string()]);
        }
        other => panic!("unexpected violation {other:?}"),
    }
    assert_eq!(report.affected_rows(), 3);
}

#[test]
fn rows_are_never_truncated_but_samples_are() {
    let variant = DatasetVariant::new("TEST", "", &["PN17"]);
    let values: Vec<i64> = (2..12).collect();
    let df = df! { "PN17" => values }.unwrap();

    let report = validate_variant(&variant, &registry(), &df).unwrap();

    match report.by_rule(Rule::OutOfDomain).next() {
        Some(Violation::OutOfDomain {
            rows,
            invalid_values,
            ..
        }) => {
            assert_eq!(rows.len(), 10);
            assert_eq!(invalid_values.len(), 5);
            assert!(rows.iter().all(|row| row.id.is_none()));
        }
        other => panic!("unexpected violation {other:?}"),
    }
}

#[test]
fn prefixed_columns_are_resolved() {
    let variant = DatasetVariant::new("G214_PQ", "G214_PQ_", &["PN17", "PN25"])
        .with_consistency(Coupling::new("PN17", &["PN25"]));
    let df = df! {
        "ID" => [1i64, 2],
        "G214_PQ_PN17" => [0i64, 1],
        "G214_PQ_PN25" => [-88i64, 0],
    }
    .unwrap();

    let report = validate_variant(&variant, &registry(), &df).unwrap();

    assert!(report.is_valid(), "{:?}", report.violations);
}

#[test]
fn unknown_variable_is_an_error() {
    let variant = DatasetVariant::new("G217_SQ", "", &["PN9"]);
    let df = df! { "PN9" => [0i64] }.unwrap();
    assert!(validate_variant(&variant, &registry(), &df).is_err());
}

#[test]
fn report_json_has_header_and_violations() {
    let variant = coupled_variant(coupling());
    let df = frame(&[[0, 1, -88, -88, -88]]);
    let report = validate_variant(&variant, &registry(), &df).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reports").join("validation.json");
    write_validation_report_json(&path, &[report]).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.ends_with('\n'));
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["schema"], "pain-harmonise.validation-report");
    assert_eq!(json["schema_version"], 1);
    assert!(json["generated_at"].is_string());
    let first = &json["reports"][0];
    assert_eq!(first["variant"], "TEST");
    assert_eq!(first["outcome"], "invalid");
    assert_eq!(first["violations"][0]["rule"], "forward_consistency");
    assert_eq!(first["violations"][0]["rows"][0]["id"], "R001");
}
