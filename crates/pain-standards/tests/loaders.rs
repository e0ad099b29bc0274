use std::fs;

use pain_model::{FieldType, MeasureLevel, ModelError, StructuralOp};
use pain_standards::{StandardsError, load_default_standards, load_registry, load_standards};

const VARIABLES: &str = r#"
[table]
schema = "pain-variables"
schema_version = 1

[defaults]
width = 4

[[variable]]
basename = "PN17"
label = "Ever had back pain"
value_codes = [{ code = -99, label = "Missing" }, { code = 0, label = "No" }, { code = 1, label = "Yes" }]

[[variable]]
basename = "PN25"
label = "Sought professional advice/treatment"
width = 2
value_codes = [{ code = -88, label = "N/A" }, { code = 0, label = "No" }, { code = 1, label = "Yes" }]
"#;

fn write_tables(variables: &str, variants: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("variables.toml"), variables).expect("write variables");
    fs::write(dir.path().join("variants.toml"), variants).expect("write variants");
    dir
}

#[test]
fn loads_shipped_tables() {
    let standards = load_default_standards().expect("load standards");
    assert_eq!(standards.registry.len(), 7);
    let names: Vec<&str> = standards.variants.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["G214_PQ", "G214_SQ", "G217_PQ", "G217_SQ"]);

    let pn17 = standards.registry.get("PN17").expect("PN17");
    assert_eq!(pn17.field_type, FieldType::Numeric);
    assert_eq!(pn17.width, 3);
    assert_eq!(pn17.variable_type, MeasureLevel::Nominal);
    assert!(!pn17.allows(-88));
}

#[test]
fn shipped_g214_keeps_backward_exemption() {
    let standards = load_default_standards().expect("load standards");
    let g214 = standards.variant("G214_PQ").expect("G214_PQ");
    let coupling = g214.consistency.as_ref().expect("coupling");
    assert_eq!(coupling.root, "PN17");
    assert!(coupling.forward_exempt.is_empty());
    assert!(coupling.backward_exempt.contains("PN35"));
    assert_eq!(g214.recode_for("PN25").map(|m| m.apply(8)), Some(-88));
    assert_eq!(
        g214.ops.first(),
        Some(&StructuralOp::Drop {
            column: "SEX".to_string()
        })
    );
}

#[test]
fn shipped_g217_has_no_coupling() {
    let standards = load_default_standards().expect("load standards");
    for name in ["G217_PQ", "G217_SQ"] {
        let variant = standards.variant(name).expect(name);
        assert!(variant.consistency.is_none(), "{name}");
        assert_eq!(variant.variables.len(), 7);
    }
}

#[test]
fn defaults_apply_unless_overridden() {
    let dir = write_tables(VARIABLES, "");
    let registry = load_registry(&dir.path().join("variables.toml")).expect("load");
    assert_eq!(registry.get("PN17").unwrap().width, 4);
    assert_eq!(registry.get("PN25").unwrap().width, 2);
    assert_eq!(registry.get("PN25").unwrap().not_applicable, -88);
}

#[test]
fn variant_referencing_unknown_variable_is_fatal() {
    let variants = r#"
[table]
schema = "pain-variants"
schema_version = 1

[[variant]]
name = "G217_SQ"
prefix = "G217_SQ_"
variables = ["PN17", "PN9"]
"#;
    let dir = write_tables(VARIABLES, variants);
    let err = load_standards(dir.path()).unwrap_err();
    match err {
        StandardsError::Model {
            source: ModelError::UnknownVariable { basename, variant },
            ..
        } => {
            assert_eq!(basename, "PN9");
            assert_eq!(variant.as_deref(), Some("G217_SQ"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_variant_names_rejected() {
    let variants = r#"
[table]
schema = "pain-variants"
schema_version = 1

[[variant]]
name = "G214_PQ"
prefix = "G214_PQ_"
variables = ["PN17"]

[[variant]]
name = "G214_PQ"
prefix = "G214_PQ_"
variables = ["PN25"]
"#;
    let dir = write_tables(VARIABLES, variants);
    assert!(matches!(
        load_standards(dir.path()),
        Err(StandardsError::DuplicateVariant { name, .. }) if name == "G214_PQ"
    ));
}

#[test]
fn wrong_schema_rejected() {
    let variables = VARIABLES.replace("pain-variables", "sdtm-domains");
    let dir = write_tables(&variables, "");
    assert!(matches!(
        load_registry(&dir.path().join("variables.toml")),
        Err(StandardsError::Schema { .. })
    ));
}

#[test]
fn duplicate_basename_in_table_is_fatal() {
    let variables = format!(
        "{VARIABLES}\n[[variable]]\nbasename = \"PN17\"\nlabel = \"again\"\nvalue_codes = []\n"
    );
    let dir = write_tables(&variables, "");
    assert!(matches!(
        load_registry(&dir.path().join("variables.toml")),
        Err(StandardsError::Model {
            source: ModelError::DuplicateVariable { .. },
            ..
        })
    ));
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_registry(&dir.path().join("variables.toml")).unwrap_err();
    assert!(err.to_string().contains("variables.toml"));
}
