use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use comfy_table::Table;
use tracing::{info, info_span, warn};

use pain_core::{PipelineOptions, RunSummary, check_prefix_conflicts, run_variants};
use pain_ingest::CsvDatasetStore;
use pain_model::{DatasetVariant, StructuralOp};
use pain_standards::{Standards, load_default_standards, load_standards};
use pain_validate::{ValidationReport, write_validation_report_json};

use crate::cli::RunArgs;
use crate::summary::{apply_table_style, describe_coupling, describe_recode};

/// Everything the summary printer needs after a `run`.
#[derive(Debug)]
pub struct RunResult {
    pub summary: RunSummary,
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub report_json: Option<PathBuf>,
}

impl RunResult {
    pub fn has_errors(&self) -> bool {
        !self.summary.all_succeeded()
    }
}

pub fn load(standards_dir: Option<&Path>) -> Result<Standards> {
    match standards_dir {
        Some(root) => load_standards(root)
            .with_context(|| format!("load standards from {}", root.display())),
        None => load_default_standards().context("load standards"),
    }
}

pub fn run_harmonise(args: &RunArgs, standards_dir: Option<&Path>) -> Result<RunResult> {
    let span = info_span!("run", dry_run = args.dry_run);
    let _guard = span.enter();

    let standards = load(standards_dir)?;
    let conflicts = check_prefix_conflicts(&standards.variants, &standards.registry)
        .context("project variant metadata")?;
    if !conflicts.is_empty() {
        warn!(
            conflicts = conflicts.len(),
            "variant prefixes render conflicting column metadata"
        );
    }

    let selected = select_variants(&standards, &args.variants)?;
    info!(
        variants = selected.len(),
        raw_dir = %args.raw_dir.display(),
        output_dir = %args.output_dir.display(),
        "starting harmonisation"
    );

    let reader = CsvDatasetStore::new(&args.raw_dir);
    let writer = CsvDatasetStore::new(&args.output_dir);
    let summary = run_variants(
        &selected,
        &standards.registry,
        &reader,
        &writer,
        PipelineOptions {
            dry_run: args.dry_run,
        },
    );

    if let Some(path) = &args.report_json {
        let reports: Vec<ValidationReport> = summary.reports().into_iter().cloned().collect();
        write_validation_report_json(path, &reports)
            .with_context(|| format!("write validation report {}", path.display()))?;
        info!(path = %path.display(), reports = reports.len(), "wrote validation report");
    }

    Ok(RunResult {
        summary,
        output_dir: args.output_dir.clone(),
        dry_run: args.dry_run,
        report_json: args.report_json.clone(),
    })
}

/// Resolve `names` against the configured variants, keeping the order
/// given. An empty list selects every variant in configuration order.
pub fn select_variants<'a>(
    standards: &'a Standards,
    names: &[String],
) -> Result<Vec<&'a DatasetVariant>> {
    if names.is_empty() {
        return Ok(standards.variants.iter().collect());
    }
    let mut selected = Vec::with_capacity(names.len());
    for name in names {
        let Some(variant) = standards.variant(name) else {
            let known: Vec<&str> = standards.variants.iter().map(|v| v.name.as_str()).collect();
            bail!("unknown variant {name} (configured: {})", known.join(", "));
        };
        if !selected.iter().any(|v: &&DatasetVariant| v.name == variant.name) {
            selected.push(variant);
        }
    }
    Ok(selected)
}

pub fn run_variables(standards_dir: Option<&Path>) -> Result<()> {
    let standards = load(standards_dir)?;
    let mut table = Table::new();
    table.set_header(vec!["Variable", "Label", "Codes", "N/A"]);
    apply_table_style(&mut table);
    for definition in standards.registry.iter() {
        let codes: Vec<String> = definition
            .value_codes
            .iter()
            .map(|code| format!("{} {}", code.code, code.label))
            .collect();
        let not_applicable = if definition.allows(definition.not_applicable) {
            definition.not_applicable.to_string()
        } else {
            "-".to_string()
        };
        table.add_row(vec![
            definition.basename.clone(),
            definition.label.clone(),
            codes.join(", "),
            not_applicable,
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_variants_list(standards_dir: Option<&Path>) -> Result<()> {
    let standards = load(standards_dir)?;
    let mut table = Table::new();
    table.set_header(vec![
        "Variant",
        "Source",
        "Prefix",
        "Variables",
        "Recode",
        "Steps",
        "Coupling",
    ]);
    apply_table_style(&mut table);
    for variant in &standards.variants {
        let steps: Vec<&str> = variant.ops.iter().map(StructuralOp::name).collect();
        table.add_row(vec![
            variant.name.clone(),
            variant.source_name().to_string(),
            variant.prefix.clone(),
            variant.variables.join(", "),
            describe_recode(variant),
            if steps.is_empty() {
                "-".to_string()
            } else {
                steps.join(", ")
            },
            describe_coupling(variant),
        ]);
    }
    println!("{table}");
    Ok(())
}
