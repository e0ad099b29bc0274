//! Per-variant harmonisation pipeline.
//!
//! Stages, in order, for each variant:
//! 1. **Load**: rows and pre-existing column metadata
//! 2. **Recode**: raw codes to canonical sentinels on governed columns
//! 3. **Structure**: the variant's drop/sort/drop-empty-rows steps
//! 4. **Validate**: the rule engine; any violation withholds output
//! 5. **Metadata**: coerce codes, project, merge and align metadata
//! 6. **Write**: rows plus merged metadata, unless this is a dry run
//!
//! Variants never share state, so one variant failing leaves the others
//! untouched.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, error, info, info_span};

use pain_ingest::{DatasetReader, DatasetWriter, LoadedDataset};
use pain_model::{DatasetVariant, MetadataRegistry};
use pain_transform::{apply_ops, apply_recode, coerce_governed};
use pain_validate::{ValidationReport, validate_variant};

use crate::error::{HarmoniseError, Result};
use crate::projection::{MetadataConflict, align_to_columns, merge, project, project_many};

#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Run every stage but skip the write.
    pub dry_run: bool,
}

/// What happened to one variant that passed validation.
#[derive(Debug, Clone)]
pub struct VariantOutcome {
    pub variant: String,
    pub rows_in: usize,
    pub rows_out: usize,
    pub rows_dropped: usize,
    pub columns_dropped: Vec<String>,
    pub cells_recoded: usize,
    pub metadata_entries: usize,
    /// Output path; `None` on a dry run.
    pub written: Option<PathBuf>,
    pub report: ValidationReport,
}

/// Harmonise one variant end to end.
pub fn harmonise_variant(
    variant: &DatasetVariant,
    registry: &MetadataRegistry,
    reader: &dyn DatasetReader,
    writer: &dyn DatasetWriter,
    options: PipelineOptions,
) -> Result<VariantOutcome> {
    let span = info_span!("harmonise", variant = %variant.name);
    let _guard = span.enter();
    let start = Instant::now();

    let definitions = registry
        .for_variant(variant)
        .map_err(|source| HarmoniseError::Config {
            variant: variant.name.clone(),
            source,
        })?;

    // Stage 1: load
    let LoadedDataset {
        mut data,
        metadata: existing,
        path,
    } = reader
        .read(variant.source_name())
        .map_err(|source| HarmoniseError::Load {
            variant: variant.name.clone(),
            source,
        })?;
    let rows_in = data.height();
    info!(
        source = %path.display(),
        rows = rows_in,
        columns = data.width(),
        "loaded source dataset"
    );

    let transform_err = |source| HarmoniseError::Transform {
        variant: variant.name.clone(),
        source,
    };

    // Stage 2 and 3: recode, then structural ops
    let stage_start = Instant::now();
    let cells_recoded = apply_recode(&mut data, variant).map_err(transform_err)?;
    let ops = apply_ops(&mut data, &variant.ops).map_err(transform_err)?;
    debug!(
        cells_recoded,
        rows_dropped = ops.rows_dropped,
        columns_dropped = ops.columns_dropped.len(),
        duration_ms = stage_start.elapsed().as_millis(),
        "prepared rows"
    );

    // Stage 4: validate
    let stage_start = Instant::now();
    let report =
        validate_variant(variant, registry, &data).map_err(|source| HarmoniseError::Config {
            variant: variant.name.clone(),
            source,
        })?;
    if !report.is_valid() {
        error!(
            violations = report.violations.len(),
            affected_rows = report.affected_rows(),
            duration_ms = stage_start.elapsed().as_millis(),
            "validation failed; output withheld"
        );
        return Err(HarmoniseError::Validation {
            variant: variant.name.clone(),
            report: Box::new(report),
        });
    }
    debug!(duration_ms = stage_start.elapsed().as_millis(), "validation passed");

    // Stage 5: coerce and build metadata
    coerce_governed(&mut data, variant).map_err(transform_err)?;
    let projected = project(&definitions, &variant.prefix);
    let merged = merge(&projected, &existing);
    let columns: Vec<String> = data
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let metadata = align_to_columns(&merged, &columns);

    // Stage 6: write
    let written = if options.dry_run {
        info!("dry run; skipping write");
        None
    } else {
        let path = writer
            .write(&variant.name, &data, &metadata)
            .map_err(|source| HarmoniseError::Write {
                variant: variant.name.clone(),
                source,
            })?;
        Some(path)
    };

    let outcome = VariantOutcome {
        variant: variant.name.clone(),
        rows_in,
        rows_out: data.height(),
        rows_dropped: ops.rows_dropped,
        columns_dropped: ops.columns_dropped,
        cells_recoded,
        metadata_entries: metadata.len(),
        written,
        report,
    };
    info!(
        rows_in = outcome.rows_in,
        rows_out = outcome.rows_out,
        duration_ms = start.elapsed().as_millis(),
        "variant harmonised"
    );
    Ok(outcome)
}

/// Per-variant results of a run, in the order the variants were given.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub results: Vec<(String, Result<VariantOutcome>)>,
}

impl RunSummary {
    pub fn successes(&self) -> impl Iterator<Item = &VariantOutcome> {
        self.results.iter().filter_map(|(_, result)| result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &HarmoniseError> {
        self.results.iter().filter_map(|(_, result)| result.as_ref().err())
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Validation reports of every variant that reached the rule engine.
    pub fn reports(&self) -> Vec<&ValidationReport> {
        self.results
            .iter()
            .filter_map(|(_, result)| match result {
                Ok(outcome) => Some(&outcome.report),
                Err(err) => err.report(),
            })
            .collect()
    }
}

/// Harmonise `variants` one after another, isolating failures.
pub fn run_variants(
    variants: &[&DatasetVariant],
    registry: &MetadataRegistry,
    reader: &dyn DatasetReader,
    writer: &dyn DatasetWriter,
    options: PipelineOptions,
) -> RunSummary {
    let start = Instant::now();
    let mut summary = RunSummary::default();
    for variant in variants {
        let result = harmonise_variant(variant, registry, reader, writer, options);
        if let Err(err) = &result {
            error!(variant = %variant.name, stage = err.stage(), "{err}");
        }
        summary.results.push((variant.name.clone(), result));
    }
    info!(
        variants = variants.len(),
        failed = summary.failures().count(),
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );
    summary
}

/// Project every variant's definitions into one namespace and report
/// column names that two prefixes would define differently.
pub fn check_prefix_conflicts(
    variants: &[DatasetVariant],
    registry: &MetadataRegistry,
) -> pain_model::Result<Vec<MetadataConflict>> {
    let mut sets = Vec::with_capacity(variants.len());
    for variant in variants {
        sets.push((variant.prefix.as_str(), registry.for_variant(variant)?));
    }
    Ok(project_many(&sets).conflicts)
}
