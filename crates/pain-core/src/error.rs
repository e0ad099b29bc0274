//! Error types for the harmonisation pipeline.

use thiserror::Error;

use pain_ingest::IngestError;
use pain_model::ModelError;
use pain_transform::TransformError;
use pain_validate::ValidationReport;

/// Why one variant did not produce output.
///
/// Each variant fails independently; the pipeline keeps going with the
/// remaining variants.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HarmoniseError {
    // === Configuration ===
    #[error("variant {variant}: {source}")]
    Config {
        variant: String,
        #[source]
        source: ModelError,
    },

    // === Input ===
    #[error("variant {variant}: failed to load source: {source}")]
    Load {
        variant: String,
        #[source]
        source: IngestError,
    },

    // === Processing ===
    #[error("variant {variant}: {source}")]
    Transform {
        variant: String,
        #[source]
        source: TransformError,
    },

    /// Rule engine found violations; nothing was written.
    #[error("variant {variant} failed validation with {} violation(s)", .report.violations.len())]
    Validation {
        variant: String,
        report: Box<ValidationReport>,
    },

    // === Output ===
    #[error("variant {variant}: failed to write output: {source}")]
    Write {
        variant: String,
        #[source]
        source: IngestError,
    },
}

impl HarmoniseError {
    pub fn variant(&self) -> &str {
        match self {
            Self::Config { variant, .. }
            | Self::Load { variant, .. }
            | Self::Transform { variant, .. }
            | Self::Validation { variant, .. }
            | Self::Write { variant, .. } => variant,
        }
    }

    /// Validation report when the failure came from the rule engine.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Validation { report, .. } => Some(report.as_ref()),
            _ => None,
        }
    }

    /// Short stage label for summaries.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Load { .. } => "load",
            Self::Transform { .. } => "transform",
            Self::Validation { .. } => "validate",
            Self::Write { .. } => "write",
        }
    }
}

pub type Result<T> = std::result::Result<T, HarmoniseError>;
