//! Metadata projection and the harmonisation pipeline.

pub mod error;
pub mod pipeline;
pub mod projection;

pub use error::{HarmoniseError, Result};
pub use pipeline::{
    PipelineOptions, RunSummary, VariantOutcome, check_prefix_conflicts, harmonise_variant,
    run_variants,
};
pub use projection::{
    MetadataConflict, Projection, align_to_columns, merge, project, project_many,
};
