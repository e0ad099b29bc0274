//! Core types for pain survey harmonisation.
//!
//! - [`VariableDefinition`]: canonical, prefix-free variable with its code domain
//! - [`DatasetVariant`]: one survey dataset with prefix, recodes, ops and coupling
//! - [`MetadataRegistry`]: basename lookup with startup-time integrity checks
//! - [`ColumnMetadata`]: per-column record persisted next to the data

pub mod error;
pub mod metadata;
pub mod registry;
pub mod values;
pub mod variable;
pub mod variant;

pub use error::{ModelError, Result};
pub use metadata::{ColumnMetadata, MetadataMap};
pub use registry::MetadataRegistry;
pub use values::{CellCode, any_to_string, cell_code, column_codes};
pub use variable::{
    FieldType, MISSING, MeasureLevel, NOT_APPLICABLE, ValueCode, ValueCodes, VariableDefinition,
};
pub use variant::{Coupling, DatasetVariant, RecodeMap, RecodeRule, StructuralOp};
