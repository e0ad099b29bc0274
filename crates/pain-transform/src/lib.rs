//! Row-level preparation of survey datasets before validation.
//!
//! Steps run in a fixed order for every variant: sentinel recoding of the
//! governed columns, then the variant's structural ops. Integer coercion
//! runs after validation passes.

pub mod coerce;
pub mod error;
pub mod ops;
pub mod recode;

pub use coerce::{coerce_governed, coerce_to_codes};
pub use error::{Result, TransformError};
pub use ops::{OpsSummary, apply_ops, drop_column, drop_empty_rows, sort_by};
pub use recode::{apply_recode, recode_column};
