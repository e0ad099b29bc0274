#![deny(unsafe_code)]

pub mod error;
pub mod loaders;
pub mod paths;
pub mod tables;

pub use crate::error::StandardsError;
pub use crate::loaders::{
    Standards, load_default_standards, load_registry, load_standards,
    load_variants,
};
pub use crate::paths::{STANDARDS_ENV_VAR, standards_root};
