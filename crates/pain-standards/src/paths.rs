//! Standards directory path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the standards directory.
pub const STANDARDS_ENV_VAR: &str = "PAIN_STANDARDS_DIR";

/// File holding the canonical variable definitions.
pub const VARIABLES_FILE: &str = "variables.toml";

/// File holding the dataset variant descriptors.
pub const VARIANTS_FILE: &str = "variants.toml";

/// Get the standards root directory.
///
/// Resolution order:
/// 1. `PAIN_STANDARDS_DIR` environment variable
/// 2. `standards/` directory relative to workspace root
pub fn standards_root() -> PathBuf {
    if let Ok(root) = std::env::var(STANDARDS_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards")
}

pub fn variables_path() -> PathBuf {
    standards_root().join(VARIABLES_FILE)
}

pub fn variants_path() -> PathBuf {
    standards_root().join(VARIANTS_FILE)
}
