use std::collections::BTreeSet;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use pain_model::{DatasetVariant, MetadataRegistry};

use crate::error::{Result, StandardsError};
use crate::paths::{VARIABLES_FILE, VARIANTS_FILE, standards_root};
use crate::tables::{
    SCHEMA_VERSION, TableHeader, VARIABLES_SCHEMA, VARIANTS_SCHEMA, VariablesTable, VariantsTable,
};

/// Registry and variants loaded together, cross-checked against each other.
#[derive(Debug, Clone)]
pub struct Standards {
    pub registry: MetadataRegistry,
    pub variants: Vec<DatasetVariant>,
}

impl Standards {
    /// Look up a configured variant by name.
    pub fn variant(&self, name: &str) -> Option<&DatasetVariant> {
        self.variants.iter().find(|variant| variant.name == name)
    }
}

pub fn load_default_standards() -> Result<Standards> {
    load_standards(&standards_root())
}

/// Load both tables from `root`.
pub fn load_standards(root: &Path) -> Result<Standards> {
    let registry = load_registry(&root.join(VARIABLES_FILE))?;
    let variants = load_variants(&root.join(VARIANTS_FILE), &registry)?;
    Ok(Standards { registry, variants })
}

pub fn load_registry(path: &Path) -> Result<MetadataRegistry> {
    let table: VariablesTable = read_toml(path)?;
    check_header(path, &table.table, VARIABLES_SCHEMA)?;
    let defaults = table.defaults;
    let definitions = table
        .variables
        .into_iter()
        .map(|entry| entry.into_definition(&defaults))
        .collect();
    let registry =
        MetadataRegistry::new(definitions).map_err(|err| StandardsError::model(path, err))?;
    debug!(path = %path.display(), variables = registry.len(), "loaded variable table");
    Ok(registry)
}

/// Load variant descriptors and check each one against `registry`.
pub fn load_variants(path: &Path, registry: &MetadataRegistry) -> Result<Vec<DatasetVariant>> {
    let table: VariantsTable = read_toml(path)?;
    check_header(path, &table.table, VARIANTS_SCHEMA)?;

    let mut names = BTreeSet::new();
    for variant in &table.variants {
        if !names.insert(variant.name.as_str()) {
            return Err(StandardsError::DuplicateVariant {
                path: path.to_path_buf(),
                name: variant.name.clone(),
            });
        }
        registry
            .ensure_variant(variant)
            .map_err(|err| StandardsError::model(path, err))?;
    }
    debug!(path = %path.display(), variants = table.variants.len(), "loaded variant table");
    Ok(table.variants)
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|err| StandardsError::io(path, err))?;
    toml::from_str(&text).map_err(|source| StandardsError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

fn check_header(path: &Path, header: &TableHeader, expected: &'static str) -> Result<()> {
    if header.schema != expected || header.schema_version != SCHEMA_VERSION {
        return Err(StandardsError::Schema {
            path: path.to_path_buf(),
            expected,
            version: SCHEMA_VERSION,
            found: header.schema.clone(),
            found_version: header.schema_version,
        });
    }
    Ok(())
}
