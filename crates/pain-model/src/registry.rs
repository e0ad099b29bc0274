//! Lookup of canonical variable definitions by basename.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ModelError, Result};
use crate::variable::VariableDefinition;
use crate::variant::DatasetVariant;

/// Immutable set of variable definitions, iterated in declaration order.
#[derive(Debug, Clone, Default)]
pub struct MetadataRegistry {
    definitions: Vec<VariableDefinition>,
    index: BTreeMap<String, usize>,
}

impl MetadataRegistry {
    /// Build a registry, rejecting repeated basenames and malformed
    /// definitions.
    pub fn new(definitions: Vec<VariableDefinition>) -> Result<Self> {
        let mut index = BTreeMap::new();
        for (position, definition) in definitions.iter().enumerate() {
            definition.validate()?;
            if index
                .insert(definition.basename.clone(), position)
                .is_some()
            {
                return Err(ModelError::DuplicateVariable {
                    basename: definition.basename.clone(),
                });
            }
        }
        Ok(Self { definitions, index })
    }

    pub fn get(&self, basename: &str) -> Result<&VariableDefinition> {
        self.index
            .get(basename)
            .map(|position| &self.definitions[*position])
            .ok_or_else(|| ModelError::UnknownVariable {
                basename: basename.to_string(),
                variant: None,
            })
    }

    pub fn contains(&self, basename: &str) -> bool {
        self.index.contains_key(basename)
    }

    /// Definitions for `basenames`, in the order given.
    pub fn subset<S: AsRef<str>>(&self, basenames: &[S]) -> Result<Vec<&VariableDefinition>> {
        basenames
            .iter()
            .map(|basename| self.get(basename.as_ref()))
            .collect()
    }

    /// Definitions governed by `variant`, in the variant's column order.
    pub fn for_variant(&self, variant: &DatasetVariant) -> Result<Vec<&VariableDefinition>> {
        self.subset(&variant.variables)
            .map_err(|err| with_variant(err, &variant.name))
    }

    /// Check that every basename a variant refers to is registered and that
    /// its coupling only names governed variables.
    pub fn ensure_variant(&self, variant: &DatasetVariant) -> Result<()> {
        if variant.name.trim().is_empty() {
            return Err(ModelError::InvalidVariant {
                variant: variant.name.clone(),
                reason: "variant name is empty".to_string(),
            });
        }

        let unknown = |basename: &str| ModelError::UnknownVariable {
            basename: basename.to_string(),
            variant: Some(variant.name.clone()),
        };

        let mut seen = BTreeSet::new();
        for basename in &variant.variables {
            if !self.contains(basename) {
                return Err(unknown(basename));
            }
            if !seen.insert(basename.as_str()) {
                return Err(ModelError::InvalidVariant {
                    variant: variant.name.clone(),
                    reason: format!("variable {basename} is listed twice"),
                });
            }
        }

        for (basename, map) in &variant.recode {
            if !self.contains(basename) {
                return Err(unknown(basename));
            }
            if !variant.governs(basename) {
                return Err(ModelError::InvalidVariant {
                    variant: variant.name.clone(),
                    reason: format!("recode map targets ungoverned variable {basename}"),
                });
            }
            if let Some(code) = map.first_duplicate() {
                return Err(ModelError::InvalidVariant {
                    variant: variant.name.clone(),
                    reason: format!("recode map for {basename} maps code {code} twice"),
                });
            }
        }

        if let Some(coupling) = &variant.consistency {
            let referenced = std::iter::once(&coupling.root)
                .chain(&coupling.dependents)
                .chain(&coupling.forward_exempt)
                .chain(&coupling.backward_exempt);
            for basename in referenced {
                if !self.contains(basename) {
                    return Err(unknown(basename));
                }
                if !variant.governs(basename) {
                    return Err(ModelError::InvalidVariant {
                        variant: variant.name.clone(),
                        reason: format!("consistency rule references ungoverned variable {basename}"),
                    });
                }
            }
            if coupling.dependents.iter().any(|name| *name == coupling.root) {
                return Err(ModelError::InvalidVariant {
                    variant: variant.name.clone(),
                    reason: format!("root {} is also listed as a dependent", coupling.root),
                });
            }
        }

        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

fn with_variant(err: ModelError, name: &str) -> ModelError {
    match err {
        ModelError::UnknownVariable { basename, .. } => ModelError::UnknownVariable {
            basename,
            variant: Some(name.to_string()),
        },
        other => other,
    }
}
