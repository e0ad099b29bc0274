use thiserror::Error;

/// Errors raised while building or querying the static survey configuration.
///
/// All of these indicate a broken setup rather than bad data, so callers
/// treat them as fatal at startup.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A basename was looked up (or referenced by a variant) but is not
    /// registered.
    #[error("unknown variable '{basename}'{}", referenced_by(.variant))]
    UnknownVariable {
        basename: String,
        variant: Option<String>,
    },

    /// Two definitions share the same basename.
    #[error("duplicate variable definition '{basename}'")]
    DuplicateVariable { basename: String },

    /// A definition lists the same value code twice.
    #[error("variable '{basename}' declares value code {code} more than once")]
    DuplicateValueCode { basename: String, code: i64 },

    /// A definition violates its own invariants.
    #[error("invalid variable definition '{basename}': {reason}")]
    InvalidDefinition { basename: String, reason: String },

    /// A variant is structurally inconsistent.
    #[error("invalid dataset variant {variant}: {reason}")]
    InvalidVariant { variant: String, reason: String },
}

fn referenced_by(variant: &Option<String>) -> String {
    match variant {
        Some(name) => format!(" referenced by variant {name}"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
