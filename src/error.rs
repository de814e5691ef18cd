//! Error types for the node-family generator

use thiserror::Error;

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, AstGenError>;

/// Generator errors
///
/// Every variant aborts the current run before any artifact is written.
#[derive(Error, Debug)]
pub enum AstGenError {
    #[error("Duplicate node type: {family}.{name}")]
    DuplicateNodeType { family: String, name: String },

    #[error("Duplicate field: {node_type}.{field}")]
    DuplicateField { node_type: String, field: String },

    #[error("Family already registered: {0}")]
    DuplicateFamily(String),

    #[error("Empty or invalid {kind} name: {name:?}")]
    EmptyName { kind: &'static str, name: String },

    #[error("Reserved word used as {kind} name: {name}")]
    ReservedName { kind: &'static str, name: String },

    #[error("Family {family} includes unregistered family {include}")]
    UnresolvedInclude { family: String, include: String },

    #[error("Unknown field type {type_name} for {node_type}.{field}{}", suggestion_hint(.suggestion))]
    UnknownFieldType {
        node_type: String,
        field: String,
        type_name: String,
        suggestion: Option<String>,
    },

    #[error("Invalid tree reference {node_type}.{field}: {reason}")]
    InvalidTreeReference {
        node_type: String,
        field: String,
        reason: String,
    },

    #[error("Template error: {0}")]
    Template(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean {}?)", name),
        None => String::new(),
    }
}

impl AstGenError {
    pub(crate) fn empty_name(kind: &'static str, name: &str) -> Self {
        Self::EmptyName {
            kind,
            name: name.to_string(),
        }
    }
}
