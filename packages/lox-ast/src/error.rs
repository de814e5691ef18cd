//! Runtime errors of the generated node types

use thiserror::Error;

/// An exclusively owned child was read while absent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{node_type}.{field} is null")]
pub struct NullChildError {
    pub node_type: &'static str,
    pub field: &'static str,
}

impl NullChildError {
    pub fn new(node_type: &'static str, field: &'static str) -> Self {
        Self { node_type, field }
    }
}
