//! Checksum utilities for generated artifacts

use sha2::{Digest, Sha256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// SHA256 checksum of artifact contents
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Compute checksum from a string
    pub fn of(content: &str) -> Self {
        Self::from_bytes(content.as_bytes())
    }

    /// Get the hex string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for log lines
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }

    /// Verify that content matches this checksum
    pub fn verify(&self, content: &str) -> bool {
        Self::of(content) == *self
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let content = "pub trait Expr {}\n";
        assert_eq!(Checksum::of(content), Checksum::of(content));
        assert_eq!(Checksum::of(content).as_str().len(), 64);
    }

    #[test]
    fn test_checksum_different_content() {
        assert_ne!(Checksum::of("pub struct Binary;"), Checksum::of("pub struct Unary;"));
    }

    #[test]
    fn test_checksum_verification() {
        let checksum = Checksum::of("pub trait Stmt {}");
        assert!(checksum.verify("pub trait Stmt {}"));
        assert!(!checksum.verify("pub trait Stmt { }"));
        assert_eq!(checksum.short().len(), 12);
    }
}
