//! Lox AST Generator
//!
//! A schema-driven generator for the node families of the Lox syntax tree.
//! Node types are declared as ordered field lists; the generator emits one
//! Rust module per family with a base trait, a visitor trait and one struct
//! per node type.
//!
//! ## Pipeline
//!
//! ```text
//! SchemaRegistry ──► Resolver ──► emit ──► RenderBinding ──► <family>.rs
//!  (validate)       (ownership)   (types)   (template)
//! ```
//!
//! Families are processed in registration order. A family may include
//! families registered before it and reference their node types.
//!
//! ## Ownership
//!
//! Every tree-reference field is either `Exclusive` (a `Box`, checked on every
//! access, absent children fail with `NullChildError`) or `Shared` (an `Rc`,
//! returned as an `Option` without a check).

pub mod checksum;
pub mod codegen;
pub mod config;
pub mod error;
pub mod lox;
pub mod registry;
pub mod render;
pub mod schema;

pub use checksum::Checksum;
pub use codegen::emit::TypeDefinition;
pub use codegen::resolve::{ResolvedField, Resolver};
pub use codegen::{FamilyDefinitions, Generator};
pub use config::GeneratorConfig;
pub use error::{AstGenError, Result};
pub use lox::lox_registry;
pub use registry::SchemaRegistry;
pub use render::{Artifact, Bindings, Drift, MiniJinjaRenderer, Render, RenderBinding};
pub use schema::{FieldSpec, NodeTypeSchema, OwnershipPolicy, SchemaDocument, SchemaFamily};
