//! Ownership & Invariant Resolution
//!
//! Classifies every field of a node type as a plain value or a tree
//! reference and fixes the ownership policy of each tree reference. The
//! output keeps declaration order, which the emitter turns into constructor,
//! storage and accessor order.

use serde::Serialize;
use tracing::trace;

use crate::error::{AstGenError, Result};
use crate::registry::{SchemaRegistry, TypeRef};
use crate::schema::{FieldSpec, NodeTypeSchema, OwnershipPolicy, SchemaFamily};

/// What a tree reference points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeTarget {
    /// Any node of a family, through its base type
    Base { family: String },
    /// One concrete node type
    Node { family: String, name: String },
}

impl TreeTarget {
    /// Family that defines the target
    pub fn family(&self) -> &str {
        match self {
            TreeTarget::Base { family } | TreeTarget::Node { family, .. } => family,
        }
    }

    /// Name imported to reference the target from another family
    pub fn type_name(&self) -> &str {
        match self {
            TreeTarget::Base { family } => family,
            TreeTarget::Node { name, .. } => name,
        }
    }
}

/// How a resolved field is stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Copied into storage verbatim
    Value { import: Option<String> },
    /// A sub-tree under an ownership policy
    Tree {
        policy: OwnershipPolicy,
        target: TreeTarget,
    },
}

/// A field with its ownership decided
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedField {
    pub name: String,
    pub type_name: String,
    pub repeated: bool,
    pub kind: FieldKind,
}

impl ResolvedField {
    /// Ownership policy, for tree references
    pub fn policy(&self) -> Option<OwnershipPolicy> {
        match &self.kind {
            FieldKind::Tree { policy, .. } => Some(*policy),
            FieldKind::Value { .. } => None,
        }
    }

    pub fn is_tree_reference(&self) -> bool {
        matches!(self.kind, FieldKind::Tree { .. })
    }

    /// Whether the accessor must check presence before handing out the child
    ///
    /// Only single exclusive children can be absent behind a checked accessor;
    /// sequences hold their elements directly.
    pub fn is_checked(&self) -> bool {
        !self.repeated && self.policy() == Some(OwnershipPolicy::Exclusive)
    }
}

/// Resolves the fields of node types belonging to one family
pub struct Resolver<'a> {
    registry: &'a SchemaRegistry,
    family: &'a SchemaFamily,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a SchemaRegistry, family: &'a SchemaFamily) -> Self {
        Self { registry, family }
    }

    /// Resolve every field of `schema`, in declaration order
    ///
    /// `policy` applies to tree references that do not declare their own.
    pub fn resolve(&self, schema: &NodeTypeSchema, policy: OwnershipPolicy) -> Result<Vec<ResolvedField>> {
        schema
            .fields
            .iter()
            .map(|field| self.resolve_field(schema, field, policy))
            .collect()
    }

    fn resolve_field(
        &self,
        schema: &NodeTypeSchema,
        field: &FieldSpec,
        policy: OwnershipPolicy,
    ) -> Result<ResolvedField> {
        let type_ref = self
            .registry
            .lookup(self.family, &field.type_name)
            .ok_or_else(|| AstGenError::UnknownFieldType {
                node_type: schema.name.clone(),
                field: field.field_name.clone(),
                type_name: field.type_name.clone(),
                suggestion: self.registry.suggest(self.family, &field.type_name),
            })?;

        let invalid = |reason: String| AstGenError::InvalidTreeReference {
            node_type: schema.name.clone(),
            field: field.field_name.clone(),
            reason,
        };

        let kind = match (type_ref, field.is_tree_reference) {
            (TypeRef::Value(value_type), false) => {
                if field.ownership.is_some() {
                    return Err(invalid(format!(
                        "ownership declared on plain value of type {}",
                        value_type.name
                    )));
                }
                FieldKind::Value {
                    import: value_type.path.clone(),
                }
            }
            (TypeRef::Value(value_type), true) => {
                return Err(invalid(format!("{} is a value type, not a node type", value_type.name)));
            }
            (TypeRef::Family(_) | TypeRef::Node { .. }, false) => {
                return Err(invalid(format!(
                    "{} is a node type but the field is not marked as a tree reference",
                    field.type_name
                )));
            }
            (TypeRef::Family(family), true) => FieldKind::Tree {
                policy: field.ownership.unwrap_or(policy),
                target: TreeTarget::Base {
                    family: family.name().to_string(),
                },
            },
            (TypeRef::Node { family, node }, true) => FieldKind::Tree {
                policy: field.ownership.unwrap_or(policy),
                target: TreeTarget::Node {
                    family: family.name().to_string(),
                    name: node.name.clone(),
                },
            },
        };

        trace!(node_type = %schema.name, field = %field.field_name, ?kind, "resolved field");

        Ok(ResolvedField {
            name: field.field_name.clone(),
            type_name: field.type_name.clone(),
            repeated: field.repeated,
            kind,
        })
    }
}
