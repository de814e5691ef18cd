//! Schema types and structures
//!
//! Families, node types and fields are kept in ordered sequences. Declaration
//! order fixes constructor-parameter, storage and accessor order in the
//! generated code, so nothing here is stored in a hashed collection.

use serde::{Deserialize, Serialize};

/// How a tree-reference field owns its sub-tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnershipPolicy {
    /// Exactly one owner; the sub-tree is moved in at construction and the
    /// accessor checks presence on every call.
    #[default]
    Exclusive,
    /// Any number of holders; the accessor hands back the stored (possibly
    /// absent) reference without a check.
    Shared,
}

impl OwnershipPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnershipPolicy::Exclusive => "exclusive",
            OwnershipPolicy::Shared => "shared",
        }
    }
}

impl std::fmt::Display for OwnershipPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OwnershipPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exclusive" | "unique" => Ok(OwnershipPolicy::Exclusive),
            "shared" => Ok(OwnershipPolicy::Shared),
            other => Err(format!("unknown ownership policy: {}", other)),
        }
    }
}

/// One field of a node type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Value type name, or the name of a family / node type for tree references
    #[serde(rename = "type")]
    pub type_name: String,
    /// Field identifier
    #[serde(rename = "name")]
    pub field_name: String,
    /// Whether the field holds a sub-tree
    #[serde(rename = "tree", default)]
    pub is_tree_reference: bool,
    /// Whether the field holds a sequence rather than a single item
    #[serde(default)]
    pub repeated: bool,
    /// Explicit ownership declaration, overriding the run policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ownership: Option<OwnershipPolicy>,
}

impl FieldSpec {
    /// A plain value field
    pub fn value(type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            field_name: field_name.into(),
            is_tree_reference: false,
            repeated: false,
            ownership: None,
        }
    }

    /// A tree-reference field governed by the run policy
    pub fn tree(type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            is_tree_reference: true,
            ..Self::value(type_name, field_name)
        }
    }

    /// Mark the field as a sequence
    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    /// Declare the field's ownership explicitly
    pub fn owned(mut self, policy: OwnershipPolicy) -> Self {
        self.ownership = Some(policy);
        self
    }

    /// Shorthand for `owned(OwnershipPolicy::Shared)`
    pub fn shared(self) -> Self {
        self.owned(OwnershipPolicy::Shared)
    }
}

/// The declarative shape of one node kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTypeSchema {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl NodeTypeSchema {
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Get a field by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.field_name == name)
    }
}

/// A named group of node types sharing one base type
///
/// Only the registry constructs families, so a `SchemaFamily` in hand has
/// passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaFamily {
    pub(crate) name: String,
    pub(crate) node_types: Vec<NodeTypeSchema>,
    pub(crate) includes: Vec<String>,
}

impl SchemaFamily {
    /// Family name, which is also the base type name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_types(&self) -> &[NodeTypeSchema] {
        &self.node_types
    }

    /// Families whose types this family's fields may reference
    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn node_type(&self, name: &str) -> Option<&NodeTypeSchema> {
        self.node_types.iter().find(|n| n.name == name)
    }
}

/// A type usable in plain value fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueType {
    pub name: String,
    /// Path imported by artifacts that use the type (`None` for prelude types)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// On-disk description of a whole generation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub value_types: Vec<ValueType>,
    #[serde(default)]
    pub families: Vec<FamilyDocument>,
}

/// One family entry of a [`SchemaDocument`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyDocument {
    pub name: String,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub node_types: Vec<NodeTypeSchema>,
}
