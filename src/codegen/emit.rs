//! Type Emission
//!
//! Turns resolved fields into the pieces of one generated node type:
//! constructor parameters, initializers, storage slots and accessors. Each
//! list follows field declaration order.
//!
//! | field | storage / parameter | accessor |
//! |---|---|---|
//! | value | `T` | `&T` |
//! | repeated value | `Vec<T>` | `&[T]` |
//! | exclusive child | `Option<Box<T>>` | `Result<&T, NullChildError>` |
//! | shared child | `Option<Rc<T>>` | `Option<&Rc<T>>` |
//! | repeated exclusive children | `Vec<Box<T>>` | `&[Box<T>]` |
//! | repeated shared children | `Vec<Rc<T>>` | `&[Rc<T>]` |

use serde::Serialize;

use super::names::visit_method;
use super::resolve::{FieldKind, ResolvedField, TreeTarget};
use crate::schema::{NodeTypeSchema, OwnershipPolicy};

/// Name of the error type returned by checked accessors
pub const NULL_CHILD_ERROR: &str = "NullChildError";

/// One constructor parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

/// One storage slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub name: String,
    pub ty: String,
}

/// One read accessor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Accessor {
    pub name: String,
    pub return_type: String,
    pub body: String,
    /// Whether the accessor fails with `NullChildError` on an absent child
    pub checked: bool,
}

/// Everything the template needs to render one node type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDefinition {
    pub name: String,
    pub base_name: String,
    pub visit_method: String,
    pub params: Vec<Param>,
    pub initializers: Vec<String>,
    pub storage: Vec<Slot>,
    pub accessors: Vec<Accessor>,
}

impl TypeDefinition {
    /// Parameter list as it appears in the constructor signature
    pub fn signature(&self) -> String {
        self.params
            .iter()
            .map(|p| format!("{}: {}", p.name, p.ty))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn accessor(&self, name: &str) -> Option<&Accessor> {
        self.accessors.iter().find(|a| a.name == name)
    }
}

/// Build the definition of `node_type` from its resolved fields
///
/// Every definition declares conformance to `base_name` through its visitor
/// method; the template renders the `impl` of the base trait from it.
pub fn emit(node_type: &NodeTypeSchema, resolved_fields: &[ResolvedField], base_name: &str) -> TypeDefinition {
    let mut params = Vec::with_capacity(resolved_fields.len());
    let mut initializers = Vec::with_capacity(resolved_fields.len());
    let mut storage = Vec::with_capacity(resolved_fields.len());
    let mut accessors = Vec::with_capacity(resolved_fields.len());

    for field in resolved_fields {
        let stored = storage_type(field);

        params.push(Param {
            name: field.name.clone(),
            ty: stored.clone(),
        });
        // Shorthand initializer: the parameter moves straight into its slot.
        initializers.push(field.name.clone());
        storage.push(Slot {
            name: field.name.clone(),
            ty: stored,
        });
        accessors.push(accessor(&node_type.name, field));
    }

    TypeDefinition {
        name: node_type.name.clone(),
        base_name: base_name.to_string(),
        visit_method: visit_method(&node_type.name, base_name),
        params,
        initializers,
        storage,
        accessors,
    }
}

/// Type spelled for a tree target: the base trait object or the concrete node
fn target_type(target: &TreeTarget) -> String {
    match target {
        TreeTarget::Base { family } => format!("dyn {}", family),
        TreeTarget::Node { name, .. } => name.clone(),
    }
}

fn pointer(policy: OwnershipPolicy) -> &'static str {
    match policy {
        OwnershipPolicy::Exclusive => "Box",
        OwnershipPolicy::Shared => "Rc",
    }
}

fn storage_type(field: &ResolvedField) -> String {
    match (&field.kind, field.repeated) {
        (FieldKind::Value { .. }, false) => field.type_name.clone(),
        (FieldKind::Value { .. }, true) => format!("Vec<{}>", field.type_name),
        (FieldKind::Tree { policy, target }, false) => {
            format!("Option<{}<{}>>", pointer(*policy), target_type(target))
        }
        (FieldKind::Tree { policy, target }, true) => {
            format!("Vec<{}<{}>>", pointer(*policy), target_type(target))
        }
    }
}

fn accessor(node_name: &str, field: &ResolvedField) -> Accessor {
    let name = field.name.clone();
    let (return_type, body, checked) = match (&field.kind, field.repeated) {
        (FieldKind::Value { .. }, false) => (
            format!("&{}", field.type_name),
            format!("&self.{}", field.name),
            false,
        ),
        (FieldKind::Value { .. }, true) => (
            format!("&[{}]", field.type_name),
            format!("&self.{}", field.name),
            false,
        ),
        (FieldKind::Tree { policy: OwnershipPolicy::Exclusive, target }, false) => (
            format!("Result<&{}, {}>", target_type(target), NULL_CHILD_ERROR),
            format!(
                "self.{}.as_deref().ok_or_else(|| {}::new(\"{}\", \"{}\"))",
                field.name, NULL_CHILD_ERROR, node_name, field.name
            ),
            true,
        ),
        (FieldKind::Tree { policy: OwnershipPolicy::Shared, target }, false) => (
            format!("Option<&Rc<{}>>", target_type(target)),
            format!("self.{}.as_ref()", field.name),
            false,
        ),
        (FieldKind::Tree { policy, target }, true) => (
            format!("&[{}<{}>]", pointer(*policy), target_type(target)),
            format!("&self.{}", field.name),
            false,
        ),
    };

    Accessor {
        name,
        return_type,
        body,
        checked,
    }
}
