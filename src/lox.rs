//! Built-in Lox schemas
//!
//! The expression and statement families of the Lox front end. `Stmt`
//! includes `Expr`, so `Expr` is registered first. Children that are absent
//! by design (an `if` without `else`, a bare `return`, an uninitialised
//! `var`, a class without superclass) and the class method list are declared
//! shared; every other child takes the run policy.

use crate::error::Result;
use crate::registry::SchemaRegistry;
use crate::schema::{FieldSpec, NodeTypeSchema};

/// Module path of the value types, relative to the artifact's parent module
pub const TOKEN_PATH: &str = "super::Token";
pub const VALUE_PATH: &str = "super::Value";

fn node(name: &str, fields: Vec<FieldSpec>) -> NodeTypeSchema {
    NodeTypeSchema::new(name, fields)
}

fn expr_node_types() -> Vec<NodeTypeSchema> {
    vec![
        node("Assign", vec![FieldSpec::value("Token", "name"), FieldSpec::tree("Expr", "value")]),
        node(
            "Binary",
            vec![
                FieldSpec::tree("Expr", "left"),
                FieldSpec::value("Token", "op"),
                FieldSpec::tree("Expr", "right"),
            ],
        ),
        node(
            "Call",
            vec![
                FieldSpec::tree("Expr", "callee"),
                FieldSpec::value("Token", "paren"),
                FieldSpec::tree("Expr", "arguments").repeated(),
            ],
        ),
        node("Get", vec![FieldSpec::tree("Expr", "object"), FieldSpec::value("Token", "name")]),
        node("Grouping", vec![FieldSpec::tree("Expr", "expression")]),
        node("Literal", vec![FieldSpec::value("Value", "value")]),
        node(
            "Logical",
            vec![
                FieldSpec::tree("Expr", "left"),
                FieldSpec::value("Token", "op"),
                FieldSpec::tree("Expr", "right"),
            ],
        ),
        node(
            "Set",
            vec![
                FieldSpec::tree("Expr", "object"),
                FieldSpec::value("Token", "name"),
                FieldSpec::tree("Expr", "value"),
            ],
        ),
        node("Super", vec![FieldSpec::value("Token", "keyword"), FieldSpec::value("Token", "method")]),
        node(
            "Ternary",
            vec![
                FieldSpec::tree("Expr", "first"),
                FieldSpec::tree("Expr", "second"),
                FieldSpec::tree("Expr", "third"),
            ],
        ),
        node("This", vec![FieldSpec::value("Token", "keyword")]),
        node("Unary", vec![FieldSpec::value("Token", "op"), FieldSpec::tree("Expr", "right")]),
        node("Variable", vec![FieldSpec::value("Token", "name")]),
    ]
}

fn stmt_node_types() -> Vec<NodeTypeSchema> {
    vec![
        node("Block", vec![FieldSpec::tree("Stmt", "statements").repeated()]),
        node("Break", vec![FieldSpec::value("Token", "keyword")]),
        node(
            "Class",
            vec![
                FieldSpec::value("Token", "name"),
                FieldSpec::tree("Variable", "superclass").shared(),
                FieldSpec::tree("Function", "methods").repeated().shared(),
            ],
        ),
        node("Expression", vec![FieldSpec::tree("Expr", "expression")]),
        node(
            "Function",
            vec![
                FieldSpec::value("Token", "name"),
                FieldSpec::value("Token", "params").repeated(),
                FieldSpec::tree("Stmt", "body").repeated(),
            ],
        ),
        node(
            "If",
            vec![
                FieldSpec::tree("Expr", "condition"),
                FieldSpec::tree("Stmt", "then_branch"),
                FieldSpec::tree("Stmt", "else_branch").shared(),
            ],
        ),
        node("Print", vec![FieldSpec::tree("Expr", "expression")]),
        node("Return", vec![FieldSpec::value("Token", "keyword"), FieldSpec::tree("Expr", "value").shared()]),
        node("Var", vec![FieldSpec::value("Token", "name"), FieldSpec::tree("Expr", "initialiser").shared()]),
        node("While", vec![FieldSpec::tree("Expr", "condition"), FieldSpec::tree("Stmt", "body")]),
    ]
}

/// Registry holding the Lox value types and the `Expr` and `Stmt` families
pub fn lox_registry() -> Result<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();
    registry.register_value_type("Token", Some(TOKEN_PATH))?;
    registry.register_value_type("Value", Some(VALUE_PATH))?;
    registry.define_family("Expr", expr_node_types(), &[])?;
    registry.define_family("Stmt", stmt_node_types(), &["Expr"])?;
    Ok(registry)
}
