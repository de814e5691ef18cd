//! Schema Registry
//!
//! Holds value types and node families in registration order. Registration
//! order doubles as resolution order: a family may only include families
//! registered before it, which rules out forward and cyclic references.

use std::fs;
use std::path::Path;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use tracing::debug;

use crate::codegen::names::{is_builtin_type, is_generated_member, is_identifier, is_reserved, is_reserved_family};
use crate::error::{AstGenError, Result};
use crate::schema::{NodeTypeSchema, SchemaDocument, SchemaFamily, ValueType};

/// What a field's type name refers to, as seen from one family
#[derive(Debug, Clone, Copy)]
pub enum TypeRef<'a> {
    /// A registered plain value type
    Value(&'a ValueType),
    /// A family base type
    Family(&'a SchemaFamily),
    /// A concrete node type of some family
    Node {
        family: &'a SchemaFamily,
        node: &'a NodeTypeSchema,
    },
}

/// The registry of value types and node families for one generation run
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    value_types: Vec<ValueType>,
    families: Vec<SchemaFamily>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a schema document, in document order
    pub fn from_document(document: &SchemaDocument) -> Result<Self> {
        let mut registry = Self::new();
        for value_type in &document.value_types {
            registry.register_value_type(&value_type.name, value_type.path.as_deref())?;
        }
        for family in &document.families {
            let includes: Vec<&str> = family.includes.iter().map(String::as_str).collect();
            registry.define_family(&family.name, family.node_types.clone(), &includes)?;
        }
        Ok(registry)
    }

    /// Load a JSON schema document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let document: SchemaDocument = serde_json::from_str(&content)?;
        Self::from_document(&document)
    }

    /// Register a type usable by plain value fields
    ///
    /// `path` is imported by every artifact using the type; pass `None` for
    /// types that need no import. Re-registering a name replaces its path.
    pub fn register_value_type(&mut self, name: &str, path: Option<&str>) -> Result<()> {
        if !is_identifier(name) {
            return Err(AstGenError::empty_name("value type", name));
        }
        let path = path.filter(|p| !p.is_empty()).map(String::from);
        match self.value_types.iter_mut().find(|v| v.name == name) {
            Some(existing) => existing.path = path,
            None => self.value_types.push(ValueType {
                name: name.to_string(),
                path,
            }),
        }
        Ok(())
    }

    /// Validate and register a family
    ///
    /// Fails with `DuplicateNodeType` when two node types share a name,
    /// `EmptyName` for empty or malformed identifiers, `ReservedName` when a
    /// name or the module and parameter names derived from it are reserved,
    /// and `UnresolvedInclude` when an include has not been registered yet.
    /// Nothing is registered on failure.
    pub fn define_family(
        &mut self,
        name: &str,
        node_types: Vec<NodeTypeSchema>,
        includes: &[&str],
    ) -> Result<&SchemaFamily> {
        check_name("family", name)?;
        if is_reserved_family(name) {
            return Err(reserved("family", name));
        }
        if self.family(name).is_some() {
            return Err(AstGenError::DuplicateFamily(name.to_string()));
        }

        let mut resolved_includes: Vec<String> = Vec::new();
        for include in includes {
            if self.family(include).is_none() {
                return Err(AstGenError::UnresolvedInclude {
                    family: name.to_string(),
                    include: include.to_string(),
                });
            }
            if !resolved_includes.iter().any(|i| i == include) {
                resolved_includes.push(include.to_string());
            }
        }

        for (index, node_type) in node_types.iter().enumerate() {
            check_name("node type", &node_type.name)?;
            let clashes_with_base = node_type.name == name;
            let repeated = node_types[..index].iter().any(|n| n.name == node_type.name);
            if clashes_with_base || repeated {
                return Err(AstGenError::DuplicateNodeType {
                    family: name.to_string(),
                    name: node_type.name.clone(),
                });
            }
            validate_fields(node_type)?;
        }

        debug!(
            family = name,
            node_types = node_types.len(),
            includes = ?resolved_includes,
            "registered family"
        );

        self.families.push(SchemaFamily {
            name: name.to_string(),
            node_types,
            includes: resolved_includes,
        });
        Ok(&self.families[self.families.len() - 1])
    }

    /// All families, in registration order
    pub fn families(&self) -> &[SchemaFamily] {
        &self.families
    }

    pub fn family(&self, name: &str) -> Option<&SchemaFamily> {
        self.families.iter().find(|f| f.name == name)
    }

    pub fn value_types(&self) -> &[ValueType] {
        &self.value_types
    }

    pub fn value_type(&self, name: &str) -> Option<&ValueType> {
        self.value_types.iter().find(|v| v.name == name)
    }

    /// Resolve a type name from within `family`
    ///
    /// Visible names are the registered value types, the family itself and its
    /// node types, and the families (with their node types) it includes. The
    /// family's own names win over included ones.
    pub fn lookup<'a>(&'a self, family: &'a SchemaFamily, type_name: &str) -> Option<TypeRef<'a>> {
        if let Some(found) = lookup_in(family, type_name) {
            return Some(found);
        }
        for include in &family.includes {
            if let Some(found) = self.family(include).and_then(|f| lookup_in(f, type_name)) {
                return Some(found);
            }
        }
        self.value_type(type_name).map(TypeRef::Value)
    }

    /// Closest visible type name to `type_name`, for error hints
    pub fn suggest(&self, family: &SchemaFamily, type_name: &str) -> Option<String> {
        let matcher = SkimMatcherV2::default();
        let mut best: Option<(i64, &str)> = None;

        for candidate in self.visible_names(family) {
            if let Some(score) = matcher.fuzzy_match(candidate, type_name) {
                if best.map_or(true, |(top, _)| score > top) {
                    best = Some((score, candidate));
                }
            }
        }

        best.map(|(_, name)| name.to_string())
    }

    fn visible_names<'a>(&'a self, family: &'a SchemaFamily) -> Vec<&'a str> {
        let mut names = Vec::new();
        let scopes = std::iter::once(family)
            .chain(family.includes.iter().filter_map(|i| self.family(i)));
        for scope in scopes {
            names.push(scope.name.as_str());
            names.extend(scope.node_types.iter().map(|n| n.name.as_str()));
        }
        names.extend(self.value_types.iter().map(|v| v.name.as_str()));
        names
    }
}

fn lookup_in<'a>(family: &'a SchemaFamily, type_name: &str) -> Option<TypeRef<'a>> {
    if family.name == type_name {
        return Some(TypeRef::Family(family));
    }
    family
        .node_type(type_name)
        .map(|node| TypeRef::Node { family, node })
}

fn check_name(kind: &'static str, name: &str) -> Result<()> {
    if !is_identifier(name) {
        return Err(AstGenError::empty_name(kind, name));
    }
    if is_reserved(name) || is_builtin_type(name) {
        return Err(reserved(kind, name));
    }
    Ok(())
}

fn reserved(kind: &'static str, name: &str) -> AstGenError {
    AstGenError::ReservedName {
        kind,
        name: name.to_string(),
    }
}

fn validate_fields(node_type: &NodeTypeSchema) -> Result<()> {
    for (index, field) in node_type.fields.iter().enumerate() {
        check_name("field", &field.field_name)?;
        if is_generated_member(&field.field_name) {
            return Err(reserved("field", &field.field_name));
        }
        if !is_identifier(&field.type_name) {
            return Err(AstGenError::empty_name("field type", &field.type_name));
        }
        if node_type.fields[..index].iter().any(|f| f.field_name == field.field_name) {
            return Err(AstGenError::DuplicateField {
                node_type: node_type.name.clone(),
                field: field.field_name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSpec;

    fn binary() -> NodeTypeSchema {
        NodeTypeSchema::new(
            "Binary",
            vec![
                FieldSpec::tree("Expr", "left"),
                FieldSpec::value("Token", "op"),
                FieldSpec::tree("Expr", "right"),
            ],
        )
    }

    fn registry_with_token() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry.register_value_type("Token", Some("super::Token")).unwrap();
        registry
    }

    #[test]
    fn test_define_family() {
        let mut registry = registry_with_token();
        let family = registry.define_family("Expr", vec![binary()], &[]).unwrap();
        assert_eq!(family.name(), "Expr");
        assert_eq!(family.node_types().len(), 1);
        assert!(family.includes().is_empty());
        assert_eq!(registry.families().len(), 1);
    }

    #[test]
    fn test_duplicate_node_type() {
        let mut registry = registry_with_token();
        let result = registry.define_family("Expr", vec![binary(), binary()], &[]);
        assert!(matches!(
            result,
            Err(AstGenError::DuplicateNodeType { ref name, .. }) if name == "Binary"
        ));
        assert!(registry.families().is_empty());
    }

    #[test]
    fn test_node_type_named_like_base() {
        let mut registry = registry_with_token();
        let result = registry.define_family("Expr", vec![NodeTypeSchema::new("Expr", vec![])], &[]);
        assert!(matches!(result, Err(AstGenError::DuplicateNodeType { .. })));
    }

    #[test]
    fn test_empty_names() {
        let mut registry = registry_with_token();
        assert!(matches!(
            registry.define_family("", vec![], &[]),
            Err(AstGenError::EmptyName { kind: "family", .. })
        ));
        assert!(matches!(
            registry.define_family("Expr", vec![NodeTypeSchema::new("", vec![])], &[]),
            Err(AstGenError::EmptyName { kind: "node type", .. })
        ));
        let bad_field = NodeTypeSchema::new("Unary", vec![FieldSpec::value("Token", "")]);
        assert!(matches!(
            registry.define_family("Expr", vec![bad_field], &[]),
            Err(AstGenError::EmptyName { kind: "field", .. })
        ));
        let bad_name = NodeTypeSchema::new("Unary", vec![FieldSpec::value("Token", "the op")]);
        assert!(matches!(
            registry.define_family("Expr", vec![bad_name], &[]),
            Err(AstGenError::EmptyName { kind: "field", .. })
        ));
    }

    #[test]
    fn test_reserved_field_name() {
        let mut registry = registry_with_token();
        let node = NodeTypeSchema::new("Cast", vec![FieldSpec::value("Token", "type")]);
        assert!(matches!(
            registry.define_family("Expr", vec![node], &[]),
            Err(AstGenError::ReservedName { kind: "field", .. })
        ));
    }

    #[test]
    fn test_family_with_reserved_module_name() {
        let mut registry = registry_with_token();
        let array = NodeTypeSchema::new("Array", vec![FieldSpec::tree("Type", "element")]);
        let result = registry.define_family("Type", vec![array], &[]);
        assert!(matches!(
            result,
            Err(AstGenError::ReservedName { kind: "family", ref name }) if name == "Type"
        ));
        assert!(registry.families().is_empty());

        registry.define_family("TypeExpr", vec![], &[]).unwrap();
    }

    #[test]
    fn test_field_named_like_generated_member() {
        let mut registry = registry_with_token();
        registry.register_value_type("bool", None).unwrap();
        for member in ["new", "accept"] {
            let flag = NodeTypeSchema::new("Flag", vec![FieldSpec::value("bool", member)]);
            assert!(matches!(
                registry.define_family("Expr", vec![flag], &[]),
                Err(AstGenError::ReservedName { kind: "field", ref name }) if name == member
            ));
        }
        assert!(registry.families().is_empty());
    }

    #[test]
    fn test_duplicate_field() {
        let mut registry = registry_with_token();
        let node = NodeTypeSchema::new(
            "Binary",
            vec![FieldSpec::tree("Expr", "left"), FieldSpec::tree("Expr", "left")],
        );
        assert!(matches!(
            registry.define_family("Expr", vec![node], &[]),
            Err(AstGenError::DuplicateField { ref field, .. }) if field == "left"
        ));
    }

    #[test]
    fn test_unresolved_include_then_success() {
        let mut registry = registry_with_token();
        let print = NodeTypeSchema::new("Print", vec![FieldSpec::tree("Expr", "expression")]);

        let result = registry.define_family("Stmt", vec![print.clone()], &["Expr"]);
        assert!(matches!(
            result,
            Err(AstGenError::UnresolvedInclude { ref include, .. }) if include == "Expr"
        ));

        registry.define_family("Expr", vec![binary()], &[]).unwrap();
        let stmt = registry.define_family("Stmt", vec![print], &["Expr"]).unwrap();
        assert_eq!(stmt.includes(), ["Expr".to_string()]);
        let names: Vec<_> = registry.families().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["Expr", "Stmt"]);
    }

    #[test]
    fn test_duplicate_family() {
        let mut registry = registry_with_token();
        registry.define_family("Expr", vec![binary()], &[]).unwrap();
        assert!(matches!(
            registry.define_family("Expr", vec![], &[]),
            Err(AstGenError::DuplicateFamily(_))
        ));
    }

    #[test]
    fn test_lookup_scopes() {
        let mut registry = registry_with_token();
        registry.define_family("Expr", vec![binary()], &[]).unwrap();
        registry.define_family("Other", vec![], &[]).unwrap();
        registry
            .define_family("Stmt", vec![NodeTypeSchema::new("Print", vec![])], &["Expr"])
            .unwrap();

        let stmt = registry.family("Stmt").unwrap();
        assert!(matches!(registry.lookup(stmt, "Stmt"), Some(TypeRef::Family(f)) if f.name() == "Stmt"));
        assert!(matches!(registry.lookup(stmt, "Print"), Some(TypeRef::Node { .. })));
        assert!(matches!(registry.lookup(stmt, "Expr"), Some(TypeRef::Family(f)) if f.name() == "Expr"));
        assert!(matches!(
            registry.lookup(stmt, "Binary"),
            Some(TypeRef::Node { family, .. }) if family.name() == "Expr"
        ));
        assert!(matches!(registry.lookup(stmt, "Token"), Some(TypeRef::Value(_))));
        assert!(registry.lookup(stmt, "Other").is_none());
        assert_eq!(registry.suggest(stmt, "Exp").as_deref(), Some("Expr"));
    }

    #[test]
    fn test_from_document() {
        let document: SchemaDocument = serde_json::from_value(serde_json::json!({
            "value_types": [{ "name": "Token", "path": "super::Token" }],
            "families": [
                {
                    "name": "Expr",
                    "node_types": [
                        { "name": "Grouping", "fields": [{ "type": "Expr", "name": "expression", "tree": true }] }
                    ]
                },
                {
                    "name": "Stmt",
                    "includes": ["Expr"],
                    "node_types": [
                        { "name": "Print", "fields": [{ "type": "Expr", "name": "expression", "tree": true }] }
                    ]
                }
            ]
        }))
        .unwrap();

        let registry = SchemaRegistry::from_document(&document).unwrap();
        assert_eq!(registry.families().len(), 2);
        assert_eq!(registry.value_type("Token").unwrap().path.as_deref(), Some("super::Token"));
    }
}
