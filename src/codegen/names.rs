//! Identifier handling
//!
//! Validation of schema identifiers against the target language and the
//! case conversions used to derive visitor method and artifact names.

use std::sync::OnceLock;

use regex::Regex;

/// Words that can never name a field or node type in the generated code
const RESERVED: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Members every generated node type defines besides its accessors
const GENERATED_MEMBERS: &[&str] = &["new", "accept"];

/// Names the generated module defines or relies on besides the schema's own
fn builtin_names() -> &'static [&'static str] {
    &["Box", "Rc", "Vec", "Option", "Result", "NullChildError"]
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap())
}

/// Whether `name` is a syntactically valid identifier
pub fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name != "_" && identifier_pattern().is_match(name)
}

/// Whether `name` collides with a reserved word of the target language
pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(&name)
}

/// Whether a field named `name` would clash with a generated member
pub fn is_generated_member(name: &str) -> bool {
    GENERATED_MEMBERS.contains(&name)
}

/// Whether a family's derived names (module, visitor parameter) are reserved
pub fn is_reserved_family(name: &str) -> bool {
    is_reserved(name) || is_reserved(&to_snake_case(name))
}

/// Whether `name` shadows a type the generated module uses itself
pub fn is_builtin_type(name: &str) -> bool {
    builtin_names().contains(&name)
}

/// Convert to snake_case
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;

    for c in s.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else if c == '-' || c == ' ' {
            result.push('_');
            prev_lower = false;
        } else {
            result.push(c);
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        }
    }

    result
}

/// Visitor method for a node type, e.g. `visit_binary_expr`
pub fn visit_method(node_type: &str, base_name: &str) -> String {
    format!("visit_{}_{}", to_snake_case(node_type), to_snake_case(base_name))
}

/// Artifact file name for a family, e.g. `expr.rs`
pub fn artifact_file_name(family: &str) -> String {
    format!("{}.rs", to_snake_case(family))
}
