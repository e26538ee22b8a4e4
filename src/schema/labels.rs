//! Label Derivation
//!
//! Naming conventions between host types and Cypher identifiers. Labels come
//! from node type names verbatim; relationship-type names use
//! SCREAMING_SNAKE_CASE derived from PascalCase or camelCase property and
//! type names.

use super::{NodeElement, PropertyInfo, RelationshipElement};

/// Label for a node type: the unqualified type name.
pub fn label_of_type<T: NodeElement>() -> String {
    T::label()
}

/// Relationship-type name for a relationship element.
pub fn relationship_type_of<R: RelationshipElement>() -> String {
    R::relationship_type()
}

/// Label of the node a complex property points at.
pub fn label_of_property(property: &PropertyInfo) -> String {
    property.target_label.clone()
}

/// Derive a relationship-type name from a property or type name:
/// `WorksFor` → `WORKS_FOR`, `homeAddress` → `HOME_ADDRESS`.
///
/// Existing underscores are preserved; an all-caps name passes through.
pub fn property_name_to_relationship_type(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    if name.chars().all(|c| !c.is_lowercase()) {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower_or_digit = false;
    for c in name.chars() {
        if c == '_' {
            out.push('_');
            prev_lower_or_digit = false;
            continue;
        }
        if c.is_uppercase() && prev_lower_or_digit {
            out.push('_');
        }
        out.extend(c.to_uppercase());
        prev_lower_or_digit = c.is_lowercase() || c.is_ascii_digit();
    }
    out
}
