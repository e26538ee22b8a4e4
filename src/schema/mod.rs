//! Schema Surface
//!
//! The translator reads a small slice of schema metadata: labels and
//! relationship-type names for element types, the identifier property name,
//! and which properties are "complex" (persisted behind a relationship to
//! another node). Everything else about materialization lives outside this
//! crate, behind the `EntityFactory` trait.

use std::any::TypeId;
use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod labels;

/// Whether a graph element is a node or a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Node,
    Relationship,
}

/// A graph element type participating in queries.
///
/// The provider never reflects over host types; this trait carries the
/// minimum identity the translator needs (a stable `TypeId` plus a display
/// name the label derivation uses).
pub trait GraphElement: 'static {
    /// Unqualified type name; defaults to the last path segment of the
    /// fully-qualified name.
    fn element_name() -> String {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full).to_string()
    }
}

/// A node type. Its label defaults to the element name.
pub trait NodeElement: GraphElement {
    fn label() -> String {
        Self::element_name()
    }
}

/// A relationship type. Its Cypher relationship-type name defaults to the
/// SCREAMING_SNAKE form of the element name (`WorksFor` → `WORKS_FOR`).
pub trait RelationshipElement: GraphElement {
    fn relationship_type() -> String {
        labels::property_name_to_relationship_type(&Self::element_name())
    }
}

/// Erased identity of an element type, carried through the operator tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementInfo {
    pub type_id: TypeId,
    pub type_name: String,
    /// Node label or relationship-type name.
    pub label: String,
    pub kind: ElementKind,
}

impl ElementInfo {
    pub fn node<T: NodeElement>() -> Self {
        ElementInfo {
            type_id: TypeId::of::<T>(),
            type_name: T::element_name(),
            label: T::label(),
            kind: ElementKind::Node,
        }
    }

    pub fn relationship<R: RelationshipElement>() -> Self {
        ElementInfo {
            type_id: TypeId::of::<R>(),
            type_name: R::element_name(),
            label: R::relationship_type(),
            kind: ElementKind::Relationship,
        }
    }

    /// Identity for projection result types that are neither nodes nor
    /// relationships (anonymous records, scalars).
    pub fn custom<T: 'static>(name: impl Into<String>) -> Self {
        ElementInfo {
            type_id: TypeId::of::<T>(),
            type_name: name.into(),
            label: String::new(),
            kind: ElementKind::Node,
        }
    }

    pub fn is_node(&self) -> bool {
        self.kind == ElementKind::Node
    }

    pub fn is_relationship(&self) -> bool {
        self.kind == ElementKind::Relationship
    }
}

/// A property persisted behind a relationship to another node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub name: String,
    /// Label of the node the property points at.
    pub target_label: String,
    /// Relationship-type name used in the pattern; derived from the property
    /// name when the schema does not override it.
    pub relationship_type: String,
}

impl PropertyInfo {
    pub fn new(name: impl Into<String>, target_label: impl Into<String>) -> Self {
        let name = name.into();
        let relationship_type = labels::property_name_to_relationship_type(&name);
        PropertyInfo {
            name,
            target_label: target_label.into(),
            relationship_type,
        }
    }
}

/// Schema metadata for one element type, as read by the translator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    pub labels: Vec<String>,
    pub id_property_name: String,
    pub simple_properties: BTreeSet<String>,
    pub complex_properties: Vec<PropertyInfo>,
}

impl EntitySchema {
    pub fn new(label: impl Into<String>) -> Self {
        EntitySchema {
            labels: vec![label.into()],
            id_property_name: "Id".to_string(),
            simple_properties: BTreeSet::new(),
            complex_properties: Vec::new(),
        }
    }

    pub fn with_id_property(mut self, name: impl Into<String>) -> Self {
        self.id_property_name = name.into();
        self
    }

    pub fn with_simple_property(mut self, name: impl Into<String>) -> Self {
        self.simple_properties.insert(name.into());
        self
    }

    pub fn with_complex_property(mut self, property: PropertyInfo) -> Self {
        self.complex_properties.push(property);
        self
    }

    pub fn primary_label(&self) -> &str {
        self.labels.first().map(String::as_str).unwrap_or("")
    }

    pub fn is_simple_property(&self, name: &str) -> bool {
        // An unknown property is treated as simple; schemas list complex
        // properties exhaustively but not necessarily simple ones.
        !self.complex_properties.iter().any(|p| p.name == name)
    }

    pub fn complex_property(&self, name: &str) -> Option<&PropertyInfo> {
        self.complex_properties.iter().find(|p| p.name == name)
    }
}

/// Schema errors surfaced during translation.
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    #[error("no schema registered for type '{type_name}' (required for {operation})")]
    SchemaMissing {
        type_name: String,
        operation: String,
    },
}

/// External collaborator providing schema metadata and materialization
/// capability hints. Implementations must be safe for concurrent reads.
pub trait EntityFactory: Send + Sync {
    fn schema(&self, type_id: TypeId) -> Option<&EntitySchema>;
    fn can_deserialize(&self, type_id: TypeId) -> bool;
}

/// Hash-map backed `EntityFactory`, the common case for callers and tests.
#[derive(Debug, Default)]
pub struct MapEntityFactory {
    schemas: HashMap<TypeId, EntitySchema>,
}

impl MapEntityFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: 'static>(mut self, schema: EntitySchema) -> Self {
        self.schemas.insert(TypeId::of::<T>(), schema);
        self
    }

    pub fn register_node<T: NodeElement>(self) -> Self {
        let schema = EntitySchema::new(T::label());
        self.register::<T>(schema)
    }
}

impl EntityFactory for MapEntityFactory {
    fn schema(&self, type_id: TypeId) -> Option<&EntitySchema> {
        self.schemas.get(&type_id)
    }

    fn can_deserialize(&self, type_id: TypeId) -> bool {
        self.schemas.contains_key(&type_id)
    }
}

/// Factory with no registered schemas; queries still translate, complex
/// property loading simply never engages.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyEntityFactory;

impl EntityFactory for EmptyEntityFactory {
    fn schema(&self, _type_id: TypeId) -> Option<&EntitySchema> {
        None
    }

    fn can_deserialize(&self, _type_id: TypeId) -> bool {
        false
    }
}
