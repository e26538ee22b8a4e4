//! Query Artifact
//!
//! `CypherQuery` is what the translator hands to the driver layer: statement
//! text, the parameter table, and shape hints the materialization layer uses
//! to interpret driver rows.

use serde::{Deserialize, Serialize};

use super::builder::ParameterTable;

/// Category of the queryable a statement was compiled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryRootKind {
    Node,
    Relationship,
    PathSegment,
    Traversal,
    Custom,
}

/// Which component of a path segment a projection selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PathSegmentProjection {
    #[default]
    None,
    StartNode,
    EndNode,
    Relationship,
}

/// Expected cardinality and kind of the driver result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultShape {
    /// Single scalar column (`count`, `any`, aggregations).
    pub is_scalar: bool,
    /// User projection (anonymous record or member selection).
    pub is_projection: bool,
    /// Type name of the projection result when known.
    pub projection_type: Option<String>,
    /// Element type name of the rows when known.
    pub result_type: Option<String>,
    pub query_root_kind: QueryRootKind,
}

impl Default for ResultShape {
    fn default() -> Self {
        ResultShape {
            is_scalar: false,
            is_projection: false,
            projection_type: None,
            result_type: None,
            query_root_kind: QueryRootKind::Custom,
        }
    }
}

/// A compiled statement ready for execution by an external driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CypherQuery {
    pub text: String,
    pub parameters: ParameterTable,
    pub result_shape: ResultShape,
    pub path_segment_projection: PathSegmentProjection,
}

impl CypherQuery {
    /// Statement text with runs of whitespace collapsed; the §-style test
    /// assertions compare this form.
    pub fn normalized_text(&self) -> String {
        self.text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// The statement and its parameter table as a JSON document, the shape
    /// HTTP-based drivers submit.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
