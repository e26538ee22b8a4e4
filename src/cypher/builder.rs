//! Cypher Query Builder
//!
//! Accumulates clauses while handlers walk the operator tree, then assembles
//! the final statement. The builder is consumed by `build()`, so a finalized
//! statement can never be mutated afterwards.
//!
//! Clause assembly order: MATCH → OPTIONAL MATCH → WHERE → WITH → UNWIND →
//! RETURN [DISTINCT] → ORDER BY → SKIP → LIMIT.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::expression::{CypherValue, Expr, SortDirection};

use super::errors::BuilderError;
use super::query::{CypherQuery, PathSegmentProjection, ResultShape};

/// Translation state of the statement under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuilderState {
    /// No root MATCH yet.
    #[default]
    Closed,
    /// Root MATCH installed, current alias set.
    Rooted,
    /// Path-segment pattern installed; alias resolution switches to the
    /// src/r/tgt mapping.
    PathSegmentOpen,
    /// A non-identity projection was applied.
    Projected,
}

/// Insertion-ordered, de-duplicating parameter table.
///
/// Placeholders are generated in first-appearance order (`$p0`, `$p1`, ...);
/// identical captured values reuse their placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterTable {
    prefix: String,
    entries: Vec<(String, CypherValue)>,
}

impl ParameterTable {
    pub fn new(prefix: impl Into<String>) -> Self {
        ParameterTable {
            prefix: prefix.into(),
            entries: Vec::new(),
        }
    }

    /// Add a value, returning its `$`-placeholder.
    pub fn add(&mut self, value: CypherValue) -> String {
        if let Some((name, _)) = self.entries.iter().find(|(_, v)| *v == value) {
            return format!("${}", name);
        }
        let name = format!("{}{}", self.prefix, self.entries.len());
        self.entries.push((name.clone(), value));
        format!("${}", name)
    }

    pub fn get(&self, name: &str) -> Option<&CypherValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CypherValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl Serialize for ParameterTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ParameterTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = ParameterTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a parameter map")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut table = ParameterTable::new("p");
                while let Some((name, value)) = access.next_entry::<String, CypherValue>()? {
                    table.entries.push((name, value));
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// The statement under construction. One instance per query execution,
/// mutated exclusively by the operator handlers.
#[derive(Debug)]
pub struct CypherQueryBuilder {
    state: BuilderState,

    match_patterns: Vec<String>,
    optional_match_patterns: Vec<String>,
    /// OPTIONAL MATCH patterns emitted for complex-property loading, kept
    /// apart so finalization can drop them when loading is disabled.
    complex_property_patterns: Vec<(String, String)>,
    where_conjuncts: Vec<String>,
    with_items: Vec<String>,
    unwind_clauses: Vec<(String, String)>,
    order_by_items: Vec<(String, SortDirection)>,
    return_items: Vec<(String, Option<String>)>,
    skip: Option<i64>,
    limit: Option<i64>,
    parameters: ParameterTable,
    trailing_comments: Vec<String>,
    pretty: bool,

    pub distinct: bool,
    pub has_applied_root_where: bool,
    pub has_user_projections: bool,
    pub needs_complex_property_loading: bool,
    pub is_exists_query: bool,
    pub is_not_exists_query: bool,
    pub is_relationship_query: bool,

    pub path_segment_source_alias: Option<String>,
    pub path_segment_relationship_alias: Option<String>,
    pub path_segment_target_alias: Option<String>,
    pub path_segment_projection: PathSegmentProjection,

    /// A predicate whose target alias must wait until projection state is
    /// known; resolved during finalization.
    pending_where: Vec<(Expr, Option<String>)>,
}

impl CypherQueryBuilder {
    pub fn new(parameter_prefix: &str, pretty: bool) -> Self {
        CypherQueryBuilder {
            state: BuilderState::Closed,
            match_patterns: Vec::new(),
            optional_match_patterns: Vec::new(),
            complex_property_patterns: Vec::new(),
            where_conjuncts: Vec::new(),
            with_items: Vec::new(),
            unwind_clauses: Vec::new(),
            order_by_items: Vec::new(),
            return_items: Vec::new(),
            skip: None,
            limit: None,
            parameters: ParameterTable::new(parameter_prefix),
            trailing_comments: Vec::new(),
            pretty,
            distinct: false,
            has_applied_root_where: false,
            has_user_projections: false,
            needs_complex_property_loading: false,
            is_exists_query: false,
            is_not_exists_query: false,
            is_relationship_query: false,
            path_segment_source_alias: None,
            path_segment_relationship_alias: None,
            path_segment_target_alias: None,
            path_segment_projection: PathSegmentProjection::None,
            pending_where: Vec::new(),
        }
    }

    pub fn state(&self) -> BuilderState {
        self.state
    }

    pub fn is_rooted(&self) -> bool {
        self.state != BuilderState::Closed
    }

    // ----- MATCH -----

    /// Install the root MATCH pattern. Exactly one root per query.
    pub fn set_root_match(&mut self, pattern: impl Into<String>) -> Result<(), BuilderError> {
        if !self.match_patterns.is_empty() {
            return Err(BuilderError::DuplicateRootMatch);
        }
        self.match_patterns.push(pattern.into());
        self.state = BuilderState::Rooted;
        Ok(())
    }

    /// Additional pattern in the same MATCH clause (joins).
    pub fn add_match_pattern(&mut self, pattern: impl Into<String>) {
        self.match_patterns.push(pattern.into());
    }

    /// Replace all accumulated MATCH patterns (traversal and path-segment
    /// compilation installs a single combined pattern).
    pub fn replace_matches(&mut self, pattern: impl Into<String>) {
        self.match_patterns.clear();
        self.match_patterns.push(pattern.into());
        if self.state == BuilderState::Closed {
            self.state = BuilderState::Rooted;
        }
    }

    pub fn mark_path_segment_open(&mut self) {
        self.state = BuilderState::PathSegmentOpen;
    }

    pub fn mark_projected(&mut self) {
        self.state = BuilderState::Projected;
        self.has_user_projections = true;
    }

    pub fn add_optional_match(&mut self, pattern: impl Into<String>) {
        let pattern = pattern.into();
        if !self.optional_match_patterns.contains(&pattern) {
            self.optional_match_patterns.push(pattern);
        }
    }

    /// OPTIONAL MATCH emitted for complex-property loading, tagged with the
    /// alias it loads so the default RETURN can include it.
    pub fn add_complex_property_match(
        &mut self,
        pattern: impl Into<String>,
        alias: impl Into<String>,
    ) {
        self.complex_property_patterns
            .push((pattern.into(), alias.into()));
    }

    pub fn complex_property_aliases(&self) -> Vec<String> {
        self.complex_property_patterns
            .iter()
            .map(|(_, alias)| alias.clone())
            .collect()
    }

    // ----- WHERE -----

    pub fn add_where(&mut self, conjunct: impl Into<String>) {
        self.where_conjuncts.push(conjunct.into());
    }

    /// Defer a predicate until the target alias is known.
    pub fn push_pending_where(&mut self, predicate: Expr, target_alias: Option<String>) {
        self.pending_where.push((predicate, target_alias));
    }

    pub fn take_pending_where(&mut self) -> Vec<(Expr, Option<String>)> {
        std::mem::take(&mut self.pending_where)
    }

    pub fn has_pending_where(&self) -> bool {
        !self.pending_where.is_empty()
    }

    // ----- WITH / UNWIND -----

    pub fn add_with_item(&mut self, item: impl Into<String>) {
        self.with_items.push(item.into());
    }

    pub fn add_unwind(&mut self, expression: impl Into<String>, alias: impl Into<String>) {
        self.unwind_clauses.push((expression.into(), alias.into()));
    }

    // ----- ORDER BY / paging -----

    pub fn add_order_by(&mut self, expression: impl Into<String>, direction: SortDirection) {
        self.order_by_items.push((expression.into(), direction));
    }

    pub fn has_order_by(&self) -> bool {
        !self.order_by_items.is_empty()
    }

    /// Reverse every ORDER BY direction (`last` over an ordered query).
    pub fn reverse_order_by(&mut self) {
        for (_, direction) in &mut self.order_by_items {
            *direction = direction.reversed();
        }
    }

    pub fn set_skip(&mut self, n: i64) {
        self.skip = Some(n);
    }

    pub fn set_limit(&mut self, n: i64) {
        self.limit = Some(n);
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    // ----- RETURN -----

    pub fn add_return(&mut self, expression: impl Into<String>, alias: Option<String>) {
        self.return_items.push((expression.into(), alias));
    }

    pub fn clear_return_items(&mut self) {
        self.return_items.clear();
    }

    pub fn has_return_clause(&self) -> bool {
        !self.return_items.is_empty()
    }

    pub fn set_distinct(&mut self) {
        self.distinct = true;
    }

    // ----- parameters -----

    pub fn add_parameter(&mut self, value: CypherValue) -> String {
        self.parameters.add(value)
    }

    pub fn parameters(&self) -> &ParameterTable {
        &self.parameters
    }

    pub fn add_trailing_comment(&mut self, comment: impl Into<String>) {
        self.trailing_comments.push(comment.into());
    }

    // ----- assembly -----

    /// Assemble the final statement. Consumes the builder: a finalized
    /// query cannot be mutated.
    pub fn build(self, result_shape: ResultShape) -> Result<CypherQuery, BuilderError> {
        if self.match_patterns.is_empty() {
            return Err(BuilderError::MissingRootMatch);
        }
        if self.return_items.is_empty() {
            return Err(BuilderError::EmptyReturnClause);
        }
        if self.has_pending_where() {
            return Err(BuilderError::invalid(
                "a deferred WHERE predicate was never resolved",
            ));
        }

        let sep = if self.pretty { "\n" } else { " " };
        let mut clauses: Vec<String> = Vec::new();

        clauses.push(format!("MATCH {}", self.match_patterns.join(", ")));

        if self.needs_complex_property_loading {
            for (pattern, _) in &self.complex_property_patterns {
                clauses.push(format!("OPTIONAL MATCH {}", pattern));
            }
        }
        for pattern in &self.optional_match_patterns {
            clauses.push(format!("OPTIONAL MATCH {}", pattern));
        }

        if !self.where_conjuncts.is_empty() {
            clauses.push(format!("WHERE {}", self.where_conjuncts.join(" AND ")));
        }

        if !self.with_items.is_empty() {
            clauses.push(format!("WITH {}", self.with_items.join(", ")));
        }

        for (expression, alias) in &self.unwind_clauses {
            clauses.push(format!("UNWIND {} AS {}", expression, alias));
        }

        let rendered_returns: Vec<String> = self
            .return_items
            .iter()
            .map(|(expression, alias)| match alias {
                Some(alias) => format!("{} AS {}", expression, alias),
                None => expression.clone(),
            })
            .collect();
        let distinct_keyword = if self.distinct { "DISTINCT " } else { "" };
        clauses.push(format!(
            "RETURN {}{}",
            distinct_keyword,
            rendered_returns.join(", ")
        ));

        if !self.order_by_items.is_empty() {
            let rendered: Vec<String> = self
                .order_by_items
                .iter()
                .map(|(expression, direction)| {
                    format!("{} {}", expression, direction.cypher_keyword())
                })
                .collect();
            clauses.push(format!("ORDER BY {}", rendered.join(", ")));
        }

        if let Some(skip) = self.skip {
            clauses.push(format!("SKIP {}", skip));
        }
        if let Some(limit) = self.limit {
            clauses.push(format!("LIMIT {}", limit));
        }

        let mut text = clauses.join(sep);
        for comment in &self.trailing_comments {
            text.push_str(sep);
            text.push_str(&format!("// {}", comment));
        }

        log::debug!("assembled cypher: {}", text);

        Ok(CypherQuery {
            text,
            parameters: self.parameters,
            result_shape,
            path_segment_projection: self.path_segment_projection,
        })
    }
}
