//! Query Scope
//!
//! `QueryScope` is the single source of truth for alias resolution at any
//! point during translation. It is built iteratively: the root queryable
//! introduces the first alias, traversal and path-segment operators add and
//! retarget aliases. It is queried for ALL alias resolution.
//!
//! Alias assignment is stable per (type, scope): the same element type
//! resolved twice in one query yields the same alias. Fresh instances of an
//! already-seen type (a traversal from `Person` to `Person`) are assigned the
//! next free candidate (`n2`, `n3`, ...).

use std::any::TypeId;
use std::collections::HashMap;

use crate::schema::{ElementInfo, ElementKind};

use super::errors::BuilderError;
use super::Direction;

/// One hop of a traversal chain, accumulated by `traverse` /
/// `then_traverse` / `with_depth` / `in_direction` and compiled into a
/// pattern when the terminal operator fires.
#[derive(Debug, Clone)]
pub struct TraversalStep {
    pub relationship: ElementInfo,
    pub target: ElementInfo,
    pub min_depth: Option<u32>,
    pub max_depth: Option<u32>,
    pub direction: Direction,
    /// Set when `relationships()` needs the relationship aliased in the
    /// pattern.
    pub relationship_alias: Option<String>,
}

impl TraversalStep {
    pub fn new(relationship: ElementInfo, target: ElementInfo) -> Self {
        TraversalStep {
            relationship,
            target,
            min_depth: None,
            max_depth: None,
            direction: Direction::Outgoing,
            relationship_alias: None,
        }
    }

    /// Variable-length fragment: empty, `*n`, `*min..max` or `*1..max`.
    pub fn depth_fragment(&self) -> String {
        match (self.min_depth, self.max_depth) {
            (None, None) => String::new(),
            (Some(min), Some(max)) if min == max => format!("*{}", min),
            (Some(min), Some(max)) => format!("*{}..{}", min, max),
            (None, Some(max)) => format!("*1..{}", max),
            (Some(min), None) => format!("*{}..", min),
        }
    }
}

/// The alias/type environment of one query translation.
#[derive(Debug, Default)]
pub struct QueryScope {
    /// Alias last introduced into MATCH.
    pub current_alias: Option<String>,

    /// The root queryable's element type.
    pub root_type: Option<ElementInfo>,

    /// Canonical alias per element type, in insertion order.
    aliases: Vec<(TypeId, String)>,

    /// Aliases for bound variables (UNWIND items, collection lambdas).
    pub variable_aliases: HashMap<String, String>,

    /// Set when a path-segment operator is opened; controls alias
    /// resolution inside predicates and projections.
    pub is_path_segment_context: bool,

    /// Pending traversal hops, compiled at finalization.
    pub traversal_steps: Vec<TraversalStep>,

    /// Guard: `in_direction` may be called at most once per chain.
    direction_was_set: bool,

    /// Cypher fragment the `key()` of a grouping resolves to.
    pub group_by_expression: Option<String>,

    /// Cypher fragment grouped elements collect into (element selector of
    /// `group_by`), when present.
    pub group_element_expression: Option<String>,
}

impl QueryScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical alias for an element type. Stable: the second lookup for
    /// the same type returns the first assignment.
    pub fn alias_for(&mut self, element: &ElementInfo) -> String {
        if let Some((_, alias)) = self.aliases.iter().find(|(id, _)| *id == element.type_id) {
            return alias.clone();
        }
        let alias = self.next_free_alias(element.kind);
        self.aliases.push((element.type_id, alias.clone()));
        alias
    }

    /// Assign a fresh alias for a new instance of a possibly-seen type
    /// (traversal targets). The canonical mapping is updated so later
    /// member access on the type resolves to the newest instance.
    pub fn assign_fresh_alias(&mut self, element: &ElementInfo) -> String {
        let alias = self.next_free_alias(element.kind);
        self.bind_alias(element, alias.clone());
        alias
    }

    /// Bind an explicit alias (path-segment `src` / `r` / `tgt`).
    pub fn bind_alias(&mut self, element: &ElementInfo, alias: String) {
        if let Some(entry) = self
            .aliases
            .iter_mut()
            .find(|(id, _)| *id == element.type_id)
        {
            entry.1 = alias;
        } else {
            self.aliases.push((element.type_id, alias));
        }
    }

    pub fn alias_of_type(&self, type_id: TypeId) -> Option<&str> {
        self.aliases
            .iter()
            .find(|(id, _)| *id == type_id)
            .map(|(_, alias)| alias.as_str())
    }

    fn next_free_alias(&self, kind: ElementKind) -> String {
        let base = match kind {
            ElementKind::Node => "n",
            ElementKind::Relationship => "r",
        };
        if !self.is_alias_taken(base) {
            return base.to_string();
        }
        let mut counter = 2;
        loop {
            let candidate = format!("{}{}", base, counter);
            if !self.is_alias_taken(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }

    fn is_alias_taken(&self, candidate: &str) -> bool {
        self.aliases.iter().any(|(_, alias)| alias == candidate)
            || self.variable_aliases.values().any(|a| a == candidate)
    }

    /// Register a bound variable (UNWIND item or lambda parameter).
    pub fn bind_variable(&mut self, name: impl Into<String>, alias: impl Into<String>) {
        self.variable_aliases.insert(name.into(), alias.into());
    }

    pub fn variable_alias(&self, name: &str) -> Option<&str> {
        self.variable_aliases.get(name).map(String::as_str)
    }

    pub fn root_is_relationship(&self) -> bool {
        self.root_type
            .as_ref()
            .map(|t| t.is_relationship())
            .unwrap_or(false)
    }

    pub fn root_is_node(&self) -> bool {
        self.root_type
            .as_ref()
            .map(|t| t.is_node())
            .unwrap_or(false)
    }

    /// Last traversal step, when a traversal chain is open.
    pub fn last_traversal_step_mut(&mut self) -> Option<&mut TraversalStep> {
        self.traversal_steps.last_mut()
    }

    /// Record the direction of the open traversal. Errors on a second call
    /// anywhere in the chain.
    pub fn set_traversal_direction(&mut self, direction: Direction) -> Result<(), BuilderError> {
        if self.direction_was_set {
            return Err(BuilderError::DirectionSetTwice);
        }
        let step = self
            .traversal_steps
            .last_mut()
            .ok_or_else(|| BuilderError::invalid("in_direction outside a traversal chain"))?;
        step.direction = direction;
        self.direction_was_set = true;
        Ok(())
    }

    /// Validated depth range for the open traversal.
    pub fn set_traversal_depth(
        &mut self,
        min: Option<u32>,
        max: Option<u32>,
        configured_max: u32,
    ) -> Result<(), BuilderError> {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(BuilderError::DepthRangeInverted { min, max });
            }
        }
        for depth in [min, max].into_iter().flatten() {
            if depth == 0 {
                return Err(BuilderError::NonPositiveDepth(0));
            }
            if depth > configured_max {
                return Err(BuilderError::DepthExceedsMaximum {
                    depth,
                    max: configured_max,
                });
            }
        }
        let step = self
            .traversal_steps
            .last_mut()
            .ok_or_else(|| BuilderError::invalid("with_depth outside a traversal chain"))?;
        if min.is_some() {
            step.min_depth = min;
        }
        if max.is_some() {
            step.max_depth = max;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{GraphElement, NodeElement, RelationshipElement};

    struct Person;
    impl GraphElement for Person {}
    impl NodeElement for Person {}

    struct Company;
    impl GraphElement for Company {}
    impl NodeElement for Company {}

    struct Knows;
    impl GraphElement for Knows {}
    impl RelationshipElement for Knows {}

    #[test]
    fn alias_assignment_is_stable() {
        let mut scope = QueryScope::new();
        let person = ElementInfo::node::<Person>();
        assert_eq!(scope.alias_for(&person), "n");
        assert_eq!(scope.alias_for(&person), "n");
    }

    #[test]
    fn collisions_get_numbered_aliases() {
        let mut scope = QueryScope::new();
        assert_eq!(scope.alias_for(&ElementInfo::node::<Person>()), "n");
        assert_eq!(scope.alias_for(&ElementInfo::node::<Company>()), "n2");
        assert_eq!(scope.alias_for(&ElementInfo::relationship::<Knows>()), "r");
    }

    #[test]
    fn fresh_alias_for_seen_type() {
        let mut scope = QueryScope::new();
        let person = ElementInfo::node::<Person>();
        assert_eq!(scope.alias_for(&person), "n");
        assert_eq!(scope.assign_fresh_alias(&person), "n2");
        // canonical mapping now points at the newest instance
        assert_eq!(scope.alias_of_type(person.type_id), Some("n2"));
    }

    #[test]
    fn direction_can_only_be_set_once() {
        let mut scope = QueryScope::new();
        scope.traversal_steps.push(TraversalStep::new(
            ElementInfo::relationship::<Knows>(),
            ElementInfo::node::<Person>(),
        ));
        scope.set_traversal_direction(Direction::Outgoing).unwrap();
        assert!(matches!(
            scope.set_traversal_direction(Direction::Both),
            Err(BuilderError::DirectionSetTwice)
        ));
    }

    #[test]
    fn depth_validation() {
        let mut scope = QueryScope::new();
        scope.traversal_steps.push(TraversalStep::new(
            ElementInfo::relationship::<Knows>(),
            ElementInfo::node::<Person>(),
        ));
        assert!(matches!(
            scope.set_traversal_depth(Some(3), Some(1), 100),
            Err(BuilderError::DepthRangeInverted { .. })
        ));
        assert!(matches!(
            scope.set_traversal_depth(Some(0), None, 100),
            Err(BuilderError::NonPositiveDepth(0))
        ));
        assert!(matches!(
            scope.set_traversal_depth(None, Some(500), 100),
            Err(BuilderError::DepthExceedsMaximum { .. })
        ));
        scope.set_traversal_depth(Some(1), Some(3), 100).unwrap();
    }

    #[test]
    fn depth_fragments() {
        let mut step = TraversalStep::new(
            ElementInfo::relationship::<Knows>(),
            ElementInfo::node::<Person>(),
        );
        assert_eq!(step.depth_fragment(), "");
        step.max_depth = Some(3);
        assert_eq!(step.depth_fragment(), "*1..3");
        step.min_depth = Some(1);
        assert_eq!(step.depth_fragment(), "*1..3");
        step.min_depth = Some(3);
        assert_eq!(step.depth_fragment(), "*3");
    }
}
