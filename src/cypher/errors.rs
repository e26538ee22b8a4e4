use thiserror::Error;

/// Errors raised while accumulating or assembling a Cypher statement.
#[derive(Debug, Clone, Error)]
pub enum BuilderError {
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("invalid query: no root MATCH pattern was installed")]
    MissingRootMatch,

    #[error("invalid query: a root MATCH pattern is already installed")]
    DuplicateRootMatch,

    #[error("invalid query: RETURN clause is empty (must specify at least one expression)")]
    EmptyReturnClause,

    #[error("invalid query: traversal depth must be positive (got {0})")]
    NonPositiveDepth(i64),

    #[error("invalid query: traversal min depth {min} exceeds max depth {max}")]
    DepthRangeInverted { min: u32, max: u32 },

    #[error("invalid query: traversal depth {depth} exceeds the configured maximum {max}")]
    DepthExceedsMaximum { depth: u32, max: u32 },

    #[error("invalid query: traversal direction was set more than once")]
    DirectionSetTwice,
}

impl BuilderError {
    pub fn invalid(message: impl Into<String>) -> Self {
        BuilderError::InvalidQuery(message.into())
    }
}
