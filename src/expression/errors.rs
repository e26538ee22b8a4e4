use thiserror::Error;

/// Errors raised while building or translating expressions.
#[derive(Debug, Clone, Error)]
pub enum ExpressionError {
    #[error("unsupported expression ({kind}): {message}")]
    Unsupported { kind: String, message: String },

    #[error("failed to evaluate captured expression '{expression}': {message}")]
    CompilationFailed { expression: String, message: String },
}

impl ExpressionError {
    pub fn unsupported(kind: impl Into<String>, message: impl Into<String>) -> Self {
        ExpressionError::Unsupported {
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn compilation_failed(
        expression: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ExpressionError::CompilationFailed {
            expression: expression.into(),
            message: message.into(),
        }
    }
}
