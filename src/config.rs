use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Provider configuration with validation.
///
/// Everything here shapes translation output only; no I/O settings belong in
/// this crate.
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Prefix for generated parameter placeholders (`$p0`, `$p1`, ...)
    #[validate(length(min = 1, message = "Parameter prefix cannot be empty"))]
    pub parameter_prefix: String,

    /// Upper bound accepted for variable-length traversal depths
    #[validate(range(
        min = 1,
        max = 1000,
        message = "Max traversal depth must be between 1 and 1000"
    ))]
    pub max_traversal_depth: u32,

    /// Emit one clause per line instead of a single-line statement
    pub pretty_print: bool,

    /// Whether identity projections of node roots load complex properties
    pub load_complex_properties: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            parameter_prefix: "p".to_string(),
            max_traversal_depth: 100,
            pretty_print: false,
            load_complex_properties: true,
        }
    }
}

impl ProviderConfig {
    /// Create configuration from environment variables with validation.
    /// Reads a `.env` file when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let config = Self {
            parameter_prefix: env::var("CYPHERABLE_PARAMETER_PREFIX")
                .unwrap_or_else(|_| "p".to_string()),
            max_traversal_depth: parse_env_var("CYPHERABLE_MAX_TRAVERSAL_DEPTH", "100")?,
            pretty_print: parse_env_var("CYPHERABLE_PRETTY_PRINT", "false")?,
            load_complex_properties: parse_env_var("CYPHERABLE_LOAD_COMPLEX_PROPERTIES", "true")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Merge with another configuration (explicit settings override).
    pub fn merge(&mut self, other: Self) {
        self.parameter_prefix = other.parameter_prefix;
        self.max_traversal_depth = other.max_traversal_depth;
        self.pretty_print = other.pretty_print;
        self.load_complex_properties = other.load_complex_properties;
    }
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
