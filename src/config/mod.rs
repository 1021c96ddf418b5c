//! Assembler configuration.

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigurationError, StreamError, StreamResult};

/// Default bound on nested continuation streams.
pub const DEFAULT_MAX_CONTINUATION_DEPTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblerConfig {
    /// Reject a closing tool-call window whose reassembled arguments are not
    /// a JSON document.
    #[serde(default)]
    pub validate_tool_arguments: bool,

    /// Maximum number of chunk sequences open at once in the continuation
    /// driver, the outermost one included.
    #[serde(default = "default_max_continuation_depth")]
    pub max_continuation_depth: usize,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AssemblerConfig {
    pub fn new() -> Self {
        Self {
            validate_tool_arguments: false,
            max_continuation_depth: default_max_continuation_depth(),
        }
    }

    /// Creates a configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - OPENAI_STREAM_VALIDATE_ARGUMENTS (optional, `true`/`false`)
    /// - OPENAI_STREAM_MAX_CONTINUATION_DEPTH (optional, positive integer)
    pub fn from_env() -> StreamResult<Self> {
        let mut config = Self::new();

        if let Ok(value) = std::env::var("OPENAI_STREAM_VALIDATE_ARGUMENTS") {
            config.validate_tool_arguments = value.trim().parse::<bool>().map_err(|_| {
                ConfigurationError::InvalidEnvValue {
                    name: "OPENAI_STREAM_VALIDATE_ARGUMENTS".to_string(),
                    value: value.clone(),
                }
            })?;
        }

        if let Ok(value) = std::env::var("OPENAI_STREAM_MAX_CONTINUATION_DEPTH") {
            config.max_continuation_depth = value.trim().parse::<usize>().map_err(|_| {
                ConfigurationError::InvalidEnvValue {
                    name: "OPENAI_STREAM_MAX_CONTINUATION_DEPTH".to_string(),
                    value: value.clone(),
                }
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> StreamResult<()> {
        if self.max_continuation_depth == 0 {
            return Err(StreamError::Configuration(
                ConfigurationError::InvalidContinuationDepth(
                    "max_continuation_depth must be at least 1".to_string(),
                ),
            ));
        }
        Ok(())
    }

    pub fn with_tool_argument_validation(mut self, enabled: bool) -> Self {
        self.validate_tool_arguments = enabled;
        self
    }

    pub fn with_max_continuation_depth(mut self, depth: usize) -> Self {
        self.max_continuation_depth = depth;
        self
    }
}

fn default_max_continuation_depth() -> usize {
    DEFAULT_MAX_CONTINUATION_DEPTH
}
