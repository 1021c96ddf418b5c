use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Multiple tool calls in one delta: got {count}, only one is supported per chunk")]
    MultipleToolCallsInOneDelta { count: usize },

    #[error("Tool call continuation at index {index} has no open call to merge into")]
    ContinuationWithoutOpenCall { index: u32 },

    #[error("Stream ended inside a tool call window after {buffered_chunks} chunk(s) (call id: {call_id:?})")]
    TruncatedToolCallStream {
        call_id: Option<String>,
        buffered_chunks: usize,
    },

    #[error("Tool call {call_id} has arguments that are not valid JSON: {reason}")]
    InvalidToolArguments { call_id: String, reason: String },
}

impl ProtocolError {
    /// Identifier of the tool call involved, when one is known.
    pub fn call_id(&self) -> Option<&str> {
        match self {
            ProtocolError::TruncatedToolCallStream { call_id, .. } => call_id.as_deref(),
            ProtocolError::InvalidToolArguments { call_id, .. } => Some(call_id),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection reset: {0}")]
    ConnectionReset(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Stream cancelled: {0}")]
    Cancelled(String),

    #[error("I/O error: {0}")]
    Io(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Invalid continuation depth: {0}")]
    InvalidContinuationDepth(String),

    #[error("Invalid environment value for {name}: {value}")]
    InvalidEnvValue { name: String, value: String },
}
