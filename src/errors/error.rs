use crate::errors::categories::{ConfigurationError, ProtocolError, TransportError};
use thiserror::Error;

pub type StreamResult<T> = Result<T, StreamError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Continuation depth exceeded: at most {max_depth} nested stream(s) allowed")]
    ContinuationDepthExceeded { max_depth: usize },
}

impl StreamError {
    /// Errors raised by the assembler itself because the chunk sequence broke
    /// the tool-call protocol.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, StreamError::Protocol(_))
    }

    pub fn is_transport_error(&self) -> bool {
        matches!(self, StreamError::Transport(_))
    }

    pub fn is_truncated_stream(&self) -> bool {
        matches!(
            self,
            StreamError::Protocol(ProtocolError::TruncatedToolCallStream { .. })
        )
    }
}

impl From<serde_json::Error> for StreamError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            StreamError::Deserialization(err.to_string())
        } else {
            StreamError::Serialization(err.to_string())
        }
    }
}

impl From<std::io::Error> for StreamError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::ConnectionReset | std::io::ErrorKind::ConnectionAborted => {
                StreamError::Transport(TransportError::ConnectionReset(err.to_string()))
            }
            _ => StreamError::Transport(TransportError::Io(err.to_string())),
        }
    }
}
