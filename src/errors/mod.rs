mod categories;
mod error;

pub use categories::{ConfigurationError, ProtocolError, TransportError};
pub use error::{StreamError, StreamResult};
