//! Reassembly of OpenAI chat completion streams.
//!
//! A streamed completion arrives as many small `chat.completion.chunk`
//! events. Plain text can be shown as it arrives, but a tool call is spread
//! over several chunks (id and name first, then argument fragments) and is
//! only usable once its finishing chunk has been seen. [`StreamAssembler`]
//! passes text chunks straight through and folds each tool call into a single
//! unit.
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use integrations_openai_stream::prelude::*;
//!
//! # async fn run(upstream: ChunkStream) -> StreamResult<()> {
//! let mut units = upstream.assemble();
//! while let Some(unit) = units.next().await {
//!     let unit = unit?;
//!     for call in unit.tool_calls() {
//!         println!("{}({})", call.function.name, call.function.arguments);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod streaming;
pub mod transport;
pub mod types;


pub use config::AssemblerConfig;
pub use errors::{StreamError, StreamResult};
pub use streaming::{
    AssembleExt, AssembledResponse, ChunkMerger, ChunkStream, ContinuationDriver,
    StreamAssembler, ToolCallContinuation,
};
pub use transport::decode_chunk_stream;

pub mod prelude {
    pub use crate::config::AssemblerConfig;
    pub use crate::errors::{StreamError, StreamResult};
    pub use crate::streaming::{
        AssembleExt, AssembledResponse, ChunkStream, ContinuationDriver, StreamAssembler,
        ToolCallContinuation,
    };
    pub use crate::transport::decode_chunk_stream;
    pub use crate::types::{ChatCompletionChunk, FinishReason, ToolCall};
}
