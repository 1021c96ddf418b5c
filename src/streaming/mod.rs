//! Reassembly of streamed chat completion chunks.
//!
//! [`ChunkMerger`] is the fold step, [`ToolCallWindow`] decides where windows
//! begin and end, [`StreamAssembler`] applies both to a live stream, and
//! [`ContinuationDriver`] chains the follow-up streams opened after tool call
//! units.

mod assembler;
mod continuation;
mod merger;
mod response;
mod window;


use crate::errors::StreamResult;
use crate::types::ChatCompletionChunk;
use futures::Stream;
use std::pin::Pin;

pub use assembler::{AssembleExt, StreamAssembler};
pub use continuation::{ContinuationDriver, ToolCallContinuation};
pub use merger::{ChunkMerger, OpenToolCall};
pub use response::AssembledResponse;
pub use window::{ChunkKind, ToolCallWindow};

/// Boxed stream of chunks or emitted units.
pub type ChunkStream = Pin<Box<dyn Stream<Item = StreamResult<ChatCompletionChunk>> + Send>>;
