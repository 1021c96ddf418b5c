//! Window tracking for a single chunk stream.

use serde::de::IgnoredAny;
use tracing::{debug, trace, warn};

use crate::config::AssemblerConfig;
use crate::errors::{ProtocolError, StreamResult};
use crate::streaming::ChunkMerger;
use crate::types::ChatCompletionChunk;

/// Role of a chunk relative to the window it falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// Plain content outside any tool call; forms its own window.
    Content,
    /// Opens a tool call window.
    ToolCallStart,
    /// Buffered inside an open tool call window.
    ToolCallContinuation,
    /// Closes the open tool call window.
    ToolCallEnd,
}

/// Groups chunks into windows and folds each one as it arrives.
///
/// Only the running accumulator of the open window is kept, never the raw
/// chunks.
#[derive(Debug, Default)]
pub struct ToolCallWindow {
    inside_tool_call: bool,
    accumulated: Option<ChatCompletionChunk>,
    buffered_chunks: usize,
    validate_tool_arguments: bool,
}

impl ToolCallWindow {
    pub fn new(config: &AssemblerConfig) -> Self {
        Self {
            validate_tool_arguments: config.validate_tool_arguments,
            ..Default::default()
        }
    }

    pub fn is_inside_tool_call(&self) -> bool {
        self.inside_tool_call
    }

    pub fn buffered_chunks(&self) -> usize {
        self.buffered_chunks
    }

    pub fn classify(&self, chunk: &ChatCompletionChunk) -> ChunkKind {
        let inside = self.inside_tool_call || ChunkMerger::is_tool_call_start(chunk);
        if !inside {
            ChunkKind::Content
        } else if ChunkMerger::is_tool_call_end(chunk) {
            ChunkKind::ToolCallEnd
        } else if self.inside_tool_call {
            ChunkKind::ToolCallContinuation
        } else {
            ChunkKind::ToolCallStart
        }
    }

    /// Feeds the next chunk. Returns the unit to emit when this chunk closes
    /// a window.
    pub fn push(&mut self, chunk: ChatCompletionChunk) -> StreamResult<Option<ChatCompletionChunk>> {
        let result = self.advance(chunk);
        if result.is_err() {
            self.reset();
        }
        result
    }

    /// Call once upstream has ended cleanly.
    pub fn finish(&mut self) -> StreamResult<()> {
        if !self.inside_tool_call {
            return Ok(());
        }

        let call_id = self.open_call_id();
        warn!(
            call_id = ?call_id,
            buffered_chunks = self.buffered_chunks,
            "Chunk stream ended inside a tool call window"
        );
        let error = ProtocolError::TruncatedToolCallStream {
            call_id,
            buffered_chunks: self.buffered_chunks,
        };
        self.reset();
        Err(error.into())
    }

    fn advance(&mut self, chunk: ChatCompletionChunk) -> StreamResult<Option<ChatCompletionChunk>> {
        check_single_fragment(&chunk)?;

        let kind = self.classify(&chunk);
        if kind == ChunkKind::Content {
            return Ok(Some(chunk));
        }
        if !self.inside_tool_call {
            self.open(&chunk)?;
        }

        let merged = ChunkMerger::merge(self.accumulated.take(), chunk)?;
        self.buffered_chunks += 1;

        if kind == ChunkKind::ToolCallEnd {
            self.close(merged).map(Some)
        } else {
            self.accumulated = Some(merged);
            trace!(buffered_chunks = self.buffered_chunks, "Buffered chunk into tool call window");
            Ok(None)
        }
    }

    fn open(&mut self, chunk: &ChatCompletionChunk) -> StreamResult<()> {
        let first = chunk
            .choices
            .iter()
            .find_map(|c| c.delta.tool_calls.as_ref().and_then(|calls| calls.first()));

        if let Some(fragment) = first {
            if fragment.id.is_none() {
                warn!(index = fragment.index, "Tool call window opened by a continuation fragment");
                return Err(ProtocolError::ContinuationWithoutOpenCall {
                    index: fragment.index,
                }
                .into());
            }
            debug!(
                call_id = ?fragment.id,
                name = ?fragment.name(),
                index = fragment.index,
                "Tool call window opened"
            );
        }

        self.inside_tool_call = true;
        Ok(())
    }

    fn close(&mut self, unit: ChatCompletionChunk) -> StreamResult<ChatCompletionChunk> {
        let buffered_chunks = self.buffered_chunks;
        self.reset();

        if self.validate_tool_arguments {
            for call in unit.tool_calls() {
                if let Err(e) = serde_json::from_str::<IgnoredAny>(&call.function.arguments) {
                    warn!(call_id = %call.id, error = %e, "Reassembled tool call arguments are not valid JSON");
                    return Err(ProtocolError::InvalidToolArguments {
                        call_id: call.id,
                        reason: e.to_string(),
                    }
                    .into());
                }
            }
        }

        debug!(
            buffered_chunks,
            tool_calls = unit.tool_call_deltas().len(),
            "Tool call window closed"
        );
        Ok(unit)
    }

    fn open_call_id(&self) -> Option<String> {
        self.accumulated
            .as_ref()
            .and_then(|chunk| chunk.tool_call_deltas().last())
            .and_then(|call| call.id.clone())
    }

    fn reset(&mut self) {
        self.inside_tool_call = false;
        self.accumulated = None;
        self.buffered_chunks = 0;
    }
}

fn check_single_fragment(chunk: &ChatCompletionChunk) -> StreamResult<()> {
    for choice in &chunk.choices {
        let count = choice.delta.tool_calls.as_ref().map_or(0, Vec::len);
        if count > 1 {
            warn!(count, "Chunk carries more than one tool call fragment");
            return Err(ProtocolError::MultipleToolCallsInOneDelta { count }.into());
        }
    }
    Ok(())
}
