//! Nested re-entry after tool call units.
//!
//! When an emitted unit asks for tools to be run, the caller may answer with
//! a fresh chunk stream (the follow-up request). That stream is drained to
//! completion before the outer one is polled again. Pending outer streams
//! wait on an explicit stack, so nesting never grows the call stack.

use async_stream::try_stream;
use async_trait::async_trait;
use futures::StreamExt;
use tracing::debug;

use crate::config::AssemblerConfig;
use crate::errors::{StreamError, StreamResult};
use crate::streaming::{ChunkStream, StreamAssembler};
use crate::types::ChatCompletionChunk;

/// Caller-side reaction to a unit that requests tool execution.
#[async_trait]
pub trait ToolCallContinuation: Send + Sync {
    /// Invoked after `unit` has been yielded downstream. Returning a stream
    /// suspends the current sequence until the returned one is drained.
    async fn resume(&self, unit: &ChatCompletionChunk) -> StreamResult<Option<ChunkStream>>;
}

pub struct ContinuationDriver<C> {
    continuation: C,
    config: AssemblerConfig,
}

impl<C> ContinuationDriver<C>
where
    C: ToolCallContinuation + 'static,
{
    pub fn new(continuation: C) -> Self {
        Self::with_config(continuation, AssemblerConfig::default())
    }

    pub fn with_config(continuation: C, config: AssemblerConfig) -> Self {
        Self {
            continuation,
            config,
        }
    }

    /// Assembles `upstream` and every stream opened by the continuation, in
    /// order, as one stream of units.
    pub fn drive(self, upstream: ChunkStream) -> ChunkStream {
        let Self {
            continuation,
            config,
        } = self;

        Box::pin(try_stream! {
            config.validate()?;

            let mut stack = vec![StreamAssembler::with_config(upstream, &config)];

            while let Some(assembler) = stack.last_mut() {
                let unit = match assembler.next().await {
                    Some(unit) => unit?,
                    None => {
                        stack.pop();
                        debug!(depth = stack.len(), "Chunk stream drained");
                        continue;
                    }
                };

                let pending = if unit.requests_tool_execution() {
                    Some(unit.clone())
                } else {
                    None
                };

                yield unit;

                if let Some(unit) = pending {
                    if let Some(nested) = continuation.resume(&unit).await? {
                        if stack.len() >= config.max_continuation_depth {
                            Err::<(), _>(StreamError::ContinuationDepthExceeded {
                                max_depth: config.max_continuation_depth,
                            })?;
                        }
                        debug!(depth = stack.len() + 1, "Opening nested chunk stream");
                        stack.push(StreamAssembler::with_config(nested, &config));
                    }
                }
            }
        })
    }
}
