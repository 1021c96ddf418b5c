use futures::stream::FusedStream;
use futures::Stream;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::debug;

use crate::config::AssemblerConfig;
use crate::errors::StreamResult;
use crate::streaming::{AssembledResponse, ToolCallWindow};
use crate::types::ChatCompletionChunk;

pin_project! {
    /// Turns a raw chunk stream into a stream of merged units.
    ///
    /// Plain content chunks are yielded as they arrive. Chunks belonging to a
    /// tool call are held back and folded until the chunk that finishes with
    /// `tool_calls`, then yielded as one unit. After the first error the
    /// stream ends.
    pub struct StreamAssembler<S> {
        #[pin]
        upstream: S,
        window: ToolCallWindow,
        done: bool,
    }
}

impl<S> StreamAssembler<S>
where
    S: Stream<Item = StreamResult<ChatCompletionChunk>>,
{
    pub fn new(upstream: S) -> Self {
        Self::with_config(upstream, &AssemblerConfig::default())
    }

    pub fn with_config(upstream: S, config: &AssemblerConfig) -> Self {
        Self {
            upstream,
            window: ToolCallWindow::new(config),
            done: false,
        }
    }

    pub fn is_inside_tool_call(&self) -> bool {
        self.window.is_inside_tool_call()
    }

    /// Drains the stream into a single response.
    pub async fn into_response(self) -> StreamResult<AssembledResponse> {
        AssembledResponse::collect(self).await
    }
}

impl<S> Stream for StreamAssembler<S>
where
    S: Stream<Item = StreamResult<ChatCompletionChunk>>,
{
    type Item = StreamResult<ChatCompletionChunk>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }

        loop {
            match this.upstream.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => match this.window.push(chunk) {
                    Ok(Some(unit)) => return Poll::Ready(Some(Ok(unit))),
                    Ok(None) => continue,
                    Err(e) => {
                        *this.done = true;
                        return Poll::Ready(Some(Err(e)));
                    }
                },
                Poll::Ready(Some(Err(e))) => {
                    debug!(
                        error = %e,
                        inside_tool_call = this.window.is_inside_tool_call(),
                        "Upstream chunk stream failed"
                    );
                    *this.done = true;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(None) => {
                    *this.done = true;
                    return match this.window.finish() {
                        Ok(()) => Poll::Ready(None),
                        Err(e) => Poll::Ready(Some(Err(e))),
                    };
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl<S> FusedStream for StreamAssembler<S>
where
    S: Stream<Item = StreamResult<ChatCompletionChunk>>,
{
    fn is_terminated(&self) -> bool {
        self.done
    }
}

/// Adapter for wrapping any chunk stream in a [`StreamAssembler`].
pub trait AssembleExt: Stream<Item = StreamResult<ChatCompletionChunk>> + Sized {
    fn assemble(self) -> StreamAssembler<Self> {
        StreamAssembler::new(self)
    }

    fn assemble_with(self, config: &AssemblerConfig) -> StreamAssembler<Self> {
        StreamAssembler::with_config(self, config)
    }
}

impl<S> AssembleExt for S where S: Stream<Item = StreamResult<ChatCompletionChunk>> + Sized {}
