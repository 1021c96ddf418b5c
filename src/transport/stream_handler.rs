use crate::errors::{StreamError, StreamResult};
use crate::streaming::ChunkStream;
use crate::types::ChatCompletionChunk;
use bytes::Bytes;
use futures::Stream;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::trace;

const DONE_MARKER: &str = "[DONE]";

/// Decodes a Server-Sent Events body into the chunk sequence the assembler
/// consumes. The sequence ends at `data: [DONE]` or when the body ends.
pub fn decode_chunk_stream<S, E>(body: S) -> ChunkStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    StreamError: From<E>,
{
    Box::pin(ChunkDecoder::new(SseStream::new(body)))
}

pin_project! {
    pub struct SseStream<S> {
        #[pin]
        inner: S,
        buffer: Vec<u8>,
        // No event boundary starts before this offset.
        scanned: usize,
        exhausted: bool,
    }
}

impl<S, E> SseStream<S>
where
    S: Stream<Item = Result<Bytes, E>>,
    StreamError: From<E>,
{
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            scanned: 0,
            exhausted: false,
        }
    }
}

impl<S, E> Stream for SseStream<S>
where
    S: Stream<Item = Result<Bytes, E>>,
    StreamError: From<E>,
{
    type Item = StreamResult<SseEvent>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some((pos, len)) = find_event_boundary(&this.buffer[..], *this.scanned) {
                *this.scanned = 0;
                let event_data = this.buffer.drain(..pos + len).collect::<Vec<_>>();
                let event = SseEvent::from_bytes(&event_data[..pos]);
                if event.is_empty() {
                    continue;
                }
                return Poll::Ready(Some(Ok(event)));
            }

            *this.scanned = this.buffer.len().saturating_sub(MAX_BOUNDARY_LEN - 1);

            if *this.exhausted {
                if this.buffer.is_empty() {
                    return Poll::Ready(None);
                }
                let event_data = this.buffer.drain(..).collect::<Vec<_>>();
                let event = SseEvent::from_bytes(&event_data);
                if event.is_empty() {
                    return Poll::Ready(None);
                }
                return Poll::Ready(Some(Ok(event)));
            }

            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => this.buffer.extend_from_slice(&chunk),
                Poll::Ready(Some(Err(e))) => return Poll::Ready(Some(Err(StreamError::from(e)))),
                Poll::Ready(None) => *this.exhausted = true,
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

const EVENT_BOUNDARIES: [&[u8]; 3] = [b"\r\n\r\n", b"\n\r\n", b"\n\n"];
const MAX_BOUNDARY_LEN: usize = 4;

/// Position and length of the first blank-line separator in `buffer` that
/// starts at or after `from`.
fn find_event_boundary(buffer: &[u8], from: usize) -> Option<(usize, usize)> {
    (from..buffer.len()).find_map(|pos| {
        EVENT_BOUNDARIES
            .iter()
            .find(|boundary| buffer[pos..].starts_with(boundary))
            .map(|boundary| (pos, boundary.len()))
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseEvent {
    pub event_type: Option<String>,
    pub data: String,
    pub id: Option<String>,
}

impl SseEvent {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes);
        let mut event_type = None;
        let mut data_lines = Vec::new();
        let mut id = None;

        for line in text.lines() {
            // Comment lines start with ':'
            if line.is_empty() || line.starts_with(':') {
                continue;
            }

            if let Some(stripped) = line.strip_prefix("event:") {
                event_type = Some(stripped.trim().to_string());
            } else if let Some(stripped) = line.strip_prefix("data:") {
                data_lines.push(stripped.trim());
            } else if let Some(stripped) = line.strip_prefix("id:") {
                id = Some(stripped.trim().to_string());
            }
        }

        Self {
            event_type,
            data: data_lines.join("\n"),
            id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.event_type.is_none() && self.data.is_empty() && self.id.is_none()
    }

    pub fn is_done(&self) -> bool {
        self.data == DONE_MARKER
    }

    pub fn parse(&self) -> StreamResult<ChatCompletionChunk> {
        Ok(serde_json::from_str(&self.data)?)
    }
}

pin_project! {
    /// Maps SSE events to chunks, stopping at the `[DONE]` marker.
    pub struct ChunkDecoder<S> {
        #[pin]
        events: S,
        done: bool,
    }
}

impl<S> ChunkDecoder<S>
where
    S: Stream<Item = StreamResult<SseEvent>>,
{
    pub fn new(events: S) -> Self {
        Self {
            events,
            done: false,
        }
    }
}

impl<S> Stream for ChunkDecoder<S>
where
    S: Stream<Item = StreamResult<SseEvent>>,
{
    type Item = StreamResult<ChatCompletionChunk>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }

        loop {
            match this.events.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(event))) => {
                    if event.is_done() {
                        trace!("Received [DONE] marker");
                        *this.done = true;
                        return Poll::Ready(None);
                    }
                    // Keep-alive events carry no data
                    if event.data.is_empty() {
                        continue;
                    }
                    return Poll::Ready(Some(event.parse()));
                }
                Poll::Ready(Some(Err(e))) => return Poll::Ready(Some(Err(e))),
                Poll::Ready(None) => {
                    *this.done = true;
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
