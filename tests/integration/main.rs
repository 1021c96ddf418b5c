//! Integration tests
//!
//! These tests drive the public API end to end: raw SSE bytes are decoded,
//! assembled into units and collected, and tool call units are answered with
//! follow-up streams through the continuation driver.

mod sse_pipeline;

use bytes::Bytes;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use integrations_openai_stream::prelude::*;
use serde_json::json;
use std::sync::Once;

static TRACING: Once = Once::new();

/// Route library logs to the test harness output, filtered by `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn chunk_json(delta: serde_json::Value, finish_reason: Option<&str>) -> serde_json::Value {
    json!({
        "id": "chatcmpl-it",
        "object": "chat.completion.chunk",
        "created": 1700000000,
        "model": "gpt-4o-mini",
        "system_fingerprint": "fp_44709d6fcb",
        "choices": [{
            "index": 0,
            "delta": delta,
            "logprobs": null,
            "finish_reason": finish_reason
        }]
    })
}

/// One tool call whose arguments arrive in `fragments`.
pub fn tool_call_events(id: &str, name: &str, fragments: &[&str]) -> Vec<serde_json::Value> {
    let mut events = vec![chunk_json(
        json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "index": 0,
                "id": id,
                "type": "function",
                "function": {"name": name, "arguments": ""}
            }]
        }),
        None,
    )];
    for fragment in fragments {
        events.push(chunk_json(
            json!({"tool_calls": [{"index": 0, "function": {"arguments": fragment}}]}),
            None,
        ));
    }
    events.push(chunk_json(json!({}), Some("tool_calls")));
    events
}

pub fn text_events(parts: &[&str]) -> Vec<serde_json::Value> {
    let mut events = vec![chunk_json(json!({"role": "assistant", "content": ""}), None)];
    for part in parts {
        events.push(chunk_json(json!({"content": part}), None));
    }
    events.push(chunk_json(json!({}), Some("stop")));
    events
}

pub fn sse_payload(events: &[serde_json::Value]) -> String {
    let mut payload = String::new();
    for event in events {
        payload.push_str(&format!("data: {}\n\n", event));
    }
    payload.push_str("data: [DONE]\n\n");
    payload
}

/// Byte stream that hands out `payload` in reads of `size` bytes.
pub fn byte_stream(payload: String, size: usize) -> BoxStream<'static, Result<Bytes, StreamError>> {
    let bytes = Bytes::from(payload);
    let reads: Vec<Result<Bytes, StreamError>> = (0..bytes.len())
        .step_by(size)
        .map(|start| Ok(bytes.slice(start..(start + size).min(bytes.len()))))
        .collect();
    stream::iter(reads).boxed()
}

pub fn decode(events: &[serde_json::Value], read_size: usize) -> ChunkStream {
    decode_chunk_stream(byte_stream(sse_payload(events), read_size))
}
