//! SSE stream fixtures

use crate::types::{
    ChatChunkChoice, ChatCompletionChunk, ChatDelta, ChatMessageRole, FinishReason,
    ToolCallDelta, Usage,
};
use serde_json::json;

pub const CHUNK_ID: &str = "chatcmpl-123";
pub const CHUNK_MODEL: &str = "gpt-4o-2024-08-06";
pub const CHUNK_CREATED: i64 = 1677652288;

/// Sample SSE chat completion chunk
pub fn chat_stream_chunk() -> serde_json::Value {
    json!({
        "id": CHUNK_ID,
        "object": "chat.completion.chunk",
        "created": CHUNK_CREATED,
        "model": CHUNK_MODEL,
        "choices": [{
            "index": 0,
            "delta": {
                "content": "Hello"
            },
            "finish_reason": null
        }]
    })
}

/// Sample SSE chat completion chunk with tool call delta
pub fn chat_stream_chunk_tool_call() -> serde_json::Value {
    json!({
        "id": CHUNK_ID,
        "object": "chat.completion.chunk",
        "created": CHUNK_CREATED,
        "model": CHUNK_MODEL,
        "choices": [{
            "index": 0,
            "delta": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "index": 0,
                    "id": "call_abc123",
                    "type": "function",
                    "function": {
                        "name": "get_weather",
                        "arguments": ""
                    }
                }]
            },
            "logprobs": null,
            "finish_reason": null
        }]
    })
}

/// Raw JSON of a full tool call stream: one call, arguments split over
/// three fragments, then the `tool_calls` finish and a usage trailer.
pub fn tool_call_stream_sequence() -> Vec<serde_json::Value> {
    let fragment = |arguments: &str| {
        json!({
            "id": CHUNK_ID,
            "object": "chat.completion.chunk",
            "created": CHUNK_CREATED,
            "model": CHUNK_MODEL,
            "choices": [{
                "index": 0,
                "delta": {
                    "tool_calls": [{
                        "index": 0,
                        "function": {"arguments": arguments}
                    }]
                },
                "logprobs": null,
                "finish_reason": null
            }]
        })
    };

    vec![
        chat_stream_chunk_tool_call(),
        fragment("{\"location\":"),
        fragment("\"Paris\","),
        fragment("\"unit\":\"celsius\"}"),
        json!({
            "id": CHUNK_ID,
            "object": "chat.completion.chunk",
            "created": CHUNK_CREATED,
            "model": CHUNK_MODEL,
            "choices": [{
                "index": 0,
                "delta": {},
                "logprobs": null,
                "finish_reason": "tool_calls"
            }]
        }),
        json!({
            "id": CHUNK_ID,
            "object": "chat.completion.chunk",
            "created": CHUNK_CREATED,
            "model": CHUNK_MODEL,
            "service_tier": "default",
            "choices": [],
            "usage": {"prompt_tokens": 82, "completion_tokens": 18, "total_tokens": 100}
        }),
    ]
}

/// Renders JSON chunks as an SSE body terminated by `[DONE]`.
pub fn sse_body(chunks: &[serde_json::Value]) -> String {
    let mut body = String::new();
    for chunk in chunks {
        body.push_str("data: ");
        body.push_str(&chunk.to_string());
        body.push_str("\n\n");
    }
    body.push_str("data: [DONE]\n\n");
    body
}

fn base_chunk() -> ChatCompletionChunk {
    ChatCompletionChunk::new(CHUNK_ID, CHUNK_MODEL, CHUNK_CREATED)
}

pub fn content_chunk(text: &str) -> ChatCompletionChunk {
    base_chunk().with_choice(ChatChunkChoice::new(0, ChatDelta::content(text)))
}

pub fn role_chunk() -> ChatCompletionChunk {
    base_chunk().with_choice(ChatChunkChoice::new(
        0,
        ChatDelta::content("").with_role(ChatMessageRole::Assistant),
    ))
}

pub fn tool_call_start(id: &str, name: &str, arguments: &str) -> ChatCompletionChunk {
    base_chunk().with_choice(ChatChunkChoice::new(
        0,
        ChatDelta::tool_call(ToolCallDelta::start(0, id, name, arguments)).with_role(ChatMessageRole::Assistant),
    ))
}

pub fn tool_call_continuation(arguments: &str) -> ChatCompletionChunk {
    base_chunk().with_choice(ChatChunkChoice::new(
        0,
        ChatDelta::tool_call(ToolCallDelta::continuation(0, arguments)),
    ))
}

pub fn finish_chunk(finish_reason: FinishReason) -> ChatCompletionChunk {
    base_chunk().with_choice(ChatChunkChoice::new(0, ChatDelta::default()).with_finish_reason(finish_reason))
}

pub fn usage_chunk() -> ChatCompletionChunk {
    base_chunk().with_usage(Usage::new(82, 18))
}

/// `[start, continuation, continuation, end]` for one call whose arguments
/// reassemble to `{"a":1,"b":2}`.
pub fn single_tool_call_window(id: &str, name: &str) -> Vec<ChatCompletionChunk> {
    vec![
        tool_call_start(id, name, "{\"a\":"),
        tool_call_continuation("1,"),
        tool_call_continuation("\"b\":2}"),
        finish_chunk(FinishReason::ToolCalls),
    ]
}

/// Plain text answer: role chunk, two text chunks, `stop` finish.
pub fn content_sequence() -> Vec<ChatCompletionChunk> {
    vec![
        role_chunk(),
        content_chunk("Hello"),
        content_chunk(" there!"),
        finish_chunk(FinishReason::Stop),
    ]
}
