mod chunk;
mod common;
mod serde_helpers;
mod tool_call;

pub use chunk::{
    ChatChunkChoice, ChatCompletionChunk, ChatDelta, FinishReason, FunctionCallDelta,
    ToolCallDelta, CHUNK_OBJECT,
};
pub use common::{ChatMessageRole, Usage};
pub use serde_helpers::*;
pub use tool_call::{FunctionCall, ToolCall};
