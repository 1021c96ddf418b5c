//! Wire types for `chat.completion.chunk` events.

use crate::types::serde_helpers::option_string;
use crate::types::{ChatMessageRole, ToolCall, Usage};
use serde::{Deserialize, Serialize};

pub const CHUNK_OBJECT: &str = "chat.completion.chunk";

fn default_object() -> String {
    CHUNK_OBJECT.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub id: String,

    #[serde(default = "default_object")]
    pub object: String,

    #[serde(default)]
    pub created: i64,

    #[serde(default)]
    pub model: String,

    #[serde(default)]
    pub choices: Vec<ChatChunkChoice>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_fingerprint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_tier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatChunkChoice {
    #[serde(default)]
    pub index: u32,

    #[serde(default)]
    pub delta: ChatDelta,

    #[serde(default)]
    pub finish_reason: Option<FinishReason>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ChatMessageRole>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallDelta>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
    FunctionCall,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallDelta {
    #[serde(default)]
    pub index: u32,

    /// Only present on the first delta of a call.
    #[serde(default, with = "option_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tool_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionCallDelta>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCallDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

impl ChatCompletionChunk {
    pub fn new(id: impl Into<String>, model: impl Into<String>, created: i64) -> Self {
        Self {
            id: id.into(),
            object: default_object(),
            created,
            model: model.into(),
            choices: Vec::new(),
            system_fingerprint: None,
            service_tier: None,
            usage: None,
        }
    }

    pub fn with_choice(mut self, choice: ChatChunkChoice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn with_service_tier(mut self, service_tier: impl Into<String>) -> Self {
        self.service_tier = Some(service_tier.into());
        self
    }

    pub fn first_choice(&self) -> Option<&ChatChunkChoice> {
        self.choices.first()
    }

    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.first_choice().and_then(|c| c.finish_reason)
    }

    pub fn content(&self) -> Option<&str> {
        self.first_choice().and_then(|c| c.delta.content.as_deref())
    }

    pub fn refusal(&self) -> Option<&str> {
        self.first_choice().and_then(|c| c.delta.refusal.as_deref())
    }

    pub fn tool_call_deltas(&self) -> &[ToolCallDelta] {
        self.first_choice()
            .and_then(|c| c.delta.tool_calls.as_deref())
            .unwrap_or(&[])
    }

    /// Completed tool calls carried by the first choice.
    ///
    /// Only meaningful on a merged unit; on a raw chunk this returns the
    /// fragments as they arrived.
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.tool_call_deltas().iter().map(ToolCall::from).collect()
    }

    /// True when this unit carries tool calls the caller is expected to
    /// execute before continuing the conversation.
    pub fn requests_tool_execution(&self) -> bool {
        !self.tool_call_deltas().is_empty()
            && matches!(
                self.finish_reason(),
                Some(FinishReason::ToolCalls) | Some(FinishReason::Stop)
            )
    }
}

impl ChatChunkChoice {
    pub fn new(index: u32, delta: ChatDelta) -> Self {
        Self {
            index,
            delta,
            finish_reason: None,
            logprobs: None,
        }
    }

    pub fn with_finish_reason(mut self, finish_reason: FinishReason) -> Self {
        self.finish_reason = Some(finish_reason);
        self
    }

    pub fn has_tool_call_deltas(&self) -> bool {
        self.delta
            .tool_calls
            .as_ref()
            .map_or(false, |calls| !calls.is_empty())
    }
}

impl ChatDelta {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn refusal(refusal: impl Into<String>) -> Self {
        Self {
            refusal: Some(refusal.into()),
            ..Default::default()
        }
    }

    pub fn tool_call(call: ToolCallDelta) -> Self {
        Self {
            tool_calls: Some(vec![call]),
            ..Default::default()
        }
    }

    pub fn with_role(mut self, role: ChatMessageRole) -> Self {
        self.role = Some(role);
        self
    }
}

impl ToolCallDelta {
    /// First fragment of a call: carries the id and function name.
    pub fn start(
        index: u32,
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            index,
            id: Some(id.into()),
            tool_type: Some("function".to_string()),
            function: Some(FunctionCallDelta {
                name: Some(name.into()),
                arguments: Some(arguments.into()),
            }),
        }
    }

    /// Follow-up fragment of the open call: arguments only.
    pub fn continuation(index: u32, arguments: impl Into<String>) -> Self {
        Self {
            index,
            id: None,
            tool_type: None,
            function: Some(FunctionCallDelta {
                name: None,
                arguments: Some(arguments.into()),
            }),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.function.as_ref().and_then(|f| f.name.as_deref())
    }

    pub fn arguments(&self) -> Option<&str> {
        self.function.as_ref().and_then(|f| f.arguments.as_deref())
    }
}
