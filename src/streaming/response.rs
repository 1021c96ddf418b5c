use futures::{Stream, StreamExt};

use crate::errors::StreamResult;
use crate::types::{ChatCompletionChunk, ChatMessageRole, FinishReason, ToolCall, Usage};

/// Everything one assembled stream produced, folded together.
///
/// Text is concatenated across emitted units here because the merge step
/// itself only keeps the latest `content` of a window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledResponse {
    pub id: String,
    pub model: String,
    pub created: i64,
    pub role: ChatMessageRole,
    pub content: String,
    pub refusal: String,
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: Option<FinishReason>,
    pub usage: Option<Usage>,
    pub system_fingerprint: Option<String>,
    pub units: usize,
}

impl AssembledResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one emitted unit into the response.
    pub fn push(&mut self, unit: &ChatCompletionChunk) {
        if !unit.id.is_empty() {
            self.id.clone_from(&unit.id);
        }
        if !unit.model.is_empty() {
            self.model.clone_from(&unit.model);
        }
        self.created = unit.created;

        if let Some(choice) = unit.first_choice() {
            if let Some(role) = choice.delta.role {
                self.role = role;
            }
            if let Some(content) = &choice.delta.content {
                self.content.push_str(content);
            }
            if let Some(refusal) = &choice.delta.refusal {
                self.refusal.push_str(refusal);
            }
            if let Some(finish_reason) = choice.finish_reason {
                self.finish_reason = Some(finish_reason);
            }
        }

        self.tool_calls.extend(unit.tool_calls());

        if let Some(usage) = &unit.usage {
            self.usage = Some(usage.clone());
        }
        if let Some(fingerprint) = &unit.system_fingerprint {
            self.system_fingerprint = Some(fingerprint.clone());
        }
        self.units += 1;
    }

    /// Drains a stream of emitted units. The first error is returned as-is.
    pub async fn collect<S>(units: S) -> StreamResult<Self>
    where
        S: Stream<Item = StreamResult<ChatCompletionChunk>>,
    {
        futures::pin_mut!(units);

        let mut response = Self::new();
        while let Some(unit) = units.next().await {
            response.push(&unit?);
        }
        Ok(response)
    }

    pub fn content(&self) -> Option<&str> {
        if self.content.is_empty() {
            None
        } else {
            Some(&self.content)
        }
    }

    pub fn requests_tool_execution(&self) -> bool {
        !self.tool_calls.is_empty()
            && matches!(
                self.finish_reason,
                Some(FinishReason::ToolCalls) | Some(FinishReason::Stop)
            )
    }
}
