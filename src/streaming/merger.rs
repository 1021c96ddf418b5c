//! Fold step for streamed chunks.
//!
//! `ChunkMerger::merge` combines an accumulated chunk with the next one from
//! the same window. Scalars are last-write-wins, tool call argument fragments
//! are concatenated in arrival order, and only one tool call is ever open.

use crate::errors::{ProtocolError, StreamResult};
use crate::types::{
    ChatChunkChoice, ChatCompletionChunk, ChatDelta, ChatMessageRole, FinishReason,
    FunctionCallDelta, ToolCallDelta,
};

pub struct ChunkMerger;

impl ChunkMerger {
    /// Merges `current` into the accumulated `previous` chunk.
    ///
    /// With no `previous` the result is `current`, untouched.
    pub fn merge(
        previous: Option<ChatCompletionChunk>,
        current: ChatCompletionChunk,
    ) -> StreamResult<ChatCompletionChunk> {
        let previous = match previous {
            Some(previous) => previous,
            None => return Ok(current),
        };

        let mut previous_choices = previous.choices.into_iter();
        let choices = current
            .choices
            .into_iter()
            .map(|choice| Self::merge_choice(previous_choices.next(), choice))
            .collect::<StreamResult<Vec<_>>>()?;

        Ok(ChatCompletionChunk {
            id: non_empty_or(current.id, previous.id),
            object: non_empty_or(current.object, previous.object),
            created: current.created,
            model: non_empty_or(current.model, previous.model),
            choices,
            system_fingerprint: current.system_fingerprint.or(previous.system_fingerprint),
            service_tier: current.service_tier.or(previous.service_tier),
            usage: current.usage.or(previous.usage),
        })
    }

    /// Left fold of `chunks` through [`ChunkMerger::merge`].
    pub fn fold<I>(chunks: I) -> StreamResult<Option<ChatCompletionChunk>>
    where
        I: IntoIterator<Item = ChatCompletionChunk>,
    {
        chunks
            .into_iter()
            .try_fold(None, |acc, chunk| Self::merge(acc, chunk).map(Some))
    }

    /// True if any choice carries at least one tool call fragment.
    pub fn is_tool_call_start(chunk: &ChatCompletionChunk) -> bool {
        chunk.choices.iter().any(ChatChunkChoice::has_tool_call_deltas)
    }

    /// True if any choice finished because the model wants tools called.
    pub fn is_tool_call_end(chunk: &ChatCompletionChunk) -> bool {
        chunk
            .choices
            .iter()
            .any(|c| c.finish_reason == Some(FinishReason::ToolCalls))
    }

    fn merge_choice(
        previous: Option<ChatChunkChoice>,
        current: ChatChunkChoice,
    ) -> StreamResult<ChatChunkChoice> {
        let previous = match previous {
            Some(previous) => previous,
            None => return Self::start_choice(current),
        };

        Ok(ChatChunkChoice {
            index: current.index,
            delta: Self::merge_delta(previous.delta, current.delta)?,
            finish_reason: current.finish_reason,
            logprobs: current.logprobs.or(previous.logprobs),
        })
    }

    /// A choice with nothing accumulated at its position. Its fragment must
    /// still open a call, so an id-less continuation is rejected here too.
    fn start_choice(mut current: ChatChunkChoice) -> StreamResult<ChatChunkChoice> {
        if let Some(calls) = current.delta.tool_calls.take() {
            let calls = Self::merge_tool_calls(Vec::new(), calls)?;
            current.delta.tool_calls = if calls.is_empty() { None } else { Some(calls) };
        }
        Ok(current)
    }

    fn merge_delta(previous: ChatDelta, current: ChatDelta) -> StreamResult<ChatDelta> {
        // Content is replaced, not appended. Plain text reaches the caller
        // chunk by chunk through single-chunk windows.
        let content = current.content.or(previous.content).unwrap_or_default();
        let role = current
            .role
            .or(previous.role)
            .unwrap_or(ChatMessageRole::Assistant);
        let refusal = current.refusal.or(previous.refusal).unwrap_or_default();

        let tool_calls = Self::merge_tool_calls(
            previous.tool_calls.unwrap_or_default(),
            current.tool_calls.unwrap_or_default(),
        )?;

        Ok(ChatDelta {
            role: Some(role),
            content: Some(content),
            refusal: Some(refusal),
            tool_calls: if tool_calls.is_empty() {
                None
            } else {
                Some(tool_calls)
            },
        })
    }

    fn merge_tool_calls(
        previous: Vec<ToolCallDelta>,
        current: Vec<ToolCallDelta>,
    ) -> StreamResult<Vec<ToolCallDelta>> {
        if current.len() > 1 {
            return Err(ProtocolError::MultipleToolCallsInOneDelta {
                count: current.len(),
            }
            .into());
        }

        let mut merged = previous;
        let mut open = OpenToolCall::take_last(&mut merged);

        if let Some(fragment) = current.into_iter().next() {
            let (closed, next) = open.advance(fragment)?;
            merged.extend(closed);
            open = next;
        }

        merged.extend(open.into_call());
        Ok(merged)
    }
}

/// The tool call currently receiving argument fragments, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OpenToolCall {
    #[default]
    NoOpenCall,
    OpenCall(ToolCallDelta),
}

impl OpenToolCall {
    /// Removes the last call from `calls` and treats it as the open one.
    /// Anything before it is already closed.
    pub fn take_last(calls: &mut Vec<ToolCallDelta>) -> Self {
        match calls.pop() {
            Some(call) => OpenToolCall::OpenCall(call),
            None => OpenToolCall::NoOpenCall,
        }
    }

    /// Applies one incoming fragment, returning the call it closed (if any)
    /// and the new open call.
    ///
    /// A fragment with an `id` starts a new call; one without continues the
    /// open call.
    pub fn advance(self, fragment: ToolCallDelta) -> StreamResult<(Option<ToolCallDelta>, Self)> {
        if fragment.id.is_some() {
            return Ok((self.into_call(), OpenToolCall::OpenCall(fragment)));
        }

        match self {
            OpenToolCall::OpenCall(open) => Ok((
                None,
                OpenToolCall::OpenCall(merge_tool_call(open, fragment)),
            )),
            OpenToolCall::NoOpenCall => Err(ProtocolError::ContinuationWithoutOpenCall {
                index: fragment.index,
            }
            .into()),
        }
    }

    pub fn into_call(self) -> Option<ToolCallDelta> {
        match self {
            OpenToolCall::OpenCall(call) => Some(call),
            OpenToolCall::NoOpenCall => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, OpenToolCall::OpenCall(_))
    }
}

fn merge_tool_call(previous: ToolCallDelta, current: ToolCallDelta) -> ToolCallDelta {
    ToolCallDelta {
        index: current.index,
        id: current.id.or(previous.id),
        tool_type: current
            .tool_type
            .or(previous.tool_type)
            .or_else(|| Some("function".to_string())),
        function: merge_function(previous.function, current.function),
    }
}

fn merge_function(
    previous: Option<FunctionCallDelta>,
    current: Option<FunctionCallDelta>,
) -> Option<FunctionCallDelta> {
    let (previous, current) = match (previous, current) {
        (Some(previous), Some(current)) => (previous, current),
        (previous, current) => return current.or(previous),
    };

    let arguments = match (previous.arguments, current.arguments) {
        (Some(mut buffer), Some(fragment)) => {
            buffer.push_str(&fragment);
            Some(buffer)
        }
        (buffer, fragment) => buffer.or(fragment),
    };

    Some(FunctionCallDelta {
        name: current.name.or(previous.name),
        arguments,
    })
}

fn non_empty_or(current: String, previous: String) -> String {
    if current.is_empty() {
        previous
    } else {
        current
    }
}
