use crate::errors::StreamResult;
use crate::types::ToolCallDelta;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A tool call whose argument fragments have been fully reassembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,

    #[serde(rename = "type")]
    pub tool_type: String,

    pub function: FunctionCall,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

impl FunctionCall {
    /// Decodes the reassembled JSON arguments.
    pub fn parse_arguments<T: DeserializeOwned>(&self) -> StreamResult<T> {
        Ok(serde_json::from_str(&self.arguments)?)
    }
}

impl From<&ToolCallDelta> for ToolCall {
    fn from(delta: &ToolCallDelta) -> Self {
        Self {
            id: delta.id.clone().unwrap_or_default(),
            tool_type: delta
                .tool_type
                .clone()
                .unwrap_or_else(|| "function".to_string()),
            function: FunctionCall {
                name: delta.name().unwrap_or_default().to_string(),
                arguments: delta.arguments().unwrap_or_default().to_string(),
            },
        }
    }
}
