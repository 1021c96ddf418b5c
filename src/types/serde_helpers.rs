use serde::{Deserialize, Deserializer, Serializer};

/// Optional string where an empty string on the wire means "absent".
///
/// Some OpenAI-compatible servers repeat `"id": ""` on tool call
/// continuations instead of omitting the field.
pub mod option_string {
    use super::*;

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(s) => serializer.serialize_some(s),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<String> = Option::deserialize(deserializer)?;
        Ok(opt.filter(|s| !s.is_empty()))
    }
}
