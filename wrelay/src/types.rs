//! Chat messages and the outgoing stream request payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::RelayError;

/// Extra top-level keys merged next to `messages` in the request payload.
pub type ExtraBody = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StreamRequest {
    pub messages: Vec<ChatMessage>,
    pub extra_body: ExtraBody,
}

impl StreamRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            extra_body: ExtraBody::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_body.insert(key.into(), value.into());
        self
    }

    pub fn with_extra_body(mut self, extra_body: ExtraBody) -> Self {
        self.extra_body.extend(extra_body);
        self
    }

    /// Builds `{ "messages": [...], ...extra_body }`. Extra keys are written last, so an
    /// extra `messages` key replaces the message array.
    pub fn to_payload(&self) -> Result<Value, RelayError> {
        let mut payload = Map::new();
        payload.insert("messages".to_string(), serde_json::to_value(&self.messages)?);

        for (key, value) in &self.extra_body {
            payload.insert(key.clone(), value.clone());
        }

        Ok(Value::Object(payload))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        let message = ChatMessage::assistant("hi");
        let value = serde_json::to_value(&message).expect("message serializes");

        assert_eq!(value, json!({ "role": "assistant", "content": "hi" }));
        assert_eq!(Role::User.as_str(), "user");
    }

    #[test]
    fn payload_merges_extra_body_as_sibling_keys() {
        let request = StreamRequest::new(vec![ChatMessage::user("hello")])
            .with_extra("type", "interview")
            .with_extra("sessionContext", json!({ "topic": "welding" }));

        let payload = request.to_payload().expect("payload builds");

        assert_eq!(
            payload,
            json!({
                "messages": [{ "role": "user", "content": "hello" }],
                "type": "interview",
                "sessionContext": { "topic": "welding" }
            })
        );
    }

    #[test]
    fn payload_keeps_empty_message_array() {
        let request = StreamRequest::default().with_extra("question", "why?");
        let payload = request.to_payload().expect("payload builds");

        assert_eq!(payload["messages"], json!([]));
        assert_eq!(payload["question"], json!("why?"));
    }

    #[test]
    fn extra_messages_key_overrides_message_array() {
        let request = StreamRequest::new(vec![ChatMessage::user("dropped")])
            .with_extra("messages", json!("replaced"));

        let payload = request.to_payload().expect("payload builds");
        assert_eq!(payload["messages"], json!("replaced"));
    }
}
