//! Small convenience constructors for common types.

use crate::{ChatMessage, ExpertiseArea, StreamRequest};

pub fn user_message(content: impl Into<String>) -> ChatMessage {
    ChatMessage::user(content)
}

pub fn assistant_message(content: impl Into<String>) -> ChatMessage {
    ChatMessage::assistant(content)
}

pub fn request(messages: Vec<ChatMessage>) -> StreamRequest {
    StreamRequest::new(messages)
}

/// Accepts wire names, labels, and a few spellings people type.
pub fn parse_expertise_area(value: &str) -> Option<ExpertiseArea> {
    let normalized = value.trim().to_ascii_lowercase().replace(['-', '_'], " ");
    match normalized.as_str() {
        "human resources" | "people" | "people ops" => Some(ExpertiseArea::Hr),
        "tech" | "it" => Some(ExpertiseArea::Technology),
        "ops" => Some(ExpertiseArea::Operations),
        other => other.parse().ok(),
    }
}
