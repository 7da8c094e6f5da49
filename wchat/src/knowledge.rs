//! Question answering over captured knowledge via the `ask-knowledge` function.

use wrelay::{CallStatus, ChatMessage, StreamRequest, StreamingChatClient};

use crate::ChatError;
use crate::conversation::Conversation;

pub const KNOWLEDGE_FUNCTION: &str = "ask-knowledge";

/// A running Q&A thread. The question and prior history travel in the extra body; the
/// `messages` array is always empty.
#[derive(Debug, Clone)]
pub struct KnowledgeQuery {
    conversation: Conversation,
}

impl KnowledgeQuery {
    pub fn new(client: &StreamingChatClient) -> Self {
        Self {
            conversation: Conversation::new(client.for_function(KNOWLEDGE_FUNCTION)),
        }
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.conversation.messages()
    }

    pub fn is_busy(&self) -> bool {
        self.conversation.is_busy()
    }

    pub fn partial_reply(&self) -> String {
        self.conversation.partial_reply()
    }

    pub fn last_error(&self) -> Option<ChatError> {
        self.conversation.last_error()
    }

    pub fn last_status(&self) -> Option<CallStatus> {
        self.conversation.last_status()
    }

    pub fn cancel(&self) -> bool {
        self.conversation.cancel()
    }

    /// Drops the history. Rejected while a question is in flight.
    pub fn clear(&self) -> Result<(), ChatError> {
        if self.conversation.is_busy() {
            return Err(ChatError::busy());
        }

        self.conversation.replace_messages(Vec::new());
        Ok(())
    }

    pub async fn ask(
        &self,
        question: &str,
        on_partial: impl FnMut(&str),
    ) -> Result<String, ChatError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChatError::invalid_request("question must not be empty"));
        }

        self.conversation
            .turn(
                |messages| {
                    let history = serde_json::to_value(&*messages)?;
                    messages.push(ChatMessage::user(question));

                    Ok(StreamRequest::new(Vec::new())
                        .with_extra("question", question)
                        .with_extra("conversationHistory", history))
                },
                on_partial,
                |messages, reply| {
                    if !reply.is_empty() {
                        messages.push(ChatMessage::assistant(reply));
                    }
                },
            )
            .await
    }
}
