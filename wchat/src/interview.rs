//! Expert interview sessions over the `ai-interview` function.

use wcommon::SessionId;
use wrelay::{CallStatus, ChatMessage, ExtraBody, Role, StreamRequest, StreamingChatClient};

use crate::conversation::Conversation;
use crate::{
    ChatError, ExpertiseArea, InterviewSummary, KnowledgeDraft, KnowledgeType, SessionContext,
};

pub const INTERVIEW_FUNCTION: &str = "ai-interview";
pub const START_PROMPT: &str = "Start the interview. Ask me about my expertise.";

const INTERVIEW_TYPE: &str = "interview";
const SUMMARIZE_TYPE: &str = "summarize";

/// An interview transcript plus the context the interviewer is primed with.
///
/// Cloning yields another handle to the same session, so a turn started on one handle makes
/// every other handle report busy until it settles.
#[derive(Debug, Clone)]
pub struct InterviewSession {
    conversation: Conversation,
    context: SessionContext,
    session_id: Option<SessionId>,
}

impl InterviewSession {
    /// The client is re-pointed at the interview function.
    pub fn new(client: &StreamingChatClient, context: SessionContext) -> Self {
        Self {
            conversation: Conversation::new(client.for_function(INTERVIEW_FUNCTION)),
            context,
            session_id: None,
        }
    }

    /// Resumes a saved transcript.
    pub fn with_transcript(self, messages: Vec<ChatMessage>) -> Self {
        self.conversation.replace_messages(messages);
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<SessionId>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn client(&self) -> &StreamingChatClient {
        self.conversation.client()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.conversation.messages()
    }

    pub fn is_busy(&self) -> bool {
        self.conversation.is_busy()
    }

    /// The assistant reply accumulated so far for the in-flight turn.
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

    /// Asks the interviewer to open the session. A non-empty reply becomes the whole
    /// transcript.
    pub async fn start(&self, on_partial: impl FnMut(&str)) -> Result<String, ChatError> {
        let extra = self.interview_extra()?;
        self.conversation
            .turn(
                |_| {
                    Ok(StreamRequest::new(vec![ChatMessage::user(START_PROMPT)])
                        .with_extra_body(extra))
                },
                on_partial,
                |messages, reply| {
                    if !reply.is_empty() {
                        *messages = vec![ChatMessage::assistant(reply)];
                    }
                },
            )
            .await
    }

    /// Sends one expert answer. The trimmed input stays in the transcript even if the call
    /// fails; whatever reply arrived is appended when non-empty, even if the stream broke off.
    pub async fn send(
        &self,
        input: &str,
        on_partial: impl FnMut(&str),
    ) -> Result<String, ChatError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ChatError::invalid_request("input must not be empty"));
        }

        let extra = self.interview_extra()?;
        self.conversation
            .turn(
                |messages| {
                    messages.push(ChatMessage::user(input));
                    Ok(StreamRequest::new(messages.clone()).with_extra_body(extra))
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

    /// Asks the model to structure the transcript and parses its JSON reply. The transcript
    /// itself is left untouched.
    pub async fn summarize(&self) -> Result<InterviewSummary, ChatError> {
        let extra = self.extra(SUMMARIZE_TYPE)?;
        let reply = self
            .conversation
            .turn(
                |messages| {
                    if messages.is_empty() {
                        return Err(ChatError::invalid_request("nothing to summarize yet"));
                    }
                    Ok(StreamRequest::new(messages.clone()).with_extra_body(extra))
                },
                |_| {},
                |_, _| {},
            )
            .await?;

        InterviewSummary::from_reply(&reply)
    }

    /// Builds a knowledge item from the assistant side of the transcript, or `None` when the
    /// interviewer has not said anything yet.
    pub fn knowledge_draft(&self, title: impl Into<String>) -> Option<KnowledgeDraft> {
        let content = self.conversation.read(|messages| {
            let assistant = messages
                .iter()
                .filter(|message| message.role == Role::Assistant)
                .map(|message| message.content.as_str())
                .collect::<Vec<_>>();
            (!assistant.is_empty()).then(|| assistant.join("\n\n"))
        })?;

        let tags = [
            self.context.topic.clone(),
            self.context
                .expertise_area
                .map(|area| area.as_str().to_string()),
        ]
        .into_iter()
        .flatten()
        .filter(|tag| !tag.is_empty())
        .collect();

        Some(KnowledgeDraft {
            session_id: self.session_id.as_ref().map(|id| id.as_str().to_string()),
            title: title.into(),
            content,
            category: self
                .context
                .expertise_area
                .unwrap_or(ExpertiseArea::Other)
                .as_str()
                .to_string(),
            knowledge_type: KnowledgeType::Explicit,
            tags,
        })
    }

    /// One-line description stored with a completed session.
    pub fn session_summary(&self) -> String {
        let topic = self
            .context
            .topic
            .as_deref()
            .filter(|topic| !topic.is_empty())
            .unwrap_or("various topics");
        let area = self
            .context
            .expertise_area
            .map_or("general", ExpertiseArea::label);

        format!("Interview session covering {topic} in {area} domain.")
    }

    /// `role: content` lines, one per message.
    pub fn transcript_text(&self) -> String {
        self.conversation.read(|messages| {
            messages
                .iter()
                .map(|message| format!("{}: {}", message.role.as_str(), message.content))
                .collect::<Vec<_>>()
                .join("\n")
        })
    }

    fn interview_extra(&self) -> Result<ExtraBody, ChatError> {
        self.extra(INTERVIEW_TYPE)
    }

    fn extra(&self, kind: &str) -> Result<ExtraBody, ChatError> {
        let mut extra = ExtraBody::new();
        extra.insert(
            "sessionContext".to_string(),
            serde_json::to_value(&self.context)?,
        );
        extra.insert("type".to_string(), kind.into());
        Ok(extra)
    }
}
