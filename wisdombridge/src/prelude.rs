//! Common imports for most WisdomBridge applications.

#[cfg(feature = "http")]
pub use crate::{HttpRelayTransport, client_from_env, http_client};
pub use crate::{
    CallPhase, CallStatus, CancellationToken, ChatError, ChatErrorKind, ChatMessage,
    ExpertiseArea, InterviewSession, InterviewSummary, KnowledgeDraft, KnowledgeQuery,
    RelayConfig, RelayError, RelayErrorKind, RelayHooks, RelayTransport, Role, SessionContext,
    SessionId, StreamOutcome, StreamRequest, StreamingChatClient,
};
pub use crate::{
    assistant_message, interview_session, knowledge_query, observed_hooks, parse_expertise_area,
    relay_client, request, user_message,
};
pub use crate::{wb_context, wb_messages, wb_msg};
