//! Unified facade over the WisdomBridge workspace crates.
//!
//! This crate is meant to be the single dependency for most applications. It re-exports the
//! relay, conversation, and observability crates and adds setup helpers and macros.
//!
//! ```rust,no_run
//! use wisdombridge::prelude::*;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = client_from_env()?;
//! let session = interview_session(&client, wb_context!("Timber framing"));
//!
//! let opening = session.start(|partial| print!("\r{partial}")).await?;
//! println!("\n{opening}");
//! # Ok(())
//! # }
//! ```

mod macros;

pub mod prelude;
pub mod runtime;
pub mod util;

pub use wchat;
pub use wcommon;
pub use wobserve;
pub use wrelay;

pub use wchat::{
    ChatError, ChatErrorKind, ExpertiseArea, INTERVIEW_FUNCTION, InterviewSession,
    InterviewSummary, KNOWLEDGE_FUNCTION, KeyInsight, KnowledgeDraft, KnowledgeQuery,
    KnowledgeType, START_PROMPT, SessionContext,
};
pub use wcommon::{BoxFuture, CallId, FunctionName, SessionId};
pub use wobserve::{FanoutRelayHooks, MetricsRelayHooks, SafeRelayHooks, TracingRelayHooks};
#[cfg(feature = "http")]
pub use wrelay::HttpRelayTransport;
pub use wrelay::{
    CallPhase, CallStatus, CancellationToken, ChatCall, ChatMessage, ExtraBody, NoopRelayHooks,
    RelayByteStream, RelayConfig, RelayDeltaStream, RelayError, RelayErrorKind, RelayHooks,
    RelayHttpRequest, RelayResponse, RelayTransport, Role, SecretString, StreamOutcome,
    StreamRequest, StreamingChatClient, VecByteStream,
};

#[cfg(feature = "http")]
pub use runtime::{client_from_env, http_client};
pub use runtime::{interview_session, knowledge_query, observed_hooks, relay_client};
pub use util::{assistant_message, parse_expertise_area, request, user_message};
