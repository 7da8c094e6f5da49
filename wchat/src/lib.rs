//! Interview and knowledge-query conversations on top of the streaming relay.
//!
//! ```rust,no_run
//! use wchat::{ExpertiseArea, InterviewSession, SessionContext};
//! use wrelay::StreamingChatClient;
//!
//! # async fn run(client: StreamingChatClient) -> Result<(), wchat::ChatError> {
//! let context = SessionContext::new()
//!     .with_topic("Kiln firing schedules")
//!     .with_expertise_area(ExpertiseArea::Manufacturing);
//! let session = InterviewSession::new(&client, context);
//!
//! session.start(|partial| println!("{partial}")).await?;
//! session.send("I have run gas kilns for twenty years.", |_| {}).await?;
//! let draft = session.knowledge_draft("Firing gas kilns");
//! # let _ = draft;
//! # Ok(())
//! # }
//! ```

mod conversation;
mod error;
mod interview;
mod knowledge;
mod types;

pub mod prelude {
    pub use crate::{
        ChatError, ChatErrorKind, ExpertiseArea, InterviewSession, InterviewSummary, KeyInsight,
        KnowledgeDraft, KnowledgeQuery, KnowledgeType, SessionContext,
    };
    pub use wcommon::SessionId;
}

pub use error::{ChatError, ChatErrorKind};
pub use interview::{INTERVIEW_FUNCTION, InterviewSession, START_PROMPT};
pub use knowledge::{KNOWLEDGE_FUNCTION, KnowledgeQuery};
pub use types::{
    ExpertiseArea, InterviewSummary, KeyInsight, KnowledgeDraft, KnowledgeType, SessionContext,
};
pub use wcommon::SessionId;
