//! Wiring helpers for relay clients and conversations.

use std::sync::Arc;

use wobserve::{FanoutRelayHooks, MetricsRelayHooks, SafeRelayHooks, TracingRelayHooks};

use crate::{
    INTERVIEW_FUNCTION, InterviewSession, KnowledgeQuery, RelayConfig, RelayHooks, RelayTransport,
    SessionContext, StreamingChatClient,
};

/// Tracing and metrics hooks, each isolated from panics.
pub fn observed_hooks() -> Arc<dyn RelayHooks> {
    Arc::new(
        FanoutRelayHooks::new()
            .with(Arc::new(SafeRelayHooks::new(TracingRelayHooks)))
            .with(Arc::new(SafeRelayHooks::new(MetricsRelayHooks))),
    )
}

/// A client over any transport with [`observed_hooks`] installed.
pub fn relay_client(config: RelayConfig, transport: Arc<dyn RelayTransport>) -> StreamingChatClient {
    StreamingChatClient::new(config, INTERVIEW_FUNCTION, transport).with_hooks(observed_hooks())
}

#[cfg(feature = "http")]
pub fn http_client(config: RelayConfig) -> StreamingChatClient {
    relay_client(config, Arc::new(crate::HttpRelayTransport::default()))
}

/// Reads the relay settings from the environment and builds an HTTP client.
#[cfg(feature = "http")]
pub fn client_from_env() -> Result<StreamingChatClient, crate::RelayError> {
    Ok(http_client(RelayConfig::from_env()?))
}

pub fn interview_session(client: &StreamingChatClient, context: SessionContext) -> InterviewSession {
    InterviewSession::new(client, context)
}

pub fn knowledge_query(client: &StreamingChatClient) -> KnowledgeQuery {
    KnowledgeQuery::new(client)
}
