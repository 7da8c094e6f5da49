//! Streaming chat relay for WisdomBridge remote functions.
//!
//! A call POSTs `{ messages, ...extra_body }` to `<base-url>/functions/v1/<function>`, reads
//! the event-stream response incrementally and hands every `choices[0].delta.content`
//! fragment to the caller as soon as its line is complete.
//!
//! ```rust,no_run
//! use wrelay::{ChatMessage, RelayConfig, StreamRequest, StreamingChatClient};
//!
//! # async fn run() -> Result<(), wrelay::RelayError> {
//! let client = StreamingChatClient::http(RelayConfig::from_env()?, "ai-interview");
//! let request = StreamRequest::new(vec![ChatMessage::user("Hello")])
//!     .with_extra("type", "interview");
//!
//! let mut reply = String::new();
//! let outcome = client
//!     .stream_chat(request, |delta| reply.push_str(delta), || println!("done"))
//!     .await;
//!
//! if let Some(error) = outcome.error() {
//!     eprintln!("{}", error.message);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod hooks;
mod sse;
mod status;
mod stream;
mod transport;
mod types;
mod utf8;

pub mod prelude {
    pub use crate::{
        CallPhase, CallStatus, ChatCall, ChatMessage, ExtraBody, NoopRelayHooks, RelayConfig,
        RelayError, RelayErrorKind, RelayHooks, Role, StreamOutcome, StreamRequest,
        StreamingChatClient,
    };
    pub use tokio_util::sync::CancellationToken;
    pub use wcommon::{CallId, FunctionName};
}

pub use client::{ChatCall, StreamOutcome, StreamingChatClient};
pub use config::{BASE_URL_ENV, PUBLIC_KEY_ENV, RelayConfig, SecretString, TIMEOUT_SECS_ENV};
pub use error::{NO_RESPONSE_BODY, RelayError, RelayErrorKind, UNKNOWN_ERROR};
pub use hooks::{NoopRelayHooks, RelayHooks};
pub use sse::{DATA_PREFIX, DONE_SENTINEL, SseLineDecoder, parse_delta};
pub use status::{CallPhase, CallStatus};
pub use stream::{RelayDeltaStream, delta_stream};
#[cfg(feature = "http")]
pub use transport::HttpRelayTransport;
pub use transport::{
    RelayByteStream, RelayHttpRequest, RelayResponse, RelayTransport, VecByteStream,
};
pub use types::{ChatMessage, ExtraBody, Role, StreamRequest};
pub use utf8::Utf8StreamDecoder;
pub use tokio_util::sync::CancellationToken;
pub use wcommon::{BoxFuture, CallId, FunctionName};
