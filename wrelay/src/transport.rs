//! Relay transport trait, in-memory body stream, and reqwest-based HTTP implementation.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use futures_core::Stream;
use serde_json::Value;
use wcommon::BoxFuture;

use crate::{RelayError, SecretString};

pub type RelayByteStream<'a> =
    Pin<Box<dyn Stream<Item = Result<Bytes, RelayError>> + Send + 'a>>;

#[derive(Debug, Clone)]
pub struct RelayHttpRequest {
    pub url: String,
    pub bearer_token: SecretString,
    pub payload: Value,
    pub timeout: Option<Duration>,
}

/// Status plus the raw body. `body` is `None` when the response carries no readable body.
pub struct RelayResponse<'a> {
    pub status: u16,
    pub body: Option<RelayByteStream<'a>>,
}

impl RelayResponse<'_> {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl std::fmt::Debug for RelayResponse<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayResponse")
            .field("status", &self.status)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

pub trait RelayTransport: Send + Sync + std::fmt::Debug {
    fn post<'a>(
        &'a self,
        request: RelayHttpRequest,
    ) -> BoxFuture<'a, Result<RelayResponse<'a>, RelayError>>;
}

/// Replays a fixed list of body chunks.
#[derive(Debug)]
pub struct VecByteStream {
    chunks: VecDeque<Result<Bytes, RelayError>>,
}

impl VecByteStream {
    pub fn new(chunks: Vec<Result<Bytes, RelayError>>) -> Self {
        Self {
            chunks: chunks.into(),
        }
    }

    pub fn from_chunks<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Bytes>,
    {
        Self::new(chunks.into_iter().map(|chunk| Ok(chunk.into())).collect())
    }
}

impl Stream for VecByteStream {
    type Item = Result<Bytes, RelayError>;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.chunks.pop_front())
    }
}

#[cfg(feature = "http")]
pub use http::HttpRelayTransport;

#[cfg(feature = "http")]
mod http {
    use futures_util::StreamExt;
    use reqwest::header::CONTENT_TYPE;
    use reqwest::{Client, StatusCode};
    use wcommon::BoxFuture;

    use super::{RelayByteStream, RelayHttpRequest, RelayResponse, RelayTransport};
    use crate::RelayError;

    #[derive(Debug, Clone, Default)]
    pub struct HttpRelayTransport {
        client: Client,
    }

    impl HttpRelayTransport {
        pub fn new(client: Client) -> Self {
            Self { client }
        }

        fn map_error(err: reqwest::Error) -> RelayError {
            if err.is_timeout() {
                RelayError::timeout(err.to_string())
            } else {
                RelayError::transport(err.to_string())
            }
        }

        /// Statuses whose responses never carry a body.
        fn is_null_body_status(status: StatusCode) -> bool {
            matches!(status.as_u16(), 101 | 103 | 204 | 205 | 304)
        }
    }

    impl RelayTransport for HttpRelayTransport {
        fn post<'a>(
            &'a self,
            request: RelayHttpRequest,
        ) -> BoxFuture<'a, Result<RelayResponse<'a>, RelayError>> {
            Box::pin(async move {
                let mut builder = self
                    .client
                    .post(&request.url)
                    .bearer_auth(request.bearer_token.expose())
                    .header(CONTENT_TYPE, "application/json")
                    .json(&request.payload);

                if let Some(timeout) = request.timeout {
                    builder = builder.timeout(timeout);
                }

                let response = builder.send().await.map_err(Self::map_error)?;
                let status = response.status();

                let body = if Self::is_null_body_status(status) {
                    None
                } else {
                    let chunks = response.bytes_stream().map(|chunk| chunk.map_err(Self::map_error));
                    Some(Box::pin(chunks) as RelayByteStream<'a>)
                };

                Ok(RelayResponse {
                    status: status.as_u16(),
                    body,
                })
            })
        }
    }
}
