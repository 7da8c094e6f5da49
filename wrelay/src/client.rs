//! Streaming chat client: sends one relay request and drives its deltas into callbacks.

use std::sync::Arc;
use std::time::Instant;

use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use wcommon::{CallId, FunctionName};

use crate::{
    CallStatus, NoopRelayHooks, RelayByteStream, RelayConfig, RelayDeltaStream, RelayError,
    RelayHooks, RelayHttpRequest, RelayTransport, StreamRequest, delta_stream,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamOutcome {
    Completed { deltas: usize },
    Failed(RelayError),
    Cancelled { deltas: usize },
}

impl StreamOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    pub fn error(&self) -> Option<&RelayError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct StreamingChatClient {
    config: Arc<RelayConfig>,
    function: FunctionName,
    transport: Arc<dyn RelayTransport>,
    hooks: Arc<dyn RelayHooks>,
}

impl std::fmt::Debug for StreamingChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingChatClient")
            .field("config", &self.config)
            .field("function", &self.function)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl StreamingChatClient {
    pub fn new(
        config: RelayConfig,
        function: impl Into<FunctionName>,
        transport: Arc<dyn RelayTransport>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            function: function.into(),
            transport,
            hooks: Arc::new(NoopRelayHooks),
        }
    }

    #[cfg(feature = "http")]
    pub fn http(config: RelayConfig, function: impl Into<FunctionName>) -> Self {
        Self::new(
            config,
            function,
            Arc::new(crate::HttpRelayTransport::default()),
        )
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn RelayHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Same config, transport and hooks, pointed at another remote function.
    pub fn for_function(&self, function: impl Into<FunctionName>) -> Self {
        Self {
            function: function.into(),
            ..self.clone()
        }
    }

    pub fn function(&self) -> &FunctionName {
        &self.function
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn prepare(&self, request: StreamRequest) -> ChatCall<'_> {
        ChatCall {
            client: self,
            request,
            id: CallId::next(),
            status: CallStatus::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Streams one request. `on_delta` sees every fragment in wire order and `on_done` runs
    /// exactly once after the call settles, whatever the outcome.
    pub async fn stream_chat<D, F>(
        &self,
        request: StreamRequest,
        on_delta: D,
        on_done: F,
    ) -> StreamOutcome
    where
        D: FnMut(&str),
        F: FnOnce(),
    {
        self.prepare(request).run(on_delta, on_done).await
    }

    /// Sends the request and returns the raw delta stream, without status tracking or hooks.
    pub async fn open(&self, request: StreamRequest) -> Result<RelayDeltaStream<'_>, RelayError> {
        let payload = request.to_payload()?;
        let response = self
            .transport
            .post(RelayHttpRequest {
                url: self.config.function_url(&self.function),
                bearer_token: self.config.public_key().clone(),
                payload,
                timeout: self.config.timeout(),
            })
            .await?;

        if !response.is_success() {
            let body = match response.body {
                Some(body) => read_error_body(body).await,
                None => Vec::new(),
            };
            return Err(RelayError::from_response(response.status, &body));
        }

        let body = response.body.ok_or_else(RelayError::missing_body)?;
        Ok(delta_stream(body))
    }

    async fn drive(
        &self,
        request: StreamRequest,
        cancel: &CancellationToken,
        mut on_delta: impl FnMut(&str),
    ) -> Result<DriveEnd, RelayError> {
        let mut deltas = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(DriveEnd::Cancelled),
            opened = self.open(request) => opened?,
        };

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(DriveEnd::Cancelled),
                next = deltas.next() => next,
            };

            match next {
                Some(delta) => on_delta(&delta?),
                None => return Ok(DriveEnd::Completed),
            }
        }
    }
}

/// One prepared call. Its status handle and cancellation token can be handed out before
/// [`ChatCall::run`] starts.
pub struct ChatCall<'a> {
    client: &'a StreamingChatClient,
    request: StreamRequest,
    id: CallId,
    status: CallStatus,
    cancel: CancellationToken,
}

impl<'a> ChatCall<'a> {
    pub fn id(&self) -> CallId {
        self.id
    }

    pub fn status(&self) -> CallStatus {
        self.status.clone()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_status(mut self, status: CallStatus) -> Self {
        self.status = status;
        self
    }

    /// Runs the call to completion. Dropping the returned future before it finishes settles
    /// the call as cancelled and still fires `on_done`.
    pub async fn run<D, F>(self, mut on_delta: D, on_done: F) -> StreamOutcome
    where
        D: FnMut(&str),
        F: FnOnce(),
    {
        let ChatCall {
            client,
            request,
            id,
            status,
            cancel,
        } = self;

        let guard = SettleGuard {
            on_done: Some(on_done),
            status: status.clone(),
            hooks: Arc::clone(&client.hooks),
            function: client.function.clone(),
            id,
            started: Instant::now(),
        };

        status.begin();
        client.hooks.on_call_start(id, &client.function);

        let result = client
            .drive(request, &cancel, |delta: &str| {
                status.record_delta();
                client.hooks.on_delta(id, &client.function, delta.len());
                on_delta(delta);
            })
            .await;

        guard.settle(result)
    }
}

enum DriveEnd {
    Completed,
    Cancelled,
}

struct SettleGuard<F: FnOnce()> {
    on_done: Option<F>,
    status: CallStatus,
    hooks: Arc<dyn RelayHooks>,
    function: FunctionName,
    id: CallId,
    started: Instant,
}

impl<F: FnOnce()> SettleGuard<F> {
    fn settle(mut self, result: Result<DriveEnd, RelayError>) -> StreamOutcome {
        let elapsed = self.started.elapsed();
        let deltas = self.status.delta_count();

        let outcome = match result {
            Ok(DriveEnd::Completed) => {
                self.status.complete();
                self.hooks
                    .on_call_success(self.id, &self.function, deltas, elapsed);
                StreamOutcome::Completed { deltas }
            }
            Ok(DriveEnd::Cancelled) => {
                self.status.cancel();
                self.hooks
                    .on_call_cancelled(self.id, &self.function, deltas, elapsed);
                StreamOutcome::Cancelled { deltas }
            }
            Err(error) => {
                let error = error.with_fallback_message();
                self.status.fail(error.clone());
                self.hooks
                    .on_call_failure(self.id, &self.function, &error, elapsed);
                StreamOutcome::Failed(error)
            }
        };

        self.fire_done();
        outcome
    }

    fn fire_done(&mut self) {
        if let Some(on_done) = self.on_done.take() {
            on_done();
        }
    }
}

impl<F: FnOnce()> Drop for SettleGuard<F> {
    fn drop(&mut self) {
        if self.on_done.is_none() {
            return;
        }

        self.status.cancel();
        self.hooks.on_call_cancelled(
            self.id,
            &self.function,
            self.status.delta_count(),
            self.started.elapsed(),
        );
        self.fire_done();
    }
}

async fn read_error_body(mut body: RelayByteStream<'_>) -> Vec<u8> {
    let mut bytes = Vec::new();
    while let Some(chunk) = body.next().await {
        match chunk {
            Ok(chunk) => bytes.extend_from_slice(&chunk),
            Err(_) => return Vec::new(),
        }
    }

    bytes
}
