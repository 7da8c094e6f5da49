//! Shared turn driver: one in-flight turn per conversation, transcript kept behind a lock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use wrelay::{
    CallStatus, CancellationToken, ChatMessage, StreamOutcome, StreamRequest, StreamingChatClient,
};

use crate::ChatError;

#[derive(Debug, Default)]
struct ConversationState {
    messages: Vec<ChatMessage>,
    partial: String,
    last_error: Option<ChatError>,
    in_flight: Option<CancellationToken>,
    last_status: Option<CallStatus>,
}

#[derive(Debug, Clone)]
pub(crate) struct Conversation {
    client: StreamingChatClient,
    state: Arc<Mutex<ConversationState>>,
}

impl Conversation {
    pub(crate) fn new(client: StreamingChatClient) -> Self {
        Self {
            client,
            state: Arc::default(),
        }
    }

    pub(crate) fn client(&self) -> &StreamingChatClient {
        &self.client
    }

    pub(crate) fn messages(&self) -> Vec<ChatMessage> {
        self.lock().messages.clone()
    }

    pub(crate) fn replace_messages(&self, messages: Vec<ChatMessage>) {
        self.lock().messages = messages;
    }

    pub(crate) fn read<T>(&self, read: impl FnOnce(&[ChatMessage]) -> T) -> T {
        read(&self.lock().messages)
    }

    pub(crate) fn partial_reply(&self) -> String {
        self.lock().partial.clone()
    }

    pub(crate) fn last_error(&self) -> Option<ChatError> {
        self.lock().last_error.clone()
    }

    pub(crate) fn last_status(&self) -> Option<CallStatus> {
        self.lock().last_status.clone()
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.lock().in_flight.is_some()
    }

    /// Cancels the in-flight turn, if any. Returns whether there was one.
    pub(crate) fn cancel(&self) -> bool {
        match &self.lock().in_flight {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Runs one turn. `build` sees the transcript before the call and `finish` sees it with the
    /// reply after the call settles; both run under the conversation lock. A turn that fails or is
    /// cancelled still hands `finish` whatever reply arrived before it ended, if any.
    pub(crate) async fn turn<B, P, F>(
        &self,
        build: B,
        mut on_partial: P,
        finish: F,
    ) -> Result<String, ChatError>
    where
        B: FnOnce(&mut Vec<ChatMessage>) -> Result<StreamRequest, ChatError>,
        P: FnMut(&str),
        F: FnOnce(&mut Vec<ChatMessage>, &str),
    {
        let call = {
            let mut state = self.lock();
            if state.in_flight.is_some() {
                return Err(ChatError::busy());
            }

            let request = build(&mut state.messages)?;
            let call = self.client.prepare(request);
            state.in_flight = Some(call.cancellation_token());
            state.last_status = Some(call.status());
            state.partial.clear();
            state.last_error = None;
            call
        };
        let _in_flight = InFlight { state: &self.state };

        let mut reply = String::new();
        let outcome = call
            .run(
                |delta| {
                    reply.push_str(delta);
                    self.lock().partial.clone_from(&reply);
                    on_partial(&reply);
                },
                || {},
            )
            .await;

        let mut state = self.lock();
        let error = match outcome {
            StreamOutcome::Completed { .. } => {
                finish(&mut state.messages, &reply);
                return Ok(reply);
            }
            StreamOutcome::Failed(error) => ChatError::from(error),
            StreamOutcome::Cancelled { .. } => ChatError::cancelled(),
        };

        if !reply.is_empty() {
            finish(&mut state.messages, &reply);
        }
        state.last_error = Some(error.clone());
        Err(error)
    }

    fn lock(&self) -> MutexGuard<'_, ConversationState> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<ConversationState>) -> MutexGuard<'_, ConversationState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the in-flight marker and partial reply when the turn ends or its future is dropped.
struct InFlight<'a> {
    state: &'a Mutex<ConversationState>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = lock_state(self.state);
        state.in_flight = None;
        state.partial.clear();
    }
}
