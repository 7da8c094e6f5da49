//! Per-call status handles shared between a running call and its observers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::RelayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallPhase {
    #[default]
    Idle,
    InFlight,
    Completed,
    Failed,
    Cancelled,
}

impl CallPhase {
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

#[derive(Debug, Default)]
struct StatusState {
    phase: CallPhase,
    last_error: Option<RelayError>,
    deltas: usize,
}

/// Cloneable view of one call's progress. Each call owns its own status, so concurrent calls
/// never overwrite each other's flags.
#[derive(Debug, Clone, Default)]
pub struct CallStatus {
    state: Arc<Mutex<StatusState>>,
}

impl CallStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> CallPhase {
        self.lock().phase
    }

    pub fn is_in_flight(&self) -> bool {
        self.phase() == CallPhase::InFlight
    }

    pub fn last_error(&self) -> Option<RelayError> {
        self.lock().last_error.clone()
    }

    pub fn last_error_message(&self) -> Option<String> {
        self.lock()
            .last_error
            .as_ref()
            .map(|error| error.message.clone())
    }

    pub fn delta_count(&self) -> usize {
        self.lock().deltas
    }

    pub(crate) fn begin(&self) {
        let mut state = self.lock();
        state.phase = CallPhase::InFlight;
        state.last_error = None;
        state.deltas = 0;
    }

    pub(crate) fn record_delta(&self) -> usize {
        let mut state = self.lock();
        state.deltas += 1;
        state.deltas
    }

    pub(crate) fn complete(&self) {
        self.lock().phase = CallPhase::Completed;
    }

    pub(crate) fn fail(&self, error: RelayError) {
        let mut state = self.lock();
        state.phase = CallPhase::Failed;
        state.last_error = Some(error);
    }

    pub(crate) fn cancel(&self) {
        self.lock().phase = CallPhase::Cancelled;
    }

    fn lock(&self) -> MutexGuard<'_, StatusState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
