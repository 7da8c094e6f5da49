//! Lifecycle hook contracts for streaming calls.

use std::time::Duration;

use wcommon::{CallId, FunctionName};

use crate::RelayError;

pub trait RelayHooks: Send + Sync {
    fn on_call_start(&self, _call: CallId, _function: &FunctionName) {}

    fn on_delta(&self, _call: CallId, _function: &FunctionName, _delta_len: usize) {}

    fn on_call_success(
        &self,
        _call: CallId,
        _function: &FunctionName,
        _deltas: usize,
        _elapsed: Duration,
    ) {
    }

    fn on_call_failure(
        &self,
        _call: CallId,
        _function: &FunctionName,
        _error: &RelayError,
        _elapsed: Duration,
    ) {
    }

    fn on_call_cancelled(
        &self,
        _call: CallId,
        _function: &FunctionName,
        _deltas: usize,
        _elapsed: Duration,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRelayHooks;

impl RelayHooks for NoopRelayHooks {}
