//! Tracing-based observability hooks for relay calls.
//!
//! ```rust
//! use wobserve::TracingRelayHooks;
//! use wrelay::RelayHooks;
//!
//! fn accepts_relay_hooks(_hooks: &dyn RelayHooks) {}
//!
//! let hooks = TracingRelayHooks;
//! accepts_relay_hooks(&hooks);
//! ```

use std::time::Duration;

use wcommon::{CallId, FunctionName};
use wrelay::{RelayError, RelayHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRelayHooks;

impl RelayHooks for TracingRelayHooks {
    fn on_call_start(&self, call: CallId, function: &FunctionName) {
        tracing::info!(
            phase = "relay",
            event = "call_start",
            call_id = %call,
            function = %function
        );
    }

    fn on_delta(&self, call: CallId, function: &FunctionName, delta_len: usize) {
        tracing::trace!(
            phase = "relay",
            event = "delta",
            call_id = %call,
            function = %function,
            delta_len
        );
    }

    fn on_call_success(
        &self,
        call: CallId,
        function: &FunctionName,
        deltas: usize,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "relay",
            event = "call_success",
            call_id = %call,
            function = %function,
            deltas,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_call_failure(
        &self,
        call: CallId,
        function: &FunctionName,
        error: &RelayError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "relay",
            event = "call_failure",
            call_id = %call,
            function = %function,
            elapsed_ms = elapsed.as_millis() as u64,
            status = error.status,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }

    fn on_call_cancelled(
        &self,
        call: CallId,
        function: &FunctionName,
        deltas: usize,
        elapsed: Duration,
    ) {
        tracing::warn!(
            phase = "relay",
            event = "call_cancelled",
            call_id = %call,
            function = %function,
            deltas,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }
}
