//! Metrics-based observability hooks for relay calls.
//!
//! ```rust
//! use wobserve::MetricsRelayHooks;
//! use wrelay::RelayHooks;
//!
//! fn accepts_relay_hooks(_hooks: &dyn RelayHooks) {}
//!
//! let hooks = MetricsRelayHooks;
//! accepts_relay_hooks(&hooks);
//! ```

use std::time::Duration;

use wcommon::{CallId, FunctionName};
use wrelay::{RelayError, RelayHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsRelayHooks;

impl RelayHooks for MetricsRelayHooks {
    fn on_call_start(&self, _call: CallId, function: &FunctionName) {
        metrics::counter!(
            "wisdombridge_relay_call_start_total",
            "function" => function.to_string()
        )
        .increment(1);
    }

    fn on_delta(&self, _call: CallId, function: &FunctionName, delta_len: usize) {
        metrics::counter!(
            "wisdombridge_relay_delta_bytes_total",
            "function" => function.to_string()
        )
        .increment(delta_len as u64);
    }

    fn on_call_success(
        &self,
        _call: CallId,
        function: &FunctionName,
        deltas: usize,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "wisdombridge_relay_call_success_total",
            "function" => function.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "wisdombridge_relay_call_duration_seconds",
            "function" => function.to_string(),
            "outcome" => "success"
        )
        .record(elapsed.as_secs_f64());
        metrics::histogram!(
            "wisdombridge_relay_deltas_per_call",
            "function" => function.to_string()
        )
        .record(deltas as f64);
    }

    fn on_call_failure(
        &self,
        _call: CallId,
        function: &FunctionName,
        error: &RelayError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "wisdombridge_relay_call_failure_total",
            "function" => function.to_string(),
            "error_kind" => format!("{:?}", error.kind),
            "retryable" => error.retryable.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "wisdombridge_relay_call_duration_seconds",
            "function" => function.to_string(),
            "outcome" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_call_cancelled(
        &self,
        _call: CallId,
        function: &FunctionName,
        _deltas: usize,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "wisdombridge_relay_call_cancelled_total",
            "function" => function.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "wisdombridge_relay_call_duration_seconds",
            "function" => function.to_string(),
            "outcome" => "cancelled"
        )
        .record(elapsed.as_secs_f64());
    }
}
