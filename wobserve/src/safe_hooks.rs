use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use wcommon::{CallId, FunctionName};
use wrelay::{RelayError, RelayHooks};

/// Runs every callback of `H` under `catch_unwind`, so a panicking hook never aborts a call.
pub struct SafeRelayHooks<H> {
    inner: H,
}

impl<H> SafeRelayHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> RelayHooks for SafeRelayHooks<H>
where
    H: RelayHooks,
{
    fn on_call_start(&self, call: CallId, function: &FunctionName) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_call_start(call, function)));
    }

    fn on_delta(&self, call: CallId, function: &FunctionName, delta_len: usize) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_delta(call, function, delta_len)
        }));
    }

    fn on_call_success(
        &self,
        call: CallId,
        function: &FunctionName,
        deltas: usize,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_call_success(call, function, deltas, elapsed)
        }));
    }

    fn on_call_failure(
        &self,
        call: CallId,
        function: &FunctionName,
        error: &RelayError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_call_failure(call, function, error, elapsed)
        }));
    }

    fn on_call_cancelled(
        &self,
        call: CallId,
        function: &FunctionName,
        deltas: usize,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_call_cancelled(call, function, deltas, elapsed)
        }));
    }
}
