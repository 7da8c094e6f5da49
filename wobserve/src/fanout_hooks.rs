use std::sync::Arc;
use std::time::Duration;

use wcommon::{CallId, FunctionName};
use wrelay::{RelayError, RelayHooks};

/// Forwards every callback to each registered hook, in registration order.
#[derive(Clone, Default)]
pub struct FanoutRelayHooks {
    hooks: Vec<Arc<dyn RelayHooks>>,
}

impl FanoutRelayHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, hooks: Arc<dyn RelayHooks>) -> Self {
        self.hooks.push(hooks);
        self
    }

    pub fn push(&mut self, hooks: Arc<dyn RelayHooks>) {
        self.hooks.push(hooks);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl std::fmt::Debug for FanoutRelayHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutRelayHooks")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl RelayHooks for FanoutRelayHooks {
    fn on_call_start(&self, call: CallId, function: &FunctionName) {
        for hooks in &self.hooks {
            hooks.on_call_start(call, function);
        }
    }

    fn on_delta(&self, call: CallId, function: &FunctionName, delta_len: usize) {
        for hooks in &self.hooks {
            hooks.on_delta(call, function, delta_len);
        }
    }

    fn on_call_success(
        &self,
        call: CallId,
        function: &FunctionName,
        deltas: usize,
        elapsed: Duration,
    ) {
        for hooks in &self.hooks {
            hooks.on_call_success(call, function, deltas, elapsed);
        }
    }

    fn on_call_failure(
        &self,
        call: CallId,
        function: &FunctionName,
        error: &RelayError,
        elapsed: Duration,
    ) {
        for hooks in &self.hooks {
            hooks.on_call_failure(call, function, error, elapsed);
        }
    }

    fn on_call_cancelled(
        &self,
        call: CallId,
        function: &FunctionName,
        deltas: usize,
        elapsed: Duration,
    ) {
        for hooks in &self.hooks {
            hooks.on_call_cancelled(call, function, deltas, elapsed);
        }
    }
}
