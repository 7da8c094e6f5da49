//! Production-friendly observability hooks for relay calls.
//!
//! ```rust
//! use wobserve::{MetricsRelayHooks, SafeRelayHooks, TracingRelayHooks};
//!
//! let _relay_hooks = SafeRelayHooks::new(TracingRelayHooks);
//! let _metrics = MetricsRelayHooks;
//! ```

mod fanout_hooks;
mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use fanout_hooks::FanoutRelayHooks;
pub use metrics_hooks::MetricsRelayHooks;
pub use safe_hooks::SafeRelayHooks;
pub use tracing_hooks::TracingRelayHooks;

pub mod prelude {
    pub use crate::{FanoutRelayHooks, MetricsRelayHooks, SafeRelayHooks, TracingRelayHooks};
}
