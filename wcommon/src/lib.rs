//! Shared aliases and strongly-typed identifiers for workspace crates.
//!
//! ```rust
//! use wcommon::{CallId, FunctionName, SessionId};
//!
//! let session = SessionId::from("interview-1");
//! let function = FunctionName::new("ai-interview");
//! let first = CallId::next();
//! let second = CallId::next();
//!
//! assert_eq!(session.as_str(), "interview-1");
//! assert_eq!(function.to_string(), "ai-interview");
//! assert!(second.get() > first.get());
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use wcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Identifier newtypes shared between the relay and the conversation layer.
    //!
    //! ```rust
    //! use wcommon::{FunctionName, SessionId};
    //!
    //! let session = SessionId::new("session-42");
    //! let function = FunctionName::from("ask-knowledge");
    //!
    //! assert_eq!(session.to_string(), "session-42");
    //! assert_eq!(function.as_str(), "ask-knowledge");
    //! ```

    use std::fmt::{Display, Formatter};
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct SessionId(String);

    impl SessionId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for SessionId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for SessionId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for SessionId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }

    /// Name of a remote function reachable under `/functions/v1/<name>`.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct FunctionName(String);

    impl FunctionName {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for FunctionName {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for FunctionName {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for FunctionName {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }

    static NEXT_CALL_ID: AtomicU64 = AtomicU64::new(1);

    /// Process-unique identifier of one streaming call, used to correlate hook events.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct CallId(u64);

    impl CallId {
        pub fn next() -> Self {
            Self(NEXT_CALL_ID.fetch_add(1, Ordering::Relaxed))
        }

        pub fn get(self) -> u64 {
            self.0
        }
    }

    impl Display for CallId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "call-{}", self.0)
        }
    }
}

pub use context::{CallId, FunctionName, SessionId};
pub use future::BoxFuture;
