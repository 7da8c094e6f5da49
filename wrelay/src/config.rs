//! Relay endpoint configuration and redacted secret handling.
//!
//! ```rust
//! use wrelay::RelayConfig;
//! use wcommon::FunctionName;
//!
//! let config = RelayConfig::new("https://project.supabase.co/", "public-anon-key")
//!     .expect("valid config");
//!
//! assert_eq!(
//!     config.function_url(&FunctionName::from("ai-interview")),
//!     "https://project.supabase.co/functions/v1/ai-interview"
//! );
//! assert_eq!(format!("{:?}", config.public_key()), "[REDACTED]");
//! ```

use std::time::Duration;

use wcommon::FunctionName;

use crate::RelayError;

pub const BASE_URL_ENV: &str = "SUPABASE_URL";
pub const PUBLIC_KEY_ENV: &str = "SUPABASE_PUBLISHABLE_KEY";
pub const TIMEOUT_SECS_ENV: &str = "WISDOMBRIDGE_RELAY_TIMEOUT_SECS";

const FRONTEND_ENV_PREFIX: &str = "VITE_";

#[derive(Clone, PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    base_url: String,
    public_key: SecretString,
    timeout: Option<Duration>,
}

impl RelayConfig {
    pub fn new(
        base_url: impl Into<String>,
        public_key: impl Into<String>,
    ) -> Result<Self, RelayError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(RelayError::configuration("relay base url must not be empty"));
        }

        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(RelayError::configuration(
                "relay base url must start with http:// or https://",
            ));
        }

        let public_key = SecretString::new(public_key.into().trim());
        if public_key.is_empty() {
            return Err(RelayError::configuration("relay public key must not be empty"));
        }

        Ok(Self {
            base_url,
            public_key,
            timeout: None,
        })
    }

    /// Reads `SUPABASE_URL` and `SUPABASE_PUBLISHABLE_KEY`, falling back to their `VITE_`
    /// front-end spellings.
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RelayError> {
        let read = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .or_else(|| lookup(&format!("{FRONTEND_ENV_PREFIX}{name}")))
                .filter(|value| !value.trim().is_empty())
        };

        let base_url = read(BASE_URL_ENV)
            .ok_or_else(|| RelayError::configuration(format!("{BASE_URL_ENV} is not set")))?;
        let public_key = read(PUBLIC_KEY_ENV)
            .ok_or_else(|| RelayError::configuration(format!("{PUBLIC_KEY_ENV} is not set")))?;

        let mut config = Self::new(base_url, public_key)?;

        if let Some(raw) = lookup(TIMEOUT_SECS_ENV) {
            let seconds = raw.trim().parse::<u64>().map_err(|_| {
                RelayError::configuration(format!("{TIMEOUT_SECS_ENV} must be a whole number"))
            })?;
            config = config.with_timeout(Duration::from_secs(seconds));
        }

        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn public_key(&self) -> &SecretString {
        &self.public_key
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn function_url(&self, function: &FunctionName) -> String {
        format!("{}/functions/v1/{}", self.base_url, function)
    }
}
