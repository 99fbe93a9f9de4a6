//! Configuration for the HTTP transport.

use std::time::Duration;

use swc_core::Profile;

/// Default connect timeout: 5 seconds.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default total request timeout: 120 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Settings fixed for the lifetime of one transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Time allowed to establish the connection.
    pub connect_timeout: Duration,
    /// Time allowed for the whole call, body included.
    pub timeout: Duration,
    /// Skip TLS certificate verification.
    pub insecure: bool,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
            insecure: false,
            user_agent: Self::default_user_agent(),
        }
    }
}

impl TransportConfig {
    fn default_user_agent() -> String {
        format!("swc/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Timeouts and TLS settings of a profile.
    pub fn from_profile(profile: &Profile) -> Self {
        let timeout = profile.timeout_config();
        Self {
            connect_timeout: Duration::from_millis(timeout.connect_ms),
            timeout: Duration::from_millis(timeout.request_ms),
            insecure: profile.insecure,
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Disable certificate verification.
    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the effective timeout, using the default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            self.timeout
        }
    }

    /// Returns the effective connect timeout, using the default if zero.
    pub fn effective_connect_timeout(&self) -> Duration {
        if self.connect_timeout.is_zero() {
            DEFAULT_CONNECT_TIMEOUT
        } else {
            self.connect_timeout
        }
    }
}
