//! Configuration types
//!
//! This module defines the configuration structures used throughout the
//! crate. Values are plain data: resolving them from the environment or a
//! host is the embedding application's job.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::convergence::ConvergencePolicy;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DnsimpleConfig {
    /// API access
    pub api: ApiConfig,

    /// Registrar convergence timing
    #[serde(default)]
    pub convergence: ConvergenceConfig,

    /// Zone record reading
    #[serde(default)]
    pub zone_records: ZoneRecordsConfig,
}

impl DnsimpleConfig {
    /// Create a configuration for the given credentials with default timing
    pub fn new(token: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            api: ApiConfig::new(token, account),
            convergence: ConvergenceConfig::default(),
            zone_records: ZoneRecordsConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.api.validate()?;
        self.convergence.validate()?;
        Ok(())
    }
}

/// API access configuration
///
/// The Debug implementation does not expose the token.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// OAuth or account API token
    pub token: String,

    /// Account identifier used in every API path
    pub account: String,

    /// Use the sandbox environment
    #[serde(default)]
    pub sandbox: bool,

    /// Override the API base URL (takes precedence over `sandbox`)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Extra User-Agent fragment prepended to the client's own
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("token", &"<REDACTED>")
            .field("account", &self.account)
            .field("sandbox", &self.sandbox)
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ApiConfig {
    /// Create an API configuration for production
    pub fn new(token: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            account: account.into(),
            sandbox: false,
            base_url: None,
            user_agent: None,
        }
    }

    /// Target the sandbox environment
    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Target an explicit base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the User-Agent fragment
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Validate the API configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.token.is_empty() {
            return Err(crate::Error::config("API token cannot be empty"));
        }
        if self.account.is_empty() {
            return Err(crate::Error::config("Account cannot be empty"));
        }
        if let Some(ref base_url) = self.base_url
            && !base_url.starts_with("https://")
            && !base_url.starts_with("http://")
        {
            return Err(crate::Error::config(format!(
                "API base URL must use HTTP or HTTPS scheme. Got: {}",
                base_url
            )));
        }
        Ok(())
    }
}

/// Registrar convergence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergenceConfig {
    /// How long a domain registration create waits (in seconds)
    #[serde(default = "default_registration_timeout_secs")]
    pub registration_timeout_secs: u64,

    /// How long a registrant change waits (in seconds)
    #[serde(default = "default_registrant_change_timeout_secs")]
    pub registrant_change_timeout_secs: u64,

    /// Fixed delay between polls (in seconds)
    #[serde(default = "default_poll_delay_secs")]
    pub poll_delay_secs: u64,
}

impl ConvergenceConfig {
    /// Validate the convergence configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.registration_timeout_secs == 0 {
            return Err(crate::Error::config("Registration timeout must be > 0"));
        }
        if self.registrant_change_timeout_secs == 0 {
            return Err(crate::Error::config("Registrant change timeout must be > 0"));
        }
        if self.poll_delay_secs == 0 {
            return Err(crate::Error::config("Poll delay must be > 0"));
        }
        Ok(())
    }

    /// Timing for domain registration waits
    pub fn registration_policy(&self) -> ConvergencePolicy {
        ConvergencePolicy::new(Duration::from_secs(self.registration_timeout_secs))
            .with_delay(Duration::from_secs(self.poll_delay_secs))
    }

    /// Timing for registrant change waits
    pub fn registrant_change_policy(&self) -> ConvergencePolicy {
        ConvergencePolicy::new(Duration::from_secs(self.registrant_change_timeout_secs))
            .with_delay(Duration::from_secs(self.poll_delay_secs))
    }
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            registration_timeout_secs: default_registration_timeout_secs(),
            registrant_change_timeout_secs: default_registrant_change_timeout_secs(),
            poll_delay_secs: default_poll_delay_secs(),
        }
    }
}

fn default_registration_timeout_secs() -> u64 {
    600
}

fn default_registrant_change_timeout_secs() -> u64 {
    30
}

fn default_poll_delay_secs() -> u64 {
    20
}

/// Zone record reading configuration
///
/// Read by the host's record handlers: with `prefetch` set they hydrate a
/// [`ZoneRecordCache`](crate::cache::ZoneRecordCache) once per zone and
/// answer lookups from it, otherwise they list records by name per lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneRecordsConfig {
    /// Hydrate whole zones into the cache instead of reading records one by one
    #[serde(default)]
    pub prefetch: bool,
}
