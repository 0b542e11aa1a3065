use crate::utils::get_env_with_prefix;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HSTS configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HstsConfig {
    /// Whether the HSTS layer is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Policy duration in seconds (the max-age directive)
    #[serde(default = "default_max_age_seconds")]
    pub max_age_seconds: u64,

    /// Whether sub-domains are covered by the browser's HSTS policy
    #[serde(default = "default_include_subdomains")]
    pub include_subdomains: bool,

    /// Whether to replace a Strict-Transport-Security header the
    /// application already set
    #[serde(default)]
    pub overwrite_existing: bool,
}

impl Default for HstsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_age_seconds: default_max_age_seconds(),
            include_subdomains: default_include_subdomains(),
            overwrite_existing: false,
        }
    }
}

impl HstsConfig {
    /// Create a new HstsConfig builder
    pub fn builder() -> HstsConfigBuilder {
        HstsConfigBuilder::new()
    }

    /// Get the policy duration
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.max_age_seconds)
    }

    /// Render the value of the Strict-Transport-Security response header
    ///
    /// With the default configuration this returns
    /// `max-age=2419200; includeSubDomains`.
    pub fn header_value(&self) -> String {
        let mut value = format!("max-age={}", self.max_age_seconds);
        if self.include_subdomains {
            value.push_str("; includeSubDomains");
        }
        value
    }

    /// Load HSTS configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(enabled) = get_env_with_prefix("ENABLED") {
            config.enabled = enabled.parse().unwrap_or(true);
        }

        if let Some(max_age) = get_env_with_prefix("MAX_AGE") {
            if let Ok(age) = max_age.parse() {
                config.max_age_seconds = age;
            }
        }

        if let Some(include_subdomains) = get_env_with_prefix("INCLUDE_SUBDOMAINS") {
            config.include_subdomains = include_subdomains.parse().unwrap_or(true);
        }

        if let Some(overwrite) = get_env_with_prefix("OVERWRITE_EXISTING") {
            config.overwrite_existing = overwrite.parse().unwrap_or(false);
        }

        config
    }
}

/// Builder for HstsConfig
#[must_use = "builder does nothing until you call build()"]
pub struct HstsConfigBuilder {
    config: HstsConfig,
}

impl HstsConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: HstsConfig::default(),
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    pub fn max_age_seconds(mut self, seconds: u64) -> Self {
        self.config.max_age_seconds = seconds;
        self
    }

    /// Set the policy duration, truncated to whole seconds
    pub fn max_age(mut self, duration: Duration) -> Self {
        self.config.max_age_seconds = duration.as_secs();
        self
    }

    pub fn include_subdomains(mut self, include: bool) -> Self {
        self.config.include_subdomains = include;
        self
    }

    pub fn overwrite_existing(mut self, overwrite: bool) -> Self {
        self.config.overwrite_existing = overwrite;
        self
    }

    pub fn build(self) -> HstsConfig {
        self.config
    }
}

impl Default for HstsConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn default_enabled() -> bool {
    true
}

fn default_max_age_seconds() -> u64 {
    2_419_200 // 28 days
}

fn default_include_subdomains() -> bool {
    true
}
