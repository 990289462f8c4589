//! Service configuration
//!
//! Loaded from TOML by the composition root; every field has a default so an
//! empty file (or no file) yields the standard request policy with latency
//! simulation switched off.
//!
//! ```toml
//! latency = "simulated"
//!
//! [request]
//! timeout_ms = 10000
//! max_attempts = 3
//! backoff_base_ms = 1000
//! ```

use crate::error::ConfigError;
use crate::latency::LatencyProfile;
use crate::policy::RequestPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Request policy settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestPolicyConfig {
    /// Timeout for a whole (retrying) operation, in milliseconds
    pub timeout_ms: u64,
    /// Attempts including the first one
    pub max_attempts: u32,
    /// Backoff before the first retry, doubled for each later retry
    pub backoff_base_ms: u64,
}

impl Default for RequestPolicyConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_attempts: 3,
            backoff_base_ms: 1_000,
        }
    }
}

/// Whether service calls pause to imitate a network round trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatencyMode {
    /// Resolve immediately
    #[default]
    Off,
    /// Use the per-operation delays of the mock backend
    Simulated,
}

/// Configuration shared by all services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Timeout and retry
    pub request: RequestPolicyConfig,
    /// Latency simulation
    pub latency: LatencyMode,
}

impl ServiceConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With attempt limit
    #[inline]
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.request.max_attempts = attempts;
        self
    }

    /// With backoff base
    #[inline]
    #[must_use]
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.request.backoff_base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// With latency mode
    #[inline]
    #[must_use]
    pub fn with_latency(mut self, mode: LatencyMode) -> Self {
        self.latency = mode;
        self
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns `ConfigError` if the TOML is malformed or a value is out of
    /// range.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` for a zero timeout or zero attempts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "request.timeout_ms",
                reason: "must be greater than zero".into(),
            });
        }
        if self.request.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "request.max_attempts",
                reason: "at least one attempt is required".into(),
            });
        }
        Ok(())
    }

    /// Request policy described by this config
    #[must_use]
    pub fn policy(&self) -> RequestPolicy {
        RequestPolicy::new(
            Duration::from_millis(self.request.timeout_ms),
            self.request.max_attempts,
            Duration::from_millis(self.request.backoff_base_ms),
        )
    }

    /// Latency profile described by this config
    #[must_use]
    pub fn latency_profile(&self) -> LatencyProfile {
        match self.latency {
            LatencyMode::Off => LatencyProfile::none(),
            LatencyMode::Simulated => LatencyProfile::simulated(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = ServiceConfig::from_toml_str("").unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.policy().timeout(), Duration::from_secs(10));
        assert_eq!(config.policy().max_attempts(), 3);
    }

    #[test]
    fn partial_toml_overrides() {
        let config = ServiceConfig::from_toml_str(
            "latency = \"simulated\"\n[request]\nmax_attempts = 5\n",
        )
        .unwrap();
        assert_eq!(config.latency, LatencyMode::Simulated);
        assert_eq!(config.request.max_attempts, 5);
        assert_eq!(config.request.timeout_ms, 10_000);
    }

    #[test]
    fn zero_attempts_rejected() {
        let err = ServiceConfig::from_toml_str("[request]\nmax_attempts = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "request.max_attempts", .. }));
    }

    #[test]
    fn unknown_latency_mode_rejected() {
        assert!(matches!(
            ServiceConfig::from_toml_str("latency = \"slow\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[request]\ntimeout_ms = 2500").unwrap();
        let config = ServiceConfig::load(file.path()).unwrap();
        assert_eq!(config.policy().timeout(), Duration::from_millis(2500));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            ServiceConfig::load("/nonexistent/bizplan.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
