use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::progress::RoundingRule;

/// Bridge configuration. Every field has a default so partial files load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Master switch for connecting to the game service at all.
    #[serde(default = "BridgeConfig::default_services_enabled")]
    pub services_enabled: bool,
    /// Reconnect when the host restarts us, provided a connection succeeded before.
    #[serde(default = "BridgeConfig::default_reconnect_on_start")]
    pub reconnect_on_start: bool,
    /// Bypass the service-side listing cache when loading achievements.
    #[serde(default)]
    pub force_reload_on_connect: bool,
    #[serde(default)]
    pub rounding: RoundingRule,
}

impl BridgeConfig {
    const fn default_services_enabled() -> bool {
        true
    }

    const fn default_reconnect_on_start() -> bool {
        true
    }

    /// Parse configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    #[must_use]
    pub const fn with_rounding(mut self, rounding: RoundingRule) -> Self {
        self.rounding = rounding;
        self
    }

    #[must_use]
    pub const fn with_services_enabled(mut self, enabled: bool) -> Self {
        self.services_enabled = enabled;
        self
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            services_enabled: Self::default_services_enabled(),
            reconnect_on_start: Self::default_reconnect_on_start(),
            force_reload_on_connect: false,
            rounding: RoundingRule::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let cfg = BridgeConfig::from_json("{}").unwrap();
        assert_eq!(cfg, BridgeConfig::default());
        assert!(cfg.services_enabled);
        assert_eq!(cfg.rounding, RoundingRule::HalfUp);
    }

    #[test]
    fn partial_overrides_apply() {
        let cfg =
            BridgeConfig::from_json(r#"{"rounding":"half_even","reconnect_on_start":false}"#)
                .unwrap();
        assert_eq!(cfg.rounding, RoundingRule::HalfEven);
        assert!(!cfg.reconnect_on_start);
        assert!(cfg.services_enabled);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = BridgeConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = BridgeConfig::load("/nonexistent/gamebridge.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/gamebridge.json"));
    }
}
