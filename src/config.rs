use serde::{Deserialize, Serialize};

use crate::error::{HelmError, Result};
use crate::security::HelmConfig;
use crate::utils::get_env_with_prefix;

/// Main configuration, resolved once at startup and passed to
/// [`mount`](crate::mount) or [`HelmLayer::new`](crate::HelmLayer::new).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub helm: HelmConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json")]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json() -> bool {
    false
}

/// Builder for Config with environment variable support
#[must_use = "builder does nothing until you call build()"]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn with_json_logging(mut self, enabled: bool) -> Self {
        self.config.logging.json = enabled;
        self
    }

    pub fn with_helm(mut self, helm: HelmConfig) -> Self {
        self.config.helm = helm;
        self
    }

    /// Load configuration from environment variables with HELM_ prefix
    ///
    /// Header overrides are applied on top of any [`with_helm`](Self::with_helm)
    /// configuration set before this call.
    pub fn from_env(mut self) -> Self {
        if let Some(level) = get_env_with_prefix("LOG_LEVEL") {
            self.config.logging.level = level;
        }
        if let Some(json) = get_env_with_prefix("LOG_JSON") {
            self.config.logging.json = json.parse().unwrap_or(false);
        }

        self.config.helm = self.config.helm.merge_env();

        self
    }

    /// Build the configuration, validating all settings
    ///
    /// # Errors
    ///
    /// Returns an error if the log level is unknown or any header value
    /// cannot be sent on the wire.
    pub fn build(self) -> Result<Config> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.config.logging.level.to_lowercase().as_str()) {
            return Err(HelmError::invalid_config(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.config.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        self.config.helm.validate()?;

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::SecurityHeader;
    use crate::utils::env::ENV_LOCK;

    #[test]
    fn test_default_build() {
        let config = ConfigBuilder::new().build().unwrap();
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
        assert_eq!(
            config.helm.get(SecurityHeader::XDnsPrefetchControl),
            Some("off")
        );
    }

    #[test]
    fn test_invalid_log_level() {
        let err = ConfigBuilder::new()
            .with_log_level("verbose")
            .build()
            .unwrap_err();
        assert!(matches!(err, HelmError::InvalidConfig(_)));
    }

    #[test]
    fn test_invalid_header_value() {
        let helm = HelmConfig::builder()
            .x_dns_prefetch_control("off\u{0}")
            .build();
        let result = ConfigBuilder::new().with_helm(helm).build();
        assert!(matches!(result, Err(HelmError::InvalidHeaderValue { .. })));
    }

    #[test]
    fn test_deserialize_nested() {
        let config: Config = serde_json::from_str(
            r#"{ "helm": { "xPermittedCrossDomainPolicies": "all" } }"#,
        )
        .unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(
            config.helm.get(SecurityHeader::XPermittedCrossDomainPolicies),
            Some("all")
        );
    }

    #[test]
    fn test_from_env_keeps_custom_helm() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let helm = HelmConfig::builder().only().x_dns_prefetch_control("on").build();
        let config = ConfigBuilder::new()
            .with_helm(helm)
            .from_env()
            .build()
            .unwrap();

        assert_eq!(config.helm.get(SecurityHeader::XDnsPrefetchControl), Some("on"));
        assert_eq!(config.helm.get(SecurityHeader::XFrameOptions), None);
        assert_eq!(config.helm.entries().count(), 1);
    }

    #[test]
    fn test_from_env_logging() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            std::env::set_var("HELM_LOG_LEVEL", "debug");
            std::env::set_var("HELM_LOG_JSON", "true");
        }

        let result = ConfigBuilder::new().from_env().build();

        unsafe {
            std::env::remove_var("HELM_LOG_LEVEL");
            std::env::remove_var("HELM_LOG_JSON");
        }

        let config = result.unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_from_env_invalid_values_fail_build() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            std::env::set_var("HELM_LOG_LEVEL", "verbose");
        }
        let log_result = ConfigBuilder::new().from_env().build();
        unsafe {
            std::env::remove_var("HELM_LOG_LEVEL");
            std::env::set_var("HELM_ORIGIN_AGENT_CLUSTER", "?1\u{7f}");
        }
        let header_result = ConfigBuilder::new().from_env().build();
        unsafe {
            std::env::remove_var("HELM_ORIGIN_AGENT_CLUSTER");
        }

        assert!(matches!(log_result, Err(HelmError::InvalidConfig(_))));
        assert!(matches!(
            header_result,
            Err(HelmError::InvalidHeaderValue { header: "Origin-Agent-Cluster", .. })
        ));
    }
}
