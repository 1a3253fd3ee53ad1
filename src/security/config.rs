use crate::error::{HelmError, Result};
use crate::headers::SecurityHeader;
use crate::utils::get_env_with_prefix;
use axum::http::HeaderValue;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

/// Security headers configuration
///
/// Every field holds the literal value written for one header. `None`
/// leaves that header alone: no middleware is mounted for it.
///
/// Keys are accepted in snake_case or in the camelCase form used by
/// JavaScript runtime configs (`xDNSPrefetchControl`). A value of `false`
/// or `null` disables the header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HelmConfig {
    /// Whether any security header is mounted
    pub enabled: bool,

    #[serde(alias = "contentSecurityPolicy", deserialize_with = "header_value")]
    pub content_security_policy: Option<String>,

    #[serde(alias = "crossOriginEmbedderPolicy", deserialize_with = "header_value")]
    pub cross_origin_embedder_policy: Option<String>,

    #[serde(alias = "crossOriginOpenerPolicy", deserialize_with = "header_value")]
    pub cross_origin_opener_policy: Option<String>,

    #[serde(alias = "crossOriginResourcePolicy", deserialize_with = "header_value")]
    pub cross_origin_resource_policy: Option<String>,

    #[serde(alias = "originAgentCluster", deserialize_with = "header_value")]
    pub origin_agent_cluster: Option<String>,

    #[serde(alias = "referrerPolicy", deserialize_with = "header_value")]
    pub referrer_policy: Option<String>,

    #[serde(alias = "strictTransportSecurity", deserialize_with = "header_value")]
    pub strict_transport_security: Option<String>,

    #[serde(alias = "xContentTypeOptions", deserialize_with = "header_value")]
    pub x_content_type_options: Option<String>,

    #[serde(alias = "xDNSPrefetchControl", deserialize_with = "header_value")]
    pub x_dns_prefetch_control: Option<String>,

    #[serde(alias = "xDownloadOptions", deserialize_with = "header_value")]
    pub x_download_options: Option<String>,

    #[serde(alias = "xFrameOptions", deserialize_with = "header_value")]
    pub x_frame_options: Option<String>,

    #[serde(alias = "xPermittedCrossDomainPolicies", deserialize_with = "header_value")]
    pub x_permitted_cross_domain_policies: Option<String>,

    #[serde(alias = "xXSSProtection", deserialize_with = "header_value")]
    pub x_xss_protection: Option<String>,
}

impl Default for HelmConfig {
    fn default() -> Self {
        let default = |header: SecurityHeader| Some(header.default_value().to_string());

        Self {
            enabled: true,
            content_security_policy: default(SecurityHeader::ContentSecurityPolicy),
            cross_origin_embedder_policy: default(SecurityHeader::CrossOriginEmbedderPolicy),
            cross_origin_opener_policy: default(SecurityHeader::CrossOriginOpenerPolicy),
            cross_origin_resource_policy: default(SecurityHeader::CrossOriginResourcePolicy),
            origin_agent_cluster: default(SecurityHeader::OriginAgentCluster),
            referrer_policy: default(SecurityHeader::ReferrerPolicy),
            strict_transport_security: default(SecurityHeader::StrictTransportSecurity),
            x_content_type_options: default(SecurityHeader::XContentTypeOptions),
            x_dns_prefetch_control: default(SecurityHeader::XDnsPrefetchControl),
            x_download_options: default(SecurityHeader::XDownloadOptions),
            x_frame_options: default(SecurityHeader::XFrameOptions),
            x_permitted_cross_domain_policies: default(
                SecurityHeader::XPermittedCrossDomainPolicies,
            ),
            x_xss_protection: default(SecurityHeader::XXssProtection),
        }
    }
}

impl HelmConfig {
    /// Create a new HelmConfig builder
    pub fn builder() -> HelmConfigBuilder {
        HelmConfigBuilder::new()
    }

    /// Configured value for `header`, if it is mounted
    pub fn get(&self, header: SecurityHeader) -> Option<&str> {
        self.slot(header).as_deref()
    }

    /// Configured headers and their values, in mount order.
    ///
    /// Empty when the configuration is disabled.
    pub fn entries(&self) -> impl Iterator<Item = (SecurityHeader, &str)> + '_ {
        SecurityHeader::ALL
            .into_iter()
            .filter(|_| self.enabled)
            .filter_map(|header| self.get(header).map(|value| (header, value)))
    }

    /// Check that every configured value can be sent as a header value
    ///
    /// # Errors
    ///
    /// Returns [`HelmError::InvalidHeaderValue`] for the first value that
    /// contains control characters or line breaks.
    pub fn validate(&self) -> Result<()> {
        for (header, value) in self.entries() {
            if HeaderValue::from_str(value).is_err() {
                return Err(HelmError::invalid_header_value(header.as_str(), value));
            }
        }
        Ok(())
    }

    /// Load security header configuration from environment variables
    ///
    /// Starts from the defaults; see [`merge_env`](Self::merge_env).
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    /// Apply environment overrides on top of this configuration
    ///
    /// Each header reads `HELM_<KEY>` (or `<KEY>`), e.g.
    /// `HELM_X_DNS_PREFETCH_CONTROL=on`. `false` or `disable` unmounts it.
    /// `true` is not a header value and is ignored, leaving the current
    /// value in place. Headers with no variable set keep their value.
    pub fn merge_env(mut self) -> Self {
        if let Some(enabled) = get_env_with_prefix("HEADERS_ENABLED") {
            self.enabled = enabled.parse().unwrap_or(true);
        }

        for header in SecurityHeader::ALL {
            if let Some(value) = get_env_with_prefix(&header.env_key()) {
                match value.to_ascii_lowercase().as_str() {
                    "false" | "disable" => *self.slot_mut(header) = None,
                    "true" => {
                        tracing::warn!(
                            header = %header,
                            "ignoring `true` from environment, expected a header value or false"
                        );
                    }
                    _ => *self.slot_mut(header) = Some(value),
                }
            }
        }

        self
    }

    fn slot(&self, header: SecurityHeader) -> &Option<String> {
        match header {
            SecurityHeader::ContentSecurityPolicy => &self.content_security_policy,
            SecurityHeader::CrossOriginEmbedderPolicy => &self.cross_origin_embedder_policy,
            SecurityHeader::CrossOriginOpenerPolicy => &self.cross_origin_opener_policy,
            SecurityHeader::CrossOriginResourcePolicy => &self.cross_origin_resource_policy,
            SecurityHeader::OriginAgentCluster => &self.origin_agent_cluster,
            SecurityHeader::ReferrerPolicy => &self.referrer_policy,
            SecurityHeader::StrictTransportSecurity => &self.strict_transport_security,
            SecurityHeader::XContentTypeOptions => &self.x_content_type_options,
            SecurityHeader::XDnsPrefetchControl => &self.x_dns_prefetch_control,
            SecurityHeader::XDownloadOptions => &self.x_download_options,
            SecurityHeader::XFrameOptions => &self.x_frame_options,
            SecurityHeader::XPermittedCrossDomainPolicies => {
                &self.x_permitted_cross_domain_policies
            }
            SecurityHeader::XXssProtection => &self.x_xss_protection,
        }
    }

    fn slot_mut(&mut self, header: SecurityHeader) -> &mut Option<String> {
        match header {
            SecurityHeader::ContentSecurityPolicy => &mut self.content_security_policy,
            SecurityHeader::CrossOriginEmbedderPolicy => &mut self.cross_origin_embedder_policy,
            SecurityHeader::CrossOriginOpenerPolicy => &mut self.cross_origin_opener_policy,
            SecurityHeader::CrossOriginResourcePolicy => &mut self.cross_origin_resource_policy,
            SecurityHeader::OriginAgentCluster => &mut self.origin_agent_cluster,
            SecurityHeader::ReferrerPolicy => &mut self.referrer_policy,
            SecurityHeader::StrictTransportSecurity => &mut self.strict_transport_security,
            SecurityHeader::XContentTypeOptions => &mut self.x_content_type_options,
            SecurityHeader::XDnsPrefetchControl => &mut self.x_dns_prefetch_control,
            SecurityHeader::XDownloadOptions => &mut self.x_download_options,
            SecurityHeader::XFrameOptions => &mut self.x_frame_options,
            SecurityHeader::XPermittedCrossDomainPolicies => {
                &mut self.x_permitted_cross_domain_policies
            }
            SecurityHeader::XXssProtection => &mut self.x_xss_protection,
        }
    }
}

/// Accepts a string, or `false`/`null` to disable the header.
fn header_value<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Value(String),
        Toggle(bool),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Value(value)) => Ok(Some(value)),
        Some(Raw::Toggle(false)) | None => Ok(None),
        Some(Raw::Toggle(true)) => Err(D::Error::custom(
            "expected a header value or false, found true",
        )),
    }
}

/// Builder for HelmConfig
#[must_use = "builder does nothing until you call build()"]
pub struct HelmConfigBuilder {
    config: HelmConfig,
}

impl HelmConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: HelmConfig::default(),
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// Set the value written for `header`
    pub fn header(mut self, header: SecurityHeader, value: impl Into<String>) -> Self {
        *self.config.slot_mut(header) = Some(value.into());
        self
    }

    /// Leave `header` unmanaged
    pub fn disable(mut self, header: SecurityHeader) -> Self {
        *self.config.slot_mut(header) = None;
        self
    }

    /// Start from an empty set and mount only the headers added afterwards
    pub fn only(mut self) -> Self {
        for header in SecurityHeader::ALL {
            *self.config.slot_mut(header) = None;
        }
        self
    }

    /// Accepts a literal or a [`DnsPrefetchControl`](crate::headers::DnsPrefetchControl).
    pub fn x_dns_prefetch_control(self, value: impl Into<String>) -> Self {
        self.header(SecurityHeader::XDnsPrefetchControl, value)
    }

    /// Accepts a literal or a
    /// [`PermittedCrossDomainPolicies`](crate::headers::PermittedCrossDomainPolicies).
    pub fn x_permitted_cross_domain_policies(self, value: impl Into<String>) -> Self {
        self.header(SecurityHeader::XPermittedCrossDomainPolicies, value)
    }

    pub fn content_security_policy(self, value: impl Into<String>) -> Self {
        self.header(SecurityHeader::ContentSecurityPolicy, value)
    }

    pub fn referrer_policy(self, value: impl Into<String>) -> Self {
        self.header(SecurityHeader::ReferrerPolicy, value)
    }

    pub fn strict_transport_security(self, value: impl Into<String>) -> Self {
        self.header(SecurityHeader::StrictTransportSecurity, value)
    }

    pub fn x_frame_options(self, value: impl Into<String>) -> Self {
        self.header(SecurityHeader::XFrameOptions, value)
    }

    pub fn cross_origin_embedder_policy(self, value: impl Into<String>) -> Self {
        self.header(SecurityHeader::CrossOriginEmbedderPolicy, value)
    }

    pub fn cross_origin_opener_policy(self, value: impl Into<String>) -> Self {
        self.header(SecurityHeader::CrossOriginOpenerPolicy, value)
    }

    pub fn cross_origin_resource_policy(self, value: impl Into<String>) -> Self {
        self.header(SecurityHeader::CrossOriginResourcePolicy, value)
    }

    pub fn origin_agent_cluster(self, value: impl Into<String>) -> Self {
        self.header(SecurityHeader::OriginAgentCluster, value)
    }

    pub fn x_content_type_options(self, value: impl Into<String>) -> Self {
        self.header(SecurityHeader::XContentTypeOptions, value)
    }

    pub fn x_download_options(self, value: impl Into<String>) -> Self {
        self.header(SecurityHeader::XDownloadOptions, value)
    }

    pub fn x_xss_protection(self, value: impl Into<String>) -> Self {
        self.header(SecurityHeader::XXssProtection, value)
    }

    pub fn build(self) -> HelmConfig {
        self.config
    }
}

impl Default for HelmConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::{DnsPrefetchControl, PermittedCrossDomainPolicies};
    use crate::utils::env::ENV_LOCK;

    #[test]
    fn test_default_config() {
        let config = HelmConfig::default();
        assert!(config.enabled);
        assert_eq!(config.get(SecurityHeader::XDnsPrefetchControl), Some("off"));
        assert_eq!(
            config.get(SecurityHeader::XPermittedCrossDomainPolicies),
            Some("none")
        );
        assert_eq!(config.entries().count(), SecurityHeader::ALL.len());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = HelmConfig::builder()
            .x_dns_prefetch_control(DnsPrefetchControl::On)
            .x_permitted_cross_domain_policies(PermittedCrossDomainPolicies::MasterOnly)
            .disable(SecurityHeader::ContentSecurityPolicy)
            .build();

        assert_eq!(config.x_dns_prefetch_control.as_deref(), Some("on"));
        assert_eq!(
            config.x_permitted_cross_domain_policies.as_deref(),
            Some("master-only")
        );
        assert_eq!(config.content_security_policy, None);
    }

    #[test]
    fn test_only_mounts_selected_headers() {
        let config = HelmConfig::builder()
            .only()
            .x_dns_prefetch_control("off")
            .build();

        let entries: Vec<_> = config.entries().collect();
        assert_eq!(entries, vec![(SecurityHeader::XDnsPrefetchControl, "off")]);
    }

    #[test]
    fn test_disabled_config_has_no_entries() {
        let config = HelmConfig::builder().enabled(false).build();
        assert_eq!(config.entries().count(), 0);
    }

    #[test]
    fn test_validate_rejects_line_breaks() {
        let config = HelmConfig::builder()
            .x_permitted_cross_domain_policies("none\nset-cookie: x")
            .build();

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            HelmError::InvalidHeaderValue { header: "X-Permitted-Cross-Domain-Policies", .. }
        ));
    }

    #[test]
    fn test_deserialize_camel_case_keys() {
        let config: HelmConfig = serde_json::from_str(
            r#"{
                "xDNSPrefetchControl": "on",
                "xPermittedCrossDomainPolicies": "by-content-type",
                "contentSecurityPolicy": false,
                "xXSSProtection": null
            }"#,
        )
        .unwrap();

        assert_eq!(config.get(SecurityHeader::XDnsPrefetchControl), Some("on"));
        assert_eq!(
            config.get(SecurityHeader::XPermittedCrossDomainPolicies),
            Some("by-content-type")
        );
        assert_eq!(config.get(SecurityHeader::ContentSecurityPolicy), None);
        assert_eq!(config.get(SecurityHeader::XXssProtection), None);
        // untouched keys keep their defaults
        assert_eq!(config.get(SecurityHeader::XFrameOptions), Some("SAMEORIGIN"));
    }

    #[test]
    fn test_deserialize_rejects_true() {
        let result: std::result::Result<HelmConfig, _> =
            serde_json::from_str(r#"{ "x_frame_options": true }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_covers_every_header() {
        let config = HelmConfig::builder()
            .only()
            .content_security_policy("default-src 'none'")
            .cross_origin_embedder_policy("credentialless")
            .cross_origin_opener_policy("same-origin-allow-popups")
            .cross_origin_resource_policy("cross-origin")
            .origin_agent_cluster("?0")
            .referrer_policy("same-origin")
            .strict_transport_security("max-age=63072000")
            .x_content_type_options("nosniff")
            .x_dns_prefetch_control("on")
            .x_download_options("noopen")
            .x_frame_options("DENY")
            .x_permitted_cross_domain_policies("all")
            .x_xss_protection("1; mode=block")
            .build();

        assert_eq!(config.entries().count(), SecurityHeader::ALL.len());
        assert_eq!(config.get(SecurityHeader::CrossOriginEmbedderPolicy), Some("credentialless"));
        assert_eq!(config.get(SecurityHeader::XXssProtection), Some("1; mode=block"));
    }

    #[test]
    fn test_from_env() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            std::env::set_var("HELM_X_DNS_PREFETCH_CONTROL", "on");
            std::env::set_var("HELM_X_DOWNLOAD_OPTIONS", "disable");
            std::env::set_var("HELM_CROSS_ORIGIN_OPENER_POLICY", "FALSE");
        }

        let config = HelmConfig::from_env();

        unsafe {
            std::env::remove_var("HELM_X_DNS_PREFETCH_CONTROL");
            std::env::remove_var("HELM_X_DOWNLOAD_OPTIONS");
            std::env::remove_var("HELM_CROSS_ORIGIN_OPENER_POLICY");
        }

        assert_eq!(config.get(SecurityHeader::XDnsPrefetchControl), Some("on"));
        // both keywords unmount, case-insensitively
        assert_eq!(config.get(SecurityHeader::XDownloadOptions), None);
        assert_eq!(config.get(SecurityHeader::CrossOriginOpenerPolicy), None);
        assert_eq!(
            config.get(SecurityHeader::XPermittedCrossDomainPolicies),
            Some("none")
        );
    }

    #[test]
    fn test_from_env_unprefixed_fallback() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            std::env::set_var("X_PERMITTED_CROSS_DOMAIN_POLICIES", "master-only");
        }

        let config = HelmConfig::from_env();

        unsafe {
            std::env::remove_var("X_PERMITTED_CROSS_DOMAIN_POLICIES");
        }

        assert_eq!(
            config.get(SecurityHeader::XPermittedCrossDomainPolicies),
            Some("master-only")
        );
    }

    #[test]
    fn test_from_env_kill_switch() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            std::env::set_var("HELM_HEADERS_ENABLED", "false");
        }

        let config = HelmConfig::from_env();

        unsafe {
            std::env::remove_var("HELM_HEADERS_ENABLED");
        }

        assert!(!config.enabled);
        assert_eq!(config.entries().count(), 0);
    }

    #[test]
    fn test_from_env_ignores_true() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            std::env::set_var("HELM_X_FRAME_OPTIONS", "true");
        }

        let config = HelmConfig::builder().x_frame_options("DENY").build().merge_env();

        unsafe {
            std::env::remove_var("HELM_X_FRAME_OPTIONS");
        }

        assert_eq!(config.get(SecurityHeader::XFrameOptions), Some("DENY"));
    }

    #[test]
    fn test_merge_env_keeps_unset_headers() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            std::env::set_var("HELM_REFERRER_POLICY", "same-origin");
        }

        let config = HelmConfig::builder()
            .only()
            .x_dns_prefetch_control("on")
            .build()
            .merge_env();

        unsafe {
            std::env::remove_var("HELM_REFERRER_POLICY");
        }

        assert_eq!(config.get(SecurityHeader::XDnsPrefetchControl), Some("on"));
        assert_eq!(config.get(SecurityHeader::ReferrerPolicy), Some("same-origin"));
        assert_eq!(config.get(SecurityHeader::ContentSecurityPolicy), None);
    }
}
