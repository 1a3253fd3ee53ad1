//! Catalogue of the security headers helm can manage.
//!
//! Each [`SecurityHeader`] knows its wire name, the configuration key that
//! holds its value, and the value used when nothing is configured.

mod cross_domain;
mod dns_prefetch;

pub use cross_domain::PermittedCrossDomainPolicies;
pub use dns_prefetch::DnsPrefetchControl;

use axum::http::{HeaderName, header};

/// A response header managed by its own middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityHeader {
    ContentSecurityPolicy,
    CrossOriginEmbedderPolicy,
    CrossOriginOpenerPolicy,
    CrossOriginResourcePolicy,
    OriginAgentCluster,
    ReferrerPolicy,
    StrictTransportSecurity,
    XContentTypeOptions,
    XDnsPrefetchControl,
    XDownloadOptions,
    XFrameOptions,
    XPermittedCrossDomainPolicies,
    XXssProtection,
}

impl SecurityHeader {
    /// Every supported header, in the order layers are mounted.
    pub const ALL: [SecurityHeader; 13] = [
        Self::ContentSecurityPolicy,
        Self::CrossOriginEmbedderPolicy,
        Self::CrossOriginOpenerPolicy,
        Self::CrossOriginResourcePolicy,
        Self::OriginAgentCluster,
        Self::ReferrerPolicy,
        Self::StrictTransportSecurity,
        Self::XContentTypeOptions,
        Self::XDnsPrefetchControl,
        Self::XDownloadOptions,
        Self::XFrameOptions,
        Self::XPermittedCrossDomainPolicies,
        Self::XXssProtection,
    ];

    /// Header name as written on the wire.
    pub fn name(&self) -> HeaderName {
        match self {
            Self::ContentSecurityPolicy => header::CONTENT_SECURITY_POLICY,
            Self::CrossOriginEmbedderPolicy => {
                HeaderName::from_static("cross-origin-embedder-policy")
            }
            Self::CrossOriginOpenerPolicy => HeaderName::from_static("cross-origin-opener-policy"),
            Self::CrossOriginResourcePolicy => {
                HeaderName::from_static("cross-origin-resource-policy")
            }
            Self::OriginAgentCluster => HeaderName::from_static("origin-agent-cluster"),
            Self::ReferrerPolicy => header::REFERRER_POLICY,
            Self::StrictTransportSecurity => header::STRICT_TRANSPORT_SECURITY,
            Self::XContentTypeOptions => header::X_CONTENT_TYPE_OPTIONS,
            Self::XDnsPrefetchControl => header::X_DNS_PREFETCH_CONTROL,
            Self::XDownloadOptions => HeaderName::from_static("x-download-options"),
            Self::XFrameOptions => header::X_FRAME_OPTIONS,
            Self::XPermittedCrossDomainPolicies => {
                HeaderName::from_static("x-permitted-cross-domain-policies")
            }
            Self::XXssProtection => header::X_XSS_PROTECTION,
        }
    }

    /// Canonical capitalisation, used in logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContentSecurityPolicy => "Content-Security-Policy",
            Self::CrossOriginEmbedderPolicy => "Cross-Origin-Embedder-Policy",
            Self::CrossOriginOpenerPolicy => "Cross-Origin-Opener-Policy",
            Self::CrossOriginResourcePolicy => "Cross-Origin-Resource-Policy",
            Self::OriginAgentCluster => "Origin-Agent-Cluster",
            Self::ReferrerPolicy => "Referrer-Policy",
            Self::StrictTransportSecurity => "Strict-Transport-Security",
            Self::XContentTypeOptions => "X-Content-Type-Options",
            Self::XDnsPrefetchControl => "X-DNS-Prefetch-Control",
            Self::XDownloadOptions => "X-Download-Options",
            Self::XFrameOptions => "X-Frame-Options",
            Self::XPermittedCrossDomainPolicies => "X-Permitted-Cross-Domain-Policies",
            Self::XXssProtection => "X-XSS-Protection",
        }
    }

    /// Configuration key holding this header's value.
    ///
    /// Upper-cased, the same key names the environment variable
    /// (`HELM_X_DNS_PREFETCH_CONTROL`).
    pub fn key(&self) -> &'static str {
        match self {
            Self::ContentSecurityPolicy => "content_security_policy",
            Self::CrossOriginEmbedderPolicy => "cross_origin_embedder_policy",
            Self::CrossOriginOpenerPolicy => "cross_origin_opener_policy",
            Self::CrossOriginResourcePolicy => "cross_origin_resource_policy",
            Self::OriginAgentCluster => "origin_agent_cluster",
            Self::ReferrerPolicy => "referrer_policy",
            Self::StrictTransportSecurity => "strict_transport_security",
            Self::XContentTypeOptions => "x_content_type_options",
            Self::XDnsPrefetchControl => "x_dns_prefetch_control",
            Self::XDownloadOptions => "x_download_options",
            Self::XFrameOptions => "x_frame_options",
            Self::XPermittedCrossDomainPolicies => "x_permitted_cross_domain_policies",
            Self::XXssProtection => "x_xss_protection",
        }
    }

    pub fn env_key(&self) -> String {
        self.key().to_ascii_uppercase()
    }

    /// Value written when the configuration does not override it.
    pub fn default_value(&self) -> &'static str {
        match self {
            Self::ContentSecurityPolicy => {
                "default-src 'self';base-uri 'self';font-src 'self' https: data:;\
                 form-action 'self';frame-ancestors 'self';img-src 'self' data:;\
                 object-src 'none';script-src 'self';script-src-attr 'none';\
                 style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests"
            }
            Self::CrossOriginEmbedderPolicy => "require-corp",
            Self::CrossOriginOpenerPolicy => "same-origin",
            Self::CrossOriginResourcePolicy => "same-origin",
            Self::OriginAgentCluster => "?1",
            Self::ReferrerPolicy => "no-referrer",
            Self::StrictTransportSecurity => "max-age=15552000; includeSubDomains",
            Self::XContentTypeOptions => "nosniff",
            Self::XDnsPrefetchControl => DnsPrefetchControl::Off.as_str(),
            Self::XDownloadOptions => "noopen",
            Self::XFrameOptions => "SAMEORIGIN",
            Self::XPermittedCrossDomainPolicies => PermittedCrossDomainPolicies::None.as_str(),
            Self::XXssProtection => "0",
        }
    }
}

impl std::fmt::Display for SecurityHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
