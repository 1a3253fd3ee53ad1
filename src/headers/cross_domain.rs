use serde::{Deserialize, Serialize};

/// X-Permitted-Cross-Domain-Policies header value
///
/// Tells Adobe clients (Flash, Acrobat) which cross-domain policy files
/// they may load from this origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermittedCrossDomainPolicies {
    /// No policy file is allowed anywhere on the origin
    #[default]
    None,
    /// Only the master policy file at the site root
    MasterOnly,
    /// Only policy files served with `text/x-cross-domain-policy`
    ByContentType,
    /// Any policy file on the origin
    All,
}

impl PermittedCrossDomainPolicies {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::MasterOnly => "master-only",
            Self::ByContentType => "by-content-type",
            Self::All => "all",
        }
    }
}

impl From<PermittedCrossDomainPolicies> for String {
    fn from(value: PermittedCrossDomainPolicies) -> Self {
        value.as_str().to_string()
    }
}
