use serde::{Deserialize, Serialize};

/// X-DNS-Prefetch-Control header value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DnsPrefetchControl {
    /// Let the browser resolve linked domains ahead of time
    On,
    /// Disable DNS prefetching
    #[default]
    Off,
}

impl DnsPrefetchControl {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

impl From<DnsPrefetchControl> for String {
    fn from(value: DnsPrefetchControl) -> Self {
        value.as_str().to_string()
    }
}
