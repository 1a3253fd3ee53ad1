/// The error type for assembling helm middleware.
///
/// Writing a header on a response never fails. Everything that can go wrong
/// is caught here, while the configuration is turned into layers.
#[derive(Debug, thiserror::Error)]
pub enum HelmError {
    #[error("Invalid value for {header}: {value:?}")]
    InvalidHeaderValue {
        header: &'static str,
        value: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl HelmError {
    pub fn invalid_header_value(header: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidHeaderValue {
            header,
            value: value.into(),
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Result type alias for helm operations
pub type Result<T> = std::result::Result<T, HelmError>;
