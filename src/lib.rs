//! helm-headers - security response headers for axum and tower
//!
//! Each supported header gets its own middleware. Values are resolved once,
//! at startup, into a [`HelmConfig`] and handed to the layers explicitly;
//! every response then carries them verbatim.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use helm_headers::{ConfigBuilder, mount};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     helm_headers::init_tracing();
//!
//!     let config = ConfigBuilder::new().from_env().build()?;
//!
//!     let app = Router::new().route("/", get(|| async { "ok" }));
//!     let app = mount(app, &config.helm)?;
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! A single middleware can be built directly:
//!
//! ```rust
//! use helm_headers::SetSecurityHeaderLayer;
//!
//! let layer = SetSecurityHeaderLayer::x_dns_prefetch_control("off").unwrap();
//! assert_eq!(layer.value(), "off");
//! ```

mod config;
mod error;
pub mod headers;
pub mod security;
pub mod utils;

// Re-exports for public API
pub use config::{Config, ConfigBuilder, LoggingConfig};
pub use error::{HelmError, Result};
pub use headers::{DnsPrefetchControl, PermittedCrossDomainPolicies, SecurityHeader};
pub use security::{
    HelmConfig, HelmConfigBuilder, HelmLayer, HelmService, SetSecurityHeader,
    SetSecurityHeaderLayer, apply, build_helm_layer, build_helm_layers, mount,
};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging with sensible defaults
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "debug", "helm_headers=debug")
/// - `HELM_LOG_JSON`: Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("HELM_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    init_subscriber(env_filter, json_logs);
}

/// Initialize tracing with a custom configuration
pub fn init_tracing_with_config(config: &Config) {
    init_subscriber(EnvFilter::new(&config.logging.level), config.logging.json);
}

fn init_subscriber(env_filter: EnvFilter, json: bool) {
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
