//! Security headers middleware.
//!
//! One middleware per header. Each takes its value once, at assembly time,
//! and writes it verbatim on every response.

mod config;
mod layer;
mod stack;

pub use config::{HelmConfig, HelmConfigBuilder};
pub use layer::{SetSecurityHeader, SetSecurityHeaderLayer, apply};
pub use stack::{HelmLayer, HelmService, build_helm_layer, build_helm_layers, mount};
