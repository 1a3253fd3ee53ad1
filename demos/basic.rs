/// Basic example
///
/// This example demonstrates:
/// - Loading header values from HELM_* environment variables
/// - Mounting one middleware per header on an axum router
/// - Overriding a single header in code
///
/// Run with: HELM_X_DNS_PREFETCH_CONTROL=on cargo run --example basic
use axum::{Router, routing::get};
use helm_headers::{ConfigBuilder, PermittedCrossDomainPolicies, mount};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ConfigBuilder::new().from_env().build()?;
    helm_headers::init_tracing_with_config(&config);

    // Flash and PDF clients never need policy files from this service
    config.helm.x_permitted_cross_domain_policies =
        Some(PermittedCrossDomainPolicies::None.into());

    let app = Router::new().route("/", get(|| async { "Hello, World!" }));
    let app = mount(app, &config.helm)?;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
    tracing::info!("listening on http://127.0.0.1:8000");
    axum::serve(listener, app).await?;

    Ok(())
}
