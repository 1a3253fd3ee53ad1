use super::config::HelmConfig;
use super::layer::{SetSecurityHeaderLayer, apply};
use crate::error::Result;
use axum::Router;
use axum::http::{HeaderName, HeaderValue, Request, Response};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Build one layer per configured header, in mount order.
///
/// Returns an empty list when the configuration is disabled.
///
/// # Errors
///
/// Fails on the first value that is not a legal header value.
pub fn build_helm_layers(config: &HelmConfig) -> Result<Vec<SetSecurityHeaderLayer>> {
    let layers = config
        .entries()
        .map(|(header, value)| -> Result<SetSecurityHeaderLayer> {
            let layer = SetSecurityHeaderLayer::new(header, value)?;
            tracing::debug!(header = %header, value = %value, "security header configured");
            Ok(layer)
        })
        .collect::<Result<Vec<_>>>()?;

    if !config.enabled {
        tracing::info!("security headers disabled");
    }

    Ok(layers)
}

/// Build a single Tower layer that writes every configured header
pub fn build_helm_layer(config: &HelmConfig) -> Result<Option<HelmLayer>> {
    if !config.enabled {
        return Ok(None);
    }

    HelmLayer::new(config).map(Some)
}

/// Wrap `router` with one middleware per configured header.
///
/// # Errors
///
/// Fails on the first value that is not a legal header value; nothing is
/// mounted in that case.
pub fn mount<S>(router: Router<S>, config: &HelmConfig) -> Result<Router<S>>
where
    S: Clone + Send + Sync + 'static,
{
    let layers = build_helm_layers(config)?;
    tracing::info!(count = layers.len(), "mounting security headers");

    Ok(layers
        .into_iter()
        .fold(router, |router, layer| router.layer(layer)))
}

/// Tower layer that writes a fixed set of security headers
#[derive(Debug, Clone)]
pub struct HelmLayer {
    headers: Arc<[(HeaderName, HeaderValue)]>,
}

impl HelmLayer {
    pub fn new(config: &HelmConfig) -> Result<Self> {
        Ok(Self::from_layers(build_helm_layers(config)?))
    }

    pub fn from_layers(layers: impl IntoIterator<Item = SetSecurityHeaderLayer>) -> Self {
        let headers = layers
            .into_iter()
            .map(|layer| (layer.header().name(), layer.value().clone()))
            .collect();

        Self { headers }
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

impl<S> Layer<S> for HelmLayer {
    type Service = HelmService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        HelmService {
            inner,
            headers: Arc::clone(&self.headers),
        }
    }
}

/// Tower service that writes a fixed set of security headers
#[derive(Debug, Clone)]
pub struct HelmService<S> {
    inner: S,
    headers: Arc<[(HeaderName, HeaderValue)]>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for HelmService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Send + 'static,
    S::Future: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = BoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let headers = Arc::clone(&self.headers);
        let fut = self.inner.call(req);

        Box::pin(async move {
            let mut response = fut.await?;
            for (name, value) in headers.iter() {
                apply(&mut response, name, value);
            }
            Ok(response)
        })
    }
}
