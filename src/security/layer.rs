use crate::error::{HelmError, Result};
use crate::headers::SecurityHeader;
use axum::http::{HeaderName, HeaderValue, Request, Response};
use futures::future::BoxFuture;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Set `name` to `value` on the response, replacing any value already there.
pub fn apply<B>(response: &mut Response<B>, name: &HeaderName, value: &HeaderValue) {
    response.headers_mut().insert(name.clone(), value.clone());
}

/// Tower layer that writes one security header on every response
#[derive(Debug, Clone)]
pub struct SetSecurityHeaderLayer {
    header: SecurityHeader,
    name: HeaderName,
    value: HeaderValue,
}

impl SetSecurityHeaderLayer {
    /// Create a layer writing `value` verbatim as `header`.
    ///
    /// # Errors
    ///
    /// Returns [`HelmError::InvalidHeaderValue`] if `value` contains bytes
    /// that are not allowed in an HTTP header value (control characters,
    /// line breaks).
    pub fn new(header: SecurityHeader, value: &str) -> Result<Self> {
        let parsed = HeaderValue::from_str(value)
            .map_err(|_| HelmError::invalid_header_value(header.as_str(), value))?;

        Ok(Self {
            header,
            name: header.name(),
            value: parsed,
        })
    }

    /// Create a layer writing the header's default value
    pub fn with_default(header: SecurityHeader) -> Self {
        Self {
            header,
            name: header.name(),
            value: HeaderValue::from_static(header.default_value()),
        }
    }

    pub fn header(&self) -> SecurityHeader {
        self.header
    }

    pub fn value(&self) -> &HeaderValue {
        &self.value
    }

    /// `X-DNS-Prefetch-Control`
    pub fn x_dns_prefetch_control(value: impl AsRef<str>) -> Result<Self> {
        Self::new(SecurityHeader::XDnsPrefetchControl, value.as_ref())
    }

    /// `X-Permitted-Cross-Domain-Policies`
    pub fn x_permitted_cross_domain_policies(value: impl AsRef<str>) -> Result<Self> {
        Self::new(SecurityHeader::XPermittedCrossDomainPolicies, value.as_ref())
    }

    pub fn content_security_policy(value: impl AsRef<str>) -> Result<Self> {
        Self::new(SecurityHeader::ContentSecurityPolicy, value.as_ref())
    }

    pub fn cross_origin_embedder_policy(value: impl AsRef<str>) -> Result<Self> {
        Self::new(SecurityHeader::CrossOriginEmbedderPolicy, value.as_ref())
    }

    pub fn cross_origin_opener_policy(value: impl AsRef<str>) -> Result<Self> {
        Self::new(SecurityHeader::CrossOriginOpenerPolicy, value.as_ref())
    }

    pub fn cross_origin_resource_policy(value: impl AsRef<str>) -> Result<Self> {
        Self::new(SecurityHeader::CrossOriginResourcePolicy, value.as_ref())
    }

    pub fn origin_agent_cluster(value: impl AsRef<str>) -> Result<Self> {
        Self::new(SecurityHeader::OriginAgentCluster, value.as_ref())
    }

    pub fn referrer_policy(value: impl AsRef<str>) -> Result<Self> {
        Self::new(SecurityHeader::ReferrerPolicy, value.as_ref())
    }

    pub fn strict_transport_security(value: impl AsRef<str>) -> Result<Self> {
        Self::new(SecurityHeader::StrictTransportSecurity, value.as_ref())
    }

    pub fn x_content_type_options(value: impl AsRef<str>) -> Result<Self> {
        Self::new(SecurityHeader::XContentTypeOptions, value.as_ref())
    }

    pub fn x_download_options(value: impl AsRef<str>) -> Result<Self> {
        Self::new(SecurityHeader::XDownloadOptions, value.as_ref())
    }

    pub fn x_frame_options(value: impl AsRef<str>) -> Result<Self> {
        Self::new(SecurityHeader::XFrameOptions, value.as_ref())
    }

    pub fn x_xss_protection(value: impl AsRef<str>) -> Result<Self> {
        Self::new(SecurityHeader::XXssProtection, value.as_ref())
    }
}

impl<S> Layer<S> for SetSecurityHeaderLayer {
    type Service = SetSecurityHeader<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SetSecurityHeader {
            inner,
            name: self.name.clone(),
            value: self.value.clone(),
        }
    }
}

/// Tower service that writes one security header on every response
#[derive(Debug, Clone)]
pub struct SetSecurityHeader<S> {
    inner: S,
    name: HeaderName,
    value: HeaderValue,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for SetSecurityHeader<S>
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
        let name = self.name.clone();
        let value = self.value.clone();
        let fut = self.inner.call(req);

        Box::pin(async move {
            let mut response = fut.await?;
            apply(&mut response, &name, &value);
            Ok(response)
        })
    }
}
