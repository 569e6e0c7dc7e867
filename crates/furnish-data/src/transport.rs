//! Outbound HTTP transports.
//!
//! Spin components send through the host's outbound HTTP; native builds
//! (the CLI, local tooling) send through `reqwest`.

use crate::{FetchError, HttpRequest, Response};
use async_trait::async_trait;

/// Executes a built request and returns the full response.
#[async_trait(?Send)]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<Response, FetchError>;
}

/// Transport for the current build target.
pub fn default_transport() -> std::sync::Arc<dyn Transport> {
    #[cfg(target_arch = "wasm32")]
    {
        std::sync::Arc::new(SpinTransport)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::sync::Arc::new(ReqwestTransport::new())
    }
}

/// Spin outbound HTTP.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinTransport;

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl Transport for SpinTransport {
    async fn execute(&self, request: HttpRequest) -> Result<Response, FetchError> {
        use crate::Method;
        use spin_sdk::http::{Method as SpinMethod, Request as SpinRequest, Response as SpinResponse};

        let method = match request.method {
            Method::Get => SpinMethod::Get,
            Method::Post => SpinMethod::Post,
            Method::Put => SpinMethod::Put,
            Method::Patch => SpinMethod::Patch,
            Method::Delete => SpinMethod::Delete,
            Method::Head => SpinMethod::Head,
            Method::Options => SpinMethod::Options,
        };

        let mut builder = SpinRequest::builder();
        builder.method(method).uri(request.url.as_str());
        for (key, value) in &request.headers {
            builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder.body(body);
        }

        let response: SpinResponse = spin_sdk::http::send(builder.build())
            .await
            .map_err(|e| FetchError::RequestError(e.to_string()))?;

        let status = *response.status();
        let headers = response
            .headers()
            .map(|(k, v)| (k.to_string(), v.as_str().unwrap_or("").to_string()))
            .collect();

        Ok(Response::new(status, headers, response.into_body()))
    }
}

/// `reqwest`-backed transport for native builds.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

#[cfg(not(target_arch = "wasm32"))]
impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<Response, FetchError> {
        use crate::Method;

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
        };

        let mut builder = self.client.request(method, request.url.as_str());
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        Ok(Response::new(status, headers, body.to_vec()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn map_reqwest_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_builder() {
        FetchError::InvalidUrl(e.to_string())
    } else {
        FetchError::RequestError(e.to_string())
    }
}
