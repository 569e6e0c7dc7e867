//! HTTP client utilities for the FurnishAI storefront.
//!
//! A small builder API over a pluggable [`Transport`], with JSON helpers and
//! retry on server errors and dropped connections.
//!
//! # Example
//!
//! ```rust,ignore
//! use furnish_data::{FetchClient, RetryPolicy};
//!
//! let client = FetchClient::new()
//!     .with_base_url("https://api.example.com/")
//!     .with_default_header("ngrok-skip-browser-warning", "true")
//!     .with_retry(RetryPolicy::new(2));
//!
//! let page: ProductsPage = client
//!     .get("p1/get-all-products")
//!     .query(&[("page", "1"), ("page_size", "100")])?
//!     .send()
//!     .await?
//!     .error_for_status()?
//!     .json()?;
//! ```

mod delay;
mod error;
mod request;
mod response;
mod retry;
mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use delay::{Delay, SystemDelay};
pub use error::FetchError;
pub use request::{HttpRequest, Method, RequestBuilder};
pub use response::Response;
pub use retry::{BackoffStrategy, RetryCondition, RetryPolicy};
pub use transport::{default_transport, Transport};

#[cfg(not(target_arch = "wasm32"))]
pub use transport::ReqwestTransport;
#[cfg(target_arch = "wasm32")]
pub use transport::SpinTransport;

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// HTTP client for outbound requests.
///
/// Cloning shares the transport and delay.
#[derive(Clone)]
pub struct FetchClient {
    base_url: Option<String>,
    default_headers: BTreeMap<String, String>,
    retry: RetryPolicy,
    transport: Arc<dyn Transport>,
    delay: Arc<dyn Delay>,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl FetchClient {
    /// Client using the target's default transport and no retries.
    pub fn new() -> Self {
        Self::with_transport(default_transport())
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: None,
            default_headers: BTreeMap::new(),
            retry: RetryPolicy::none(),
            transport,
            delay: Arc::new(SystemDelay),
        }
    }

    /// Prepend `base_url` to relative request URLs.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_default_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_delay(mut self, delay: Arc<dyn Delay>) -> Self {
        self.delay = delay;
        self
    }

    /// The delay used between retries, shared with callers that pace
    /// their own request loops.
    pub fn delay(&self) -> Arc<dyn Delay> {
        Arc::clone(&self.delay)
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Get, url)
    }

    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Post, url)
    }

    pub fn put(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Put, url)
    }

    pub fn patch(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Patch, url)
    }

    pub fn delete(&self, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Delete, url)
    }

    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder<'_> {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) if !is_absolute(&url) => join_url(base, &url),
            _ => url,
        };

        let builder = RequestBuilder::new(method, full_url).headers(self.default_headers.clone());

        ClientRequestBuilder {
            client: self,
            builder,
        }
    }

    /// Send a built request, retrying per the client's policy.
    pub async fn execute(&self, request: HttpRequest) -> Result<Response, FetchError> {
        let mut attempt = 0;
        loop {
            let result = self.transport.execute(request.clone()).await;
            let retry = match &result {
                Ok(response) => self.retry.should_retry_status(response.status, attempt),
                Err(e) => self.retry.should_retry_error(e, attempt),
            };
            if !retry {
                return result;
            }

            self.delay
                .sleep(self.retry.backoff.delay_for_attempt(attempt))
                .await;
            attempt += 1;
        }
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn join_url(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder<'a> {
    client: &'a FetchClient,
    builder: RequestBuilder,
}

impl<'a> ClientRequestBuilder<'a> {
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    pub fn query<T: Serialize + ?Sized>(mut self, params: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.query(params)?;
        Ok(self)
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.builder = self.builder.body(body);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.builder = self.builder.text(text);
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    pub fn build(self) -> HttpRequest {
        self.builder.build()
    }

    /// Send the request and return the response.
    pub async fn send(self) -> Result<Response, FetchError> {
        let client = self.client;
        client.execute(self.builder.build()).await
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, Method, Response, RetryPolicy};
}

#[cfg(test)]
mod tests {
    use super::testing::{MockTransport, RecordingDelay};
    use super::*;
    use futures::executor::block_on;
    use std::time::Duration;

    fn client(transport: &Arc<MockTransport>, delay: &Arc<RecordingDelay>) -> FetchClient {
        FetchClient::with_transport(transport.clone())
            .with_delay(delay.clone())
            .with_base_url("https://api.test/")
    }

    #[test]
    fn test_base_url_and_default_headers() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, serde_json::json!({"ok": true}));
        let delay = Arc::new(RecordingDelay::new());

        let response = block_on(
            client(&transport, &delay)
                .with_default_header("ngrok-skip-browser-warning", "true")
                .get("/p1/get-all-products")
                .send(),
        )
        .unwrap();
        assert!(response.is_success());

        let sent = &transport.requests()[0];
        assert_eq!(sent.url, "https://api.test/p1/get-all-products");
        assert_eq!(sent.header("ngrok-skip-browser-warning"), Some("true"));
    }

    #[test]
    fn test_absolute_url_ignores_base() {
        let transport = Arc::new(MockTransport::new());
        let delay = Arc::new(RecordingDelay::new());
        let request = client(&transport, &delay)
            .get("https://other.test/x")
            .build();
        assert_eq!(request.url, "https://other.test/x");
    }

    #[test]
    fn test_retries_server_errors_then_succeeds() {
        let transport = Arc::new(MockTransport::new());
        transport
            .push_status(503)
            .push_error(FetchError::RequestError("reset".into()))
            .push_json(200, serde_json::json!({}));
        let delay = Arc::new(RecordingDelay::new());

        let client = client(&transport, &delay).with_retry(
            RetryPolicy::new(3).with_backoff(BackoffStrategy::Fixed(Duration::from_millis(10))),
        );
        let response = block_on(client.get("thing").send()).unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(transport.request_count(), 3);
        assert_eq!(delay.recorded(), vec![Duration::from_millis(10); 2]);
    }

    #[test]
    fn test_gives_up_after_max_attempts() {
        let transport = Arc::new(MockTransport::new());
        transport.push_status(500).push_status(502);
        let delay = Arc::new(RecordingDelay::new());

        let client = client(&transport, &delay).with_retry(RetryPolicy::new(1));
        let response = block_on(client.get("thing").send()).unwrap();

        assert_eq!(response.status, 502);
        assert_eq!(transport.request_count(), 2);
    }

    #[test]
    fn test_client_errors_are_not_retried() {
        let transport = Arc::new(MockTransport::new());
        transport.push_status(404);
        let delay = Arc::new(RecordingDelay::new());

        let client = client(&transport, &delay).with_retry(RetryPolicy::new(3));
        let response = block_on(client.get("missing").send()).unwrap();

        assert!(response.is_not_found());
        assert_eq!(transport.request_count(), 1);
        assert!(delay.recorded().is_empty());
    }
}
