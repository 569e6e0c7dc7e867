//! FurnishAI storefront - Spin HTTP workload.
//!
//! Serves the server-rendered storefront:
//! - `/` catalog with search, category filter and pagination
//! - `/product/{id}` detail page with reviews and product Q&A
//! - `/wishlist` and `/wishlist/toggle`, keyed by a session cookie
//! - `/assistant?q=` AI shopping assistant recommendations
//! - `/api/chat-history/{document_id}` raw conversation JSON
//!
//! Routing and rendering live in [`app`] and run on any target; only the
//! component entry point below is `wasm32`-specific.

pub mod app;
pub mod http;
pub mod pages;
pub mod query;

pub use app::App;
pub use http::{PageRequest, PageResponse};

#[cfg(target_arch = "wasm32")]
mod component {
    use anyhow::Context;
    use spin_sdk::http::{IntoResponse, Method as SpinMethod, Request, Response};
    use spin_sdk::http_component;

    use furnish_cache::Cache;
    use furnish_data::Method;
    use furnish_observability::{RequestId, StructuredLogger};
    use furnish_storefront::{Storefront, StorefrontConfig};

    use crate::{App, PageRequest};

    /// Configuration from Spin variables (`furnish_api_base_url`, ...).
    fn load_config() -> StorefrontConfig {
        let mut config = StorefrontConfig::default();
        config.apply_overrides(|key| spin_sdk::variables::get(&key.to_lowercase()).ok());
        config
    }

    fn method(method: &SpinMethod) -> Option<Method> {
        match method {
            SpinMethod::Get => Some(Method::Get),
            SpinMethod::Post => Some(Method::Post),
            SpinMethod::Put => Some(Method::Put),
            SpinMethod::Patch => Some(Method::Patch),
            SpinMethod::Delete => Some(Method::Delete),
            SpinMethod::Head => Some(Method::Head),
            SpinMethod::Options => Some(Method::Options),
            _ => None,
        }
    }

    #[http_component]
    async fn handle(req: Request) -> anyhow::Result<impl IntoResponse> {
        let Some(method) = method(req.method()) else {
            return Ok(Response::builder()
                .status(405)
                .body("Method Not Allowed")
                .build());
        };

        let config = load_config();
        let logger = StructuredLogger::new(RequestId::generate())
            .with_component("storefront")
            .with_route(req.path())
            .with_min_level(config.logging.level())
            .with_format(config.logging.format());

        let cache = Cache::open(&config.wishlist.kv_store)
            .with_context(|| format!("opening key-value store {}", config.wishlist.kv_store))?;

        let mut request = PageRequest::new(method, req.path(), req.query())
            .with_body(req.body().to_vec());
        if let Some(cookie) = req.header("cookie").and_then(|v| v.as_str()) {
            request = request.with_header("cookie", cookie);
        }

        // A fresh instance per request, so the catalog memo is per request here.
        let app = App::new(Storefront::new(config, logger.clone()), cache, logger);
        let page = app.handle(request).await;

        let mut response = Response::builder();
        response.status(page.status);
        for (name, value) in &page.headers {
            response.header(name.as_str(), value.as_str());
        }
        Ok(response.body(page.body).build())
    }
}
