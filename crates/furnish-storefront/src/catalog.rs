//! Catalog access over the paginated upstream product API.

use crate::config::CatalogConfig;
use crate::error::Result;
use furnish_commerce::prelude::*;
use furnish_data::{Delay, FetchClient};
use furnish_observability::StructuredLogger;
use futures::lock::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

const PRODUCTS_PATH: &str = "p1/get-all-products";

/// One catalog page plus the full list it was cut from.
#[derive(Debug, Clone)]
pub struct CatalogPage {
    pub products: Vec<Product>,
    pub total_pages: usize,
    pub current_page: usize,
    pub all_products: Arc<Vec<Product>>,
}

impl CatalogPage {
    fn empty() -> Self {
        Self {
            products: Vec::new(),
            total_pages: 0,
            current_page: 1,
            all_products: Arc::new(Vec::new()),
        }
    }
}

/// Reads the full catalog once and serves it from memory.
///
/// The memo is a single slot that is never invalidated. The slot's lock is
/// held for the whole upstream walk, so concurrent first loads wait for the
/// same walk instead of starting their own. A failed walk leaves the slot
/// empty and the next call starts over.
pub struct CatalogService {
    client: FetchClient,
    delay: Arc<dyn Delay>,
    upstream_page_size: u32,
    page_delay: Duration,
    page_size: usize,
    memo: Mutex<Option<Arc<Vec<Product>>>>,
    logger: StructuredLogger,
}

impl CatalogService {
    /// `client` must carry the product API base URL.
    pub fn new(client: FetchClient, config: &CatalogConfig, logger: StructuredLogger) -> Self {
        let client = client
            .with_default_header("ngrok-skip-browser-warning", "true")
            .with_retry(config.retry_policy());
        let delay = client.delay();

        Self {
            client,
            delay,
            upstream_page_size: config.upstream_page_size.max(1),
            page_delay: config.page_delay(),
            page_size: config.page_size.max(1),
            memo: Mutex::new(None),
            logger: logger.child("catalog"),
        }
    }

    /// Default products per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The whole catalog, in upstream order.
    pub async fn all_products(&self) -> Result<Arc<Vec<Product>>> {
        let mut slot = self.memo.lock().await;
        if let Some(products) = slot.as_ref() {
            return Ok(Arc::clone(products));
        }

        let started = Instant::now();
        match self.fetch_all().await {
            Ok(products) => {
                self.logger
                    .info_builder("Catalog loaded")
                    .field_i64("products", products.len() as i64)
                    .duration_ms("duration_ms", started.elapsed())
                    .emit();
                let products = Arc::new(products);
                *slot = Some(Arc::clone(&products));
                Ok(products)
            }
            Err(e) => {
                self.logger
                    .error_builder("Error fetching all products from API")
                    .field("error", e.to_string())
                    .emit();
                Err(e)
            }
        }
    }

    async fn fetch_all(&self) -> Result<Vec<Product>> {
        let mut products = Vec::new();
        let mut page: u32 = 1;
        let mut total_pages: u32 = 1;

        while page <= total_pages {
            let envelope: ProductsPage = self
                .client
                .get(PRODUCTS_PATH)
                .query(&[("page", page), ("page_size", self.upstream_page_size)])?
                .send()
                .await?
                .error_for_status()?
                .json()?;

            if page == 1 {
                total_pages = envelope.total_pages();
            }
            self.logger
                .debug_builder("Fetched product page")
                .field_i64("page", page as i64)
                .field_i64("total_pages", total_pages as i64)
                .field_i64("count", envelope.products.len() as i64)
                .emit();

            products.extend(envelope.products.into_iter().map(ApiProduct::into_product));
            self.delay.sleep(self.page_delay).await;
            page += 1;
        }

        Ok(products)
    }

    /// One page of the catalog. Failures are logged and yield an empty page.
    pub async fn get_products(&self, page: usize, page_size: Option<usize>) -> CatalogPage {
        let page_size = page_size.unwrap_or(self.page_size);
        match self.all_products().await {
            Ok(all) => {
                let slice = paginate(&all, page, page_size);
                CatalogPage {
                    products: slice.items,
                    total_pages: slice.total_pages,
                    current_page: slice.current_page,
                    all_products: all,
                }
            }
            Err(e) => {
                self.logger
                    .error_builder("Error fetching products from API")
                    .field("error", e.to_string())
                    .emit();
                CatalogPage::empty()
            }
        }
    }

    /// A product by id. Failures are logged and yield `None`.
    pub async fn get_product(&self, id: &ProductId) -> Option<Product> {
        match self.all_products().await {
            Ok(all) => all.iter().find(|p| &p.id == id).cloned(),
            Err(e) => {
                self.logger
                    .error_builder("Error fetching product")
                    .field("product_id", id.as_str())
                    .field("error", e.to_string())
                    .emit();
                None
            }
        }
    }

    /// Wishlisted products, in catalog order.
    pub async fn wishlisted(&self, wishlist: &Wishlist) -> Vec<Product> {
        match self.all_products().await {
            Ok(all) => all
                .iter()
                .filter(|p| wishlist.contains(&p.id))
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use furnish_data::testing::{MockTransport, RecordingDelay};
    use furnish_data::FetchError;
    use futures::executor::block_on;
    use serde_json::json;

    fn api_product(id: u64, title: &str, category: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": title,
            "description": "",
            "price": 100.0 + id as f64,
            "image": "",
            "categories": [category],
            "features": []
        })
    }

    fn page(products: Vec<serde_json::Value>, page: u32, total: u64) -> serde_json::Value {
        json!({"products": products, "page": page, "page_size": 2, "total": total})
    }

    fn service(
        transport: &Arc<MockTransport>,
        delay: &Arc<RecordingDelay>,
    ) -> CatalogService {
        let client = FetchClient::with_transport(transport.clone())
            .with_delay(delay.clone())
            .with_base_url("https://api.test/");
        let config = CatalogConfig {
            retries: 0,
            ..CatalogConfig::default()
        };
        CatalogService::new(client, &config, StructuredLogger::default())
    }

    fn queue_three_pages(transport: &MockTransport) {
        transport
            .push_json(200, page(vec![api_product(1, "Oak Table", "Tables"), api_product(2, "Sofa", "Sofas")], 1, 5))
            .push_json(200, page(vec![api_product(3, "Chair", "Chair"), api_product(4, "Bed", "Beds")], 2, 5))
            .push_json(200, page(vec![api_product(5, "Lamp", "")], 3, 5));
    }

    #[test]
    fn test_walks_every_page_in_order() {
        let transport = Arc::new(MockTransport::new());
        let delay = Arc::new(RecordingDelay::new());
        queue_three_pages(&transport);

        let products = block_on(service(&transport, &delay).all_products()).unwrap();
        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(products[2].category, Category::Chairs);
        assert_eq!(products[4].category, Category::Tables);

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(
            requests[1].url,
            "https://api.test/p1/get-all-products?page=2&page_size=100"
        );
        assert_eq!(requests[0].header("ngrok-skip-browser-warning"), Some("true"));
        assert_eq!(delay.recorded(), vec![Duration::from_millis(200); 3]);
    }

    #[test]
    fn test_memoizes_after_first_load() {
        let transport = Arc::new(MockTransport::new());
        let delay = Arc::new(RecordingDelay::new());
        queue_three_pages(&transport);
        let service = service(&transport, &delay);

        block_on(service.all_products()).unwrap();
        let again = block_on(service.all_products()).unwrap();
        assert_eq!(again.len(), 5);
        assert_eq!(transport.request_count(), 3);
    }

    #[test]
    fn test_concurrent_first_loads_share_one_walk() {
        let transport = Arc::new(MockTransport::new());
        let delay = Arc::new(RecordingDelay::new());
        queue_three_pages(&transport);
        let service = service(&transport, &delay);

        let (a, b) = block_on(async { futures::join!(service.all_products(), service.all_products()) });
        assert_eq!(a.unwrap().len(), 5);
        assert_eq!(b.unwrap().len(), 5);
        assert_eq!(transport.request_count(), 3);
    }

    #[test]
    fn test_failure_caches_nothing_and_retries_next_call() {
        let transport = Arc::new(MockTransport::new());
        let delay = Arc::new(RecordingDelay::new());
        transport
            .push_json(200, page(vec![api_product(1, "Oak Table", "Tables")], 1, 3))
            .push_status(502);
        let service = service(&transport, &delay);

        let err = block_on(service.all_products()).unwrap_err();
        assert!(matches!(
            err,
            crate::StorefrontError::Fetch(FetchError::HttpError { status: 502, .. })
        ));

        queue_three_pages(&transport);
        let products = block_on(service.all_products()).unwrap();
        assert_eq!(products.len(), 5);
    }

    #[test]
    fn test_empty_upstream() {
        let transport = Arc::new(MockTransport::new());
        let delay = Arc::new(RecordingDelay::new());
        transport.push_json(200, page(vec![], 1, 0));

        let products = block_on(service(&transport, &delay).all_products()).unwrap();
        assert!(products.is_empty());
        assert_eq!(transport.request_count(), 1);
    }

    #[test]
    fn test_get_products_pages_the_catalog() {
        let transport = Arc::new(MockTransport::new());
        let delay = Arc::new(RecordingDelay::new());
        queue_three_pages(&transport);
        let service = service(&transport, &delay);

        let page = block_on(service.get_products(2, Some(2)));
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.products.len(), 2);
        assert_eq!(page.products[0].id, "3");
        assert_eq!(page.all_products.len(), 5);

        let default_size = block_on(service.get_products(1, None));
        assert_eq!(default_size.products.len(), 5);
        assert_eq!(default_size.total_pages, 1);
    }

    #[test]
    fn test_get_products_failure_is_empty_page() {
        let transport = Arc::new(MockTransport::new());
        let delay = Arc::new(RecordingDelay::new());
        transport.push_error(FetchError::RequestError("connection refused".into()));

        let page = block_on(service(&transport, &delay).get_products(3, None));
        assert!(page.products.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn test_get_product_and_wishlisted() {
        let transport = Arc::new(MockTransport::new());
        let delay = Arc::new(RecordingDelay::new());
        queue_three_pages(&transport);
        let service = service(&transport, &delay);

        let product = block_on(service.get_product(&ProductId::new("4"))).unwrap();
        assert_eq!(product.name, "Bed");
        assert!(block_on(service.get_product(&ProductId::new("99"))).is_none());

        let wishlist = Wishlist::from(vec![ProductId::new("5"), ProductId::new("1")]);
        let ids: Vec<String> = block_on(service.wishlisted(&wishlist))
            .into_iter()
            .map(|p| p.id.into_inner())
            .collect();
        assert_eq!(ids, vec!["1", "5"]);
    }

    #[test]
    fn test_get_product_failure_is_none() {
        let transport = Arc::new(MockTransport::new());
        let delay = Arc::new(RecordingDelay::new());
        transport.push_json(200, json!({"unexpected": true}));

        assert!(block_on(service(&transport, &delay).get_product(&ProductId::new("1"))).is_none());
    }
}
