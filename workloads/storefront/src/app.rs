//! Routing and request handling.

use std::sync::Arc;
use std::time::Instant;

use furnish_cache::{Cache, SessionId};
use furnish_commerce::prelude::*;
use furnish_data::Method;
use furnish_observability::StructuredLogger;
use furnish_storefront::{SessionWishlistStorage, Storefront, StorefrontError};
use serde_json::json;

use crate::http::{PageRequest, PageResponse};
use crate::pages::{self, AssistantOutcome, CatalogView, Chrome, QuestionOutcome};
use crate::query::{self, AskForm, AssistantQuery, CatalogQuery, NoticeQuery, ToggleForm};

const EMPTY_QUESTION: &str = "Please enter a question.";
const ADVISOR_APOLOGY: &str = "Sorry, I couldn't answer that question right now.";

type SessionWishlist = WishlistStore<SessionWishlistStorage>;

#[derive(Debug, Clone, PartialEq)]
enum Route {
    Catalog,
    Product(ProductId),
    AskProduct(ProductId),
    Wishlist,
    ToggleWishlist,
    Assistant,
    ChatHistory(String),
}

impl Route {
    /// Route for a path and the one method it answers to.
    fn parse(path: &str) -> Option<(Route, Method)> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => (Route::Catalog, Method::Get),
            ["product", id] => (Route::Product(ProductId::new(decode_segment(id)?)), Method::Get),
            ["product", id, "ask"] => (Route::AskProduct(ProductId::new(decode_segment(id)?)), Method::Post),
            ["wishlist"] => (Route::Wishlist, Method::Get),
            ["wishlist", "toggle"] => (Route::ToggleWishlist, Method::Post),
            ["assistant"] => (Route::Assistant, Method::Get),
            ["api", "chat-history", id] => (Route::ChatHistory(decode_segment(id)?), Method::Get),
            _ => return None,
        };
        Some(route)
    }
}

fn decode_segment(raw: &str) -> Option<String> {
    urlencoding::decode(raw).ok().map(|s| s.into_owned())
}

/// The storefront web application.
///
/// One `App` serves any number of requests; the catalog memo lives as long
/// as the app does.
pub struct App {
    storefront: Storefront,
    cache: Cache,
    session_cookie: String,
    logger: StructuredLogger,
}

impl App {
    pub fn new(storefront: Storefront, cache: Cache, logger: StructuredLogger) -> Self {
        let session_cookie = storefront.config.wishlist.session_cookie.clone();
        Self {
            storefront,
            cache,
            session_cookie,
            logger,
        }
    }

    pub fn storefront(&self) -> &Storefront {
        &self.storefront
    }

    pub async fn handle(&self, request: PageRequest) -> PageResponse {
        let start = Instant::now();

        let (session_id, fresh_session) = self.session(&request);
        let mut wishlist = WishlistStore::new(
            SessionWishlistStorage::new(self.cache.clone(), session_id.clone()),
            self.logger.child("wishlist"),
        );

        let mut response = match Route::parse(&request.path) {
            Some((route, method)) if method == request.method => {
                self.dispatch(route, &request, &mut wishlist).await
            }
            Some((_, method)) => {
                PageResponse::html(405, "Method Not Allowed".to_string())
                    .with_header("allow", method.as_str())
            }
            None => self.not_found(&request, &wishlist),
        };

        if fresh_session {
            response = response.with_header(
                "set-cookie",
                format!(
                    "{}={}; Path=/; HttpOnly; SameSite=Lax",
                    self.session_cookie, session_id
                ),
            );
        }

        self.logger
            .info_builder("Request handled")
            .field("method", request.method.as_str())
            .field("path", request.path.as_str())
            .field_i64("status", i64::from(response.status))
            .duration_ms("duration_ms", start.elapsed())
            .emit();

        response.with_header("x-request-id", self.logger.request_id().as_str())
    }

    /// Session from the cookie, or a new one when it is missing or invalid.
    fn session(&self, request: &PageRequest) -> (SessionId, bool) {
        match request
            .cookie(&self.session_cookie)
            .map(SessionId::parse)
        {
            Some(Ok(id)) => (id, false),
            Some(Err(e)) => {
                self.logger
                    .warn_builder("Replacing invalid session cookie")
                    .field("error", e.to_string())
                    .emit();
                (SessionId::generate(), true)
            }
            None => (SessionId::generate(), true),
        }
    }

    async fn dispatch(
        &self,
        route: Route,
        request: &PageRequest,
        wishlist: &mut SessionWishlist,
    ) -> PageResponse {
        match route {
            Route::Catalog => self.catalog(request, wishlist).await,
            Route::Product(id) => self.product(request, &id, wishlist, None).await,
            Route::AskProduct(id) => {
                let form: AskForm = query::parse_form(&request.body);
                self.product(request, &id, wishlist, Some(form.question)).await
            }
            Route::Wishlist => self.wishlist(request, wishlist).await,
            Route::ToggleWishlist => self.toggle(request, wishlist),
            Route::Assistant => self.assistant(request, wishlist).await,
            Route::ChatHistory(document_id) => self.chat_history(&document_id).await,
        }
    }

    fn chrome(&self, request: &PageRequest, wishlist: &SessionWishlist) -> Chrome {
        let notice: NoticeQuery = query::parse(&request.query);
        Chrome {
            wishlist_count: wishlist.len(),
            assistant_query: String::new(),
            notice: query::notice_text(&notice.notice).map(str::to_string),
        }
    }

    async fn catalog(&self, request: &PageRequest, wishlist: &SessionWishlist) -> PageResponse {
        let query: CatalogQuery = query::parse(&request.query);
        let filter = query.filter();

        let (products, pagination) = if filter.is_empty() {
            let page = self.storefront.catalog.get_products(query.page(), None).await;
            let pagination = Page::<()> {
                items: Vec::new(),
                total_pages: page.total_pages,
                current_page: page.current_page,
            };
            (page.products, Some(pagination))
        } else {
            let all = self
                .storefront
                .catalog
                .all_products()
                .await
                .unwrap_or_else(|_| Arc::new(Vec::new()));
            let matches: Vec<Product> = filter.apply(&all).into_iter().cloned().collect();
            (matches, None)
        };

        let return_to = request.return_path();
        let content = pages::render_catalog(&CatalogView {
            products: products.iter().collect(),
            wishlist: wishlist.wishlist(),
            filter: &filter,
            pagination,
            return_to: &return_to,
        });

        PageResponse::html(
            200,
            pages::render_layout("Our Collection", &self.chrome(request, wishlist), &content),
        )
    }

    async fn product(
        &self,
        request: &PageRequest,
        id: &ProductId,
        wishlist: &SessionWishlist,
        question: Option<String>,
    ) -> PageResponse {
        let chrome = self.chrome(request, wishlist);
        let Some(product) = self.storefront.catalog.get_product(id).await else {
            return PageResponse::html(
                404,
                pages::render_layout("Product not found", &chrome, &pages::render_product_not_found()),
            );
        };

        let outcome = match question {
            Some(question) => Some(self.answer(&product, question.trim().to_string()).await),
            None => None,
        };

        let content = pages::render_product(&product, wishlist.contains(&product.id), outcome.as_ref());
        PageResponse::html(200, pages::render_layout(&product.name, &chrome, &content))
    }

    async fn answer(&self, product: &Product, question: String) -> QuestionOutcome {
        match self.storefront.advisor.answer(&product.name, &question).await {
            Ok(answer) => QuestionOutcome::Answered { question, answer },
            Err(StorefrontError::InvalidInput(_)) => QuestionOutcome::Failed {
                question,
                message: EMPTY_QUESTION.to_string(),
            },
            Err(e) => {
                self.logger
                    .warn_builder("Product question failed")
                    .field("product_id", product.id.as_str())
                    .field("error", e.to_string())
                    .emit();
                QuestionOutcome::Failed {
                    question,
                    message: ADVISOR_APOLOGY.to_string(),
                }
            }
        }
    }

    async fn wishlist(&self, request: &PageRequest, wishlist: &SessionWishlist) -> PageResponse {
        let products = self.storefront.catalog.wishlisted(wishlist.wishlist()).await;
        let content = pages::render_wishlist(&products);
        PageResponse::html(
            200,
            pages::render_layout("Your Wishlist", &self.chrome(request, wishlist), &content),
        )
    }

    fn toggle(&self, request: &PageRequest, wishlist: &mut SessionWishlist) -> PageResponse {
        let form: ToggleForm = query::parse_form(&request.body);
        let return_to = form.return_path();

        let product_id = form.product_id.trim();
        if product_id.is_empty() {
            return PageResponse::redirect(return_to);
        }

        let change = wishlist.toggle(ProductId::from(product_id));
        self.logger
            .debug_builder("Wishlist toggled")
            .field("product_id", product_id)
            .field_bool("added", change == WishlistChange::Added)
            .emit();

        PageResponse::redirect(query::with_param(return_to, "notice", query::notice_code(change)))
    }

    async fn assistant(&self, request: &PageRequest, wishlist: &SessionWishlist) -> PageResponse {
        let query: AssistantQuery = query::parse(&request.query);
        let question = query.q.trim();
        if question.is_empty() {
            return PageResponse::redirect("/");
        }

        let outcome = match self.storefront.assistant.ask(question).await {
            Ok(reply) => AssistantOutcome::Reply(reply),
            Err(e) => {
                self.logger
                    .error_builder("Assistant request failed")
                    .field("error", e.to_string())
                    .emit();
                AssistantOutcome::Failed
            }
        };

        let mut chrome = self.chrome(request, wishlist);
        chrome.assistant_query = question.to_string();
        let content = pages::render_assistant(question, &outcome, wishlist.wishlist());
        PageResponse::html(200, pages::render_layout("AI Recommendations", &chrome, &content))
    }

    async fn chat_history(&self, document_id: &str) -> PageResponse {
        match self.storefront.assistant.chat_history(document_id).await {
            Ok(conversation) => match serde_json::to_value(&conversation) {
                Ok(body) => PageResponse::json(200, &body),
                Err(e) => PageResponse::json(500, &json!({"error": e.to_string()})),
            },
            Err(e @ StorefrontError::InvalidDocumentId(_)) => {
                PageResponse::json(400, &json!({"error": e.to_string()}))
            }
            Err(e) => PageResponse::json(502, &json!({"error": e.to_string()})),
        }
    }

    fn not_found(&self, request: &PageRequest, wishlist: &SessionWishlist) -> PageResponse {
        PageResponse::html(
            404,
            pages::render_layout(
                "Page not found",
                &self.chrome(request, wishlist),
                &pages::render_not_found(&request.path),
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use furnish_data::testing::{MockTransport, RecordingDelay};
    use furnish_observability::RequestId;
    use furnish_storefront::StorefrontConfig;
    use futures::executor::block_on;
    use serde_json::Value;

    fn api_product(id: u64, title: &str, category: &str) -> Value {
        json!({
            "id": id,
            "title": title,
            "description": format!("{} description", title),
            "price": 100.0 + id as f64,
            "image": "",
            "categories": [category],
            "features": [],
            "reviews": [{"id": 1, "author": "Robin", "rating": 4, "comment": "Solid"}]
        })
    }

    fn catalog_page(count: u64) -> Value {
        let products: Vec<Value> = (1..=count)
            .map(|id| {
                let category = if id % 2 == 0 { "Chairs" } else { "Sofas" };
                api_product(id, &format!("Item {}", id), category)
            })
            .collect();
        json!({"products": products, "page": 1, "page_size": 100, "total": count})
    }

    fn app(transport: &Arc<MockTransport>) -> App {
        let mut config = StorefrontConfig::default();
        config.catalog.api_base_url = "https://shop.test/".to_string();
        config.assistant.firestore_project_id = "furnish".to_string();
        config.assistant.poll_attempts = 2;
        config.advisor.api_key = "sk-test".to_string();

        let logger = StructuredLogger::new(RequestId::from_string("req-test"));
        let storefront = Storefront::with_transport(
            config,
            transport.clone(),
            Arc::new(RecordingDelay::new()),
            logger.clone(),
        );
        App::new(storefront, Cache::in_memory(), logger)
    }

    fn get(uri: &str) -> PageRequest {
        PageRequest::from_uri(Method::Get, uri)
    }

    fn post(uri: &str, body: &str) -> PageRequest {
        PageRequest::from_uri(Method::Post, uri).with_body(body.as_bytes().to_vec())
    }

    fn session_cookie(response: &PageResponse) -> String {
        let header = response.header("set-cookie").unwrap();
        header.split(';').next().unwrap().to_string()
    }

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("/"), Some((Route::Catalog, Method::Get)));
        assert_eq!(
            Route::parse("/product/a%20b"),
            Some((Route::Product(ProductId::from("a b")), Method::Get))
        );
        assert_eq!(
            Route::parse("/product/3/ask"),
            Some((Route::AskProduct(ProductId::from("3")), Method::Post))
        );
        assert_eq!(
            Route::parse("/api/chat-history/doc-1"),
            Some((Route::ChatHistory("doc-1".to_string()), Method::Get))
        );
        assert_eq!(Route::parse("/wishlist/"), Some((Route::Wishlist, Method::Get)));
        assert_eq!(Route::parse("/cart"), None);
    }

    #[test]
    fn test_catalog_paginates_unfiltered_view() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, catalog_page(12));
        let app = app(&transport);

        let response = block_on(app.handle(get("/?page=2")));
        let html = response.body_text();
        assert_eq!(response.status, 200);
        assert!(html.contains("Our Collection"));
        assert!(html.contains("Item 11"));
        assert!(!html.contains("Item 1<"));
        assert!(html.contains(r#"aria-current="page">2</span>"#));
        assert!(response.header("set-cookie").unwrap().contains("furnish_session=sess_"));
        assert_eq!(response.header("x-request-id"), Some("req-test"));
    }

    #[test]
    fn test_catalog_filter_shows_all_matches() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, catalog_page(12));
        let app = app(&transport);

        let html = block_on(app.handle(get("/?category=chairs"))).body_text();
        assert_eq!(html.matches(r#"class="product-card""#).count(), 6);
        assert!(!html.contains("pagination-page"));

        let html = block_on(app.handle(get("/?q=zebra"))).body_text();
        assert!(html.contains("No Products Found"));
        assert_eq!(transport.request_count(), 1);
    }

    #[test]
    fn test_catalog_failure_renders_empty_state() {
        let transport = Arc::new(MockTransport::new());
        transport.push_status(502).push_status(502);
        let app = app(&transport);

        let response = block_on(app.handle(get("/")));
        assert_eq!(response.status, 200);
        assert!(response.body_text().contains("No Products Found"));
    }

    #[test]
    fn test_product_detail_and_not_found() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, catalog_page(3));
        let app = app(&transport);

        let response = block_on(app.handle(get("/product/2")));
        let html = response.body_text();
        assert_eq!(response.status, 200);
        assert!(html.contains("<h1>Item 2</h1>"));
        assert!(html.contains("Customer Reviews (1)"));
        assert!(html.contains("by Robin"));

        let response = block_on(app.handle(get("/product/99")));
        assert_eq!(response.status, 404);
        assert!(response.body_text().contains("Product not found"));
    }

    #[test]
    fn test_ask_renders_answer() {
        let transport = Arc::new(MockTransport::new());
        transport
            .push_json(200, catalog_page(3))
            .push_json(
                200,
                json!({"choices": [{"message": {"role": "assistant", "content": " Seats three. "}}]}),
            );
        let app = app(&transport);

        let response = block_on(app.handle(post("/product/1/ask", "question=How+many+seats%3F")));
        let html = response.body_text();
        assert_eq!(response.status, 200);
        assert!(html.contains("How many seats?</textarea>"));
        assert!(html.contains(r#"<div class="advisor-answer">Seats three.</div>"#));
    }

    #[test]
    fn test_ask_with_empty_question() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, catalog_page(1));
        let app = app(&transport);

        let html = block_on(app.handle(post("/product/1/ask", "question=+"))).body_text();
        assert!(html.contains(EMPTY_QUESTION));
        assert_eq!(transport.request_count(), 1);
    }

    #[test]
    fn test_toggle_persists_in_session() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, catalog_page(3));
        let app = app(&transport);

        let response = block_on(app.handle(post(
            "/wishlist/toggle",
            "product_id=3&return_to=%2Fproduct%2F3",
        )));
        assert_eq!(response.status, 303);
        assert_eq!(response.header("location"), Some("/product/3?notice=added"));
        let cookie = session_cookie(&response);

        let response = block_on(app.handle(get("/wishlist?notice=added").with_header("cookie", cookie.as_str())));
        let html = response.body_text();
        assert!(response.header("set-cookie").is_none());
        assert!(html.contains("Added to wishlist!"));
        assert!(html.contains("Item 3"));
        assert!(html.contains(r#"<span class="wishlist-badge">1</span>"#));

        let response = block_on(app.handle(
            post("/wishlist/toggle", "product_id=3&return_to=%2Fwishlist")
                .with_header("cookie", cookie.as_str()),
        ));
        assert_eq!(response.header("location"), Some("/wishlist?notice=removed"));

        let html = block_on(app.handle(get("/wishlist").with_header("cookie", cookie.as_str()))).body_text();
        assert!(html.contains("Your wishlist is empty"));
    }

    #[test]
    fn test_toggle_rejects_offsite_return() {
        let transport = Arc::new(MockTransport::new());
        let app = app(&transport);

        let response = block_on(app.handle(post(
            "/wishlist/toggle",
            "product_id=3&return_to=https%3A%2F%2Fevil.test",
        )));
        assert_eq!(response.header("location"), Some("/?notice=added"));
    }

    #[test]
    fn test_invalid_session_cookie_is_replaced() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, catalog_page(0));
        let app = app(&transport);

        let response = block_on(app.handle(get("/wishlist").with_header("cookie", "furnish_session=../../etc")));
        assert!(response.header("set-cookie").unwrap().starts_with("furnish_session=sess_"));
    }

    #[test]
    fn test_assistant_page() {
        let transport = Arc::new(MockTransport::new());
        transport
            .push_json(200, json!({"document_id": "doc-1"}))
            .push_json(200, json!({"fields": {"conversation": {"arrayValue": {"values": [
                {"mapValue": {"fields": {
                    "author": {"stringValue": "user"},
                    "message": {"stringValue": "small sofa"}
                }}},
                {"mapValue": {"fields": {
                    "author": {"stringValue": "assistant"},
                    "message": {"stringValue": "Have a look at these."}
                }}}
            ]}}}}));
        let app = app(&transport);

        let html = block_on(app.handle(get("/assistant?q=small+sofa"))).body_text();
        assert!(html.contains("AI Recommendations"));
        assert!(html.contains("Have a look at these."));
        assert!(html.contains(r#"value="small sofa""#));
    }

    #[test]
    fn test_assistant_failure_apologizes() {
        let transport = Arc::new(MockTransport::new());
        transport.push_status(500).push_status(500);
        let app = app(&transport);

        let html = block_on(app.handle(get("/assistant?q=lamp"))).body_text();
        assert!(html.contains(pages::ASSISTANT_APOLOGY));
    }

    #[test]
    fn test_empty_assistant_query_redirects_home() {
        let transport = Arc::new(MockTransport::new());
        let app = app(&transport);

        let response = block_on(app.handle(get("/assistant?q=")));
        assert_eq!(response.status, 303);
        assert_eq!(response.header("location"), Some("/"));
    }

    #[test]
    fn test_chat_history_api() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, json!({"fields": {"conversation": {"arrayValue": {"values": [
            {"mapValue": {"fields": {
                "author": {"stringValue": "user"},
                "message": {"stringValue": "hi"}
            }}}
        ]}}}}));
        let app = app(&transport);

        let response = block_on(app.handle(get("/api/chat-history/doc-1")));
        assert_eq!(response.status, 200);
        assert_eq!(response.header("content-type"), Some("application/json"));
        let body: Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["conversation"][0]["author"], "user");
        assert_eq!(body["conversation"][0]["message"], "hi");

        let response = block_on(app.handle(get("/api/chat-history/__bad__")));
        assert_eq!(response.status, 400);
    }

    #[test]
    fn test_wrong_method_and_unknown_path() {
        let transport = Arc::new(MockTransport::new());
        let app = app(&transport);

        let response = block_on(app.handle(get("/wishlist/toggle")));
        assert_eq!(response.status, 405);
        assert_eq!(response.header("allow"), Some("POST"));

        let response = block_on(app.handle(get("/cart")));
        assert_eq!(response.status, 404);
        assert!(response.body_text().contains("Page not found"));
    }
}
