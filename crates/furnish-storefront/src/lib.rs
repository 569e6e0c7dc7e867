//! Storefront services for FurnishAI.
//!
//! - [`CatalogService`]: full-catalog memo over the paginated product API
//! - [`ShoppingAssistant`]: initiate a search and poll its conversation
//! - [`ProductAdvisor`]: free-text product Q&A through a chat model
//! - wishlist storage backends for the CLI and the Spin workload
//!
//! [`Storefront`] wires all three services from one [`StorefrontConfig`].

pub mod advisor;
pub mod assistant;
pub mod catalog;
pub mod config;
pub mod error;
pub mod firestore;
pub mod wishlist;

pub use advisor::ProductAdvisor;
pub use assistant::{AssistantReply, PollPolicy, ShoppingAssistant};
pub use catalog::{CatalogPage, CatalogService};
pub use config::StorefrontConfig;
pub use error::StorefrontError;
pub use firestore::DocumentStore;
pub use wishlist::{FileWishlistStorage, SessionWishlistStorage};

use furnish_data::{default_transport, Delay, FetchClient, SystemDelay, Transport};
use furnish_observability::StructuredLogger;
use std::sync::Arc;

/// The storefront's services, built from one configuration.
pub struct Storefront {
    pub config: StorefrontConfig,
    pub catalog: CatalogService,
    pub assistant: ShoppingAssistant,
    pub advisor: ProductAdvisor,
}

impl Storefront {
    /// Services over the target's default transport.
    pub fn new(config: StorefrontConfig, logger: StructuredLogger) -> Self {
        Self::with_transport(config, default_transport(), Arc::new(SystemDelay), logger)
    }

    /// Services over an explicit transport and delay.
    pub fn with_transport(
        config: StorefrontConfig,
        transport: Arc<dyn Transport>,
        delay: Arc<dyn Delay>,
        logger: StructuredLogger,
    ) -> Self {
        let client = |base_url: &str| {
            FetchClient::with_transport(Arc::clone(&transport))
                .with_delay(Arc::clone(&delay))
                .with_base_url(base_url)
        };

        let catalog = CatalogService::new(
            client(&config.catalog.api_base_url),
            &config.catalog,
            logger.clone(),
        );

        let documents = DocumentStore::new(
            client(&config.assistant.firestore_base_url)
                .with_retry(config.catalog.retry_policy()),
            config.assistant.firestore_project_id.clone(),
            config.assistant.firestore_api_key.clone(),
            config.assistant.collection.clone(),
        );
        let assistant = ShoppingAssistant::new(
            client(config.assistant_api_base_url()),
            documents,
            PollPolicy::from(&config.assistant),
            logger.clone(),
        );

        let advisor = ProductAdvisor::new(client(&config.advisor.base_url), &config.advisor, logger);

        Self {
            config,
            catalog,
            assistant,
            advisor,
        }
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        AssistantReply, CatalogPage, CatalogService, ProductAdvisor, ShoppingAssistant,
        Storefront, StorefrontConfig, StorefrontError,
    };
}
