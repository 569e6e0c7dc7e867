//! Wire types of the upstream product API.

use crate::catalog::{Category, Product, Review};
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// A product as `p1/get-all-products` returns it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiProduct {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub reviews: Option<Vec<Review>>,
}

impl ApiProduct {
    /// Map into the storefront view.
    ///
    /// The first upstream category wins; a product without one is filed
    /// under the default category.
    pub fn into_product(self) -> Product {
        let category = self
            .categories
            .first()
            .map(|name| Category::parse(name))
            .unwrap_or_default();

        Product {
            id: ProductId::from(self.id),
            name: self.title,
            category,
            price: self.price,
            description: self.description,
            image_url: self.image,
            reviews: self.reviews.unwrap_or_default(),
        }
    }
}

/// One page of the upstream product listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductsPage {
    pub products: Vec<ApiProduct>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl ProductsPage {
    /// Number of pages the listing spans, as reported by this page.
    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 1;
        }
        self.total.div_ceil(self.page_size as u64) as u32
    }
}
