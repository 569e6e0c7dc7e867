//! Product and review types.

use crate::catalog::Category;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// Image shown when a product has no image of its own.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/800x600.png";

/// A customer review, owned by its product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: u64,
    pub author: String,
    /// Rating from 0 to 5.
    pub rating: f32,
    pub comment: String,
}

impl Review {
    /// Number of the five star slots that render filled.
    pub fn filled_stars(&self) -> usize {
        (0..5).filter(|slot| (*slot as f32) < self.rating).count()
    }

    /// Render the rating as text stars.
    pub fn render_stars(&self) -> String {
        let filled = self.filled_stars();
        format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
    }
}

/// A product as the storefront shows it.
///
/// Products are immutable once fetched; the catalog never edits them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    pub price: f64,
    pub description: String,
    pub image_url: String,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Product {
    /// Price formatted for display, e.g. `$1299.00`.
    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price)
    }

    /// The product image, or the placeholder when none is set.
    pub fn image_or_placeholder(&self) -> &str {
        if self.image_url.trim().is_empty() {
            PLACEHOLDER_IMAGE_URL
        } else {
            &self.image_url
        }
    }

    /// Average review rating, if there are reviews.
    pub fn average_rating(&self) -> Option<f32> {
        if self.reviews.is_empty() {
            return None;
        }
        let total: f32 = self.reviews.iter().map(|r| r.rating).sum();
        Some(total / self.reviews.len() as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(image_url: &str, ratings: &[f32]) -> Product {
        Product {
            id: ProductId::new("1"),
            name: "Harbor Sofa".to_string(),
            category: Category::Sofas,
            price: 1299.5,
            description: "Three-seater".to_string(),
            image_url: image_url.to_string(),
            reviews: ratings
                .iter()
                .enumerate()
                .map(|(i, r)| Review {
                    id: i as u64,
                    author: "Ana".to_string(),
                    rating: *r,
                    comment: "Comfy".to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_display_price() {
        assert_eq!(product("", &[]).display_price(), "$1299.50");
    }

    #[test]
    fn test_placeholder_image() {
        assert_eq!(product("", &[]).image_or_placeholder(), PLACEHOLDER_IMAGE_URL);
        assert_eq!(product("https://img/x.png", &[]).image_or_placeholder(), "https://img/x.png");
    }

    #[test]
    fn test_filled_stars() {
        let p = product("", &[0.0, 3.0, 4.5, 5.0, 7.0]);
        let stars: Vec<usize> = p.reviews.iter().map(Review::filled_stars).collect();
        assert_eq!(stars, vec![0, 3, 5, 5, 5]);
        assert_eq!(p.reviews[1].render_stars(), "★★★☆☆");
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(product("", &[]).average_rating(), None);
        assert_eq!(product("", &[4.0, 2.0]).average_rating(), Some(3.0));
    }

    #[test]
    fn test_serializes_image_url_camel_case() {
        let json = serde_json::to_value(product("u", &[])).unwrap();
        assert_eq!(json["imageUrl"], "u");
        assert_eq!(json["category"], "Sofas");
    }
}
