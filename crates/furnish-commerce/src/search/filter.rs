//! Search term and category filtering over the cached catalog.

use crate::catalog::{Category, Product};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category restriction for the catalog view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Parse a filter value from a query string. `All` and blank mean no
    /// restriction.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(Category::parse(trimmed))
        }
    }

    /// Filter bar buttons, in display order.
    pub fn options() -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(Category::FILTERABLE.iter().cloned().map(CategoryFilter::Only))
            .collect()
    }

    pub fn accepts(&self, category: &Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(category) => category.as_str(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Search term plus category filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFilter {
    pub term: String,
    pub category: CategoryFilter,
}

impl CatalogFilter {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            category: CategoryFilter::All,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = CategoryFilter::Only(category);
        self
    }

    pub fn with_category_filter(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    /// True when neither a term nor a category restricts the view.
    pub fn is_empty(&self) -> bool {
        self.term.is_empty() && self.category == CategoryFilter::All
    }

    /// Category match and case-insensitive substring match on the name.
    pub fn matches(&self, product: &Product) -> bool {
        self.category.accepts(&product.category)
            && product
                .name
                .to_lowercase()
                .contains(&self.term.to_lowercase())
    }

    /// Matching products, in catalog order.
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ProductId;

    fn product(id: &str, name: &str, category: Category) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            category,
            price: 100.0,
            description: String::new(),
            image_url: String::new(),
            reviews: Vec::new(),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("1", "Oak Dining Table", Category::Tables),
            product("2", "Velvet Sofa", Category::Sofas),
            product("3", "Oak Armchair", Category::Chairs),
            product("4", "Oak Bed Frame", Category::Beds),
        ]
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let products = catalog();
        let filter = CatalogFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&products).len(), 4);
    }

    #[test]
    fn test_term_is_case_insensitive_and_keeps_order() {
        let products = catalog();
        let ids: Vec<&str> = CatalogFilter::new("OAK")
            .apply(&products)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3", "4"]);
    }

    #[test]
    fn test_term_and_category_combine() {
        let products = catalog();
        let matched = CatalogFilter::new("oak")
            .with_category(Category::Chairs)
            .apply(&products);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "Oak Armchair");
    }

    #[test]
    fn test_term_only_matches_name() {
        let mut products = catalog();
        products[1].description = "oak legs".to_string();
        assert_eq!(CatalogFilter::new("legs").apply(&products).len(), 0);
    }

    #[test]
    fn test_category_filter_parse() {
        assert_eq!(CategoryFilter::parse(""), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("ALL"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("beds"), CategoryFilter::Only(Category::Beds));
    }

    #[test]
    fn test_filter_bar_order() {
        let labels: Vec<String> = CategoryFilter::options()
            .iter()
            .map(|o| o.label().to_string())
            .collect();
        assert_eq!(labels, vec!["All", "Sofas", "Chairs", "Tables", "Beds"]);
    }
}
