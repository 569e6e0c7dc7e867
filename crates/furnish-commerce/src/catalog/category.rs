//! Furniture categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A product category.
///
/// The upstream API sends free-form category strings. The four furniture
/// families the storefront filters on get their own variants; anything else
/// is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Sofas,
    Chairs,
    #[default]
    Tables,
    Beds,
    Other(String),
}

impl Category {
    /// Categories offered in the catalog filter bar, in display order.
    pub const FILTERABLE: [Category; 4] = [
        Category::Sofas,
        Category::Chairs,
        Category::Tables,
        Category::Beds,
    ];

    /// Parse an upstream category name.
    ///
    /// Matching is case-insensitive and accepts the singular spelling.
    /// A blank name falls back to the default category.
    pub fn parse(name: &str) -> Self {
        let trimmed = name.trim();
        match trimmed.to_lowercase().as_str() {
            "" => Category::default(),
            "sofa" | "sofas" => Category::Sofas,
            "chair" | "chairs" => Category::Chairs,
            "table" | "tables" => Category::Tables,
            "bed" | "beds" => Category::Beds,
            _ => Category::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Category::Sofas => "Sofas",
            Category::Chairs => "Chairs",
            Category::Tables => "Tables",
            Category::Beds => "Beds",
            Category::Other(name) => name,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::parse(&s)
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Category::parse(s)
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_families() {
        assert_eq!(Category::parse("Sofas"), Category::Sofas);
        assert_eq!(Category::parse("chair"), Category::Chairs);
        assert_eq!(Category::parse("TABLE"), Category::Tables);
        assert_eq!(Category::parse(" Beds "), Category::Beds);
    }

    #[test]
    fn test_blank_defaults_to_tables() {
        assert_eq!(Category::parse(""), Category::Tables);
        assert_eq!(Category::parse("   "), Category::Tables);
    }

    #[test]
    fn test_unknown_kept_verbatim() {
        let c = Category::parse("Outdoor Lounge");
        assert_eq!(c, Category::Other("Outdoor Lounge".to_string()));
        assert_eq!(c.to_string(), "Outdoor Lounge");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Category::Chairs).unwrap();
        assert_eq!(json, r#""Chairs""#);
        let back: Category = serde_json::from_str(r#""sofa""#).unwrap();
        assert_eq!(back, Category::Sofas);
    }
}
