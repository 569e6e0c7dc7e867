//! Ordered set of wishlisted product ids.

use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// Product ids in insertion order, without duplicates.
///
/// Serializes as a flat JSON array of ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ProductId>", into = "Vec<ProductId>")]
pub struct Wishlist {
    ids: Vec<ProductId>,
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an id. Returns `false` if it was already present.
    pub fn add(&mut self, id: ProductId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove an id. Returns `false` if it was not present.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl From<Vec<ProductId>> for Wishlist {
    fn from(ids: Vec<ProductId>) -> Self {
        let mut wishlist = Wishlist::new();
        for id in ids {
            wishlist.add(id);
        }
        wishlist
    }
}

impl From<Wishlist> for Vec<ProductId> {
    fn from(wishlist: Wishlist) -> Self {
        wishlist.ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_dedups_and_keeps_order() {
        let mut wishlist = Wishlist::new();
        assert!(wishlist.add("3".into()));
        assert!(wishlist.add("1".into()));
        assert!(!wishlist.add("3".into()));
        assert_eq!(wishlist.ids(), &[ProductId::from("3"), ProductId::from("1")]);
    }

    #[test]
    fn test_remove() {
        let mut wishlist = Wishlist::from(vec!["1".into(), "2".into()]);
        assert!(wishlist.remove(&"1".into()));
        assert!(!wishlist.remove(&"1".into()));
        assert!(!wishlist.contains(&"1".into()));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn test_json_is_flat_list() {
        let wishlist = Wishlist::from(vec!["7".into(), "7".into(), "9".into()]);
        assert_eq!(serde_json::to_string(&wishlist).unwrap(), r#"["7","9"]"#);

        let back: Wishlist = serde_json::from_str(r#"["9","9","2"]"#).unwrap();
        assert_eq!(back.len(), 2);
    }
}
