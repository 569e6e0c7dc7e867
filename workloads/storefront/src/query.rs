//! Query string and form parsing.

use furnish_commerce::prelude::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Parse a query string or form body, falling back to defaults on garbage.
///
/// A repeated key keeps its last value.
pub fn parse<T: DeserializeOwned + Default>(input: &str) -> T {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(input).unwrap_or_default();
    serde_urlencoded::to_string(last_values(pairs))
        .ok()
        .and_then(|encoded| serde_urlencoded::from_str(&encoded).ok())
        .unwrap_or_default()
}

pub fn parse_form<T: DeserializeOwned + Default>(body: &[u8]) -> T {
    parse(&String::from_utf8_lossy(body))
}

fn last_values(pairs: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut kept: Vec<(String, String)> = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        match kept.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => kept.push((key, value)),
        }
    }
    kept
}

/// `GET /?page=&q=&category=`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogQuery {
    pub page: String,
    pub q: String,
    pub category: String,
    pub notice: String,
}

impl CatalogQuery {
    /// Requested page; anything unparseable means the first page.
    pub fn page(&self) -> usize {
        self.page.trim().parse().unwrap_or(1).max(1)
    }

    pub fn filter(&self) -> CatalogFilter {
        CatalogFilter::new(self.q.trim()).with_category_filter(CategoryFilter::parse(&self.category))
    }
}

/// `GET /assistant?q=`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssistantQuery {
    pub q: String,
}

/// Query of pages that can show a wishlist notice.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NoticeQuery {
    pub notice: String,
}

/// `POST /product/{id}/ask`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AskForm {
    pub question: String,
}

/// `POST /wishlist/toggle`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ToggleForm {
    pub product_id: String,
    pub return_to: String,
}

impl ToggleForm {
    /// Local path to return to. Anything that could leave the site goes home.
    pub fn return_path(&self) -> &str {
        let path = self.return_to.as_str();
        if path.starts_with('/')
            && !path.starts_with("//")
            && !path.contains('\\')
            && !path.chars().any(char::is_control)
        {
            path
        } else {
            "/"
        }
    }
}

/// Query code carried through the toggle redirect.
pub fn notice_code(change: WishlistChange) -> &'static str {
    match change {
        WishlistChange::Added => "added",
        WishlistChange::Removed => "removed",
    }
}

pub fn notice_text(code: &str) -> Option<&'static str> {
    match code {
        "added" => Some(WishlistChange::Added.notice()),
        "removed" => Some(WishlistChange::Removed.notice()),
        _ => None,
    }
}

/// Append `key=value` to a local path, replacing an existing `key`.
pub fn with_param(path: &str, key: &str, value: &str) -> String {
    let (base, query) = path.split_once('?').unwrap_or((path, ""));
    let prefix = format!("{}=", key);
    let mut params: Vec<String> = query
        .split('&')
        .filter(|p| !p.is_empty() && !p.starts_with(&prefix))
        .map(str::to_string)
        .collect();
    params.push(format!("{}{}", prefix, urlencoding::encode(value)));
    format!("{}?{}", base, params.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_query() {
        let query: CatalogQuery = parse("page=3&q=Oak+Table&category=chairs");
        assert_eq!(query.page(), 3);
        let filter = query.filter();
        assert_eq!(filter.term, "Oak Table");
        assert_eq!(filter.category, CategoryFilter::Only(Category::Chairs));
    }

    #[test]
    fn test_bad_page_is_first_page() {
        assert_eq!(parse::<CatalogQuery>("page=abc").page(), 1);
        assert_eq!(parse::<CatalogQuery>("page=0").page(), 1);
        assert_eq!(parse::<CatalogQuery>("").page(), 1);
        assert!(parse::<CatalogQuery>("").filter().is_empty());
    }

    #[test]
    fn test_repeated_key_keeps_last_value() {
        let query: CatalogQuery = parse("q=a&q=b&page=2&category=chairs");
        assert_eq!(query.q, "b");
        assert_eq!(query.page(), 2);
        assert_eq!(query.filter().category, CategoryFilter::Only(Category::Chairs));

        let form: AskForm = parse_form(b"question=one&question=two");
        assert_eq!(form.question, "two");
    }

    #[test]
    fn test_toggle_form_return_path() {
        let form: ToggleForm = parse_form(b"product_id=4&return_to=%2Fproduct%2F4");
        assert_eq!(form.product_id, "4");
        assert_eq!(form.return_path(), "/product/4");

        let form: ToggleForm =
            parse_form(b"product_id=4&return_to=%2F%0D%0ALocation%3A%20https%3A%2F%2Fevil.test");
        assert_eq!(form.return_path(), "/");

        for bad in [
            "https://evil.test/",
            "//evil.test",
            "",
            "/\\evil",
            "/\r\nSet-Cookie: furnish_session=evil",
            "/product/4\0",
        ] {
            let form = ToggleForm {
                product_id: "4".to_string(),
                return_to: bad.to_string(),
            };
            assert_eq!(form.return_path(), "/");
        }
    }

    #[test]
    fn test_with_param_replaces_existing() {
        assert_eq!(with_param("/", "notice", "added"), "/?notice=added");
        assert_eq!(
            with_param("/?page=2&notice=removed", "notice", "added"),
            "/?page=2&notice=added"
        );
    }

    #[test]
    fn test_notice_roundtrip() {
        assert_eq!(
            notice_text(notice_code(WishlistChange::Added)),
            Some("Added to wishlist!")
        );
        assert_eq!(notice_text("bogus"), None);
    }
}
