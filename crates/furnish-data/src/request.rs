//! HTTP request builder.

use crate::FetchError;
use serde::Serialize;
use std::collections::BTreeMap;

/// HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    /// Convert to HTTP method string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

/// A fully built request, ready for a [`Transport`](crate::Transport).
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Body parsed as JSON.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_slice(body).ok())
    }
}

/// A builder for constructing HTTP requests.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: String,
    query: Vec<String>,
    headers: BTreeMap<String, String>,
    body: Option<Vec<u8>>,
}

impl RequestBuilder {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Append URL-encoded query parameters.
    ///
    /// Accepts anything `serde_urlencoded` can serialize: a struct, a map or
    /// a slice of pairs.
    pub fn query<T: Serialize + ?Sized>(mut self, params: &T) -> Result<Self, FetchError> {
        let encoded = serde_urlencoded::to_string(params)?;
        if !encoded.is_empty() {
            self.query.push(encoded);
        }
        Ok(self)
    }

    /// Set the request body as raw bytes.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the request body as a string.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.headers
            .entry("Content-Type".to_string())
            .or_insert_with(|| "text/plain".to_string());
        self.body = Some(text.into().into_bytes());
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, FetchError> {
        let json = serde_json::to_vec(value)?;
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self.body = Some(json);
        Ok(self)
    }

    pub fn bearer_auth(self, token: impl AsRef<str>) -> Self {
        self.header("Authorization", format!("Bearer {}", token.as_ref()))
    }

    pub fn accept(self, content_type: impl Into<String>) -> Self {
        self.header("Accept", content_type)
    }

    pub fn build(self) -> HttpRequest {
        let url = if self.query.is_empty() {
            self.url
        } else {
            let separator = if self.url.contains('?') { '&' } else { '?' };
            format!("{}{}{}", self.url, separator, self.query.join("&"))
        };

        HttpRequest {
            method: self.method,
            url,
            headers: self.headers,
            body: self.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_encoded_and_appended() {
        let request = RequestBuilder::new(Method::Get, "https://api.test/p1/get-all-products")
            .query(&[("page", "2"), ("page_size", "100")])
            .unwrap()
            .query(&[("q", "oak table")])
            .unwrap()
            .build();
        assert_eq!(
            request.url,
            "https://api.test/p1/get-all-products?page=2&page_size=100&q=oak+table"
        );
    }

    #[test]
    fn test_query_extends_existing_query() {
        let request = RequestBuilder::new(Method::Get, "https://db.test/doc?key=abc")
            .query(&[("mask", "conversation")])
            .unwrap()
            .build();
        assert_eq!(request.url, "https://db.test/doc?key=abc&mask=conversation");
    }

    #[test]
    fn test_json_sets_content_type() {
        let request = RequestBuilder::new(Method::Post, "https://api.test/p1/initiate-search")
            .json(&serde_json::json!({"query": "sofa"}))
            .unwrap()
            .build();
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.json_body().unwrap()["query"], "sofa");
    }

    #[test]
    fn test_bearer_auth_header() {
        let request = RequestBuilder::new(Method::Get, "https://x")
            .bearer_auth("tok")
            .build();
        assert_eq!(request.header("authorization"), Some("Bearer tok"));
    }
}
