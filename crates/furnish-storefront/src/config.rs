//! Storefront configuration.
//!
//! Loaded from TOML, then overridden key by key from the environment (CLI)
//! or from Spin variables (workload).

use crate::error::{Result, StorefrontError};
use furnish_data::{BackoffStrategy, RetryPolicy};
use furnish_observability::{LogFormat, LogLevel};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub advisor: AdvisorConfig,

    #[serde(default)]
    pub wishlist: WishlistConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Upstream product API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the product API, with trailing slash.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Products requested per upstream page.
    #[serde(default = "default_upstream_page_size")]
    pub upstream_page_size: u32,

    /// Pause after each upstream page.
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Products per catalog page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Retries for 5xx and dropped connections.
    #[serde(default = "default_retries")]
    pub retries: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            upstream_page_size: default_upstream_page_size(),
            page_delay_ms: default_page_delay_ms(),
            page_size: default_page_size(),
            retries: default_retries(),
        }
    }
}

impl CatalogConfig {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries)
    }
}

/// Search service and its conversation store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Initiate-search endpoint base; the catalog API when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    #[serde(default = "default_firestore_base_url")]
    pub firestore_base_url: String,

    #[serde(default)]
    pub firestore_project_id: String,

    /// Web API key for the document store.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub firestore_api_key: String,

    /// Collection holding conversation documents.
    #[serde(default = "default_collection")]
    pub collection: String,

    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,

    /// Linear backoff step between polls.
    #[serde(default = "default_poll_step_ms")]
    pub poll_step_ms: u64,

    /// Backoff ceiling.
    #[serde(default = "default_poll_max_ms")]
    pub poll_max_ms: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            firestore_base_url: default_firestore_base_url(),
            firestore_project_id: String::new(),
            firestore_api_key: String::new(),
            collection: default_collection(),
            poll_attempts: default_poll_attempts(),
            poll_step_ms: default_poll_step_ms(),
            poll_max_ms: default_poll_max_ms(),
        }
    }
}

impl AssistantConfig {
    pub fn poll_backoff(&self) -> BackoffStrategy {
        BackoffStrategy::Linear {
            step: Duration::from_millis(self.poll_step_ms),
            max: Duration::from_millis(self.poll_max_ms),
        }
    }
}

/// OpenAI-compatible chat completion endpoint for product Q&A.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    #[serde(default = "default_advisor_base_url")]
    pub base_url: String,

    #[serde(default = "default_advisor_model")]
    pub model: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            base_url: default_advisor_base_url(),
            model: default_advisor_model(),
            api_key: String::new(),
            temperature: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistConfig {
    /// Key-value store holding session wishlists (workload).
    #[serde(default = "default_kv_store")]
    pub kv_store: String,

    /// Cookie carrying the browser session id (workload).
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,

    /// Directory of the local wishlist file (CLI); the user data dir when
    /// unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
}

impl Default for WishlistConfig {
    fn default() -> Self {
        Self {
            kv_store: default_kv_store(),
            session_cookie: default_session_cookie(),
            data_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Parsed level, `Info` when unrecognized.
    pub fn level(&self) -> LogLevel {
        LogLevel::parse(&self.level).unwrap_or(LogLevel::Info)
    }

    pub fn format(&self) -> LogFormat {
        LogFormat::parse(&self.format).unwrap_or_default()
    }
}

fn default_api_base_url() -> String {
    "http://localhost:8000/".to_string()
}

fn default_upstream_page_size() -> u32 {
    100
}

fn default_page_delay_ms() -> u64 {
    200
}

fn default_page_size() -> usize {
    10
}

fn default_retries() -> u32 {
    1
}

fn default_firestore_base_url() -> String {
    "https://firestore.googleapis.com/v1/".to_string()
}

fn default_collection() -> String {
    "website_search".to_string()
}

fn default_poll_attempts() -> u32 {
    20
}

fn default_poll_step_ms() -> u64 {
    1000
}

fn default_poll_max_ms() -> u64 {
    5000
}

fn default_advisor_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_advisor_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_kv_store() -> String {
    "default".to_string()
}

fn default_session_cookie() -> String {
    "furnish_session".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

/// Override keys understood by [`StorefrontConfig::apply_overrides`].
pub const OVERRIDE_KEYS: &[&str] = &[
    "FURNISH_API_BASE_URL",
    "FURNISH_ASSISTANT_API_BASE_URL",
    "FURNISH_FIRESTORE_PROJECT_ID",
    "FURNISH_FIRESTORE_API_KEY",
    "FURNISH_ADVISOR_BASE_URL",
    "FURNISH_ADVISOR_MODEL",
    "FURNISH_ADVISOR_API_KEY",
    "FURNISH_LOG_LEVEL",
    "FURNISH_LOG_FORMAT",
];

impl StorefrontConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| StorefrontError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| StorefrontError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| StorefrontError::Config(e.to_string()))
    }

    /// Apply overrides from a key lookup such as `std::env::var` or Spin
    /// variables. Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("FURNISH_API_BASE_URL") {
            self.catalog.api_base_url = v;
        }
        if let Some(v) = get("FURNISH_ASSISTANT_API_BASE_URL") {
            self.assistant.api_base_url = Some(v);
        }
        if let Some(v) = get("FURNISH_FIRESTORE_PROJECT_ID") {
            self.assistant.firestore_project_id = v;
        }
        if let Some(v) = get("FURNISH_FIRESTORE_API_KEY") {
            self.assistant.firestore_api_key = v;
        }
        if let Some(v) = get("FURNISH_ADVISOR_BASE_URL") {
            self.advisor.base_url = v;
        }
        if let Some(v) = get("FURNISH_ADVISOR_MODEL") {
            self.advisor.model = v;
        }
        if let Some(v) = get("FURNISH_ADVISOR_API_KEY") {
            self.advisor.api_key = v;
        }
        if let Some(v) = get("FURNISH_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = get("FURNISH_LOG_FORMAT") {
            self.logging.format = v;
        }
    }

    /// Base URL for initiate-search.
    pub fn assistant_api_base_url(&self) -> &str {
        self.assistant
            .api_base_url
            .as_deref()
            .unwrap_or(&self.catalog.api_base_url)
    }

    /// Problems that would make a service fail at runtime.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for (name, url) in [
            ("catalog.api_base_url", self.catalog.api_base_url.as_str()),
            ("assistant.firestore_base_url", self.assistant.firestore_base_url.as_str()),
            ("advisor.base_url", self.advisor.base_url.as_str()),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                problems.push(format!("{} must be an http(s) URL, got {:?}", name, url));
            }
        }
        if !self.catalog.api_base_url.ends_with('/') {
            problems.push("catalog.api_base_url must end with '/'".to_string());
        }
        if self.catalog.upstream_page_size == 0 {
            problems.push("catalog.upstream_page_size must be at least 1".to_string());
        }
        if self.catalog.page_size == 0 {
            problems.push("catalog.page_size must be at least 1".to_string());
        }
        if self.assistant.poll_attempts == 0 {
            problems.push("assistant.poll_attempts must be at least 1".to_string());
        }
        if self.assistant.firestore_project_id.trim().is_empty() {
            problems.push("assistant.firestore_project_id is not set".to_string());
        }
        if self.advisor.api_key.trim().is_empty() {
            problems.push("advisor.api_key is not set (FURNISH_ADVISOR_API_KEY)".to_string());
        }
        if LogLevel::parse(&self.logging.level).is_none() {
            problems.push(format!("logging.level {:?} is not a level", self.logging.level));
        }
        if LogFormat::parse(&self.logging.format).is_none() {
            problems.push(format!("logging.format {:?} is not json or human", self.logging.format));
        }

        problems
    }
}
