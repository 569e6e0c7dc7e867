//! Conversation transcript stored by the search service.

use crate::catalog::{Category, Product};
use crate::error::CommerceError;
use crate::ids::ProductId;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Who wrote a conversation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Author {
    User,
    /// The assistant or any other non-user participant.
    Other(String),
}

impl Author {
    pub fn is_user(&self) -> bool {
        matches!(self, Author::User)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Author::User => "user",
            Author::Other(name) => name,
        }
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Author {
    fn from(s: String) -> Self {
        if s == "user" {
            Author::User
        } else {
            Author::Other(s)
        }
    }
}

impl From<Author> for String {
    fn from(author: Author) -> Self {
        match author {
            Author::User => "user".to_string(),
            Author::Other(name) => name,
        }
    }
}

/// Product snapshot embedded in a search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(deserialize_with = "whole_u64")]
    pub id: u64,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub categories: Vec<String>,
    pub features: Vec<String>,
    pub image: String,
    #[serde(deserialize_with = "whole_i64")]
    pub quantity: i64,
}

/// Document stores may hand back `4.0` where `4` was written.
#[derive(Deserialize)]
#[serde(untagged)]
enum WholeNumber {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

fn whole_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match WholeNumber::deserialize(deserializer)? {
        WholeNumber::Unsigned(n) => Ok(n),
        WholeNumber::Signed(n) => u64::try_from(n)
            .map_err(|_| D::Error::custom(format!("expected a non-negative number, got {}", n))),
        WholeNumber::Float(f) if f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 => {
            Ok(f as u64)
        }
        WholeNumber::Float(f) => Err(D::Error::custom(format!(
            "expected a whole non-negative number, got {}",
            f
        ))),
    }
}

fn whole_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match WholeNumber::deserialize(deserializer)? {
        WholeNumber::Unsigned(n) => i64::try_from(n)
            .map_err(|_| D::Error::custom(format!("number out of range: {}", n))),
        WholeNumber::Signed(n) => Ok(n),
        WholeNumber::Float(f)
            if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 =>
        {
            Ok(f as i64)
        }
        WholeNumber::Float(f) => Err(D::Error::custom(format!("expected a whole number, got {}", f))),
    }
}

impl Snapshot {
    /// Product view for rendering a result card.
    pub fn to_product(&self) -> Product {
        Product {
            id: ProductId::from(self.id),
            name: self.title.clone(),
            category: self
                .categories
                .first()
                .map(|name| Category::parse(name))
                .unwrap_or_default(),
            price: self.price,
            description: self.description.clone(),
            image_url: self.image.clone(),
            reviews: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub snapshot: Snapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub author: Author,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<SearchResult>>,
}

impl ConversationEntry {
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            author: Author::User,
            message: message.into(),
            results: None,
        }
    }

    pub fn reply(author: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            author: Author::from(author.into()),
            message: message.into(),
            results: None,
        }
    }

    pub fn with_results(mut self, results: Vec<SearchResult>) -> Self {
        self.results = Some(results);
        self
    }

    /// Result snapshots as product views, in result order.
    pub fn products(&self) -> Vec<Product> {
        self.results
            .iter()
            .flatten()
            .map(|result| result.snapshot.to_product())
            .collect()
    }
}

/// A conversation transcript, replaced wholesale on every read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub conversation: Vec<ConversationEntry>,
}

impl Conversation {
    pub fn new(entries: Vec<ConversationEntry>) -> Self {
        Self {
            conversation: entries,
        }
    }

    /// Validate raw entries one by one.
    ///
    /// The first entry that does not match the expected shape fails the
    /// whole read with its index.
    pub fn from_entries(raw: Vec<serde_json::Value>) -> Result<Self, CommerceError> {
        let entries = raw
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value::<ConversationEntry>(value).map_err(|e| {
                    CommerceError::InvalidConversationEntry {
                        index,
                        reason: e.to_string(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.conversation
    }

    pub fn is_empty(&self) -> bool {
        self.conversation.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conversation.len()
    }

    /// The service has answered once the last entry is not the user's.
    pub fn is_answered(&self) -> bool {
        self.conversation
            .last()
            .is_some_and(|entry| !entry.author.is_user())
    }

    /// The last entry, when it is a reply.
    pub fn latest_reply(&self) -> Option<&ConversationEntry> {
        self.conversation
            .last()
            .filter(|entry| !entry.author.is_user())
    }
}
