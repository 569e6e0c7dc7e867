//! Shopping assistant: submit a query, then poll the conversation until the
//! search service replies.

use crate::config::AssistantConfig;
use crate::error::{Result, StorefrontError};
use crate::firestore::DocumentStore;
use furnish_commerce::prelude::*;
use furnish_data::{BackoffStrategy, Delay, FetchClient};
use furnish_observability::StructuredLogger;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

const INITIATE_PATH: &str = "p1/initiate-search";

/// How long to wait for a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Conversation reads before giving up.
    pub max_attempts: u32,
    pub backoff: BackoffStrategy,
}

impl Default for PollPolicy {
    fn default() -> Self {
        AssistantConfig::default().into()
    }
}

impl From<AssistantConfig> for PollPolicy {
    fn from(config: AssistantConfig) -> Self {
        Self::from(&config)
    }
}

impl From<&AssistantConfig> for PollPolicy {
    fn from(config: &AssistantConfig) -> Self {
        Self {
            max_attempts: config.poll_attempts.max(1),
            backoff: config.poll_backoff(),
        }
    }
}

#[derive(Serialize)]
struct InitiateRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct InitiateResponse {
    #[serde(alias = "id")]
    document_id: String,
}

/// The assistant's answer to one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantReply {
    pub document_id: String,
    pub message: String,
    /// Result cards, in the order the service ranked them.
    pub products: Vec<Product>,
    pub conversation: Conversation,
}

pub struct ShoppingAssistant {
    api: FetchClient,
    documents: DocumentStore,
    poll: PollPolicy,
    delay: Arc<dyn Delay>,
    logger: StructuredLogger,
}

impl ShoppingAssistant {
    /// `api` must carry the search service base URL.
    pub fn new(
        api: FetchClient,
        documents: DocumentStore,
        poll: PollPolicy,
        logger: StructuredLogger,
    ) -> Self {
        let delay = api.delay();
        Self {
            api,
            documents,
            poll,
            delay,
            logger: logger.child("assistant"),
        }
    }

    /// Submit a query and return the id of its conversation document.
    pub async fn initiate(&self, query: &str) -> Result<String> {
        let query = query.trim();
        if query.is_empty() {
            return Err(StorefrontError::InvalidInput(
                "query must not be empty".to_string(),
            ));
        }

        let response: InitiateResponse = self
            .api
            .post(INITIATE_PATH)
            .json(&InitiateRequest { query })?
            .send()
            .await?
            .error_for_status()?
            .json()?;

        if response.document_id.trim().is_empty() {
            return Err(StorefrontError::Malformed(
                "initiate-search returned an empty document id".to_string(),
            ));
        }

        self.logger
            .info_builder("Search initiated")
            .field("document_id", response.document_id.as_str())
            .emit();
        Ok(response.document_id)
    }

    /// Read the full conversation. A missing document is an empty one.
    pub async fn chat_history(&self, document_id: &str) -> Result<Conversation> {
        let result = self.read_conversation(document_id).await;
        if let Err(e) = &result {
            self.logger
                .error_builder("Failed to read chat history")
                .field("document_id", document_id)
                .field("error", e.to_string())
                .emit();
        }
        result
    }

    async fn read_conversation(&self, document_id: &str) -> Result<Conversation> {
        let Some(mut fields) = self.documents.get(document_id).await? else {
            return Ok(Conversation::default());
        };

        match fields.remove("conversation") {
            None | Some(serde_json::Value::Null) => Ok(Conversation::default()),
            Some(serde_json::Value::Array(entries)) => Ok(Conversation::from_entries(entries)?),
            Some(_) => Err(StorefrontError::Malformed(
                "conversation is not a list".to_string(),
            )),
        }
    }

    /// Poll until the last entry is not the user's.
    ///
    /// Read errors end the wait immediately; only an unanswered
    /// conversation is polled again.
    pub async fn await_reply(&self, document_id: &str) -> Result<Conversation> {
        let started = Instant::now();

        for attempt in 0..self.poll.max_attempts {
            let conversation = self.chat_history(document_id).await?;
            if conversation.is_answered() {
                self.logger
                    .info_builder("Assistant replied")
                    .field("document_id", document_id)
                    .field_i64("attempts", attempt as i64 + 1)
                    .duration_ms("duration_ms", started.elapsed())
                    .emit();
                return Ok(conversation);
            }

            if attempt + 1 < self.poll.max_attempts {
                let wait = self.poll.backoff.delay_for_attempt(attempt);
                self.logger
                    .debug_builder("Waiting for assistant")
                    .field("document_id", document_id)
                    .field_i64("attempt", attempt as i64 + 1)
                    .duration_ms("wait_ms", wait)
                    .emit();
                self.delay.sleep(wait).await;
            }
        }

        self.logger
            .warn_builder("Assistant did not reply")
            .field("document_id", document_id)
            .field_i64("attempts", self.poll.max_attempts as i64)
            .emit();
        Err(StorefrontError::NoReply {
            attempts: self.poll.max_attempts,
        })
    }

    /// Submit a query and wait for the reply.
    pub async fn ask(&self, query: &str) -> Result<AssistantReply> {
        let document_id = self.initiate(query).await?;
        let conversation = self.await_reply(&document_id).await?;

        let (message, products) = match conversation.latest_reply() {
            Some(entry) => (entry.message.clone(), entry.products()),
            None => (String::new(), Vec::new()),
        };

        Ok(AssistantReply {
            document_id,
            message,
            products,
            conversation,
        })
    }
}
