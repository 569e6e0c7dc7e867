//! Product Q&A through an OpenAI-compatible chat completion endpoint.
//!
//! The model answers from its own knowledge of the named product; nothing
//! from the catalog is retrieved into the prompt beyond the name.

use crate::config::AdvisorConfig;
use crate::error::{Result, StorefrontError};
use furnish_data::FetchClient;
use furnish_observability::StructuredLogger;
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// Customer-service prompt for one product question.
pub fn build_prompt(product_name: &str, question: &str) -> String {
    format!(
        "You are a customer service agent who specializes in answering questions about products.\n\
         \n\
         Product Name: {}\n\
         Question: {}\n\
         \n\
         Answer the question using your knowledge of the product. Be specific and provide as much detail as possible.\n\
         Keep your answer concise and to the point.",
        product_name, question
    )
}

pub struct ProductAdvisor {
    client: FetchClient,
    api_key: String,
    model: String,
    temperature: Option<f32>,
    logger: StructuredLogger,
}

impl ProductAdvisor {
    /// `client` must carry the completion API base URL.
    pub fn new(client: FetchClient, config: &AdvisorConfig, logger: StructuredLogger) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            logger: logger.child("advisor"),
        }
    }

    fn completions_url(&self) -> &'static str {
        match self.client.base_url() {
            Some(base) if base.contains("/chat/completions") => "",
            _ => "chat/completions",
        }
    }

    /// Answer a free-text question about a product.
    pub async fn answer(&self, product_name: &str, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(StorefrontError::InvalidInput(
                "question must not be empty".to_string(),
            ));
        }
        if self.api_key.trim().is_empty() {
            return Err(StorefrontError::Config(
                "No API key configured for the product advisor".to_string(),
            ));
        }

        let started = Instant::now();
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage::user(build_prompt(product_name, question))],
            temperature: self.temperature,
        };

        let result = self.complete(&request).await;
        match &result {
            Ok(answer) => self
                .logger
                .info_builder("Product question answered")
                .field("product", product_name)
                .field_i64("answer_chars", answer.chars().count() as i64)
                .duration_ms("duration_ms", started.elapsed())
                .emit(),
            Err(e) => self
                .logger
                .error_builder("Product question failed")
                .field("product", product_name)
                .field("error", e.to_string())
                .emit(),
        }
        result
    }

    async fn complete(&self, request: &ChatCompletionRequest<'_>) -> Result<String> {
        let completion: ChatCompletionResponse = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(request)?
            .send()
            .await?
            .error_for_status()?
            .json()?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|answer| !answer.is_empty())
            .ok_or_else(|| StorefrontError::Malformed("No response content".to_string()))
    }
}
