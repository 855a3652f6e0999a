use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{error_from_response, http_client, DocProvider};
use crate::config::ProviderConfig;
use crate::error::{DocifyError, Result};
use crate::prompts::PromptStyle;
use crate::utils::RetryPolicy;

const NAME: &str = "Mistral";

/// Mistral chat completions
pub struct MistralProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    /// A string, or content chunks for multimodal models
    #[serde(default)]
    content: Value,
}

impl MistralProvider {
    pub fn new(api_key: &str, settings: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(settings)?,
            api_key: api_key.to_string(),
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            retry: settings.retry.policy(),
        })
    }
}

#[async_trait]
impl DocProvider for MistralProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn prompt_style(&self) -> PromptStyle {
        PromptStyle::Concise
    }

    fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!("Requesting {} completion from {}", self.model, NAME);
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": [{ "role": "user", "content": prompt }]
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(NAME, response).await);
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| DocifyError::provider(NAME, "response contained no choices"))?;

        match content.as_str() {
            Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
            _ => Err(DocifyError::provider(NAME, "completion did not contain text")),
        }
    }
}
