use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{error_from_response, http_client, DocProvider};
use crate::config::ProviderConfig;
use crate::error::{DocifyError, Result};
use crate::prompts::PromptStyle;
use crate::utils::RetryPolicy;

const NAME: &str = "Gemini";

/// Google Gemini through the `generateContent` endpoint
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default, rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiProvider {
    pub fn new(api_key: &str, settings: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(settings)?,
            api_key: api_key.to_string(),
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            retry: settings.retry.policy(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl DocProvider for GeminiProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn prompt_style(&self) -> PromptStyle {
        PromptStyle::Detailed
    }

    fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!("Requesting {} completion from {}", self.model, NAME);
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&json!({
                "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(NAME, response).await);
        }

        let body: GenerateContentResponse = response.json().await?;
        let candidate = body
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| DocifyError::provider(NAME, "response contained no candidates"))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(DocifyError::provider(
                NAME,
                format!(
                    "empty completion (finish reason: {})",
                    candidate.finish_reason.as_deref().unwrap_or("unknown")
                ),
            ));
        }
        Ok(text)
    }
}
