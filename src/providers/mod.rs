//! Hosted text-generation services used to write documentation.

pub mod gemini;
pub mod mistral;

pub use gemini::GeminiProvider;
pub use mistral::MistralProvider;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};

use crate::config::{Config, ProviderConfig};
use crate::error::{DocifyError, Result};
use crate::prompts::PromptStyle;
use crate::utils::RetryPolicy;

/// A service that turns a prompt into documentation text
#[async_trait]
pub trait DocProvider: Send + Sync {
    /// Display name used in logs and responses
    fn name(&self) -> &str;

    /// The prompt this provider is given
    fn prompt_style(&self) -> PromptStyle;

    /// How overloaded responses are retried
    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::none()
    }

    /// Sends a single completion request
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Providers with an API key configured, in fallback order: Gemini, then Mistral
pub fn configured_providers(config: &Config) -> Result<Vec<Box<dyn DocProvider>>> {
    let mut providers: Vec<Box<dyn DocProvider>> = Vec::new();

    if let Some(key) = config.providers.gemini.api_key() {
        providers.push(Box::new(GeminiProvider::new(key, &config.providers.gemini)?));
    }
    if let Some(key) = config.providers.mistral.api_key() {
        providers.push(Box::new(MistralProvider::new(key, &config.providers.mistral)?));
    }

    Ok(providers)
}

pub(crate) fn http_client(settings: &ProviderConfig) -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()?)
}

/// Turns a failed provider response into an error, flagging overload conditions
pub(crate) async fn error_from_response(provider: &str, response: Response) -> DocifyError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("HTTP {}", status));

    if is_overload(status, &message) {
        DocifyError::ProviderOverloaded(provider.to_string())
    } else {
        DocifyError::provider(provider, format!("HTTP {}: {}", status.as_u16(), message))
    }
}

fn is_overload(status: StatusCode, message: &str) -> bool {
    status == StatusCode::SERVICE_UNAVAILABLE
        || status == StatusCode::TOO_MANY_REQUESTS
        || message.to_lowercase().contains("overloaded")
}

/// Whether a provider error is worth retrying
pub fn is_retryable(error: &DocifyError) -> bool {
    error.is_transient()
}
