use thiserror::Error;
use std::io;

/// Custom result type alias for the application
pub type Result<T> = std::result::Result<T, DocifyError>;

/// Errors that can occur while analyzing repositories and generating documentation
#[derive(Debug, Error)]
pub enum DocifyError {
    /// I/O errors
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing/serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Base64 payloads returned by the contents API
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// TOML configuration parse errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing, expired or rejected GitHub credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller may not access the requested resource
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// API rate limit exceeded errors
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// GitHub API errors not covered by a more specific variant
    #[error("GitHub API error ({status}): {message}")]
    GitHubApi {
        /// HTTP status returned by GitHub
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// A documentation provider rejected or failed a request
    #[error("{provider} error: {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Failure description
        message: String,
    },

    /// A documentation provider is temporarily overloaded
    #[error("{0} API is currently overloaded. Please try again in a few minutes.")]
    ProviderOverloaded(String),

    /// No documentation provider has an API key configured
    #[error("No AI providers configured. Please set GEMINI_API_KEY or MISTRAL_API_KEY.")]
    NoProviders,

    /// Every configured provider failed
    #[error("All AI providers failed. Last error: {0}")]
    AllProvidersFailed(String),
}

impl DocifyError {
    /// Shorthand for a provider failure
    pub fn provider(provider: &str, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// Checks if this error is transient and retryable
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::RateLimitExceeded(_) | Self::ProviderOverloaded(_) | Self::IO(_) => true,
            _ => false,
        }
    }
}
