mod env_manager;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::error::{DocifyError, Result};
use crate::utils::retry::RetryPolicy;

pub use env_manager::{apply_env_overrides, get_env_value};

/// Main configuration struct for the application
///
/// Every section falls back to its defaults, so a config file only needs to
/// name the settings it changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub REST API settings
    pub github: GitHubSettings,
    /// Hosted text-generation providers
    pub providers: ProviderSettings,
    /// Limits applied while analyzing a repository
    pub analysis: AnalysisLimits,
    /// Prompt template overrides
    pub prompts: PromptSettings,
    /// HTTP server settings
    pub server: ServerSettings,
}

/// Settings for the GitHub REST API client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubSettings {
    /// Base URL of the REST API
    pub api_base: String,
    /// Personal access token used by the command-line tool
    pub token: Option<String>,
    /// Value of the `User-Agent` header
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Page size for paginated listings
    pub per_page: u32,
    /// Upper bound on pages fetched for one listing
    pub max_pages: u32,
}

/// Settings for all documentation providers
///
/// A provider table only overrides the fields it names; everything else keeps
/// that provider's own defaults (see [`ProviderConfig::gemini`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ProviderSettingsFile")]
pub struct ProviderSettings {
    /// Google Gemini
    pub gemini: ProviderConfig,
    /// Mistral
    pub mistral: ProviderConfig,
}

/// Settings for a single documentation provider
#[derive(Debug, Clone, Serialize)]
pub struct ProviderConfig {
    /// API key; the provider is disabled without one
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// Base URL of the provider API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Retry behaviour for overloaded responses
    pub retry: RetrySettings,
}

/// `[providers]` as written in a config file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProviderSettingsFile {
    gemini: ProviderOverrides,
    mistral: ProviderOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProviderOverrides {
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    retry: RetryOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RetryOverrides {
    max_attempts: Option<u32>,
    base_delay_ms: Option<u64>,
}

impl ProviderOverrides {
    fn apply(self, mut base: ProviderConfig) -> ProviderConfig {
        if self.api_key.is_some() {
            base.api_key = self.api_key;
        }
        base.model = self.model.unwrap_or(base.model);
        base.base_url = self.base_url.unwrap_or(base.base_url);
        base.timeout_secs = self.timeout_secs.unwrap_or(base.timeout_secs);
        base.retry.max_attempts = self.retry.max_attempts.unwrap_or(base.retry.max_attempts);
        base.retry.base_delay_ms = self.retry.base_delay_ms.unwrap_or(base.retry.base_delay_ms);
        base
    }
}

impl From<ProviderSettingsFile> for ProviderSettings {
    fn from(file: ProviderSettingsFile) -> Self {
        Self {
            gemini: file.gemini.apply(ProviderConfig::gemini()),
            mistral: file.mistral.apply(ProviderConfig::mistral()),
        }
    }
}

/// Retry settings in a serializable form
#[derive(Debug, Clone, Serialize)]
pub struct RetrySettings {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the second attempt, doubled after every retry
    pub base_delay_ms: u64,
}

/// Limits applied while analyzing a repository
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisLimits {
    /// Number of tree entries kept in the analysis structure
    pub max_structure_entries: usize,
    /// Number of distinct dependencies kept
    pub max_dependencies: usize,
}

/// Optional files replacing the built-in prompt templates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettings {
    /// Template used by providers asking for the detailed prompt
    pub detailed_template: Option<PathBuf>,
    /// Template used by providers asking for the concise prompt
    pub concise_template: Option<PathBuf>,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Socket address to bind
    pub bind: String,
    /// Generation requests allowed per caller per window
    pub rate_limit_requests: usize,
    /// Length of the rate limit window in seconds
    pub rate_limit_window_secs: u64,
}

fn default_provider_timeout() -> u64 {
    120
}

impl Config {
    /// Loads configuration from the default config file location
    ///
    /// If the config file doesn't exist the defaults are used. Environment
    /// variables are applied on top in both cases.
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::read_file(&path)?,
            _ => Self::default(),
        };
        apply_env_overrides(&mut config);
        Ok(config)
    }

    /// Loads configuration from an explicit file, then applies environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut config = Self::read_file(path)?;
        apply_env_overrides(&mut config);
        Ok(config)
    }

    /// Location of the per-user config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docify").join("config.toml"))
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DocifyError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Retrieves the GitHub token from the configuration
    pub fn github_token(&self) -> Result<&str> {
        self.github
            .token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| DocifyError::Config("GitHub token not configured (set GITHUB_TOKEN)".into()))
    }
}

impl RetrySettings {
    /// Converts the settings into a policy usable by the retry helper
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }
}

impl ProviderConfig {
    /// Default settings for Gemini: three attempts with a one second base delay
    pub fn gemini() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_secs: default_provider_timeout(),
            retry: RetrySettings { max_attempts: 3, base_delay_ms: 1000 },
        }
    }

    /// Default settings for Mistral: a single attempt
    pub fn mistral() -> Self {
        Self {
            api_key: None,
            model: "mistral-large-latest".to_string(),
            base_url: "https://api.mistral.ai".to_string(),
            timeout_secs: default_provider_timeout(),
            retry: RetrySettings { max_attempts: 1, base_delay_ms: 1000 },
        }
    }

    /// The configured key, ignoring blank values
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            token: None,
            user_agent: "docify".to_string(),
            timeout_secs: 30,
            per_page: 100,
            max_pages: 10,
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            gemini: ProviderConfig::gemini(),
            mistral: ProviderConfig::mistral(),
        }
    }
}

impl Default for AnalysisLimits {
    fn default() -> Self {
        Self {
            max_structure_entries: 50,
            max_dependencies: 20,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
            rate_limit_requests: 10,
            rate_limit_window_secs: 60,
        }
    }
}
