//! README generation with provider fallback.

use chrono::{DateTime, Utc};
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::analysis::RepoAnalysis;
use crate::config::Config;
use crate::error::{DocifyError, Result};
use crate::prompts::PromptTemplates;
use crate::providers::{self, DocProvider};
use crate::utils::retry_with_backoff;

/// A README produced by one of the providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedReadme {
    pub content: String,
    /// Name of the provider that wrote it
    pub provider: String,
    pub generated_at: DateTime<Utc>,
}

/// Tries each configured provider in order until one produces a README
pub struct ReadmeGenerator {
    providers: Vec<Box<dyn DocProvider>>,
    templates: PromptTemplates,
}

impl ReadmeGenerator {
    /// Builds the generator from every provider with an API key
    pub fn from_config(config: &Config) -> Result<Self> {
        let templates = PromptTemplates::from_settings(&config.prompts)?;
        Self::new(providers::configured_providers(config)?, templates)
    }

    /// Fails with [`DocifyError::NoProviders`] when `providers` is empty
    pub fn new(providers: Vec<Box<dyn DocProvider>>, templates: PromptTemplates) -> Result<Self> {
        if providers.is_empty() {
            return Err(DocifyError::NoProviders);
        }
        let generator = Self { providers, templates };
        info!("AI providers initialized: {}", generator.available_providers().join(", "));
        Ok(generator)
    }

    /// Names of the providers, in fallback order
    pub fn available_providers(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Generates a README, falling back to the next provider on failure
    pub async fn generate(&self, analysis: &RepoAnalysis) -> Result<GeneratedReadme> {
        let mut last_error: Option<DocifyError> = None;

        for provider in &self.providers {
            info!("Trying {} for README generation...", provider.name());
            let prompt = self.templates.render(provider.prompt_style(), analysis);

            let result = retry_with_backoff(provider.retry_policy(), providers::is_retryable, || {
                provider.complete(&prompt)
            })
            .await;

            match result {
                Ok(content) => {
                    info!("{} generated the README for {}/{}", provider.name(), analysis.owner, analysis.name);
                    return Ok(GeneratedReadme {
                        content,
                        provider: provider.name().to_string(),
                        generated_at: Utc::now(),
                    });
                }
                Err(e) => {
                    error!("{} failed: {}", provider.name(), e);
                    last_error = Some(e);
                }
            }
        }

        Err(DocifyError::AllProvidersFailed(
            last_error.map_or_else(|| "Unknown error".to_string(), |e| e.to_string()),
        ))
    }
}

/// Placeholder logo showing the project's initial
pub fn placeholder_logo_url(project_name: &str) -> String {
    let initial = project_name
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect::<String>())
        .unwrap_or_default();
    format!("https://via.placeholder.com/200x200/4F46E5/FFFFFF?text={}", initial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::RepoStats;
    use crate::prompts::PromptStyle;
    use crate::utils::RetryPolicy;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Scripted provider returning queued results
    struct ScriptedProvider {
        name: &'static str,
        style: PromptStyle,
        retry: RetryPolicy,
        results: Mutex<Vec<Result<String>>>,
        calls: Arc<AtomicU32>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedProvider {
        fn new(name: &'static str, style: PromptStyle, mut results: Vec<Result<String>>) -> Self {
            results.reverse();
            Self {
                name,
                style,
                retry: RetryPolicy::none(),
                results: Mutex::new(results),
                calls: Arc::new(AtomicU32::new(0)),
                prompts: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn with_retry(mut self, attempts: u32) -> Self {
            self.retry = RetryPolicy::new(attempts, Duration::from_millis(1));
            self
        }
    }

    #[async_trait]
    impl DocProvider for ScriptedProvider {
        fn name(&self) -> &str {
            self.name
        }

        fn prompt_style(&self) -> PromptStyle {
            self.style
        }

        fn retry_policy(&self) -> RetryPolicy {
            self.retry
        }

        async fn complete(&self, prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.results
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(DocifyError::provider(self.name, "script exhausted")))
        }
    }

    fn analysis() -> RepoAnalysis {
        RepoAnalysis {
            name: "demo".into(),
            owner: "octo".into(),
            description: Some("A demo".into()),
            language: "Rust".into(),
            languages: vec!["Rust".into()],
            structure: vec![],
            dependencies: vec![],
            package_json: None,
            has_tests: true,
            has_documentation: false,
            frameworks: vec![],
            features: vec![],
            repo_stats: RepoStats::default(),
        }
    }

    #[test]
    fn test_requires_a_provider() {
        let result = ReadmeGenerator::new(Vec::new(), PromptTemplates::default());
        assert!(matches!(result, Err(DocifyError::NoProviders)));
    }

    #[tokio::test]
    async fn test_first_success_wins() -> Result<()> {
        let second = ScriptedProvider::new("Second", PromptStyle::Concise, vec![Ok("unused".into())]);
        let second_calls = second.calls.clone();
        let generator = ReadmeGenerator::new(
            vec![
                Box::new(ScriptedProvider::new("First", PromptStyle::Detailed, vec![Ok("# demo".into())])),
                Box::new(second),
            ],
            PromptTemplates::default(),
        )?;

        let readme = generator.generate(&analysis()).await?;
        assert_eq!(readme.content, "# demo");
        assert_eq!(readme.provider, "First");
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_falls_back_with_the_fallback_prompt_style() -> Result<()> {
        let fallback = ScriptedProvider::new("Fallback", PromptStyle::Concise, vec![Ok("# from fallback".into())]);
        let prompts = fallback.prompts.clone();
        let generator = ReadmeGenerator::new(
            vec![
                Box::new(ScriptedProvider::new(
                    "Primary",
                    PromptStyle::Detailed,
                    vec![Err(DocifyError::provider("Primary", "invalid key"))],
                )),
                Box::new(fallback),
            ],
            PromptTemplates::default(),
        )?;

        let readme = generator.generate(&analysis()).await?;
        assert_eq!(readme.provider, "Fallback");
        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].starts_with("You are an expert technical writer"));
        Ok(())
    }

    #[tokio::test]
    async fn test_overloaded_provider_is_retried() -> Result<()> {
        let primary = ScriptedProvider::new(
            "Primary",
            PromptStyle::Detailed,
            vec![
                Err(DocifyError::ProviderOverloaded("Primary".into())),
                Err(DocifyError::ProviderOverloaded("Primary".into())),
                Ok("# third time".into()),
            ],
        )
        .with_retry(3);
        let calls = primary.calls.clone();
        let generator = ReadmeGenerator::new(vec![Box::new(primary)], PromptTemplates::default())?;

        let readme = generator.generate(&analysis()).await?;
        assert_eq!(readme.content, "# third time");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_non_overload_errors_are_not_retried() -> Result<()> {
        let primary = ScriptedProvider::new(
            "Primary",
            PromptStyle::Detailed,
            vec![Err(DocifyError::provider("Primary", "bad request")), Ok("never".into())],
        )
        .with_retry(3);
        let calls = primary.calls.clone();
        let generator = ReadmeGenerator::new(vec![Box::new(primary)], PromptTemplates::default())?;

        let err = generator.generate(&analysis()).await.unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(err, DocifyError::AllProvidersFailed(ref msg) if msg == "Primary error: bad request"));
        Ok(())
    }

    #[tokio::test]
    async fn test_all_failures_report_last_error() -> Result<()> {
        let generator = ReadmeGenerator::new(
            vec![
                Box::new(ScriptedProvider::new(
                    "A",
                    PromptStyle::Detailed,
                    vec![Err(DocifyError::provider("A", "first"))],
                )),
                Box::new(ScriptedProvider::new(
                    "B",
                    PromptStyle::Concise,
                    vec![Err(DocifyError::ProviderOverloaded("B".into()))],
                )),
            ],
            PromptTemplates::default(),
        )?;

        let err = generator.generate(&analysis()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "All AI providers failed. Last error: B API is currently overloaded. Please try again in a few minutes."
        );
        Ok(())
    }

    #[test]
    fn test_placeholder_logo_url() {
        assert_eq!(
            placeholder_logo_url("docify"),
            "https://via.placeholder.com/200x200/4F46E5/FFFFFF?text=D"
        );
        assert_eq!(placeholder_logo_url(""), "https://via.placeholder.com/200x200/4F46E5/FFFFFF?text=");
    }
}
