//! Service layer behind the HTTP API.

pub mod routes;

pub use routes::create_app;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::{GitHubAnalyzer, RepoAnalysis};
use crate::config::Config;
use crate::error::{DocifyError, Result};
use crate::generator::ReadmeGenerator;
use crate::github::{GitHubClient, Permissions, Repository, User};
use crate::rate_limiter::RateLimiter;
use crate::store::{Project, ProjectStore};
use crate::validation::{self, ProjectInput};

/// Body of `POST /api/generate`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub github_url: Option<String>,
}

/// Subset of the analysis returned alongside a generated README
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub name: String,
    pub description: Option<String>,
    pub language: String,
    pub languages: Vec<String>,
    pub has_tests: bool,
    pub has_documentation: bool,
}

impl From<&RepoAnalysis> for AnalysisSummary {
    fn from(analysis: &RepoAnalysis) -> Self {
        Self {
            name: analysis.name.clone(),
            description: analysis.description.clone(),
            language: analysis.language.clone(),
            languages: analysis.languages.clone(),
            has_tests: analysis.has_tests,
            has_documentation: analysis.has_documentation,
        }
    }
}

/// Response of `POST /api/generate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub readme: String,
    pub provider: String,
    pub project: Project,
    pub analysis: AnalysisSummary,
}

/// Repository as listed for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "githubUrl")]
    pub github_url: String,
    #[serde(rename = "githubId")]
    pub github_id: String,
    pub language: String,
    #[serde(rename = "isPublic")]
    pub is_public: bool,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub default_branch: String,
    pub owner: OwnerSummary,
    pub permissions: Permissions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub login: String,
    pub avatar_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl From<Repository> for RepositorySummary {
    fn from(repo: Repository) -> Self {
        Self {
            id: repo.id.to_string(),
            name: repo.name,
            description: repo.description,
            github_url: repo.html_url,
            github_id: repo.full_name,
            language: repo.language.unwrap_or_else(|| "Unknown".to_string()),
            is_public: !repo.private,
            stargazers_count: repo.stargazers_count,
            forks_count: repo.forks_count,
            updated_at: repo.updated_at,
            created_at: repo.created_at,
            default_branch: repo.default_branch,
            owner: OwnerSummary {
                login: repo.owner.login,
                avatar_url: repo.owner.avatar_url,
                kind: repo.owner.kind,
            },
            permissions: repo.permissions.unwrap_or_default(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub service: String,
    pub version: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Seconds since the service started
    pub uptime: u64,
    pub providers: Vec<String>,
}

/// Coordinates GitHub access, analysis, generation and storage for API callers
pub struct DocService {
    config: Arc<Config>,
    generator: Option<Arc<ReadmeGenerator>>,
    store: Arc<dyn ProjectStore>,
    limiter: RateLimiter,
    start_time: DateTime<Utc>,
}

impl DocService {
    /// Builds the service; it still starts when no provider is configured,
    /// but generation requests then fail with [`DocifyError::NoProviders`]
    pub fn new(config: Config, store: Arc<dyn ProjectStore>) -> Result<Self> {
        let generator = match ReadmeGenerator::from_config(&config) {
            Ok(generator) => Some(generator),
            Err(DocifyError::NoProviders) => {
                warn!("No AI providers configured; README generation is disabled");
                None
            }
            Err(e) => return Err(e),
        };
        Ok(Self::with_generator(config, generator, store))
    }

    /// Builds the service around an existing generator
    pub fn with_generator(
        config: Config,
        generator: Option<ReadmeGenerator>,
        store: Arc<dyn ProjectStore>,
    ) -> Self {
        let limiter = RateLimiter::new(
            config.server.rate_limit_requests,
            Duration::from_secs(config.server.rate_limit_window_secs),
        );
        Self {
            config: Arc::new(config),
            generator: generator.map(Arc::new),
            store,
            limiter,
            start_time: Utc::now(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Provider names in fallback order
    pub fn providers(&self) -> Vec<String> {
        self.generator
            .as_ref()
            .map(|g| g.available_providers())
            .unwrap_or_default()
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            service: "docify".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            status: "healthy".to_string(),
            timestamp: Utc::now(),
            uptime: (Utc::now() - self.start_time).num_seconds().max(0) as u64,
            providers: self.providers(),
        }
    }

    /// Forgets rate limiting state for idle callers
    pub async fn prune_rate_limits(&self) {
        self.limiter.prune().await;
    }

    fn github(&self, token: &str) -> Result<GitHubClient> {
        GitHubClient::new(&self.config.github, Some(token.to_string()))
    }

    /// Repositories the caller owns or collaborates on
    pub async fn list_repositories(&self, token: &str) -> Result<Vec<RepositorySummary>> {
        let repositories = self.github(token)?.list_user_repositories().await?;
        info!("Found {} repositories", repositories.len());
        Ok(repositories.into_iter().map(RepositorySummary::from).collect())
    }

    /// Analyzes a repository and writes its README with the first provider that succeeds
    pub async fn generate(&self, token: &str, request: GenerateRequest) -> Result<GenerateResponse> {
        let github_url = request
            .github_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| DocifyError::Validation("GitHub URL is required".into()))?;
        let (owner, repo) = validation::parse_github_url(&github_url)?;
        let generator = self.generator.as_ref().ok_or(DocifyError::NoProviders)?;

        // Rejected requests never count against the caller's quota
        if self.limiter.is_rate_limited(&caller_key(token)).await {
            return Err(DocifyError::RateLimitExceeded(
                "Too many generation requests. Please try again later.".into(),
            ));
        }

        let client = self.github(token)?;
        let user = client.get_authenticated_user().await?;
        let repository = verify_access(&client, &user, &owner, &repo).await?;
        info!(
            "Repository access verified: {} ({}) for {}",
            repository.full_name,
            if repository.private { "private" } else { "public" },
            user.login
        );

        let analyzer = GitHubAnalyzer::with_client(client, self.config.analysis.clone());
        let analysis = analyzer.analyze_repository(&owner, &repo).await?;
        let readme = generator.generate(&analysis).await?;

        let input = ProjectInput {
            github_url: repository.html_url.clone(),
            name: analysis.name.clone(),
            description: analysis.description.clone(),
            language: Some(analysis.language.clone()),
            github_id: format!("{}/{}", owner, repo),
            readme_content: Some(readme.content.clone()),
        };
        let (project, _) = self.store.upsert(&user.login, input).await?;

        Ok(GenerateResponse {
            readme: readme.content,
            provider: readme.provider,
            project,
            analysis: AnalysisSummary::from(&analysis),
        })
    }

    /// The caller's saved projects
    pub async fn list_projects(&self, token: &str) -> Result<Vec<Project>> {
        let user = self.github(token)?.get_authenticated_user().await?;
        self.store.list(&user.login).await
    }

    /// Validates and stores a project; the flag is true when it was created
    pub async fn save_project(&self, token: &str, input: ProjectInput) -> Result<(Project, bool)> {
        let input = input.validate()?;
        let user = self.github(token)?.get_authenticated_user().await?;
        self.store.upsert(&user.login, input).await
    }
}

/// Rate limiting key that avoids keeping raw tokens in memory
fn caller_key(token: &str) -> String {
    format!("{:x}", md5::compute(token.as_bytes()))
}

/// Fetches the repository and checks the caller may document it
///
/// Public repositories are open to everyone. Private ones need push or admin
/// permission, or the caller must be the owner.
pub async fn verify_access(
    client: &GitHubClient,
    user: &User,
    owner: &str,
    repo: &str,
) -> Result<Repository> {
    let repository = match client.get_repository(owner, repo).await {
        Ok(repository) => repository,
        Err(DocifyError::NotFound(_)) => {
            return Err(DocifyError::Forbidden(
                "Repository not found or you do not have access to this repository.".into(),
            ))
        }
        Err(DocifyError::Forbidden(_)) => {
            return Err(DocifyError::Forbidden(
                "You do not have permission to access this repository.".into(),
            ))
        }
        Err(e) => return Err(e),
    };

    let permissions = repository.permissions.unwrap_or_default();
    let has_write_access = permissions.push || permissions.admin;
    let is_owner = repository.owner.login.eq_ignore_ascii_case(&user.login);

    if repository.private && !has_write_access && !is_owner {
        return Err(DocifyError::Forbidden(
            "You can only generate documentation for repositories you own or have write access to.".into(),
        ));
    }
    Ok(repository)
}
