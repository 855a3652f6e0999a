//! Thin client over the parts of the GitHub REST API used by the analyzer.

mod types;

pub use types::{Owner, Permissions, Repository, Tree, TreeEntry, User};

use std::collections::HashMap;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, warn};
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::GitHubSettings;
use crate::error::{DocifyError, Result};
use types::{ApiMessage, ContentFile};

const ACCEPT_V3: &str = "application/vnd.github.v3+json";

/// Authenticated GitHub REST client
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: String,
    token: Option<String>,
    per_page: u32,
    max_pages: u32,
}

impl GitHubClient {
    /// Creates a client; `token` is sent as a bearer token when present
    pub fn new(settings: &GitHubSettings, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            per_page: settings.per_page.clamp(1, 100),
            max_pages: settings.max_pages.max(1),
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.api_base, path);
        debug!("GET {}", url);
        let request = self.client.get(url).header(header::ACCEPT, ACCEPT_V3);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let response = check_status(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Fetches repository metadata
    pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository> {
        self.get_json(self.get(&format!("/repos/{}/{}", owner, repo))).await
    }

    /// Lists repository languages, largest first
    pub async fn list_languages(&self, owner: &str, repo: &str) -> Result<Vec<String>> {
        let languages: HashMap<String, u64> = self
            .get_json(self.get(&format!("/repos/{}/{}/languages", owner, repo)))
            .await?;
        Ok(order_languages(languages))
    }

    /// Fetches the full recursive tree at `sha` (a branch name works too)
    pub async fn get_tree(&self, owner: &str, repo: &str, sha: &str) -> Result<Tree> {
        let request = self
            .get(&format!("/repos/{}/{}/git/trees/{}", owner, repo, sha))
            .query(&[("recursive", "true")]);
        let tree: Tree = self.get_json(request).await?;
        if tree.truncated {
            warn!(
                "Tree of {}/{} was truncated by GitHub ({} entries returned)",
                owner,
                repo,
                tree.tree.len()
            );
        }
        Ok(tree)
    }

    /// Fetches and decodes a file from the default branch. A missing file is `Ok(None)`.
    pub async fn get_file_content(&self, owner: &str, repo: &str, path: &str) -> Result<Option<String>> {
        let request = self.get(&format!("/repos/{}/{}/contents/{}", owner, repo, path));
        let file: ContentFile = match self.get_json(request).await {
            Ok(file) => file,
            Err(DocifyError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        match (file.content, file.encoding.as_deref()) {
            (Some(content), Some("base64") | None) => decode_base64_content(&content).map(Some),
            (Some(content), Some(_)) => Ok(Some(content)),
            (None, _) => Ok(None),
        }
    }

    /// The user owning the token
    pub async fn get_authenticated_user(&self) -> Result<User> {
        self.get_json(self.get("/user")).await
    }

    /// Repositories the authenticated user owns or collaborates on, most recently updated first
    pub async fn list_user_repositories(&self) -> Result<Vec<Repository>> {
        let mut repositories = Vec::new();
        let per_page = self.per_page.to_string();

        for page in 1..=self.max_pages {
            let page_param = page.to_string();
            let request = self.get("/user/repos").query(&[
                ("sort", "updated"),
                ("direction", "desc"),
                ("affiliation", "owner,collaborator"),
                ("per_page", per_page.as_str()),
                ("page", page_param.as_str()),
            ]);
            let batch: Vec<Repository> = self.get_json(request).await?;
            let done = batch.len() < self.per_page as usize;
            repositories.extend(batch);
            if done {
                break;
            }
            if page == self.max_pages {
                warn!("Stopped listing repositories after {} pages", self.max_pages);
            }
        }

        Ok(repositories)
    }
}

/// Maps non-success statuses onto typed errors
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let rate_limit_exhausted = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim() == "0")
        .unwrap_or(false);

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiMessage>(&body)
        .ok()
        .and_then(|m| m.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    Err(match status {
        StatusCode::UNAUTHORIZED => DocifyError::Unauthorized(message),
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
            if rate_limit_exhausted || message.to_lowercase().contains("rate limit") =>
        {
            DocifyError::RateLimitExceeded(message)
        }
        StatusCode::FORBIDDEN => DocifyError::Forbidden(message),
        StatusCode::NOT_FOUND => DocifyError::NotFound(message),
        _ => DocifyError::GitHubApi {
            status: status.as_u16(),
            message,
        },
    })
}

fn order_languages(languages: HashMap<String, u64>) -> Vec<String> {
    let mut languages: Vec<(String, u64)> = languages.into_iter().collect();
    languages.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    languages.into_iter().map(|(name, _)| name).collect()
}

/// The contents API wraps base64 at 60 columns
pub fn decode_base64_content(content: &str) -> Result<String> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
