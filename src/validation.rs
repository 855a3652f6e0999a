//! Input validation for URLs and project submissions.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DocifyError, Result};

lazy_static! {
    static ref GITHUB_REPO_IN_URL: Regex = Regex::new(r"github\.com/([^/]+)/([^/]+)").unwrap();
    static ref GITHUB_REPO_URL: Regex = Regex::new(r"^https://github\.com/[^/]+/[^/]+/?$").unwrap();
}

const MAX_SANITIZED_LEN: usize = 1000;

/// Extracts `(owner, repo)` from anything containing `github.com/{owner}/{repo}`
pub fn parse_github_url(url: &str) -> Result<(String, String)> {
    let caps = GITHUB_REPO_IN_URL
        .captures(url.trim())
        .ok_or_else(|| DocifyError::Validation("Invalid GitHub URL format".into()))?;

    let owner = caps[1].to_string();
    let repo = caps[2]
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or_default()
        .trim_end_matches(".git")
        .to_string();

    if owner.is_empty() || repo.is_empty() {
        return Err(DocifyError::Validation("Invalid GitHub URL format".into()));
    }
    Ok((owner, repo))
}

/// Accepts only `https://github.com/{owner}/{repo}` and returns it without a trailing slash
pub fn validate_repository_url(url: &str) -> Result<String> {
    Url::parse(url).map_err(|_| DocifyError::Validation("Must be a valid URL".into()))?;
    if !GITHUB_REPO_URL.is_match(url) {
        return Err(DocifyError::Validation("Must be a valid GitHub repository URL".into()));
    }
    Ok(url.trim_end_matches('/').to_string())
}

/// Trims, removes angle brackets and caps the length of free text
pub fn sanitize_string(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .take(MAX_SANITIZED_LEN)
        .collect()
}

/// A project submitted through the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    pub github_url: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    pub github_id: String,
    #[serde(default)]
    pub readme_content: Option<String>,
}

fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min {
        return Err(DocifyError::Validation(format!("{} is required", field)));
    }
    if len > max {
        return Err(DocifyError::Validation(format!("{} must be at most {} characters", field, max)));
    }
    Ok(())
}

impl ProjectInput {
    /// Checks field limits, sanitizes free text and normalizes the URL
    pub fn validate(mut self) -> Result<Self> {
        self.github_url = validate_repository_url(&self.github_url)?;
        self.name = sanitize_string(&self.name);
        self.description = self.description.as_deref().map(sanitize_string);
        self.language = self.language.as_deref().map(sanitize_string);
        check_len("Name", &self.name, 1, 100)?;
        if let Some(description) = &self.description {
            check_len("Description", description, 0, 500)?;
        }
        if let Some(language) = &self.language {
            check_len("Language", language, 0, 50)?;
        }
        check_len("GitHub ID", &self.github_id, 1, 100)?;
        if let Some(readme) = &self.readme_content {
            check_len("README content", readme, 0, 50_000)?;
        }
        Ok(self)
    }
}
