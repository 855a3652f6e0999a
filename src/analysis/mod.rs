//! Repository analysis: metadata, structure, dependencies and heuristics.

pub mod detect;
pub mod manifest;
pub mod structure;

pub use structure::{EntryKind, FileEntry};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{AnalysisLimits, Config};
use crate::error::Result;
use crate::github::GitHubClient;

/// Everything the generator knows about a repository
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoAnalysis {
    pub name: String,
    pub owner: String,
    pub description: Option<String>,
    /// Primary language, or `Unknown`
    pub language: String,
    /// All languages, largest first
    pub languages: Vec<String>,
    pub structure: Vec<FileEntry>,
    pub dependencies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_json: Option<Value>,
    pub has_tests: bool,
    pub has_documentation: bool,
    pub frameworks: Vec<String>,
    pub features: Vec<String>,
    pub repo_stats: RepoStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoStats {
    pub stars: u64,
    pub forks: u64,
    pub issues: u64,
    /// Repository size in kilobytes
    pub size: u64,
    pub default_branch: String,
}

/// Dependencies gathered from the root manifests
#[derive(Debug, Default)]
struct ManifestScan {
    dependencies: Vec<String>,
    package_json: Option<Value>,
}

/// Analyzes GitHub repositories through the REST API
pub struct GitHubAnalyzer {
    client: GitHubClient,
    limits: AnalysisLimits,
}

impl GitHubAnalyzer {
    /// Creates an analyzer acting with the given access token
    pub fn new(config: &Config, access_token: &str) -> Result<Self> {
        let client = GitHubClient::new(&config.github, Some(access_token.to_string()))?;
        Ok(Self::with_client(client, config.analysis.clone()))
    }

    /// Creates an analyzer around an existing client
    pub fn with_client(client: GitHubClient, limits: AnalysisLimits) -> Self {
        Self { client, limits }
    }

    /// The underlying REST client
    pub fn client(&self) -> &GitHubClient {
        &self.client
    }

    /// Collects metadata, structure and dependencies and runs the detection heuristics
    pub async fn analyze_repository(&self, owner: &str, repo: &str) -> Result<RepoAnalysis> {
        info!("Analyzing repository {}/{}", owner, repo);

        let repository = self.client.get_repository(owner, repo).await?;
        let languages = self.client.list_languages(owner, repo).await?;
        let tree = self
            .client
            .get_tree(owner, repo, &repository.default_branch)
            .await?;

        let structure = structure::build_structure(&tree.tree, self.limits.max_structure_entries);
        let scan = self.scan_manifests(owner, repo).await;
        let dependencies = manifest::dedup_and_limit(scan.dependencies, self.limits.max_dependencies);

        let frameworks = detect::detect_frameworks(&structure, &dependencies);
        let features = detect::detect_features(&structure, &dependencies);
        let has_tests = detect::has_tests(&structure);
        let has_documentation = detect::has_documentation(&structure);

        let language = languages
            .first()
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());

        debug!(
            "{}/{}: {} entries, {} dependencies, frameworks {:?}",
            owner,
            repo,
            structure.len(),
            dependencies.len(),
            frameworks
        );

        Ok(RepoAnalysis {
            name: repository.name,
            owner: repository.owner.login,
            description: repository.description.filter(|d| !d.trim().is_empty()),
            language,
            languages,
            structure,
            dependencies,
            package_json: scan.package_json,
            has_tests,
            has_documentation,
            frameworks,
            features,
            repo_stats: RepoStats {
                stars: repository.stargazers_count,
                forks: repository.forks_count,
                issues: repository.open_issues_count,
                size: repository.size,
                default_branch: repository.default_branch,
            },
        })
    }

    /// Reads the root manifests; unreadable ones are skipped
    async fn scan_manifests(&self, owner: &str, repo: &str) -> ManifestScan {
        let mut scan = ManifestScan::default();

        for file in manifest::MANIFEST_FILES {
            let content = match self.client.get_file_content(owner, repo, file).await {
                Ok(Some(content)) => content,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Skipping {} in {}/{}: {}", file, owner, repo, e);
                    continue;
                }
            };
            debug!("Found {} in {}/{}", file, owner, repo);

            match *file {
                "package.json" => {
                    if let Some(package) = manifest::parse_package_json(&content) {
                        scan.dependencies
                            .extend(manifest::package_json_dependencies(&package));
                        scan.package_json = Some(package);
                    }
                }
                "requirements.txt" => scan
                    .dependencies
                    .extend(manifest::requirements_dependencies(&content)),
                "Cargo.toml" => scan
                    .dependencies
                    .extend(manifest::cargo_dependencies(&content)),
                _ => {}
            }
        }

        scan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_serializes_camel_case() {
        let analysis = RepoAnalysis {
            name: "demo".into(),
            owner: "octo".into(),
            description: None,
            language: "Rust".into(),
            languages: vec!["Rust".into()],
            structure: vec![],
            dependencies: vec![],
            package_json: None,
            has_tests: true,
            has_documentation: false,
            frameworks: vec![],
            features: vec![],
            repo_stats: RepoStats {
                default_branch: "main".into(),
                ..RepoStats::default()
            },
        };

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["hasTests"], true);
        assert_eq!(json["repoStats"]["defaultBranch"], "main");
        assert!(json.get("packageJson").is_none());
    }
}
