#![doc = include_str!("../README.md")]
#![warn(clippy::all)]

//! ## Usage
//! ```rust,ignore
//! use docify::{Config, GitHubAnalyzer, ReadmeGenerator};
//!
//! async fn example() -> docify::Result<()> {
//!     let config = Config::load()?;
//!     let analyzer = GitHubAnalyzer::new(&config, config.github_token()?)?;
//!     let analysis = analyzer.analyze_repository("rust-lang", "cargo").await?;
//!
//!     let readme = ReadmeGenerator::from_config(&config)?.generate(&analysis).await?;
//!     println!("{}", readme.content);
//!     Ok(())
//! }
//! ```

/// Repository analysis: structure, dependencies and detection heuristics
pub mod analysis;
/// HTTP API service and routes
pub mod api;
/// Configuration module for the application
pub mod config;
/// Error handling types and utilities
pub mod error;
/// README generation with provider fallback
pub mod generator;
/// GitHub REST client
pub mod github;
/// Logging configuration and utilities
pub mod logging;
/// Prompt templates sent to the AI providers
pub mod prompts;
/// Hosted language model providers
pub mod providers;
/// Rate limiting for API callers
pub mod rate_limiter;
/// Project persistence
pub mod store;
/// Retry helpers
pub mod utils;
/// Input validation
pub mod validation;

pub use analysis::{GitHubAnalyzer, RepoAnalysis};
pub use config::Config;
pub use error::{DocifyError, Result};
pub use generator::{GeneratedReadme, ReadmeGenerator};
pub use providers::DocProvider;
