use std::fs;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::analysis::RepoAnalysis;
use crate::config::PromptSettings;
use crate::error::{DocifyError, Result};

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{\{(\w+)\}\}").unwrap();
}

/// Long-form README prompt with an explicit section list
pub const README_DETAILED: &str = include_str!("../prompts/readme_detailed.txt");

/// Short README prompt
pub const README_CONCISE: &str = include_str!("../prompts/readme_concise.txt");

/// Which prompt a provider is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptStyle {
    Detailed,
    Concise,
}

/// The README templates in use
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    detailed: String,
    concise: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            detailed: README_DETAILED.to_string(),
            concise: README_CONCISE.to_string(),
        }
    }
}

impl PromptTemplates {
    /// Built-in templates, replaced by any files named in the settings
    pub fn from_settings(settings: &PromptSettings) -> Result<Self> {
        let mut templates = Self::default();
        if let Some(path) = &settings.detailed_template {
            templates.detailed = fs::read_to_string(path).map_err(|e| {
                DocifyError::Config(format!("Failed to read prompt template {}: {}", path.display(), e))
            })?;
        }
        if let Some(path) = &settings.concise_template {
            templates.concise = fs::read_to_string(path).map_err(|e| {
                DocifyError::Config(format!("Failed to read prompt template {}: {}", path.display(), e))
            })?;
        }
        Ok(templates)
    }

    /// Renders the prompt of the given style for an analysis
    pub fn render(&self, style: PromptStyle, analysis: &RepoAnalysis) -> String {
        let template = match style {
            PromptStyle::Detailed => &self.detailed,
            PromptStyle::Concise => &self.concise,
        };
        render_template(template, &prompt_vars(analysis))
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}

/// Placeholder values exposed to templates
pub fn prompt_vars(analysis: &RepoAnalysis) -> Vec<(&'static str, String)> {
    vec![
        ("name", analysis.name.clone()),
        ("owner", analysis.owner.clone()),
        (
            "description",
            analysis
                .description
                .clone()
                .unwrap_or_else(|| "No description provided".to_string()),
        ),
        ("language", analysis.language.clone()),
        ("languages", join_or_none(&analysis.languages)),
        ("dependencies", join_or_none(&analysis.dependencies)),
        ("frameworks", join_or_none(&analysis.frameworks)),
        ("features", join_or_none(&analysis.features)),
        ("has_tests", yes_no(analysis.has_tests)),
        ("has_documentation", yes_no(analysis.has_documentation)),
        ("stars", analysis.repo_stats.stars.to_string()),
        ("forks", analysis.repo_stats.forks.to_string()),
        (
            "issues_url",
            format!("https://github.com/{}/{}/issues", analysis.owner, analysis.name),
        ),
    ]
}

/// Replaces `{{key}}` placeholders in one pass; unknown placeholders are
/// left as they are and substituted values are never expanded again
pub fn render_template(template: &str, vars: &[(&str, String)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            vars.iter()
                .find(|(key, _)| *key == &caps[1])
                .map_or_else(|| caps[0].to_string(), |(_, value)| value.clone())
        })
        .into_owned()
}
