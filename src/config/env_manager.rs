use super::Config;

/// Reads an environment variable, treating empty values as unset
pub fn get_env_value(key: &str) -> Option<String> {
    let value = std::env::var(key).ok()?;
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Applies the supported environment variables on top of a loaded configuration
///
/// | Variable              | Setting                        |
/// |-----------------------|--------------------------------|
/// | `GITHUB_TOKEN`        | `github.token`                 |
/// | `GITHUB_API_BASE_URL` | `github.api_base`              |
/// | `GEMINI_API_KEY`      | `providers.gemini.api_key`     |
/// | `GEMINI_BASE_URL`     | `providers.gemini.base_url`    |
/// | `MISTRAL_API_KEY`     | `providers.mistral.api_key`    |
/// | `MISTRAL_BASE_URL`    | `providers.mistral.base_url`   |
/// | `DOCIFY_BIND`         | `server.bind`                  |
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides_with(config, get_env_value);
}

fn apply_overrides_with<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = lookup("GITHUB_TOKEN") {
        config.github.token = Some(token);
    }
    if let Some(base) = lookup("GITHUB_API_BASE_URL") {
        config.github.api_base = base;
    }
    if let Some(key) = lookup("GEMINI_API_KEY") {
        config.providers.gemini.api_key = Some(key);
    }
    if let Some(base) = lookup("GEMINI_BASE_URL") {
        config.providers.gemini.base_url = base;
    }
    if let Some(key) = lookup("MISTRAL_API_KEY") {
        config.providers.mistral.api_key = Some(key);
    }
    if let Some(base) = lookup("MISTRAL_BASE_URL") {
        config.providers.mistral.base_url = base;
    }
    if let Some(bind) = lookup("DOCIFY_BIND") {
        config.server.bind = bind;
    }
}
