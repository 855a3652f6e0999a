#![allow(dead_code)]

use base64::{engine::general_purpose::STANDARD, Engine as _};
use docify::config::Config;
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};

pub const TOKEN: &str = "ghp_test_token";

/// Config pointing GitHub and both providers at the mock server
pub fn test_config(server: &ServerGuard) -> Config {
    let mut config = Config::default();
    config.github.api_base = server.url();
    config.github.token = Some(TOKEN.to_string());
    config.providers.gemini.base_url = server.url();
    config.providers.gemini.api_key = Some("gemini-key".to_string());
    config.providers.gemini.retry.base_delay_ms = 1;
    config.providers.mistral.base_url = server.url();
    config.providers.mistral.api_key = Some("mistral-key".to_string());
    config
}

pub fn setup_test_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub fn repository_json(owner: &str, repo: &str, private: bool, push: bool) -> Value {
    json!({
        "id": 1296269,
        "name": repo,
        "full_name": format!("{}/{}", owner, repo),
        "description": "A demo project",
        "language": "TypeScript",
        "private": private,
        "html_url": format!("https://github.com/{}/{}", owner, repo),
        "stargazers_count": 42,
        "forks_count": 7,
        "open_issues_count": 3,
        "size": 1024,
        "default_branch": "main",
        "owner": { "login": owner, "avatar_url": "https://avatars.example/u", "type": "User" },
        "permissions": { "admin": false, "maintain": false, "push": push, "triage": false, "pull": true },
        "created_at": "2023-01-01T00:00:00Z",
        "updated_at": "2024-06-01T12:00:00Z"
    })
}

pub async fn mock_user(server: &mut ServerGuard, login: &str) -> Mock {
    server
        .mock("GET", "/user")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "login": login, "name": "Test User" }).to_string())
        .create_async()
        .await
}

pub async fn mock_repository(server: &mut ServerGuard, owner: &str, repo: &str, private: bool, push: bool) -> Mock {
    server
        .mock("GET", format!("/repos/{}/{}", owner, repo).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(repository_json(owner, repo, private, push).to_string())
        .create_async()
        .await
}

/// Mocks everything the analyzer reads for `owner/repo`: a TypeScript web
/// app with a package.json and no other manifests
pub async fn mock_analyzable_repo(server: &mut ServerGuard, owner: &str, repo: &str) -> Vec<Mock> {
    mock_analyzable_repo_with(server, owner, repo, 404).await
}

/// Same repository, but `requirements.txt` answers with `requirements_status`
pub async fn mock_analyzable_repo_with(
    server: &mut ServerGuard,
    owner: &str,
    repo: &str,
    requirements_status: usize,
) -> Vec<Mock> {
    let base = format!("/repos/{}/{}", owner, repo);
    let package_json = json!({
        "name": repo,
        "dependencies": { "react": "^18.2.0", "express": "^4.18.0", "prisma": "^5.0.0" },
        "devDependencies": { "jest": "^29.0.0" }
    });

    let mut mocks = vec![mock_repository(server, owner, repo, false, false).await];
    mocks.push(
        server
            .mock("GET", format!("{}/languages", base).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"JavaScript": 2000, "TypeScript": 9000, "CSS": 300}"#)
            .create_async()
            .await,
    );
    mocks.push(
        server
            .mock("GET", format!("{}/git/trees/main", base).as_str())
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "sha": "abc123",
                    "truncated": false,
                    "tree": [
                        { "path": "README.md", "type": "blob", "size": 120 },
                        { "path": "src", "type": "tree" },
                        { "path": "src/index.ts", "type": "blob", "size": 300 },
                        { "path": "src/api/users.ts", "type": "blob", "size": 500 },
                        { "path": "tests/users.test.ts", "type": "blob", "size": 200 },
                        { "path": "Dockerfile", "type": "blob", "size": 80 }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await,
    );
    mocks.push(
        server
            .mock("GET", format!("{}/contents/package.json", base).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "encoding": "base64",
                    "content": STANDARD.encode(package_json.to_string())
                })
                .to_string(),
            )
            .create_async()
            .await,
    );
    for (file, status) in [("requirements.txt", requirements_status), ("Cargo.toml", 404)] {
        let message = if status == 404 { "Not Found" } else { "Server Error" };
        mocks.push(
            server
                .mock("GET", format!("{}/contents/{}", base, file).as_str())
                .with_status(status)
                .with_header("content-type", "application/json")
                .with_body(json!({ "message": message }).to_string())
                .create_async()
                .await,
        );
    }
    mocks
}

pub fn gemini_path() -> &'static str {
    "/v1beta/models/gemini-1.5-flash:generateContent"
}

pub fn gemini_success(text: &str) -> String {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

pub fn mistral_success(text: &str) -> String {
    json!({
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}
