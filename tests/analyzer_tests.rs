mod common;

use docify::error::DocifyError;
use docify::github::GitHubClient;
use docify::GitHubAnalyzer;
use mockito::{Matcher, Server};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{mock_analyzable_repo, mock_analyzable_repo_with, repository_json, test_config, TOKEN};

#[tokio::test]
async fn test_analyze_repository_end_to_end() {
    common::setup_test_logger();
    let mut server = Server::new_async().await;
    let _mocks = mock_analyzable_repo(&mut server, "octo", "webapp").await;
    let config = test_config(&server);

    let analyzer = GitHubAnalyzer::new(&config, TOKEN).unwrap();
    let analysis = analyzer.analyze_repository("octo", "webapp").await.unwrap();

    assert_eq!(analysis.name, "webapp");
    assert_eq!(analysis.owner, "octo");
    assert_eq!(analysis.language, "TypeScript");
    assert_eq!(analysis.languages, vec!["TypeScript", "JavaScript", "CSS"]);
    assert_eq!(analysis.structure.len(), 6);
    assert_eq!(analysis.dependencies, vec!["express", "prisma", "react", "jest"]);
    assert!(analysis.package_json.is_some());
    assert!(analysis.has_tests);
    assert!(analysis.has_documentation);
    assert_eq!(analysis.frameworks, vec!["Express.js", "Prisma", "React"]);
    assert_eq!(
        analysis.features,
        vec![
            "REST API",
            "Database Integration",
            "Automated Testing",
            "TypeScript Support",
            "Docker Support"
        ]
    );
    assert_eq!(analysis.repo_stats.stars, 42);
    assert_eq!(analysis.repo_stats.issues, 3);
    assert_eq!(analysis.repo_stats.default_branch, "main");
}

#[tokio::test]
async fn test_structure_respects_configured_limit() {
    let mut server = Server::new_async().await;
    let _mocks = mock_analyzable_repo(&mut server, "octo", "webapp").await;
    let mut config = test_config(&server);
    config.analysis.max_structure_entries = 2;

    let analyzer = GitHubAnalyzer::new(&config, TOKEN).unwrap();
    let analysis = analyzer.analyze_repository("octo", "webapp").await.unwrap();

    let paths: Vec<&str> = analysis.structure.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["README.md", "src"]);
    // Detection only sees the truncated structure
    assert!(!analysis.has_tests);
}

#[tokio::test]
async fn test_unreadable_manifest_is_skipped() {
    let mut server = Server::new_async().await;
    let mocks = mock_analyzable_repo_with(&mut server, "octo", "webapp", 500).await;
    let config = test_config(&server);

    let analyzer = GitHubAnalyzer::new(&config, TOKEN).unwrap();
    let analysis = analyzer.analyze_repository("octo", "webapp").await.unwrap();

    assert_eq!(analysis.dependencies, vec!["express", "prisma", "react", "jest"]);
    assert!(analysis.package_json.is_some());
    for mock in &mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_missing_repository_is_not_found() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/repos/octo/missing")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Not Found"}"#)
        .create_async()
        .await;
    let config = test_config(&server);

    let analyzer = GitHubAnalyzer::new(&config, TOKEN).unwrap();
    let err = analyzer.analyze_repository("octo", "missing").await.unwrap_err();
    assert!(matches!(err, DocifyError::NotFound(_)));
}

#[tokio::test]
async fn test_rate_limit_is_reported() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/repos/octo/busy")
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_header("x-ratelimit-remaining", "0")
        .with_body(r#"{"message": "API rate limit exceeded for user."}"#)
        .create_async()
        .await;
    let config = test_config(&server);

    let analyzer = GitHubAnalyzer::new(&config, TOKEN).unwrap();
    let err = analyzer.analyze_repository("octo", "busy").await.unwrap_err();
    assert!(matches!(err, DocifyError::RateLimitExceeded(_)));
}

#[tokio::test]
async fn test_list_user_repositories_follows_pages() {
    let mut server = Server::new_async().await;
    let mut config = test_config(&server);
    config.github.per_page = 2;

    let first_page = json!([
        repository_json("octo", "one", false, true),
        repository_json("octo", "two", true, true)
    ]);
    let second_page = json!([repository_json("octo", "three", false, false)]);

    let page_one = server
        .mock("GET", "/user/repos")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("per_page".into(), "2".into()),
            Matcher::UrlEncoded("sort".into(), "updated".into()),
        ]))
        .match_header("authorization", format!("Bearer {}", TOKEN).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(first_page.to_string())
        .create_async()
        .await;
    let page_two = server
        .mock("GET", "/user/repos")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(second_page.to_string())
        .create_async()
        .await;

    let client = GitHubClient::new(&config.github, Some(TOKEN.to_string())).unwrap();
    let repositories = client.list_user_repositories().await.unwrap();

    let names: Vec<&str> = repositories.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["one", "two", "three"]);
    page_one.assert_async().await;
    page_two.assert_async().await;
}

#[tokio::test]
async fn test_unauthorized_token() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/user")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Bad credentials"}"#)
        .create_async()
        .await;
    let config = test_config(&server);

    let client = GitHubClient::new(&config.github, Some("expired".to_string())).unwrap();
    let err = client.get_authenticated_user().await.unwrap_err();
    assert!(matches!(err, DocifyError::Unauthorized(ref msg) if msg == "Bad credentials"));
}
