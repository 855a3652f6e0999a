use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json as ResponseJson, Response},
    routing::{get, post},
    Router,
};
use log::{error, info};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{DocService, GenerateRequest, GenerateResponse, HealthResponse, RepositorySummary};
use crate::error::DocifyError;
use crate::store::Project;
use crate::validation::ProjectInput;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    service: Arc<DocService>,
}

/// Error returned from handlers, rendered as `{"error": message}`
#[derive(Debug)]
pub struct ApiError(pub DocifyError);

impl From<DocifyError> for ApiError {
    fn from(e: DocifyError) -> Self {
        Self(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            DocifyError::Validation(_) => StatusCode::BAD_REQUEST,
            DocifyError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DocifyError::Forbidden(_) => StatusCode::FORBIDDEN,
            DocifyError::NotFound(_) => StatusCode::NOT_FOUND,
            DocifyError::RateLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            DocifyError::AllProvidersFailed(_) => StatusCode::BAD_GATEWAY,
            DocifyError::NoProviders => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {}", self.0);
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };
        (status, ResponseJson(json!({ "error": message }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Builds the router with every API route
pub fn create_app(service: Arc<DocService>) -> Router {
    let state = AppState { service };
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/api/providers", get(list_providers))
        .route("/api/github/repositories", get(list_repositories))
        .route("/api/generate", post(generate_readme))
        .route("/api/projects", get(list_projects).post(save_project))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Reads the GitHub token from `Authorization: Bearer <token>`
fn bearer_token(headers: &HeaderMap) -> ApiResult<String> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| DocifyError::Unauthorized("Missing Authorization header".into()))?;

    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| DocifyError::Unauthorized("Expected a Bearer token".into()))?;
    Ok(token.to_string())
}

/// Turns a body that failed to deserialize into a 400 with a JSON error
fn json_body<T>(body: std::result::Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError(DocifyError::Validation(rejection.body_text())))
}

async fn index() -> ResponseJson<Value> {
    ResponseJson(json!({
        "service": "docify",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Generate README files for GitHub repositories with AI providers",
        "endpoints": {
            "health": "/health",
            "providers": "/api/providers",
            "repositories": "/api/github/repositories",
            "generate": "/api/generate",
            "projects": "/api/projects"
        }
    }))
}

async fn health_check(State(state): State<AppState>) -> ResponseJson<HealthResponse> {
    ResponseJson(state.service.health())
}

async fn list_providers(State(state): State<AppState>) -> ResponseJson<Value> {
    ResponseJson(json!({ "providers": state.service.providers() }))
}

async fn list_repositories(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<ResponseJson<Vec<RepositorySummary>>> {
    let token = bearer_token(&headers)?;
    Ok(ResponseJson(state.service.list_repositories(&token).await?))
}

async fn generate_readme(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult<ResponseJson<GenerateResponse>> {
    let token = bearer_token(&headers)?;
    let request = json_body(body)?;
    info!("README generation requested for {:?}", request.github_url);
    Ok(ResponseJson(state.service.generate(&token, request).await?))
}

async fn list_projects(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<ResponseJson<Vec<Project>>> {
    let token = bearer_token(&headers)?;
    Ok(ResponseJson(state.service.list_projects(&token).await?))
}

async fn save_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: std::result::Result<Json<ProjectInput>, JsonRejection>,
) -> ApiResult<(StatusCode, ResponseJson<Project>)> {
    let token = bearer_token(&headers)?;
    let input = json_body(body)?;
    let (project, created) = state.service.save_project(&token, input).await?;
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, ResponseJson(project)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert!(matches!(bearer_token(&headers), Err(ApiError(DocifyError::Unauthorized(_)))));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer ghp_abc"));
        assert_eq!(bearer_token(&headers).unwrap(), "ghp_abc");
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (DocifyError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (DocifyError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
            (DocifyError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (DocifyError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (DocifyError::RateLimitExceeded("slow".into()), StatusCode::TOO_MANY_REQUESTS),
            (DocifyError::AllProvidersFailed("x".into()), StatusCode::BAD_GATEWAY),
            (DocifyError::NoProviders, StatusCode::SERVICE_UNAVAILABLE),
            (DocifyError::Config("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, expected) in cases {
            assert_eq!(ApiError(error).status(), expected);
        }
    }
}
