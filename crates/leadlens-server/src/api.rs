use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use leadlens_core::{DiscoveryRun, Lead, RunConfig};
use leadlens_scraper::{run_discovery, to_csv, to_json, HttpFetcher, ScrapeError, SourceProfile};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RunConfig>,
    pub profiles: Arc<Vec<SourceProfile>>,
    pub fetcher: Arc<HttpFetcher>,
    /// Most recent completed run, served by the export endpoints.
    pub last_run: Arc<RwLock<Option<DiscoveryRun>>>,
}

impl AppState {
    pub fn new(config: RunConfig, profiles: Vec<SourceProfile>, fetcher: HttpFetcher) -> Self {
        Self {
            config: Arc::new(config),
            profiles: Arc::new(profiles),
            fetcher: Arc::new(fetcher),
            last_run: Arc::new(RwLock::new(None)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub success: bool,
    pub count: usize,
    pub leads: Vec<Lead>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/scrape", post(scrape))
        .route("/export/csv", get(export_csv))
        .route("/export/json", get(export_json))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthData { status: "ok" }))
}

async fn scrape(
    State(state): State<AppState>,
    Json(request): Json<ScrapeRequest>,
) -> Result<Json<ScrapeResponse>, ApiError> {
    let run = run_discovery(
        &request.query,
        &state.config,
        &state.profiles,
        state.fetcher.as_ref(),
    )
    .await
    .map_err(|e| match e {
        ScrapeError::EmptyQuery => ApiError::new("validation_error", "query must not be blank"),
        other => {
            tracing::error!(error = %other, "discovery run failed");
            ApiError::new("internal_error", "discovery run failed")
        }
    })?;

    let response = ScrapeResponse {
        success: true,
        count: run.leads.len(),
        leads: run.leads.clone(),
    };
    *state.last_run.write().await = Some(run);
    Ok(Json(response))
}

async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let guard = state.last_run.read().await;
    let run = guard
        .as_ref()
        .ok_or_else(|| ApiError::new("bad_request", "no completed run to export"))?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"leads.csv\"",
            ),
        ],
        to_csv(run),
    ))
}

async fn export_json(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let guard = state.last_run.read().await;
    let run = guard
        .as_ref()
        .ok_or_else(|| ApiError::new("bad_request", "no completed run to export"))?;
    let body = to_json(run).map_err(|e| {
        tracing::error!(error = %e, "lead serialization failed");
        ApiError::new("internal_error", "lead serialization failed")
    })?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"leads.json\"",
            ),
        ],
        body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::Utc;
    use leadlens_core::{AnalysisResult, Candidate, SourceOutcome};
    use tower::ServiceExt;
    use uuid::Uuid;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_state(profiles: Vec<SourceProfile>) -> AppState {
        let mut config = RunConfig::default();
        config.scroll.settle = std::time::Duration::from_millis(0);
        let fetcher =
            HttpFetcher::new(vec!["leadlens-test/0.1".to_owned()]).expect("build fetcher");
        AppState::new(config, profiles, fetcher)
    }

    fn canned_run() -> DiscoveryRun {
        let candidate = Candidate {
            url: "https://palestra.example/contatti".to_owned(),
            source: "meta_ads".to_owned(),
            query: "palestra".to_owned(),
            discovered_at: Utc::now(),
            provenance: None,
        };
        let mut analysis = AnalysisResult::zeroed();
        analysis.emails = vec!["info@palestra.example".to_owned()];
        analysis.lead_score = 3;
        DiscoveryRun {
            id: Uuid::new_v4(),
            query: "palestra".to_owned(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            leads: vec![Lead {
                candidate,
                analysis,
            }],
            source_outcomes: vec![SourceOutcome {
                source: "meta_ads".to_owned(),
                candidate_count: 1,
                error: None,
            }],
        }
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = build_app(test_state(Vec::new()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn scrape_rejects_blank_query() {
        let app = build_app(test_state(Vec::new()));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/scrape")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"query": "   "}"#))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn scrape_runs_discovery_and_stores_the_run() {
        let server = MockServer::start().await;
        let search_html = format!(
            r#"<a href="{}/lead">Palestra</a>"#,
            server.uri()
        );
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(search_html))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/lead"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<p>Contattaci: info@palestra.it</p><form><input name=\"email\"></form>",
            ))
            .mount(&server)
            .await;

        let profile = SourceProfile {
            name: "mock_source",
            search_url_template: format!("{}/search?q={{query}}", server.uri()),
            max_scrolls: 1,
            publish_date: None,
        };
        let state = test_state(vec![profile]);
        let app = build_app(state.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/scrape")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"query": "palestra"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 1);
        assert_eq!(json["leads"][0]["emails"][0], "info@palestra.it");

        let stored = state.last_run.read().await;
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn export_without_a_run_is_rejected() {
        let app = build_app(test_state(Vec::new()));
        for uri in ["/export/csv", "/export/json"] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .uri(uri)
                        .body(Body::empty())
                        .expect("request"),
                )
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[tokio::test]
    async fn export_csv_serves_the_stored_run() {
        let state = test_state(Vec::new());
        *state.last_run.write().await = Some(canned_run());
        let app = build_app(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/export/csv")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_DISPOSITION)
                .and_then(|v| v.to_str().ok()),
            Some("attachment; filename=\"leads.csv\"")
        );
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let text = String::from_utf8(body.to_vec()).expect("utf8");
        assert!(text.starts_with("source,url,query"));
        assert!(text.contains("info@palestra.example"));
    }

    #[tokio::test]
    async fn export_json_serves_the_stored_run() {
        let state = test_state(Vec::new());
        *state.last_run.write().await = Some(canned_run());
        let app = build_app(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/export/json")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json[0]["url"], "https://palestra.example/contatti");
        assert_eq!(json[0]["lead_score"], 3);
    }
}
