use anyhow::Result;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use fetcher::{CamaraClient, ClientConfig, Proposal, Representative, DEFAULT_PROPOSAL_LIMIT};
use pimonitor_core::chart::{render_svg, DEFAULT_CHART_TOP_N, DEFAULT_TITLE};
use pimonitor_core::normalize::value_to_text;
use pimonitor_core::table::{load_csv, TableOptions};
use pimonitor_core::{
    analyze, default_keywords, sample_documents, AnalysisError, Document, DocumentId, KeywordSet, Report, DEFAULT_TOP_N,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

const MAX_TOP_N: usize = 100;

type ApiError = (StatusCode, String);

#[derive(Clone)]
pub struct AppState {
    pub keywords: Arc<KeywordSet>,
    pub camara: CamaraClient,
    pub default_top_n: usize,
}

pub struct AppConfig {
    pub keywords: KeywordSet,
    pub camara: ClientConfig,
    pub default_top_n: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { keywords: default_keywords().clone(), camara: ClientConfig::from_env(), default_top_n: DEFAULT_TOP_N }
    }
}

#[derive(Deserialize)]
pub struct TopParams {
    pub top_n: Option<usize>,
}

#[derive(Deserialize)]
pub struct CsvParams {
    pub top_n: Option<usize>,
    pub delimiter: Option<char>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize)]
pub struct ProposalParams {
    pub limit: Option<usize>,
    #[serde(default)]
    pub analyze: bool,
    #[serde(default)]
    pub themes: bool,
    pub top_n: Option<usize>,
}

/// A document as posted by a client. Every field may be any JSON value.
#[derive(Deserialize)]
pub struct InputDoc {
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default)]
    pub date: serde_json::Value,
    #[serde(default)]
    pub text: serde_json::Value,
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub documents: Vec<InputDoc>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct ProposalsResponse {
    pub author_id: u64,
    pub proposals: Vec<Proposal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<Report>,
}

pub fn build_app(config: AppConfig) -> Result<Router> {
    let camara = CamaraClient::new(config.camara)?;
    let app_state = AppState {
        keywords: Arc::new(config.keywords),
        camara,
        default_top_n: config.default_top_n,
    };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/keywords", get(keywords_handler))
        .route("/sample", get(sample_handler))
        .route("/analyze", post(analyze_handler))
        .route("/analyze/csv", post(analyze_csv_handler))
        .route("/analyze/sample", get(analyze_sample_handler))
        .route("/chart.svg", get(chart_handler))
        .route("/representatives", get(search_handler))
        .route("/representatives/:id", get(representative_handler))
        .route("/representatives/:id/proposals", get(proposals_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

fn top_n(state: &AppState, requested: Option<usize>) -> usize {
    requested.unwrap_or(state.default_top_n).clamp(1, MAX_TOP_N)
}

fn bad_request(e: AnalysisError) -> ApiError {
    match e {
        AnalysisError::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        other => (StatusCode::BAD_REQUEST, other.to_string()),
    }
}

pub async fn keywords_handler(State(state): State<AppState>) -> Json<KeywordSet> {
    Json(state.keywords.as_ref().clone())
}

pub async fn sample_handler() -> Json<Vec<Document>> {
    Json(sample_documents())
}

pub async fn analyze_sample_handler(State(state): State<AppState>, Query(params): Query<TopParams>) -> Json<Report> {
    let analysis = analyze(&sample_documents(), &state.keywords);
    Json(Report::build(&analysis, top_n(&state, params.top_n)))
}

pub async fn analyze_handler(
    State(state): State<AppState>,
    Query(params): Query<TopParams>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<Report>, ApiError> {
    let docs: Vec<Document> = req
        .documents
        .into_iter()
        .enumerate()
        .map(|(pos, d)| {
            let id = match value_to_text(&d.id) {
                s if s.trim().is_empty() => DocumentId::from(pos),
                s => DocumentId::from(s),
            };
            let date = Some(value_to_text(&d.date)).filter(|s| !s.is_empty());
            let text = Some(value_to_text(&d.text)).filter(|s| !s.is_empty());
            Document { id, date, text }
        })
        .collect();

    let custom;
    let keywords = match req.keywords {
        Some(list) => {
            custom = KeywordSet::new(list);
            if custom.is_empty() {
                return Err((StatusCode::BAD_REQUEST, "keyword list is empty".into()));
            }
            &custom
        }
        None => state.keywords.as_ref(),
    };
    let analysis = analyze(&docs, keywords);
    Ok(Json(Report::build(&analysis, top_n(&state, params.top_n))))
}

pub async fn analyze_csv_handler(
    State(state): State<AppState>,
    Query(params): Query<CsvParams>,
    body: Bytes,
) -> Result<Json<Report>, ApiError> {
    let delimiter = match params.delimiter {
        Some(c) if c.is_ascii() => Some(c as u8),
        Some(_) => return Err((StatusCode::BAD_REQUEST, "delimiter must be ASCII".into())),
        None => None,
    };
    let docs = load_csv(body.as_ref(), &TableOptions { delimiter, ..TableOptions::default() }).map_err(bad_request)?;
    let analysis = analyze(&docs, &state.keywords);
    Ok(Json(Report::build(&analysis, top_n(&state, params.top_n))))
}

pub async fn chart_handler(State(state): State<AppState>, Query(params): Query<TopParams>) -> impl IntoResponse {
    let analysis = analyze(&sample_documents(), &state.keywords);
    let report = Report::build(&analysis, DEFAULT_TOP_N);
    let n = params.top_n.unwrap_or(DEFAULT_CHART_TOP_N).clamp(1, MAX_TOP_N);
    let svg = render_svg(report.top_terms(n), DEFAULT_TITLE);
    ([(header::CONTENT_TYPE, "image/svg+xml")], svg)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<Vec<Representative>> {
    if params.name.trim().is_empty() {
        return Json(vec![]);
    }
    Json(state.camara.search_representatives(&params.name).await)
}

pub async fn representative_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Representative>, ApiError> {
    state
        .camara
        .representative(id)
        .await
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, format!("representative {id} not found")))
}

pub async fn proposals_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(params): Query<ProposalParams>,
) -> Json<ProposalsResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_PROPOSAL_LIMIT).clamp(1, MAX_TOP_N);
    let mut proposals = state.camara.proposals_by_author(id, limit).await;
    if params.themes {
        state.camara.attach_themes(&mut proposals).await;
    }
    let report = params.analyze.then(|| {
        let docs: Vec<Document> = proposals.iter().map(Proposal::as_document).collect();
        Report::build(&analyze(&docs, &state.keywords), top_n(&state, params.top_n))
    });
    Json(ProposalsResponse { author_id: id, proposals, report })
}
