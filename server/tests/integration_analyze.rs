use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use fetcher::ClientConfig;
use http_body_util::BodyExt;
use hyper::body::Bytes;
use pimonitor_core::chart::DEFAULT_CHART_TOP_N;
use pimonitor_core::{analyze, default_keywords, sample_documents, KeywordSet, Report};
use serde_json::{json, Value};
use server::{build_app, AppConfig};
use std::time::Duration;
use tower::ServiceExt;

fn app() -> Router {
    // nothing listens on port 9 locally; API-backed routes must degrade to empty
    let camara = ClientConfig {
        base_url: "http://127.0.0.1:9".into(),
        timeout: Duration::from_millis(500),
        ..ClientConfig::default()
    };
    build_app(AppConfig { keywords: default_keywords().clone(), camara, default_top_n: 3 }).unwrap()
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Bytes) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

async fn get(uri: &str) -> (StatusCode, Bytes) {
    call(app(), Request::get(uri).body(Body::empty()).unwrap()).await
}

fn json_body(bytes: &Bytes) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn sample_report_ranks_documents() {
    let (status, body) = get("/analyze/sample").await;
    assert_eq!(status, StatusCode::OK);
    let v = json_body(&body);
    assert_eq!(v["documents"], 5);
    let top = v["top_documents"].as_array().unwrap();
    assert_eq!(top.len(), 3);
    assert_eq!(top[0]["id"], "101");
    assert_eq!(v["frequencies"][0]["term"], "marca");

    let (_, body) = get("/analyze/sample?top_n=10").await;
    assert_eq!(json_body(&body)["top_documents"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn analyze_json_coerces_fields() {
    let payload = json!({
        "documents": [
            { "id": "a", "text": "Pirataria e PIRATARIA" },
            { "text": null },
            { "id": "x", "text": 12345 }
        ]
    });
    let req = Request::post("/analyze?top_n=5")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (status, body) = call(app(), req).await;
    assert_eq!(status, StatusCode::OK);
    let v = json_body(&body);
    assert_eq!(v["documents"], 3);
    assert_eq!(v["total_occurrences"], 2);
    let ids: Vec<&str> = v["top_documents"].as_array().unwrap().iter().map(|d| d["id"].as_str().unwrap()).collect();
    // the second document has no id and falls back to its position
    assert_eq!(ids, vec!["a", "1", "x"]);
}

#[tokio::test]
async fn analyze_json_with_custom_keywords() {
    let payload = json!({
        "documents": [{ "id": "a", "text": "Tênis e tenis" }],
        "keywords": ["TÊNIS"]
    });
    let req = Request::post("/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (status, body) = call(app(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["frequencies"], json!([{ "term": "tenis", "count": 2 }]));

    let req = Request::post("/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "documents": [], "keywords": ["  "] }).to_string()))
        .unwrap();
    let (status, _) = call(app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyze_csv_body() {
    let csv = "ID;Data;Texto_Documento\n1;2025-01-01;Uso indevido da marca\n2;;\n";
    let req = Request::post("/analyze/csv").body(Body::from(csv)).unwrap();
    let (status, body) = call(app(), req).await;
    assert_eq!(status, StatusCode::OK);
    let v = json_body(&body);
    assert_eq!(v["documents"], 2);
    assert_eq!(v["top_documents"][0], json!({ "id": "1", "score": 2 }));
    assert_eq!(v["top_documents"][1], json!({ "id": "2", "score": 0 }));
}

#[tokio::test]
async fn analyze_csv_missing_column_is_rejected() {
    let req = Request::post("/analyze/csv").body(Body::from("ID,Texto\n1,marca\n")).unwrap();
    let (status, body) = call(app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8_lossy(&body).contains("Texto_Documento"));
}

#[tokio::test]
async fn chart_is_svg() {
    let resp = app().oneshot(Request::get("/chart.svg?top_n=3").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "image/svg+xml");
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let svg = String::from_utf8_lossy(&body);
    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches("<title>").count(), 3);
}

#[tokio::test]
async fn chart_defaults_to_shared_bar_count() {
    let resp = app().oneshot(Request::get("/chart.svg").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let svg = String::from_utf8_lossy(&body);
    let terms = Report::build(&analyze(&sample_documents(), default_keywords()), 1).frequencies.len();
    assert_eq!(svg.matches("<title>").count(), terms.min(DEFAULT_CHART_TOP_N));
}

#[tokio::test]
async fn keywords_and_sample_listings() {
    let (_, body) = get("/keywords").await;
    let v = json_body(&body);
    let expected = KeywordSet::new(pimonitor_core::DEFAULT_KEYWORDS);
    assert_eq!(v["phrases"].as_array().unwrap().len(), expected.phrases().len());
    assert_eq!(v["tokens"].as_array().unwrap().len(), expected.tokens().len());

    let (_, body) = get("/sample").await;
    assert_eq!(json_body(&body).as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn unavailable_api_degrades_to_empty() {
    let (status, body) = get("/representatives?name=Ana").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body), json!([]));

    let (status, _) = get("/representatives/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get("/representatives/1/proposals?analyze=true").await;
    assert_eq!(status, StatusCode::OK);
    let v = json_body(&body);
    assert_eq!(v["proposals"], json!([]));
    assert_eq!(v["report"]["documents"], 0);
}
