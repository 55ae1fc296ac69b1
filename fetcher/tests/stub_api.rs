use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use fetcher::{CamaraClient, ClientConfig, PLACEHOLDER};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Hits(Arc<AtomicUsize>);

async fn deputados(State(hits): State<Hits>, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    hits.0.fetch_add(1, Ordering::SeqCst);
    let nome = q.get("nome").cloned().unwrap_or_default();
    if nome == "ninguem" {
        return Json(json!({ "dados": [] }));
    }
    Json(json!({
        "dados": [
            { "id": 1, "nome": "Ana Souza", "siglaPartido": "ABC", "siglaUf": "RJ", "email": "ana@camara.leg.br" },
            { "id": 2, "nome": "Ana Lima" },
            { "nome": "sem id" }
        ],
        "links": []
    }))
}

async fn deputado(Path(id): Path<u64>) -> Result<Json<Value>, StatusCode> {
    if id != 1 {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({
        "dados": {
            "id": 1,
            "nomeCivil": "Ana Maria Souza",
            "ultimoStatus": { "nome": "Ana Souza", "siglaPartido": "ABC", "siglaUf": "RJ", "situacao": "Exercício" }
        }
    })))
}

async fn proposicoes(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    assert_eq!(q.get("idDeputadoAutor").map(String::as_str), Some("1"));
    assert_eq!(q.get("ordem").map(String::as_str), Some("DESC"));
    Json(json!({
        "dados": [
            { "id": 900, "siglaTipo": "PL", "numero": 10, "ano": 2024, "ementa": "Dispõe sobre o combate à pirataria e à contrafação de marca." },
            { "id": 901, "siglaTipo": "PL", "numero": 11, "ano": 2024 }
        ]
    }))
}

async fn temas(Path(id): Path<u64>) -> Json<Value> {
    if id == 900 {
        Json(json!({ "dados": [ { "codTema": 1, "tema": "Indústria, Comércio e Serviços" } ] }))
    } else {
        Json(json!({ "sem_dados": true }))
    }
}

async fn start_stub() -> (String, Hits) {
    let hits = Hits::default();
    let app = Router::new()
        .route("/deputados", get(deputados))
        .route("/deputados/:id", get(deputado))
        .route("/proposicoes", get(proposicoes))
        .route("/proposicoes/:id/temas", get(temas))
        .with_state(hits.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), hits)
}

fn client_for(base_url: String) -> CamaraClient {
    CamaraClient::new(ClientConfig { base_url, timeout: Duration::from_secs(2), ..ClientConfig::default() }).unwrap()
}

#[tokio::test]
async fn search_decodes_envelope_and_fills_placeholders() {
    let (base, _) = start_stub().await;
    let client = client_for(base);
    let reps = client.search_representatives("Ana").await;
    assert_eq!(reps.len(), 2);
    assert_eq!(reps[0].party, "ABC");
    assert_eq!(reps[1].party, PLACEHOLDER);
    assert_eq!(reps[1].email, PLACEHOLDER);
    assert!(client.search_representatives("ninguem").await.is_empty());
}

#[tokio::test]
async fn repeated_queries_hit_the_cache() {
    let (base, hits) = start_stub().await;
    let client = client_for(base);
    client.search_representatives("Ana").await;
    client.search_representatives("Ana").await;
    assert_eq!(hits.0.load(Ordering::SeqCst), 1);
    client.cache().clear();
    client.search_representatives("Ana").await;
    assert_eq!(hits.0.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn expired_entries_are_refetched() {
    let (base, hits) = start_stub().await;
    let client = CamaraClient::new(ClientConfig {
        base_url: base,
        cache_ttl: Duration::from_millis(20),
        ..ClientConfig::default()
    })
    .unwrap();
    client.search_representatives("Ana").await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    client.search_representatives("Ana").await;
    assert_eq!(hits.0.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn representative_by_id() {
    let (base, _) = start_stub().await;
    let client = client_for(base);
    let rep = client.representative(1).await.unwrap();
    assert_eq!(rep.name, "Ana Souza");
    assert_eq!(rep.status, "Exercício");
    assert_eq!(rep.email, PLACEHOLDER);
    // 404 yields nothing instead of an error
    assert!(client.representative(2).await.is_none());
}

#[tokio::test]
async fn proposals_with_themes() {
    let (base, _) = start_stub().await;
    let client = client_for(base);
    let mut props = client.proposals_by_author(1, 5).await;
    assert_eq!(props.len(), 2);
    assert_eq!(props[0].label(), "PL 10/2024");
    assert_eq!(props[1].summary, PLACEHOLDER);
    client.attach_themes(&mut props).await;
    assert_eq!(props[0].themes, vec!["Indústria, Comércio e Serviços".to_string()]);
    // missing `dados` envelope degrades to no themes
    assert!(props[1].themes.is_empty());
}

#[tokio::test]
async fn unreachable_host_yields_empty_results() {
    // bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = client_for(format!("http://{addr}"));
    assert!(client.search_representatives("Ana").await.is_empty());
    assert!(client.representative(1).await.is_none());
    assert!(client.proposals_by_author(1, 5).await.is_empty());
    assert!(client.cache().is_empty());
}

#[test]
fn malformed_base_url_is_rejected() {
    let err = CamaraClient::new(ClientConfig { base_url: "not a url".into(), ..ClientConfig::default() }).err();
    assert!(err.is_some_and(|e| e.to_string().contains("invalid base url")));
}
