use crate::cache::{CacheKey, ResponseCache, DEFAULT_TTL_SECS};
use crate::models::{ApiProposal, ApiRepresentative, ApiRepresentativeDetail, ApiTheme, Proposal, Representative};
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://dadosabertos.camara.leg.br/api/v2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PROPOSAL_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub cache_ttl: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            user_agent: concat!("pimonitor-fetcher/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults, with the base URL taken from `CAMARA_API_URL` when set.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(url) = std::env::var("CAMARA_API_URL") {
            if !url.trim().is_empty() { cfg.base_url = url.trim().to_string(); }
        }
        cfg
    }
}

/// Client for the Câmara dos Deputados open-data API.
///
/// Public operations never fail: network errors, non-2xx statuses and malformed
/// payloads are logged and surface as empty results.
#[derive(Clone)]
pub struct CamaraClient {
    http: Client,
    base_url: String,
    cache: Arc<ResponseCache>,
}

impl CamaraClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Url::parse(&config.base_url).with_context(|| format!("invalid base url {}", config.base_url))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache: Arc::new(ResponseCache::new(config.cache_ttl)),
        })
    }

    pub fn cache(&self) -> &ResponseCache { &self.cache }

    /// GET `{base}/{endpoint}?params` and return the payload under `dados`.
    async fn fetch_dados(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value> {
        let key = CacheKey::new(endpoint, params);
        if let Some(hit) = self.cache.get(&key) {
            debug!(endpoint, "cache hit");
            return Ok(hit);
        }

        let url = Url::parse_with_params(
            &format!("{}/{}", self.base_url, endpoint),
            params.iter().map(|(k, v)| (*k, v.as_str())),
        )?;
        let start = Instant::now();
        let resp = self
            .http
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("request failed for {url}"))?;
        let resp = resp.error_for_status().with_context(|| format!("HTTP error for {url}"))?;
        let mut body: Value = resp.json().await.with_context(|| format!("decoding JSON for {url}"))?;
        let dados = body
            .get_mut("dados")
            .map(Value::take)
            .ok_or_else(|| anyhow!("response from {url} has no 'dados' field"))?;
        debug!(endpoint, elapsed_ms = start.elapsed().as_millis() as u64, "fetched");

        self.cache.insert(key, dados.clone());
        Ok(dados)
    }

    /// Like `fetch_dados`, but decodes into `T` and turns any failure into `None`.
    async fn dados_or_warn<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, String)]) -> Option<T> {
        let value = match self.fetch_dados(endpoint, params).await {
            Ok(v) => v,
            Err(e) => {
                warn!(endpoint, error = %format!("{e:#}"), "camara api call failed");
                return None;
            }
        };
        match serde_json::from_value(value) {
            Ok(t) => Some(t),
            Err(e) => {
                warn!(endpoint, error = %e, "unexpected payload shape");
                None
            }
        }
    }

    pub async fn search_representatives(&self, name: &str) -> Vec<Representative> {
        let params = [
            ("nome", name.trim().to_string()),
            ("ordem", "ASC".to_string()),
            ("ordenarPor", "nome".to_string()),
        ];
        self.dados_or_warn::<Vec<ApiRepresentative>>("deputados", &params)
            .await
            .unwrap_or_default()
            .into_iter()
            .filter_map(Representative::from_api)
            .collect()
    }

    pub async fn representative(&self, id: u64) -> Option<Representative> {
        let detail: ApiRepresentativeDetail = self.dados_or_warn(&format!("deputados/{id}"), &[]).await?;
        Representative::from_detail(detail)
    }

    /// Most recent proposals authored by a representative, newest first.
    pub async fn proposals_by_author(&self, author_id: u64, limit: usize) -> Vec<Proposal> {
        let params = [
            ("idDeputadoAutor", author_id.to_string()),
            ("ordem", "DESC".to_string()),
            ("ordenarPor", "id".to_string()),
            ("itens", limit.max(1).to_string()),
        ];
        self.dados_or_warn::<Vec<ApiProposal>>("proposicoes", &params)
            .await
            .unwrap_or_default()
            .into_iter()
            .filter_map(Proposal::from_api)
            .collect()
    }

    pub async fn proposal_themes(&self, proposal_id: u64) -> Vec<String> {
        self.dados_or_warn::<Vec<ApiTheme>>(&format!("proposicoes/{proposal_id}/temas"), &[])
            .await
            .unwrap_or_default()
            .into_iter()
            .filter_map(|t| t.tema)
            .filter(|t| !t.trim().is_empty())
            .collect()
    }

    /// Fill `themes` on each proposal; proposals whose lookup fails keep an empty list.
    pub async fn attach_themes(&self, proposals: &mut [Proposal]) {
        for p in proposals.iter_mut() {
            p.themes = self.proposal_themes(p.id).await;
        }
    }
}
