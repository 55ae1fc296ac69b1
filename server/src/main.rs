use anyhow::{bail, Context, Result};
use axum::Router;
use clap::Parser;
use fetcher::ClientConfig;
use pimonitor_core::{default_keywords, KeywordSet, DEFAULT_TOP_N};
use server::{build_app, AppConfig};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Keyword file, one term per line (defaults to the built-in list)
    #[arg(long)]
    keywords: Option<String>,
    /// Default number of documents in a ranking
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    top_n: usize,
    /// Câmara API base URL (defaults to CAMARA_API_URL or the public endpoint)
    #[arg(long)]
    camara_url: Option<String>,
    /// Câmara API request timeout seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
    /// How long Câmara API responses are cached, in seconds
    #[arg(long, default_value_t = 600)]
    cache_ttl_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let keywords = match &args.keywords {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading keyword file {path}"))?;
            let set = KeywordSet::from_lines(&text);
            if set.is_empty() { bail!("keyword file {path} contains no keywords"); }
            set
        }
        None => default_keywords().clone(),
    };
    let mut camara = ClientConfig::from_env();
    if let Some(url) = args.camara_url.clone() { camara.base_url = url; }
    camara.timeout = Duration::from_secs(args.timeout_secs);
    camara.cache_ttl = Duration::from_secs(args.cache_ttl_secs);

    let app: Router = build_app(AppConfig { keywords, camara, default_top_n: args.top_n })?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
