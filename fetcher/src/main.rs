use anyhow::Result;
use clap::{Parser, Subcommand};
use fetcher::cache::DEFAULT_TTL_SECS;
use fetcher::{CamaraClient, ClientConfig, Proposal, Representative, DEFAULT_PROPOSAL_LIMIT};
use pimonitor_core::{analyze, default_keywords, Document, Report};
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "fetcher")]
#[command(about = "Query representatives and their proposals from the Câmara dos Deputados API")]
struct Cli {
    /// API base URL (defaults to CAMARA_API_URL or the public endpoint)
    #[arg(long)]
    base_url: Option<String>,
    /// Request timeout seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
    /// How long API responses are cached, in seconds
    #[arg(long, default_value_t = DEFAULT_TTL_SECS)]
    cache_ttl_secs: u64,
    /// Print JSON instead of tables
    #[arg(long, default_value_t = false)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search representatives by name
    Search {
        #[arg(long)]
        name: String,
    },
    /// Show one representative
    Representative {
        #[arg(long)]
        id: u64,
    },
    /// List proposals authored by a representative
    Proposals {
        #[arg(long)]
        author_id: u64,
        /// Maximum number of proposals
        #[arg(long, default_value_t = DEFAULT_PROPOSAL_LIMIT)]
        limit: usize,
        /// Also fetch the themes of each proposal
        #[arg(long, default_value_t = false)]
        themes: bool,
        /// Run the keyword analysis over the proposal summaries
        #[arg(long, default_value_t = false)]
        analyze: bool,
        /// Number of top proposals to show in the ranking
        #[arg(long, default_value_t = 5)]
        top_n: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let client = CamaraClient::new(client_config(&cli))?;

    match cli.command {
        Commands::Search { name } => {
            let reps = client.search_representatives(&name).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&reps)?);
            } else {
                print_representatives(&reps);
            }
        }
        Commands::Representative { id } => match client.representative(id).await {
            Some(rep) if cli.json => println!("{}", serde_json::to_string_pretty(&rep)?),
            Some(rep) => print_representatives(std::slice::from_ref(&rep)),
            None => println!("No representative found for id {id}"),
        },
        Commands::Proposals { author_id, limit, themes, analyze: run_analysis, top_n } => {
            let mut proposals = client.proposals_by_author(author_id, limit).await;
            if themes { client.attach_themes(&mut proposals).await; }
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&proposals)?);
            } else {
                print_proposals(&proposals);
            }
            if run_analysis {
                let docs: Vec<Document> = proposals.iter().map(Proposal::as_document).collect();
                let report = Report::build(&analyze(&docs, default_keywords()), top_n);
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    println!();
                    print!("{}", report.render_text());
                }
            }
        }
    }
    Ok(())
}

fn client_config(cli: &Cli) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.base_url.clone() { config.base_url = url; }
    config.timeout = Duration::from_secs(cli.timeout_secs);
    config.cache_ttl = Duration::from_secs(cli.cache_ttl_secs);
    config
}

fn print_representatives(reps: &[Representative]) {
    if reps.is_empty() {
        println!("No representatives found");
        return;
    }
    println!("{:<8}  {:<32}  {:<8}  {:<2}  {:<12}  {}", "ID", "Name", "Party", "UF", "Status", "Email");
    for r in reps {
        println!("{:<8}  {:<32}  {:<8}  {:<2}  {:<12}  {}", r.id, r.name, r.party, r.state, r.status, r.email);
    }
}

fn print_proposals(proposals: &[Proposal]) {
    if proposals.is_empty() {
        println!("No proposals found");
        return;
    }
    for p in proposals {
        println!("[{}] {}", p.id, p.label());
        println!("    {}", p.summary);
        if !p.themes.is_empty() {
            println!("    themes: {}", p.themes.join(", "));
        }
    }
}
