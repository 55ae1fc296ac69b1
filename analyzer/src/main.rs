use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pimonitor_core::chart::{render_svg, DEFAULT_CHART_TOP_N, DEFAULT_TITLE};
use pimonitor_core::table::{load_csv_path, TableOptions};
use pimonitor_core::{analyze, default_keywords, sample_documents, Document, KeywordSet, Report, DEFAULT_TOP_N};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "analyzer")]
#[command(about = "Count legal/IP keywords in a batch of documents and rank them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a CSV file, a directory of .csv/.txt files, or the bundled sample
    Analyze {
        /// Input path (file or directory); the bundled sample is used when omitted
        #[arg(long)]
        input: Option<String>,
        /// Keyword file, one term per line (defaults to the built-in list)
        #[arg(long)]
        keywords: Option<String>,
        /// Number of documents in the ranking
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,
        /// Number of keywords drawn in the chart
        #[arg(long, default_value_t = DEFAULT_CHART_TOP_N)]
        chart_top_n: usize,
        /// Write the bar chart as SVG to this path
        #[arg(long)]
        chart: Option<String>,
        /// Write the report as JSON to this path
        #[arg(long)]
        json: Option<String>,
        /// Field delimiter for CSV input (sniffed when omitted)
        #[arg(long)]
        delimiter: Option<char>,
    },
    /// Print the active keyword list in normalized form
    Keywords {
        #[arg(long)]
        keywords: Option<String>,
    },
}

#[derive(Serialize)]
struct ReportFile<'a> {
    generated_at: String,
    source: &'a str,
    report: &'a Report,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { input, keywords, top_n, chart_top_n, chart, json, delimiter } => {
            let keywords = load_keywords(keywords.as_deref())?;
            let options = table_options(delimiter)?;
            let (docs, source) = match input.as_deref() {
                Some(path) => (load_input(Path::new(path), &options)?, path.to_string()),
                None => {
                    tracing::info!("no input given, using bundled sample documents");
                    (sample_documents(), "sample".to_string())
                }
            };
            run_analysis(&docs, &keywords, &source, top_n, chart_top_n, chart.as_deref(), json.as_deref())
        }
        Commands::Keywords { keywords } => {
            let keywords = load_keywords(keywords.as_deref())?;
            for p in keywords.phrases() { println!("{p}\t(phrase)"); }
            for t in keywords.tokens() { println!("{t}\t(token)"); }
            Ok(())
        }
    }
}

fn run_analysis(
    docs: &[Document],
    keywords: &KeywordSet,
    source: &str,
    top_n: usize,
    chart_top_n: usize,
    chart: Option<&str>,
    json: Option<&str>,
) -> Result<()> {
    let analysis = analyze(docs, keywords);
    let report = Report::build(&analysis, top_n);
    print!("{}", report.render_text());

    if let Some(path) = chart {
        let svg = render_svg(report.top_terms(chart_top_n), DEFAULT_TITLE);
        fs::write(path, svg).with_context(|| format!("writing chart to {path}"))?;
        tracing::info!(path, "chart written");
    }
    if let Some(path) = json {
        let file = ReportFile {
            generated_at: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_else(|_| "".into()),
            source,
            report: &report,
        };
        fs::write(path, serde_json::to_string_pretty(&file)?).with_context(|| format!("writing report to {path}"))?;
        tracing::info!(path, "report written");
    }
    Ok(())
}

fn load_keywords(path: Option<&str>) -> Result<KeywordSet> {
    match path {
        Some(p) => {
            let text = fs::read_to_string(p).with_context(|| format!("reading keyword file {p}"))?;
            let set = KeywordSet::from_lines(&text);
            if set.is_empty() { bail!("keyword file {p} contains no keywords"); }
            Ok(set)
        }
        None => Ok(default_keywords().clone()),
    }
}

fn table_options(delimiter: Option<char>) -> Result<TableOptions> {
    let delimiter = match delimiter {
        Some(c) if c.is_ascii() => Some(c as u8),
        Some(c) => bail!("delimiter must be a single ASCII character, got {c:?}"),
        None => None,
    };
    Ok(TableOptions { delimiter, ..TableOptions::default() })
}

/// A single table file, or every `.csv`/`.tsv`/`.txt` under a directory. Text files become
/// one document each, with the file stem as id. In a directory, tables without ids get
/// `{relative path}:{row}` ids so rows from different files never share one.
fn load_input(input: &Path, options: &TableOptions) -> Result<Vec<Document>> {
    if input.is_file() {
        return load_file(input, options);
    }
    if !input.is_dir() {
        bail!("input path {} does not exist", input.display());
    }
    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && matches!(extension(p).as_deref(), Some("csv" | "tsv" | "txt")))
        .collect();
    files.sort();

    let mut docs = Vec::new();
    for file in files {
        let rel = file.strip_prefix(input).unwrap_or(&file).to_string_lossy().replace('\\', "/");
        let opts = TableOptions { fallback_id_prefix: Some(rel), ..options.clone() };
        docs.extend(load_file(&file, &opts)?);
    }
    tracing::info!(num_docs = docs.len(), input = %input.display(), "loaded documents");
    Ok(docs)
}

fn load_file(path: &Path, options: &TableOptions) -> Result<Vec<Document>> {
    match extension(path).as_deref() {
        Some("txt") => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            let id = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
            Ok(vec![Document::new(id, text)])
        }
        Some("tsv") => {
            let opts = TableOptions { delimiter: options.delimiter.or(Some(b'\t')), ..options.clone() };
            load_csv_path(path, &opts).with_context(|| format!("loading {}", path.display()))
        }
        _ => load_csv_path(path, options).with_context(|| format!("loading {}", path.display())),
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension().and_then(|s| s.to_str()).map(|s| s.to_ascii_lowercase())
}
