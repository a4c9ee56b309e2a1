pub mod config;
pub mod engine;
pub mod export;
pub mod model;
pub mod query;
pub mod ui;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use serde_json::json;

use config::AppConfig;
use engine::client::EngineClient;
use export::{ExportFormat, ExportOptions, export_results, strip_highlight_tags};
use model::Sport;
use query::builder::QueryBuilder;
use ui::date_input;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("VERGEN_BUILD_TIMESTAMP"),
    ")"
);

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "sport-search",
    version,
    long_version = LONG_VERSION,
    about = "Faceted search client for a sports event index"
)]
pub struct Cli {
    /// Path to the config file (defaults to platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Engine base URL override
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Index name override
    #[arg(long, global = true)]
    pub index: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive TUI
    Tui,
    /// Run a one-shot search and print the hits
    Search {
        /// Search text; prefix rules apply (e.g. "d=soccer")
        #[arg(default_value = "")]
        term: String,

        /// Zero-based result page
        #[arg(long, default_value_t = 0)]
        page: usize,

        /// Results per page (defaults to the configured page size)
        #[arg(long)]
        limit: Option<usize>,

        /// Output format: text, markdown, or json
        #[arg(long, default_value = "text")]
        format: ExportFormat,

        /// Include the description/content/snippet fields in the output
        #[arg(long)]
        body: bool,

        /// Print the generated query body instead of executing it
        #[arg(long)]
        show_query: bool,
    },
    /// Query the autocomplete variant (top title matches)
    Suggest { term: String },
    /// Add a document to the index
    Add {
        #[arg(long)]
        title: Option<String>,

        /// Event date (ISO or US format, or "today"/"yesterday")
        #[arg(long)]
        date: Option<String>,

        /// Popularity rating from 0 to 5
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=5))]
        popularity: u8,

        /// Comma-separated sport types
        #[arg(long, value_delimiter = ',')]
        sport_type: Vec<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        content: Option<String>,

        #[arg(long)]
        snippet: Option<String>,

        /// Print the request body without sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete a document by its engine-assigned id
    Delete { id: String },
    /// Check engine reachability and version
    Ping,
    /// Generate shell completions
    Completions { shell: Shell },
    /// Render the man page to stdout
    Man,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Tui | Commands::Completions { .. } | Commands::Man => {}
        _ => init_logging(),
    }

    let cfg = load_config(&cli)?;

    match cli.command {
        Commands::Tui => run_tui(cfg).await,
        Commands::Search {
            term,
            page,
            limit,
            format,
            body,
            show_query,
        } => run_search(cfg, term, page, limit, format, body, show_query).await,
        Commands::Suggest { term } => run_suggest(cfg, term).await,
        Commands::Add {
            title,
            date,
            popularity,
            sport_type,
            description,
            content,
            snippet,
            dry_run,
        } => {
            let doc = build_document(
                title,
                date,
                popularity,
                sport_type,
                description,
                content,
                snippet,
            )?;
            run_add(cfg, doc, dry_run).await
        }
        Commands::Delete { id } => run_delete(cfg, id).await,
        Commands::Ping => run_ping(cfg).await,
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "sps", &mut io::stdout());
            Ok(())
        }
        Commands::Man => run_man(),
    }
}

async fn run_tui(cfg: AppConfig) -> Result<()> {
    let _guard = init_tui_logging()?;
    let handle = tokio::runtime::Handle::current();
    tokio::task::spawn_blocking(move || ui::tui::run_tui(cfg, handle))
        .await
        .context("TUI task failed")?
}

async fn run_search(
    cfg: AppConfig,
    term: String,
    page: usize,
    limit: Option<usize>,
    format: ExportFormat,
    body: bool,
    show_query: bool,
) -> Result<()> {
    let builder = QueryBuilder::from_config(&cfg.search);
    let size = limit.unwrap_or(cfg.search.page_size);
    let mut request = json!({
        "from": page * size,
        "size": size,
        "highlight": {
            "fields": {"title": {"fragment_size": 100, "number_of_fragments": 1}}
        },
    });
    builder.rewrite(&mut request, &term);

    if show_query {
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    let client = EngineClient::from_config(&cfg.engine)?;
    let response = client.search(&request).await?;
    let total = response.hits.total.value;
    let took = response.took;
    let hits = response.into_hits();

    let options = ExportOptions {
        include_body: body,
        total,
        query: (!term.is_empty()).then(|| term.clone()),
        ..ExportOptions::default()
    };
    print!("{}", export_results(&hits, format, &options));

    if format == ExportFormat::PlainText {
        let summary = format!("{total} hits in {took} ms");
        eprintln!("{}", summary.as_str().dimmed());
    }
    Ok(())
}

async fn run_suggest(cfg: AppConfig, term: String) -> Result<()> {
    if term.chars().count() < cfg.autocomplete.min_chars {
        bail!(
            "suggest needs at least {} characters",
            cfg.autocomplete.min_chars
        );
    }

    let builder = QueryBuilder::from_config(&cfg.search);
    let Some(query) = builder.query_for(&term) else {
        bail!("suggest needs a non-empty term");
    };
    let request = json!({
        "size": cfg.autocomplete.size,
        "query": query,
        "_source": ["title"],
    });

    let client = EngineClient::from_config(&cfg.engine)?;
    let response = client.search(&request).await?;
    for hit in response.into_hits() {
        println!("{}", strip_highlight_tags(hit.display_title()));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn build_document(
    title: Option<String>,
    date: Option<String>,
    popularity: u8,
    sport_type: Vec<String>,
    description: Option<String>,
    content: Option<String>,
    snippet: Option<String>,
) -> Result<Sport> {
    let event_date = match date {
        Some(raw) => date_input::parse_event_date(&raw)
            .with_context(|| format!("unrecognized date '{raw}'"))?,
        None => String::new(),
    };

    Ok(Sport {
        title: title.unwrap_or_default(),
        event_date,
        popularity,
        sport_type,
        description: description.unwrap_or_default(),
        content: content.unwrap_or_default(),
        snippet: snippet.unwrap_or_default(),
    })
}

async fn run_add(cfg: AppConfig, doc: Sport, dry_run: bool) -> Result<()> {
    if dry_run {
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    let client = EngineClient::from_config(&cfg.engine)?;
    let created = client.create_document(&doc).await?;
    println!("{} {}", "indexed".green(), created.id);
    Ok(())
}

async fn run_delete(cfg: AppConfig, id: String) -> Result<()> {
    let client = EngineClient::from_config(&cfg.engine)?;
    let deleted = client.delete_document(&id).await?;
    println!("{} {}", deleted.result.as_str().green(), id);
    Ok(())
}

async fn run_ping(cfg: AppConfig) -> Result<()> {
    let client = EngineClient::from_config(&cfg.engine)?;
    let info = client.ping().await?;
    println!(
        "{} {} (cluster {}, version {})",
        "ok".green(),
        info.name,
        info.cluster_name,
        info.version.number
    );
    Ok(())
}

fn run_man() -> Result<()> {
    let man = clap_mangen::Man::new(Cli::command());
    let mut buf: Vec<u8> = Vec::new();
    man.render(&mut buf)?;
    io::stdout().write_all(&buf)?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut cfg = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    if let Some(host) = &cli.host {
        cfg.engine.host = host.clone();
    }
    if let Some(index) = &cli.index {
        cfg.engine.index = index.clone();
    }
    cfg.validate()?;
    Ok(cfg)
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(default_env_filter())
        .with_writer(std::io::stderr)
        .init();
}

fn init_tui_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let dir = default_data_dir().join("logs");
    std::fs::create_dir_all(&dir)?;
    let appender = tracing_appender::rolling::never(&dir, "sport-search.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(default_env_filter())
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(guard)
}

fn default_env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "sport-search", "sport-search")
        .expect("project dirs available")
        .data_dir()
        .to_path_buf()
}
