use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use nw_core::{Result, WatchConfig};
use nw_scrapers::{HomepageScraper, RefreshScheduler};
use nw_storage::{check_news_exists, ArticleStore, SharedStore};
use nw_web::{create_app, AppState};
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Interval like "30m", "1h15m" or "90" (bare seconds).
#[derive(Debug, Clone)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total = 0u64;
        let mut digits = String::new();
        let mut saw_component = false;

        for c in s.trim().chars() {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            let value: u64 = digits
                .parse()
                .map_err(|_| format!("expected a number before '{c}'"))?;
            digits.clear();
            total += match c {
                's' => value,
                'm' => value * 60,
                'h' => value * 3600,
                'd' => value * 86400,
                _ => return Err(format!("invalid duration unit: {c}")),
            };
            saw_component = true;
        }
        if !digits.is_empty() {
            // bare trailing number means seconds
            total += digits
                .parse::<u64>()
                .map_err(|_| "invalid number in duration".to_string())?;
            saw_component = true;
        }
        if !saw_component {
            return Err("duration must include a number".to_string());
        }
        Ok(HumanDuration(Duration::from_secs(total)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Watch a news homepage for fresh headlines", long_about = None)]
struct Cli {
    /// Homepage to fetch; also the origin used to resolve relative links
    #[arg(long, default_value = "https://timesofindia.indiatimes.com/")]
    base_url: String,
    /// Label recorded on captured articles
    #[arg(long, default_value = "Times of India")]
    source: String,
    /// Path of the persisted article store
    #[arg(long, default_value = "news_data.json")]
    data_file: PathBuf,
    /// Titles this long or shorter are treated as scraping noise
    #[arg(long, default_value_t = 10)]
    min_title_len: usize,
    /// Time between refresh cycles (e.g. 30m, 1h15m)
    #[arg(long, default_value = "30m")]
    interval: HumanDuration,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Refresh immediately, then periodically, and serve the query API
    Run {
        /// Address for the query API
        #[arg(long, default_value = "127.0.0.1:3000")]
        listen: SocketAddr,
    },
    /// Run a single refresh cycle and exit
    Scrape,
    /// Check whether some text matches a known article
    Check { text: String },
    /// List stored articles
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = WatchConfig {
        base_url: cli.base_url,
        source: cli.source,
        min_title_len: cli.min_title_len,
        interval: cli.interval.0,
        data_file: cli.data_file,
    };
    config.validate()?;

    // A corrupt state file is fatal here: silently starting over would
    // discard the capture history.
    let store = ArticleStore::load(&config.data_file)?.into_shared();

    match cli.command {
        Commands::Run { listen } => run(config, store, listen).await,
        Commands::Scrape => {
            let source = Arc::new(HomepageScraper::new(&config));
            RefreshScheduler::new(&config, store, source).run_cycle().await
        }
        Commands::Check { text } => {
            match check_news_exists(&store, &text).await {
                (true, Some(article)) => {
                    println!("matches stored article: {} ({})", article.title, article.url)
                }
                _ => println!("no matching article"),
            }
            Ok(())
        }
        Commands::List => {
            let snapshot = store.read().await.snapshot();
            for record in snapshot.values() {
                println!(
                    "{} [{}] {}",
                    record.timestamp.format("%Y-%m-%d %H:%M"),
                    record.source,
                    record.title
                );
            }
            Ok(())
        }
    }
}

async fn run(config: WatchConfig, store: SharedStore, listen: SocketAddr) -> Result<()> {
    let source = Arc::new(HomepageScraper::new(&config));
    let scheduler = RefreshScheduler::new(&config, store.clone(), source);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler_task = tokio::spawn(scheduler.run(shutdown_rx));

    let app = create_app(AppState { store });
    let listener = tokio::net::TcpListener::bind(listen).await?;
    info!("query API listening on {listen}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    // interrupt received: stop scheduling further cycles, let an in-flight
    // cycle finish
    let _ = shutdown_tx.send(true);
    let _ = scheduler_task.await;
    Ok(())
}
