//! Paper Ranker - Entry Point

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use paper_ranker::config::{Config, api};
use paper_ranker::server::PaperServer;

#[derive(Parser, Debug)]
#[command(name = "paper-ranker")]
#[command(about = "Rank arXiv papers by citation count or recency")]
#[command(version)]
struct Cli {
    /// Semantic Scholar API key (optional, enables higher rate limits)
    #[arg(long, env = "SEMANTIC_SCHOLAR_API_KEY")]
    api_key: Option<String>,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1", env = "HOST")]
    host: IpAddr,

    /// HTTP server port
    #[arg(long, default_value_t = api::DEFAULT_PORT, env = "PORT")]
    port: u16,

    /// Citation cache file
    #[arg(long, default_value = api::CACHE_PATH, env = "PAPER_CACHE_PATH")]
    cache_path: PathBuf,

    /// Return full records instead of pruning verbose fields
    #[arg(long)]
    no_prune: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        cache = %cli.cache_path.display(),
        prune = !cli.no_prune,
        "Starting paper ranker"
    );

    let mut config = Config::from_env()?;
    config.api_key = cli.api_key;
    config.cache_path = cli.cache_path;
    config.prune = config.prune && !cli.no_prune;

    let server = PaperServer::from_config(&config).await?;
    server.run_http(SocketAddr::new(cli.host, cli.port)).await
}
