use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dealer_core::{DealerConfig, LexiconModel, SentimentClassifier};
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};

use dealer_analyzer::{start_analyzer, AnalyzerState};

#[derive(Parser, Debug)]
#[command(author, version, about = "Lexicon sentiment analyzer service", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "dealer.toml")]
    config: String,

    /// Overrides `analyzer.port`
    #[arg(short, long)]
    port: Option<u16>,

    /// Overrides `analyzer.lexicon_path`
    #[arg(long)]
    lexicon: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = DealerConfig::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.service.log_level));
    fmt().with_env_filter(filter).init();

    let lexicon_path = args.lexicon.or(config.analyzer.lexicon_path.clone());
    let model = LexiconModel::with_optional_file(lexicon_path.as_deref())
        .context("Failed to load sentiment lexicon")?;
    let state = Arc::new(AnalyzerState {
        classifier: SentimentClassifier::new(Arc::new(model)),
    });

    let port = args.port.unwrap_or(config.analyzer.port);
    let addr = format!("{}:{}", config.analyzer.host, port);

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                let _ = shutdown_tx.send(());
            }
            Err(e) => tracing::error!("Failed to listen for Ctrl+C: {}", e),
        }
    });

    start_analyzer(state, &addr, tx.subscribe()).await
}
