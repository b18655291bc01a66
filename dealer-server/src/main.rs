use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dealer_core::{create_sentiment_service, DealerConfig, ReviewSourceClient, SentimentService};
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};

use dealer_server::http::{start_http_server, HttpState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "dealer.toml")]
    config: String,

    /// Print the resolved upstream settings and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (production uses real env vars)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = match DealerConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins; otherwise the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.service.log_level));
    fmt().with_env_filter(filter).init();

    let source = ReviewSourceClient::new(config.review_source.clone())
        .context("Failed to build review source client")?;
    let sentiment: Arc<dyn SentimentService> = Arc::from(
        create_sentiment_service(&config.sentiment)
            .context("Failed to build sentiment backend")?,
    );

    if args.check {
        println!("review source:  {}", source.base_url());
        println!(
            "sentiment:      {} ({})",
            sentiment.name(),
            config.sentiment.base_url
        );
        println!("concurrency:    {}", config.pipeline.classify_concurrency.max(1));
        println!("user header:    {}", config.auth.user_header);
        return Ok(());
    }

    tracing::info!(
        review_source = %source.base_url(),
        sentiment_backend = sentiment.name(),
        concurrency = config.pipeline.classify_concurrency,
        "Starting dealer server"
    );

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

    let state = Arc::new(HttpState::new(Arc::new(source), sentiment, config));
    start_http_server(state, tx.subscribe()).await?;

    Ok(())
}
