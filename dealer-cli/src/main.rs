//! dealer-cli: command-line client for the dealer review service
//!
//! # Subcommands
//! - `reviews <dealer_id> [--json]`  : reviews of a dealer with sentiment
//! - `dealers [--state S] [--json]`  : list dealerships
//! - `dealer <dealer_id>`            : one dealership as JSON
//! - `classify <text>`               : classify text locally, no server needed
//! - `status`                        : show server health

use clap::{Parser, Subcommand};
use dealer_core::{Dealer, EnrichedReview, LexiconModel, Sentiment, SentimentClassifier};
use serde::de::DeserializeOwned;

const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "dealer-cli",
    version,
    about = "Browse dealerships and sentiment-annotated reviews"
)]
struct Cli {
    /// Dealer HTTP server URL (overrides DEALER_HTTP_URL env var)
    #[arg(long, env = "DEALER_HTTP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the reviews of a dealer, each with its sentiment
    Reviews {
        dealer_id: String,

        /// Print the raw JSON array
        #[arg(long)]
        json: bool,
    },

    /// List dealerships
    Dealers {
        /// Only dealers in this state ("All" for every state)
        #[arg(long)]
        state: Option<String>,

        /// Print the raw JSON array
        #[arg(long)]
        json: bool,
    },

    /// Show one dealership
    Dealer { dealer_id: String },

    /// Classify text with the built-in lexicon
    Classify {
        text: String,

        /// Optional lexicon file extending the built-in one
        #[arg(long)]
        lexicon: Option<String>,
    },

    /// Show dealer server status
    Status,
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

fn client() -> anyhow::Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?)
}

/// GET `url` and pull `field` out of the `{status: 200, <field>: ...}` body.
fn get_field<T: DeserializeOwned>(url: &str, field: &str) -> anyhow::Result<T> {
    let resp = match client()?.get(url).send() {
        Ok(r) => r,
        Err(e) => anyhow::bail!("connection failed to {}: {}", url, e),
    };

    let status = resp.status();
    let body: serde_json::Value = resp
        .json()
        .map_err(|e| anyhow::anyhow!("failed to parse response from {}: {}", url, e))?;

    if !status.is_success() {
        anyhow::bail!("server returned {}: {}", status, error_message(&body));
    }

    let value = body
        .get(field)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("response has no `{}` field", field))?;
    Ok(serde_json::from_value(value)?)
}

fn do_reviews(server: &str, dealer_id: &str, json_output: bool) -> anyhow::Result<()> {
    let url = format!("{}/reviews/dealer/{}", server, dealer_id);
    let reviews: Vec<EnrichedReview> = get_field(&url, "reviews")?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&reviews)?);
        return Ok(());
    }

    if reviews.is_empty() {
        eprintln!("No reviews for dealer {}", dealer_id);
        return Ok(());
    }
    for r in &reviews {
        println!("{}\n", format_review(r));
    }
    Ok(())
}

fn do_dealers(server: &str, state: Option<&str>, json_output: bool) -> anyhow::Result<()> {
    let url = match state {
        Some(s) => format!("{}/get_dealers/{}", server, s),
        None => format!("{}/get_dealers", server),
    };
    let dealers: Vec<Dealer> = get_field(&url, "dealers")?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&dealers)?);
        return Ok(());
    }
    for d in &dealers {
        println!("{}", format_dealer(d));
    }
    Ok(())
}

fn do_dealer(server: &str, dealer_id: &str) -> anyhow::Result<()> {
    let url = format!("{}/get_dealer/{}", server, dealer_id);
    let dealer: Dealer = get_field(&url, "dealer")?;
    println!("{}", serde_json::to_string_pretty(&dealer)?);
    Ok(())
}

fn do_classify(text: &str, lexicon: Option<&str>) -> anyhow::Result<()> {
    let model = LexiconModel::with_optional_file(lexicon)?;
    let classifier = SentimentClassifier::new(std::sync::Arc::new(model));
    let scores = classifier.scores(text);
    println!(
        "{}  (pos {:.3}, neg {:.3}, neu {:.3})",
        classifier.classify(text),
        scores.positive,
        scores.negative,
        scores.neutral
    );
    Ok(())
}

/// Show the server status by calling GET /health.
fn do_status(server: &str) -> anyhow::Result<()> {
    let url = format!("{}/health", server);

    match client()?.get(&url).send() {
        Ok(r) if r.status().is_success() => {
            let body: serde_json::Value = r.json().unwrap_or_default();
            println!("Dealer server: {}", body["status"].as_str().unwrap_or("unknown"));
            println!("Version:       {}", body["version"].as_str().unwrap_or("?"));
            println!("Review source: {}", body["review_source"].as_str().unwrap_or("?"));
            println!("Sentiment:     {}", body["sentiment_backend"].as_str().unwrap_or("?"));
            Ok(())
        }
        Ok(r) => anyhow::bail!("server unhealthy (HTTP {})", r.status()),
        Err(e) => anyhow::bail!("cannot reach {}: {}", url, e),
    }
}

// ============================================================================
// Formatting
// ============================================================================

fn error_message(body: &serde_json::Value) -> String {
    body["error"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}

fn sentiment_marker(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "+",
        Sentiment::Negative => "-",
        Sentiment::Neutral => "~",
    }
}

/// Two-line summary: header with sentiment, then the review text.
fn format_review(r: &EnrichedReview) -> String {
    let review = &r.review;
    let purchase = if review.purchase {
        format!(
            "bought {} {} {}",
            review.car_year, review.car_make, review.car_model
        )
    } else {
        "no purchase".to_string()
    };
    format!(
        "[{}] {} #{} {} ({})\n    {}",
        sentiment_marker(r.sentiment),
        r.sentiment,
        review.id,
        review.name,
        purchase,
        review.review
    )
}

fn format_dealer(d: &Dealer) -> String {
    let name = d
        .full_name
        .as_deref()
        .or(d.short_name.as_deref())
        .unwrap_or("(unnamed)");
    let city = d.city.as_deref().unwrap_or("?");
    let st = d.st.as_deref().or(d.state.as_deref()).unwrap_or("?");
    format!("{:>5}  {}  {}, {}", d.id, name, city, st)
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    let result = match cli.command {
        Commands::Reviews { dealer_id, json } => do_reviews(&server, &dealer_id, json),
        Commands::Dealers { state, json } => do_dealers(&server, state.as_deref(), json),
        Commands::Dealer { dealer_id } => do_dealer(&server, &dealer_id),
        Commands::Classify { text, lexicon } => do_classify(&text, lexicon.as_deref()),
        Commands::Status => do_status(&server),
    };

    if let Err(e) = result {
        eprintln!("dealer-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================
