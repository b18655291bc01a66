use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

/// Legacy environment keys read by existing deployment scripts.
pub const BACKEND_URL_ENV: &str = "backend_url";
pub const SENTIMENT_ANALYZER_URL_ENV: &str = "sentiment_analyzer_url";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DealerConfig {
    pub service: ServiceConfig,
    pub http: HttpConfig,
    pub review_source: UpstreamConfig,
    pub sentiment: SentimentConfig,
    pub pipeline: PipelineConfig,
    pub auth: AuthConfig,
    pub analyzer: AnalyzerConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Connection settings shared by both upstream clients.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Extra attempts after the first one. Zero keeps a single attempt.
    pub max_retries: usize,
    pub retry_delay_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3030".to_string(),
            timeout_secs: 10,
            max_retries: 0,
            retry_delay_ms: 200,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SentimentConfig {
    /// `remote` calls the analyzer over HTTP, `local` classifies in-process.
    pub backend: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: usize,
    pub retry_delay_ms: u64,
    pub lexicon_path: Option<String>,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            backend: "remote".to_string(),
            base_url: "http://localhost:5050/".to_string(),
            timeout_secs: 10,
            max_retries: 0,
            retry_delay_ms: 200,
            lexicon_path: None,
        }
    }
}

impl SentimentConfig {
    pub fn upstream(&self) -> UpstreamConfig {
        UpstreamConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            max_retries: self.max_retries,
            retry_delay_ms: self.retry_delay_ms,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PipelineConfig {
    pub classify_concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            classify_concurrency: 1,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    /// Header carrying the username set by the fronting auth layer.
    pub user_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            user_header: "x-remote-user".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub host: String,
    pub port: u16,
    pub lexicon_path: Option<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5050,
            lexicon_path: None,
        }
    }
}

impl DealerConfig {
    /// Load from an optional TOML file, then `DEALER__SECTION__KEY`
    /// environment variables, then the legacy `backend_url` /
    /// `sentiment_analyzer_url` keys.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("DEALER")
                    .separator("__")
                    .try_parsing(true),
            );
        let builder = with_legacy_overrides(
            builder,
            std::env::var(BACKEND_URL_ENV).ok(),
            std::env::var(SENTIMENT_ANALYZER_URL_ENV).ok(),
        )?;
        builder.build()?.try_deserialize()
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

fn with_legacy_overrides(
    builder: ConfigBuilder<DefaultState>,
    backend_url: Option<String>,
    sentiment_analyzer_url: Option<String>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_override_option("review_source.base_url", backend_url)?
        .set_override_option("sentiment.base_url", sentiment_analyzer_url)
}
