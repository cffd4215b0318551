use thiserror::Error;

/// Errors raised while talking to a market-data aggregator
#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Aggregator returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Rate limited by aggregator (429)")]
    RateLimited,

    #[error("Failed to parse aggregator response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Raised when a chain identifier cannot be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown chain `{0}`")]
pub struct UnknownChain(pub String);

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
