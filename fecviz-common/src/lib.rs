pub mod config;
pub use config::{CachePolicy, Config, HistogramConfig, JoinKeyPolicy};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
pub enum FecVizError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid record on line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },
    #[error("invalid bin thresholds: {0}")]
    InvalidBins(String),
    #[error("dispatch channel closed")]
    ChannelClosed,
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, FecVizError>;

/// One contribution: a category label (a US state code in FEC data) and an amount in dollars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionRecord {
    #[serde(rename = "state", alias = "category")]
    pub category: String,
    pub amount: f64,
}

impl ContributionRecord {
    pub fn new(category: impl Into<String>, amount: f64) -> Self {
        Self { category: category.into(), amount }
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` controls the filter (default `warn`); `LOG_FORMAT=json` switches
/// to structured output. Fails if a subscriber is already installed.
pub fn init_tracing<W>(writer: W) -> Result<()>
where
    W: for<'a> tracing_subscriber::fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    let result = match format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(writer)
            .try_init(),
        _ => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(writer)
            .try_init(),
    };
    result.map_err(|e| FecVizError::Other(format!("tracing init failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_subscriber_install_reports_error() {
        let _ = init_tracing(std::io::sink);
        let err = init_tracing(std::io::sink).unwrap_err();
        assert!(err.to_string().contains("tracing init failed"));
    }

    #[test]
    fn record_reads_state_or_category() {
        let a: ContributionRecord = serde_json::from_str(r#"{"state":"CA","amount":10}"#).unwrap();
        let b: ContributionRecord = serde_json::from_str(r#"{"category":"CA","amount":10}"#).unwrap();
        assert_eq!(a, b);
    }
}
