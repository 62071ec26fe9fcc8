//! Error types for stock analysis operations

use std::fmt;
use thiserror::Error;

/// Upstream data source a fetch was made against
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DataSource {
    /// Yahoo Finance daily price history
    PriceHistory,
    /// Yahoo Finance income-statement time series
    Financials,
    /// screener.in company page
    Screener,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PriceHistory => f.write_str("Yahoo Finance price history"),
            Self::Financials => f.write_str("Yahoo Finance financials"),
            Self::Screener => f.write_str("Screener.in"),
        }
    }
}

/// Stock analysis specific errors
#[derive(Debug, Error)]
pub enum StockError {
    /// A data source was unreachable or answered with something unexpected.
    /// Non-fatal: the report is built without that source.
    #[error("{provider} unavailable for {symbol}: {reason}")]
    UpstreamUnavailable {
        provider: DataSource,
        symbol: String,
        reason: String,
    },

    /// Every data source failed; there is nothing to analyse
    #[error("No market data could be fetched for {0}")]
    NoData(String),

    /// The LLM could not be reached or rejected the request. Fatal to the
    /// current action.
    #[error("LLM unavailable: {0}")]
    LlmUnavailable(#[from] analyst_llm::LLMError),

    /// Invalid stock symbol provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Invalid user or caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A follow-up was asked before any symbol was analysed
    #[error("No stock analysed yet - run /analyze <SYMBOL> first")]
    NoActiveAnalysis,

    /// Prompt template error
    #[error("Prompt error: {0}")]
    PromptError(#[from] analyst_prompt::PromptError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// REPL command could not be parsed
    #[error("Command error: {0}")]
    CommandError(String),
}

impl StockError {
    /// Build an [`StockError::UpstreamUnavailable`]
    pub fn upstream(
        provider: DataSource,
        symbol: impl Into<String>,
        reason: impl fmt::Display,
    ) -> Self {
        Self::UpstreamUnavailable {
            provider,
            symbol: symbol.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the error only degrades the report instead of failing the action
    pub fn is_degraded_source(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable { .. })
    }
}

impl From<analyst_utils::EnvError> for StockError {
    fn from(err: analyst_utils::EnvError) -> Self {
        StockError::ConfigError(err.to_string())
    }
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;
