//! Configuration for stock analysis operations

use crate::error::{Result, StockError};
use analyst_utils::{env_parse, env_string};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Lookback periods the Yahoo chart endpoint accepts for daily bars
pub const HISTORY_PERIODS: &[&str] = &[
    "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max",
];

/// Default browser-like User-Agent; screener.in rejects bare HTTP clients
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Default Claude model used for the analysis
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Configuration for stock analysis operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockConfig {
    /// Exchange suffix appended to the local symbol for Yahoo (`.NS` = NSE)
    pub exchange_suffix: String,

    /// Lookback period for the daily price history
    pub history_period: String,

    /// Number of most recent history rows included in the report
    pub history_tail: usize,

    /// Base URL of screener.in
    pub screener_base_url: String,

    /// Base URL of the Yahoo fundamentals time-series endpoint
    pub yahoo_base_url: String,

    /// User-Agent sent to data sources
    pub user_agent: String,

    /// Timeout for each data-source request
    pub request_timeout: Duration,

    /// LLM model identifier
    pub model: String,

    /// Maximum tokens the LLM may generate per answer
    pub max_tokens: usize,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            exchange_suffix: ".NS".to_string(),
            history_period: "1y".to_string(),
            history_tail: 5,
            screener_base_url: "https://www.screener.in".to_string(),
            yahoo_base_url: "https://query2.finance.yahoo.com".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(30),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4096,
        }
    }
}

impl StockConfig {
    /// Create a new configuration builder
    pub fn builder() -> StockConfigBuilder {
        StockConfigBuilder::default()
    }

    /// Load configuration from environment variables, falling back to defaults
    ///
    /// A variable that is set but malformed is an error, not a silent default.
    pub fn from_env() -> Result<Self> {
        StockConfigBuilder::default().with_env()?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.exchange_suffix.starts_with('.') || self.exchange_suffix.len() < 2 {
            return Err(StockError::ConfigError(format!(
                "exchange suffix must look like \".NS\", got {:?}",
                self.exchange_suffix
            )));
        }

        validate_period(&self.history_period)
            .map_err(|_| StockError::ConfigError(format!(
                "history period must be one of {}, got {:?}",
                HISTORY_PERIODS.join(" "),
                self.history_period
            )))?;

        if self.history_tail == 0 {
            return Err(StockError::ConfigError(
                "history_tail must be greater than 0".to_string(),
            ));
        }

        validate_base_url("screener_base_url", &self.screener_base_url)?;
        validate_base_url("yahoo_base_url", &self.yahoo_base_url)?;

        if self.request_timeout.is_zero() {
            return Err(StockError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(StockError::ConfigError("model must not be empty".to_string()));
        }

        if self.max_tokens == 0 {
            return Err(StockError::ConfigError(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Check a history period against [`HISTORY_PERIODS`]
pub fn validate_period(period: &str) -> Result<()> {
    if HISTORY_PERIODS.contains(&period) {
        Ok(())
    } else {
        Err(StockError::InvalidInput(format!(
            "unsupported history period {period:?} (expected one of {})",
            HISTORY_PERIODS.join(" ")
        )))
    }
}

fn validate_base_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| StockError::ConfigError(format!("{field} is not a valid URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(StockError::ConfigError(format!(
            "{field} must be http or https, got {scheme}"
        ))),
    }
}

/// Builder for StockConfig
#[derive(Debug, Default)]
pub struct StockConfigBuilder {
    exchange_suffix: Option<String>,
    history_period: Option<String>,
    history_tail: Option<usize>,
    screener_base_url: Option<String>,
    yahoo_base_url: Option<String>,
    user_agent: Option<String>,
    request_timeout: Option<Duration>,
    model: Option<String>,
    max_tokens: Option<usize>,
}

impl StockConfigBuilder {
    /// Set the exchange suffix
    pub fn exchange_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.exchange_suffix = Some(suffix.into());
        self
    }

    /// Set the history lookback period
    pub fn history_period(mut self, period: impl Into<String>) -> Self {
        self.history_period = Some(period.into());
        self
    }

    /// Set how many history rows go into the report
    pub fn history_tail(mut self, rows: usize) -> Self {
        self.history_tail = Some(rows);
        self
    }

    /// Set the screener.in base URL
    pub fn screener_base_url(mut self, url: impl Into<String>) -> Self {
        self.screener_base_url = Some(url.into());
        self
    }

    /// Set the Yahoo fundamentals base URL
    pub fn yahoo_base_url(mut self, url: impl Into<String>) -> Self {
        self.yahoo_base_url = Some(url.into());
        self
    }

    /// Set the User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the LLM model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the LLM max tokens
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Fill every field that has an environment variable set
    pub fn with_env(mut self) -> Result<Self> {
        if let Some(v) = env_string("STOCK_EXCHANGE_SUFFIX") {
            self.exchange_suffix = Some(v);
        }
        if let Some(v) = env_string("STOCK_HISTORY_PERIOD") {
            self.history_period = Some(v);
        }
        if let Some(v) = env_parse::<usize>("STOCK_HISTORY_TAIL")? {
            self.history_tail = Some(v);
        }
        if let Some(v) = env_string("SCREENER_BASE_URL") {
            self.screener_base_url = Some(v);
        }
        if let Some(v) = env_string("YAHOO_FUNDAMENTALS_BASE_URL") {
            self.yahoo_base_url = Some(v);
        }
        if let Some(v) = env_string("STOCK_USER_AGENT") {
            self.user_agent = Some(v);
        }
        if let Some(secs) = env_parse::<u64>("STOCK_REQUEST_TIMEOUT_SECS")? {
            self.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(v) = env_string("ANTHROPIC_MODEL") {
            self.model = Some(v);
        }
        if let Some(v) = env_parse::<usize>("ANTHROPIC_MAX_TOKENS")? {
            self.max_tokens = Some(v);
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<StockConfig> {
        let defaults = StockConfig::default();

        let config = StockConfig {
            exchange_suffix: self.exchange_suffix.unwrap_or(defaults.exchange_suffix),
            history_period: self.history_period.unwrap_or(defaults.history_period),
            history_tail: self.history_tail.unwrap_or(defaults.history_tail),
            screener_base_url: self
                .screener_base_url
                .unwrap_or(defaults.screener_base_url),
            yahoo_base_url: self.yahoo_base_url.unwrap_or(defaults.yahoo_base_url),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            model: self.model.unwrap_or(defaults.model),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
        };

        config.validate()?;
        Ok(config)
    }
}
