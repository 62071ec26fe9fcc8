//! Yahoo Finance client
//!
//! Daily bars come from the chart endpoint through `yahoo_finance_api`.
//! Annual statements come from the fundamentals time-series endpoint, which
//! that crate does not cover, so it is called directly with reqwest.

use crate::api::MarketDataSource;
use crate::config::{StockConfig, validate_period};
use crate::error::{DataSource, Result, StockError};
use crate::models::{FinancialsSnapshot, HistoricalSeries, PriceBar};
use crate::symbol::Symbol;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};
use yahoo_finance_api as yahoo;

/// Annual income-statement line items requested from the fundamentals endpoint
pub const FINANCIAL_LINE_ITEMS: &[&str] = &[
    "TotalRevenue",
    "CostOfRevenue",
    "GrossProfit",
    "OperatingExpense",
    "OperatingIncome",
    "EBITDA",
    "InterestExpense",
    "PretaxIncome",
    "TaxProvision",
    "NetIncome",
    "BasicEPS",
    "DilutedEPS",
];

const FUNDAMENTALS_PATH: &str = "/ws/fundamentals-timeseries/v1/finance/timeseries";
const FINANCIALS_LOOKBACK_DAYS: i64 = 5 * 366;

/// Yahoo Finance client
pub struct YahooFinanceClient {
    http: Client,
    base_url: String,
    exchange_suffix: String,
    timeout: Duration,
}

impl YahooFinanceClient {
    /// Create a client from the stock configuration
    pub fn new(config: &StockConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| StockError::ConfigError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.yahoo_base_url.trim_end_matches('/').to_string(),
            exchange_suffix: config.exchange_suffix.clone(),
            timeout: config.request_timeout,
        })
    }

    fn provider_symbol(&self, symbol: &Symbol) -> String {
        symbol.provider_symbol(&self.exchange_suffix)
    }
}

#[async_trait]
impl MarketDataSource for YahooFinanceClient {
    #[instrument(skip(self, symbol), fields(symbol = %symbol))]
    async fn fetch_history(&self, symbol: &Symbol, period: &str) -> Result<HistoricalSeries> {
        validate_period(period)?;

        let ticker = self.provider_symbol(symbol);
        let unavailable = |reason: String| StockError::upstream(DataSource::PriceHistory, symbol.as_str(), reason);

        let provider = yahoo::YahooConnector::new().map_err(|e| unavailable(e.to_string()))?;

        debug!("Requesting {period} of daily bars for {ticker}");
        let response = tokio::time::timeout(self.timeout, provider.get_quote_range(&ticker, "1d", period))
            .await
            .map_err(|_| unavailable(format!("timed out after {}s", self.timeout.as_secs())))?
            .map_err(|e| unavailable(e.to_string()))?;

        let quotes = response.quotes().map_err(|e| unavailable(e.to_string()))?;

        let bars: Vec<PriceBar> = quotes
            .iter()
            .filter(|q| q.close.is_finite())
            .filter_map(|q| {
                let date = i64::try_from(q.timestamp).ok().and_then(date_from_timestamp)?;
                Some(PriceBar::new(date, q.open, q.high, q.low, q.close, q.volume))
            })
            .collect();

        if bars.is_empty() {
            return Err(unavailable(format!("no price bars returned for {ticker}")));
        }

        debug!("Received {} bars", bars.len());
        Ok(HistoricalSeries::from_bars(bars))
    }

    #[instrument(skip(self, symbol), fields(symbol = %symbol))]
    async fn fetch_financials(&self, symbol: &Symbol) -> Result<FinancialsSnapshot> {
        let ticker = self.provider_symbol(symbol);
        let unavailable = |reason: String| StockError::upstream(DataSource::Financials, symbol.as_str(), reason);

        let now = Utc::now();
        let start = now - ChronoDuration::days(FINANCIALS_LOOKBACK_DAYS);
        let types = FINANCIAL_LINE_ITEMS
            .iter()
            .map(|item| format!("annual{item}"))
            .collect::<Vec<_>>()
            .join(",");

        let url = format!("{}{FUNDAMENTALS_PATH}/{ticker}", self.base_url);
        debug!("Requesting annual financials from {url}");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("symbol", ticker.clone()),
                ("type", types),
                ("period1", start.timestamp().to_string()),
                ("period2", now.timestamp().to_string()),
            ])
            .send()
            .await
            .map_err(|e| unavailable(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(unavailable(format!("HTTP {}", response.status())));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| unavailable(format!("invalid JSON: {e}")))?;

        let snapshot = parse_fundamentals(&body).map_err(unavailable)?;
        debug!("Parsed {} financial line items", snapshot.line_items.len());
        Ok(snapshot)
    }
}

/// Calendar date (UTC) of a Unix timestamp
fn date_from_timestamp(timestamp: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
}

/// Flatten a fundamentals time-series response into line item -> period -> value
///
/// Each result carries its type name under `meta.type[0]` and a list of
/// `{asOfDate, reportedValue: {raw}}` entries under a key of the same name.
/// Null entries and entries without a raw value are skipped.
fn parse_fundamentals(body: &Value) -> std::result::Result<FinancialsSnapshot, String> {
    let results = body
        .pointer("/timeseries/result")
        .and_then(Value::as_array)
        .ok_or_else(|| "response has no timeseries.result".to_string())?;

    let mut snapshot = FinancialsSnapshot::default();
    for result in results {
        let Some(type_name) = result.pointer("/meta/type/0").and_then(Value::as_str) else {
            continue;
        };
        let Some(entries) = result.get(type_name).and_then(Value::as_array) else {
            continue;
        };
        let line_item = type_name.strip_prefix("annual").unwrap_or(type_name);

        for entry in entries {
            let period = entry.get("asOfDate").and_then(Value::as_str);
            let value = entry.pointer("/reportedValue/raw").and_then(Value::as_f64);
            if let (Some(period), Some(value)) = (period, value) {
                snapshot.insert(line_item, period, value);
            }
        }
    }

    if snapshot.is_empty() {
        return Err("no financial statement data returned".to_string());
    }
    Ok(snapshot)
}
