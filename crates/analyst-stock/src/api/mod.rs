//! API clients for the market-data and fundamentals sources

pub mod screener;
pub mod yahoo;

pub use screener::{ScreenerClient, parse_screener_html};
pub use yahoo::{FINANCIAL_LINE_ITEMS, YahooFinanceClient};

use crate::error::Result;
use crate::models::{FinancialsSnapshot, HistoricalSeries, ScreenerReport};
use crate::symbol::Symbol;
use async_trait::async_trait;

/// Source of daily price history and annual financial statements
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Daily bars over `period` with MA50/MA200 filled in
    async fn fetch_history(&self, symbol: &Symbol, period: &str) -> Result<HistoricalSeries>;

    /// Annual income-statement line items
    async fn fetch_financials(&self, symbol: &Symbol) -> Result<FinancialsSnapshot>;
}

/// Source of the scraped fundamentals page
#[async_trait]
pub trait ScreenerSource: Send + Sync {
    async fn fetch_report(&self, symbol: &Symbol) -> Result<ScreenerReport>;
}
