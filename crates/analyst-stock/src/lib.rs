//! Single-symbol equity analysis
//!
//! Fetches public data for one NSE-listed company, merges it into a plain
//! text report and asks an LLM to analyse it:
//!
//! - Daily price history with 50/200-day moving averages (Yahoo Finance)
//! - Annual income-statement line items (Yahoo Finance fundamentals)
//! - Company name, headline ratios and statement tables (screener.in)
//!
//! # Architecture
//!
//! - [`api`]: the two data sources, each behind a trait
//! - [`report::ReportAggregator`]: calls every source and tolerates failures,
//!   producing a [`CombinedReport`] whose text is what the LLM sees
//! - [`analysis::AnalysisService`]: initial analysis and follow-up answers
//! - [`engine::StockAnalyzer`]: the actions the REPL invokes, committing to an
//!   [`AnalysisSession`] only when they succeed
//!
//! # Example
//!
//! ```rust,ignore
//! use analyst_llm::providers::AnthropicProvider;
//! use analyst_stock::{AnalysisSession, StockAnalyzer, StockConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = StockConfig::from_env()?;
//!     let llm = Arc::new(AnthropicProvider::from_env()?);
//!     let analyzer = StockAnalyzer::from_config(&config, llm)?;
//!
//!     let mut session = AnalysisSession::new();
//!     let snapshot = analyzer.analyze(&mut session, "INFY").await?;
//!     println!("{}", snapshot.initial_analysis);
//!
//!     let answer = analyzer.ask(&mut session, "Is this overvalued?").await?;
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod commands;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod models;
pub mod prompts;
pub mod report;
pub mod session;
pub mod symbol;

#[cfg(test)]
mod test_support;

pub use analysis::AnalysisService;
pub use api::{MarketDataSource, ScreenerClient, ScreenerSource, YahooFinanceClient};
pub use commands::Command;
pub use config::{StockConfig, StockConfigBuilder};
pub use engine::StockAnalyzer;
pub use error::{DataSource, Result, StockError};
pub use models::{
    DataSection, FinancialsSnapshot, HistoricalSeries, PriceBar, ScreenerReport, ScreenerTable,
};
pub use report::{CombinedReport, ReportAggregator};
pub use session::{AnalysisSession, FollowUpTurn, SessionSnapshot};
pub use symbol::Symbol;
