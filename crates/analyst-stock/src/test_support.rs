//! Test doubles and fixtures shared by the unit tests

use crate::api::{MarketDataSource, ScreenerSource};
use crate::error::Result;
use crate::models::{
    FinancialsSnapshot, HistoricalSeries, PriceBar, ScreenerReport, ScreenerTable,
};
use crate::symbol::Symbol;
use analyst_llm::{
    CompletionRequest, CompletionResponse, LLMProvider, Message, StopReason, TokenUsage,
};
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use mockall::mock;

mock! {
    pub MarketData {}

    #[async_trait]
    impl MarketDataSource for MarketData {
        async fn fetch_history(&self, symbol: &Symbol, period: &str) -> Result<HistoricalSeries>;
        async fn fetch_financials(&self, symbol: &Symbol) -> Result<FinancialsSnapshot>;
    }
}

mock! {
    pub Screener {}

    #[async_trait]
    impl ScreenerSource for Screener {
        async fn fetch_report(&self, symbol: &Symbol) -> Result<ScreenerReport>;
    }
}

mock! {
    pub Llm {}

    #[async_trait]
    impl LLMProvider for Llm {
        async fn complete(&self, request: CompletionRequest) -> analyst_llm::Result<CompletionResponse>;
        fn name(&self) -> &str;
    }
}

/// `days` consecutive daily bars starting 2024-01-01 with a gently rising close
pub fn daily_series(days: u32) -> HistoricalSeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    let bars = (0..days)
        .map(|i| {
            let close = 1500.0 + f64::from(i);
            PriceBar::new(
                start + Days::new(u64::from(i)),
                close - 5.0,
                close + 10.0,
                close - 10.0,
                close,
                1_000_000 + u64::from(i),
            )
        })
        .collect();
    HistoricalSeries::from_bars(bars)
}

pub fn financials() -> FinancialsSnapshot {
    let mut snapshot = FinancialsSnapshot::default();
    snapshot.insert("TotalRevenue", "2023-03-31", 1_467_670_000_000.0);
    snapshot.insert("TotalRevenue", "2024-03-31", 1_536_700_000_000.0);
    snapshot.insert("NetIncome", "2024-03-31", 262_480_000_000.0);
    snapshot
}

/// Screener page with one "Quarterly Results" table
pub fn screener_report() -> ScreenerReport {
    let mut report = ScreenerReport {
        company_name: "Infosys Ltd".to_string(),
        ..ScreenerReport::default()
    };
    report
        .key_metrics
        .insert("Market Cap".to_string(), "7,90,000".to_string());
    report
        .key_metrics
        .insert("Stock P/E".to_string(), "28.4".to_string());
    report.tables.insert(
        "Quarterly Results".to_string(),
        ScreenerTable {
            header: strings(&["Metric", "Q1", "Q2"]),
            rows: vec![
                strings(&["Sales", "100", "110"]),
                strings(&["Profit", "20", "NA"]),
            ],
        },
    );
    report
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

/// An LLM reply carrying `text`
pub fn llm_reply(text: &str) -> CompletionResponse {
    CompletionResponse {
        message: Message::assistant(text),
        stop_reason: StopReason::EndTurn,
        usage: TokenUsage {
            input_tokens: 100,
            output_tokens: 20,
        },
    }
}
