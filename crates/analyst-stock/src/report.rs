//! Combined report: fetch every source for a symbol and flatten it to text
//!
//! The rendered text is exactly what the LLM sees, so its layout is fixed:
//! Yahoo history tail, Yahoo financials, then the screener page.

use crate::api::{MarketDataSource, ScreenerSource};
use crate::config::StockConfig;
use crate::models::{
    DataSection, FinancialsSnapshot, HistoricalSeries, ScreenerReport, ScreenerTable,
};
use crate::symbol::Symbol;
use chrono::{DateTime, Utc};
use comfy_table::{Table, presets::ASCII_MARKDOWN};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{info, instrument, warn};

const HISTORY_COLUMNS: [&str; 8] = [
    "Date", "Open", "High", "Low", "Close", "Volume", "MA50", "MA200",
];

/// Everything fetched for one symbol, plus its text rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedReport {
    pub symbol: Symbol,
    pub history: DataSection<HistoricalSeries>,
    pub financials: DataSection<FinancialsSnapshot>,
    pub screener: DataSection<ScreenerReport>,
    /// Number of history rows rendered
    pub history_tail: usize,
    pub generated_at: DateTime<Utc>,
    text: String,
}

impl CombinedReport {
    /// Assemble a report and render its text
    pub fn new(
        symbol: Symbol,
        history: DataSection<HistoricalSeries>,
        financials: DataSection<FinancialsSnapshot>,
        screener: DataSection<ScreenerReport>,
        history_tail: usize,
    ) -> Self {
        let mut report = Self {
            symbol,
            history,
            financials,
            screener,
            history_tail,
            generated_at: Utc::now(),
            text: String::new(),
        };
        report.text = report.render();
        report
    }

    /// The text sent to the LLM
    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when at least one source returned data
    pub fn has_data(&self) -> bool {
        self.history.is_present() || self.financials.is_present() || self.screener.is_present()
    }

    /// Absent-source reasons, in report order
    pub fn warnings(&self) -> Vec<&str> {
        [
            self.history.absent_reason(),
            self.financials.absent_reason(),
            self.screener.absent_reason(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Render the report as plain text
    ///
    /// Output depends only on the report's data, never on the clock or
    /// terminal, so the same data always yields the same text.
    pub fn render(&self) -> String {
        let mut sections = Vec::new();

        if self.history.is_present() || self.financials.is_present() {
            let mut out = String::from("Yahoo Finance Data:\n");

            let _ = writeln!(
                out,
                "Latest Historical Data (last {} days):",
                self.history_tail
            );
            match &self.history {
                DataSection::Present(series) => {
                    let _ = writeln!(out, "{}", history_table(series, self.history_tail));
                }
                DataSection::Absent { reason } => {
                    let _ = writeln!(out, "Unavailable: {reason}");
                }
            }

            out.push_str("\nFinancials:\n");
            match &self.financials {
                DataSection::Present(snapshot) => {
                    let _ = writeln!(out, "{}", financials_table(snapshot));
                }
                DataSection::Absent { reason } => {
                    let _ = writeln!(out, "Unavailable: {reason}");
                }
            }

            sections.push(out);
        }

        if let DataSection::Present(screener) = &self.screener {
            sections.push(screener_section(screener));
        }

        sections.join("\n")
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(ASCII_MARKDOWN).force_no_tty();
    table
}

fn format_price(value: f64) -> String {
    format!("{value:.2}")
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "NaN".to_string(), format_price)
}

fn history_table(series: &HistoricalSeries, tail: usize) -> Table {
    let mut table = new_table();
    table.set_header(HISTORY_COLUMNS);
    for bar in series.tail(tail) {
        table.add_row(vec![
            bar.date.to_string(),
            format_price(bar.open),
            format_price(bar.high),
            format_price(bar.low),
            format_price(bar.close),
            bar.volume.to_string(),
            format_optional(bar.ma50),
            format_optional(bar.ma200),
        ]);
    }
    table
}

fn financials_table(snapshot: &FinancialsSnapshot) -> Table {
    let periods = snapshot.periods();

    let mut table = new_table();
    let mut header = vec!["Line Item".to_string()];
    header.extend(periods.iter().cloned());
    table.set_header(header);

    for line_item in snapshot.line_items.keys() {
        let mut row = vec![line_item.clone()];
        row.extend(
            periods
                .iter()
                .map(|period| format_optional(snapshot.value(line_item, period))),
        );
        table.add_row(row);
    }
    table
}

fn screener_table(source: &ScreenerTable) -> Table {
    let mut table = new_table();
    table.set_header(source.header.clone());
    for row in &source.rows {
        table.add_row(row.clone());
    }
    table
}

fn screener_section(report: &ScreenerReport) -> String {
    let mut out = String::from("Screener.in Data:\n");
    let _ = writeln!(out, "Company Name: {}", report.company_name);

    out.push_str("Key Metrics:\n");
    if report.key_metrics.is_empty() {
        out.push_str("(none)\n");
    }
    for (label, value) in &report.key_metrics {
        let _ = writeln!(out, "{label}: {value}");
    }

    out.push_str("Tables:\n");
    if report.tables.is_empty() {
        out.push_str("(none)\n");
    }
    for (name, table) in &report.tables {
        let _ = writeln!(out, "\n{name}:\n{}", screener_table(table));
    }
    out
}

/// Fetches every source for a symbol and merges the results
pub struct ReportAggregator {
    market_data: Arc<dyn MarketDataSource>,
    screener: Arc<dyn ScreenerSource>,
    history_period: String,
    history_tail: usize,
}

impl ReportAggregator {
    pub fn new(
        market_data: Arc<dyn MarketDataSource>,
        screener: Arc<dyn ScreenerSource>,
        config: &StockConfig,
    ) -> Self {
        Self {
            market_data,
            screener,
            history_period: config.history_period.clone(),
            history_tail: config.history_tail,
        }
    }

    /// Fetch history, financials and the screener page, one after another
    ///
    /// A failing source never aborts the others and never fails the call:
    /// it is logged and recorded in the report as absent with its reason.
    #[instrument(skip(self, symbol), fields(symbol = %symbol))]
    pub async fn build_report(&self, symbol: &Symbol) -> CombinedReport {
        let history = self
            .market_data
            .fetch_history(symbol, &self.history_period)
            .await;
        if let Err(e) = &history {
            warn!("Price history unavailable: {e}");
        }

        let financials = self.market_data.fetch_financials(symbol).await;
        if let Err(e) = &financials {
            warn!("Financials unavailable: {e}");
        }

        let screener = self.screener.fetch_report(symbol).await;
        if let Err(e) = &screener {
            warn!("Screener data unavailable: {e}");
        }

        let report = CombinedReport::new(
            symbol.clone(),
            DataSection::from_result(history),
            DataSection::from_result(financials),
            DataSection::from_result(screener),
            self.history_tail,
        );

        info!(
            chars = report.text().len(),
            degraded = report.warnings().len(),
            "Built combined report"
        );
        report
    }
}
