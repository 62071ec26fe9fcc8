//! Terminal rendering of fetched data
//!
//! The report text in [`crate::report`] is the LLM's view of the data; this
//! module is the human's view of the same data, drawn with box tables.

use crate::models::{DataSection, HistoricalSeries, ScreenerReport};
use crate::report::CombinedReport;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use std::fmt::Write as _;

/// Shown once at startup
pub const DISCLAIMER: &str = "The insights and analyses provided by this application are intended to \
offer financial advice based on the available data. However, the stock market is inherently \
unpredictable, and outcomes may vary. While we aim to assist and guide your decisions, the ultimate \
responsibility for investment choices lies with you. Please consider the risks involved before proceeding.";

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Warnings, history tail, moving-average summary and key metrics
pub fn format_data_view(report: &CombinedReport) -> String {
    let mut out = String::new();

    for warning in report.warnings() {
        let _ = writeln!(out, "⚠ {warning}");
    }
    if !report.warnings().is_empty() {
        out.push('\n');
    }

    if let DataSection::Present(series) = &report.history {
        let _ = writeln!(
            out,
            "{} - last {} trading days",
            report.symbol, report.history_tail
        );
        let _ = writeln!(out, "{}", history_table(series, report.history_tail));
        if let Some(summary) = format_ma_summary(series) {
            let _ = writeln!(out, "{summary}");
        }
        out.push('\n');
    }

    if let DataSection::Present(screener) = &report.screener {
        let _ = writeln!(out, "{}", screener.company_name);
        if let Some(table) = metrics_table(screener) {
            let _ = writeln!(out, "{table}");
        }
    }

    out
}

fn history_table(series: &HistoricalSeries, tail: usize) -> Table {
    let mut table = new_table();
    table.set_header(["Date", "Open", "High", "Low", "Close", "Volume"]);
    for bar in series.tail(tail) {
        table.add_row(vec![
            bar.date.to_string(),
            format!("{:.2}", bar.open),
            format!("{:.2}", bar.high),
            format!("{:.2}", bar.low),
            format!("{:.2}", bar.close),
            bar.volume.to_string(),
        ]);
    }
    table
}

fn metrics_table(screener: &ScreenerReport) -> Option<Table> {
    if screener.key_metrics.is_empty() {
        return None;
    }
    let mut table = new_table();
    table.set_header(["Metric", "Value"]);
    for (label, value) in &screener.key_metrics {
        table.add_row([label, value]);
    }
    Some(table)
}

/// Latest close against MA50 and MA200
///
/// Returns `None` for an empty series. Averages still warming up are
/// reported as not yet available.
pub fn format_ma_summary(series: &HistoricalSeries) -> Option<String> {
    let latest = series.latest()?;
    let mut out = format!("Latest close {:.2} on {}", latest.close, latest.date);

    for (label, average) in [("MA50", latest.ma50), ("MA200", latest.ma200)] {
        match average {
            Some(avg) => {
                let pct = (latest.close - avg) / avg * 100.0;
                let side = if latest.close >= avg { "above" } else { "below" };
                let _ = write!(out, " | {label} {avg:.2} ({:.2} % {side})", pct.abs());
            }
            None => {
                let _ = write!(out, " | {label} n/a");
            }
        }
    }

    if let (Some(short), Some(long)) = (latest.ma50, latest.ma200) {
        let trend = if short >= long {
            "MA50 above MA200 (uptrend)"
        } else {
            "MA50 below MA200 (downtrend)"
        };
        let _ = write!(out, "\n{trend}");
    }

    Some(out)
}
