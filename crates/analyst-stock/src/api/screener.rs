//! screener.in company page scraper
//!
//! The page has no API; fundamentals are read straight out of the HTML.
//! Parsing is best-effort: table rows whose cell count does not match the
//! header are dropped, and metric items missing a label or value are skipped.

use crate::api::ScreenerSource;
use crate::config::StockConfig;
use crate::error::{DataSource, Result, StockError};
use crate::models::{ScreenerReport, ScreenerTable};
use crate::symbol::Symbol;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

/// screener.in client
pub struct ScreenerClient {
    http: Client,
    base_url: String,
}

impl ScreenerClient {
    /// Create a client from the stock configuration
    pub fn new(config: &StockConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| StockError::ConfigError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.screener_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Consolidated-statements page for a symbol
    pub fn company_url(&self, symbol: &Symbol) -> String {
        format!("{}/company/{symbol}/consolidated/", self.base_url)
    }
}

#[async_trait]
impl ScreenerSource for ScreenerClient {
    #[instrument(skip(self, symbol), fields(symbol = %symbol))]
    async fn fetch_report(&self, symbol: &Symbol) -> Result<ScreenerReport> {
        let unavailable = |reason: String| StockError::upstream(DataSource::Screener, symbol.as_str(), reason);

        let url = self.company_url(symbol);
        debug!("Fetching {url}");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| unavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("HTTP {status}")));
        }

        let html = response
            .text()
            .await
            .map_err(|e| unavailable(format!("failed to read body: {e}")))?;

        let report = parse_screener_html(&html).map_err(unavailable)?;
        debug!(
            "Parsed {} metrics and {} tables",
            report.key_metrics.len(),
            report.tables.len()
        );
        Ok(report)
    }
}

/// Parse a screener.in company page
///
/// - company name: text of the first `<h1>`; an error when there is none
/// - key metrics: `#top-ratios li`, `span.name` -> `span.number`; a repeated
///   label keeps its first position and takes the last value
/// - tables: every `<table>`, named after the nearest preceding `<h2>` or
///   `Table_N` (1-based over all tables); a repeated name replaces the
///   earlier table. Tables with no header or no kept rows are dropped.
pub fn parse_screener_html(html: &str) -> std::result::Result<ScreenerReport, String> {
    let document = Html::parse_document(html);

    let h1 = selector("h1")?;
    let company_name = document
        .select(&h1)
        .next()
        .map(element_text)
        .ok_or_else(|| "page has no company heading (<h1>)".to_string())?;

    let mut report = ScreenerReport {
        company_name,
        ..ScreenerReport::default()
    };

    let ratio_items = selector("#top-ratios li")?;
    let name_span = selector("span.name")?;
    let number_span = selector("span.number")?;
    for item in document.select(&ratio_items) {
        let label = item.select(&name_span).next().map(element_text);
        let value = item.select(&number_span).next().map(element_text);
        match (label, value) {
            (Some(label), Some(value)) => {
                report.key_metrics.insert(label, value);
            }
            _ => debug!("Skipping metric item without name/number spans"),
        }
    }

    let headings_and_tables = selector("h2, table")?;
    let th = selector("th")?;
    let tr = selector("tr")?;
    let td = selector("td")?;

    let mut last_heading: Option<String> = None;
    let mut table_index = 0usize;
    for element in document.root_element().select(&headings_and_tables) {
        if element.value().name() == "h2" {
            last_heading = Some(element_text(element)).filter(|text| !text.is_empty());
            continue;
        }

        table_index += 1;
        let name = last_heading
            .clone()
            .unwrap_or_else(|| format!("Table_{table_index}"));

        let header: Vec<String> = element.select(&th).map(element_text).collect();
        let mut rows = Vec::new();
        for row in element.select(&tr) {
            let cells: Vec<String> = row.select(&td).map(element_text).collect();
            if cells.is_empty() {
                continue;
            }
            if cells.len() == header.len() {
                rows.push(cells);
            } else {
                debug!(
                    table = %name,
                    "Dropping row with {} cells, header has {}",
                    cells.len(),
                    header.len()
                );
            }
        }

        if header.is_empty() || rows.is_empty() {
            debug!(table = %name, "Dropping table without header or rows");
            continue;
        }

        report.tables.insert(name, ScreenerTable { header, rows });
    }

    Ok(report)
}

fn selector(css: &str) -> std::result::Result<Selector, String> {
    Selector::parse(css).map_err(|e| format!("invalid selector {css:?}: {e}"))
}

/// Element text with runs of whitespace collapsed to single spaces
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::time::Duration;

    const PAGE: &str = r#"
<html>
  <body>
    <h1 class="margin-0">
      Infosys Ltd
    </h1>
    <div class="company-ratios">
      <ul id="top-ratios">
        <li class="flex">
          <span class="name">Market Cap</span>
          <span class="nowrap value">₹ <span class="number">7,85,432</span> Cr.</span>
        </li>
        <li class="flex">
          <span class="name">Stock P/E</span>
          <span class="nowrap value"><span class="number">28.4</span></span>
        </li>
        <li class="flex">
          <span class="name">Broken</span>
        </li>
        <li class="flex">
          <span class="name">Market Cap</span>
          <span class="nowrap value">₹ <span class="number">7,90,000</span> Cr.</span>
        </li>
      </ul>
    </div>
    <section id="quarters">
      <h2>Quarterly Results</h2>
      <table class="data-table">
        <thead><tr><th></th><th>Jun 2024</th><th>Sep 2024</th></tr></thead>
        <tbody>
          <tr><td class="text">Sales</td><td>39,315</td><td>40,986</td></tr>
          <tr><td class="text">Expenses</td><td>29,901</td></tr>
          <tr><td class="text">Net Profit</td><td>6,368</td><td>6,516</td></tr>
        </tbody>
      </table>
    </section>
    <section id="peers">
      <h2>Peer comparison</h2>
      <table><tr><th>Name</th></tr></table>
    </section>
  </body>
</html>
"#;

    #[test]
    fn test_parse_company_and_metrics() {
        let report = parse_screener_html(PAGE).unwrap();

        assert_eq!(report.company_name, "Infosys Ltd");
        let metrics: Vec<(&str, &str)> = report
            .key_metrics
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        // Duplicate label keeps its first position with the last value
        assert_eq!(metrics, vec![("Market Cap", "7,90,000"), ("Stock P/E", "28.4")]);
    }

    #[test]
    fn test_parse_tables_drop_mismatched_rows() {
        let report = parse_screener_html(PAGE).unwrap();

        assert_eq!(report.tables.len(), 1);
        let table = &report.tables["Quarterly Results"];
        assert_eq!(table.header, vec!["", "Jun 2024", "Sep 2024"]);
        assert_eq!(
            table.rows,
            vec![
                vec!["Sales", "39,315", "40,986"],
                vec!["Net Profit", "6,368", "6,516"],
            ]
        );
        assert!(table.rows.iter().all(|row| row.len() == table.header.len()));
    }

    #[test]
    fn test_unnamed_tables_are_numbered_across_all_tables() {
        let html = r#"
            <h1>Acme</h1>
            <table><tr><th>A</th></tr></table>
            <table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>
        "#;
        let report = parse_screener_html(html).unwrap();

        let names: Vec<&String> = report.tables.keys().collect();
        assert_eq!(names, vec!["Table_2"]);
    }

    #[test]
    fn test_table_named_after_nearest_preceding_heading() {
        let html = r#"
            <h1>Acme</h1>
            <h2>Profit &amp; Loss</h2>
            <p>Consolidated figures in Rs. Crores</p>
            <table><tr><th>Metric</th><th>FY24</th></tr><tr><td>Sales</td><td>10</td></tr></table>
            <h2>Balance Sheet</h2>
            <div><table><tr><th>Metric</th><th>FY24</th></tr><tr><td>Equity</td><td>5</td></tr></table></div>
            <h2>Balance Sheet</h2>
            <table><tr><th>Metric</th><th>FY24</th></tr><tr><td>Reserves</td><td>7</td></tr></table>
        "#;
        let report = parse_screener_html(html).unwrap();

        let names: Vec<&str> = report.tables.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Profit & Loss", "Balance Sheet"]);
        // Later table with the same name replaces the earlier one
        assert_eq!(report.tables["Balance Sheet"].rows, vec![vec!["Reserves", "7"]]);
    }

    #[test]
    fn test_blank_heading_falls_back_to_numbered_name() {
        let html = r#"
            <h1>Acme</h1>
            <h2>Quarterly Results</h2>
            <h2>   </h2>
            <table><tr><th>Metric</th><th>Q1</th></tr><tr><td>Sales</td><td>100</td></tr></table>
        "#;
        let report = parse_screener_html(html).unwrap();

        let names: Vec<&str> = report.tables.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Table_1"]);
    }

    #[test]
    fn test_missing_heading_is_error() {
        let result = parse_screener_html("<html><body><p>Page not found</p></body></html>");
        assert!(result.is_err());
    }

    #[test]
    fn test_page_without_metrics_or_tables() {
        let report = parse_screener_html("<h1>Acme</h1>").unwrap();
        assert!(report.key_metrics.is_empty());
        assert!(report.tables.is_empty());
    }

    fn client_for(server: &MockServer) -> ScreenerClient {
        let config = StockConfig::builder()
            .screener_base_url(server.base_url())
            .user_agent("test-agent/1.0")
            .request_timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        ScreenerClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_report_sends_user_agent() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/company/INFY/consolidated/")
                    .header("user-agent", "test-agent/1.0");
                then.status(200).body(PAGE);
            })
            .await;

        let client = client_for(&server);
        let report = client
            .fetch_report(&Symbol::parse("INFY").unwrap())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(report.company_name, "Infosys Ltd");
    }

    #[tokio::test]
    async fn test_fetch_report_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(404).body("<h1>Not Found</h1>");
            })
            .await;

        let client = client_for(&server);
        let err = client
            .fetch_report(&Symbol::parse("NOPE").unwrap())
            .await
            .unwrap_err();

        match err {
            StockError::UpstreamUnavailable { provider, symbol, reason } => {
                assert_eq!(provider, DataSource::Screener);
                assert_eq!(symbol, "NOPE");
                assert!(reason.contains("404"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_report_unexpected_page() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).body("<html><body>captcha</body></html>");
            })
            .await;

        let client = client_for(&server);
        let result = client.fetch_report(&Symbol::parse("INFY").unwrap()).await;
        assert!(matches!(result, Err(StockError::UpstreamUnavailable { .. })));
    }
}
