//! Data fetched for one symbol

use crate::error::Result;
use crate::indicators::{MA_LONG, MA_SHORT, rolling_mean};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One daily OHLCV bar with its moving averages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    /// 50-day simple moving average of the close, absent during warm-up
    pub ma50: Option<f64>,
    /// 200-day simple moving average of the close, absent during warm-up
    pub ma200: Option<f64>,
}

impl PriceBar {
    /// A bar without derived averages
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            ma50: None,
            ma200: None,
        }
    }
}

/// Date-ordered daily bars
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    bars: Vec<PriceBar>,
}

impl HistoricalSeries {
    /// Sort bars by date and compute both moving averages over the closes
    ///
    /// Any averages already set on the input are overwritten.
    pub fn from_bars(mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|bar| bar.date);

        let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
        let ma50 = rolling_mean(&closes, MA_SHORT);
        let ma200 = rolling_mean(&closes, MA_LONG);

        for ((bar, short), long) in bars.iter_mut().zip(ma50).zip(ma200) {
            bar.ma50 = short;
            bar.ma200 = long;
        }

        Self { bars }
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The last `n` bars (all of them when fewer exist)
    pub fn tail(&self, n: usize) -> &[PriceBar] {
        &self.bars[self.bars.len().saturating_sub(n)..]
    }

    /// Most recent bar
    pub fn latest(&self) -> Option<&PriceBar> {
        self.bars.last()
    }
}

/// Annual statement line items: line item -> period (ISO date) -> value
///
/// The shape is whatever the provider returned; no fixed schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialsSnapshot {
    pub line_items: BTreeMap<String, BTreeMap<String, f64>>,
}

impl FinancialsSnapshot {
    /// Record one value
    pub fn insert(&mut self, line_item: impl Into<String>, period: impl Into<String>, value: f64) {
        self.line_items
            .entry(line_item.into())
            .or_default()
            .insert(period.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Every period that appears under any line item, newest first
    pub fn periods(&self) -> Vec<String> {
        let periods: BTreeSet<&String> = self
            .line_items
            .values()
            .flat_map(BTreeMap::keys)
            .collect();
        periods.into_iter().rev().cloned().collect()
    }

    pub fn value(&self, line_item: &str, period: &str) -> Option<f64> {
        self.line_items.get(line_item)?.get(period).copied()
    }
}

/// A table scraped from the screener page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenerTable {
    pub header: Vec<String>,
    /// Every row has exactly `header.len()` cells
    pub rows: Vec<Vec<String>>,
}

/// Fundamentals scraped from a screener.in company page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenerReport {
    pub company_name: String,
    /// Label -> display string, in page order
    pub key_metrics: IndexMap<String, String>,
    /// Table name -> table, in page order
    pub tables: IndexMap<String, ScreenerTable>,
}

/// A report section that either holds data or records why it could not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DataSection<T> {
    Present(T),
    Absent { reason: String },
}

impl<T> DataSection<T> {
    /// Capture a fetch result, keeping the error message as the reason
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Present(value),
            Err(e) => Self::Absent {
                reason: e.to_string(),
            },
        }
    }

    pub fn present(&self) -> Option<&T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent { .. } => None,
        }
    }

    pub fn absent_reason(&self) -> Option<&str> {
        match self {
            Self::Present(_) => None,
            Self::Absent { reason } => Some(reason),
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DataSource, StockError};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_from_bars_sorts_and_derives() {
        let bars = vec![
            PriceBar::new(date(3), 1.0, 1.0, 1.0, 30.0, 10),
            PriceBar::new(date(1), 1.0, 1.0, 1.0, 10.0, 10),
            PriceBar::new(date(2), 1.0, 1.0, 1.0, 20.0, 10),
        ];
        let series = HistoricalSeries::from_bars(bars);

        let dates: Vec<NaiveDate> = series.bars().iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![date(1), date(2), date(3)]);
        assert!(series.bars().iter().all(|b| b.ma50.is_none() && b.ma200.is_none()));
        assert_eq!(series.latest().unwrap().close, 30.0);
    }

    #[test]
    fn test_tail() {
        let bars = (1..=10)
            .map(|d| PriceBar::new(date(d), 1.0, 1.0, 1.0, f64::from(d), 1))
            .collect();
        let series = HistoricalSeries::from_bars(bars);

        assert_eq!(series.tail(5).len(), 5);
        assert_eq!(series.tail(5)[0].date, date(6));
        assert_eq!(series.tail(50).len(), 10);
        assert!(HistoricalSeries::default().tail(5).is_empty());
    }

    #[test]
    fn test_financial_periods_newest_first() {
        let mut snapshot = FinancialsSnapshot::default();
        snapshot.insert("TotalRevenue", "2023-03-31", 1.0);
        snapshot.insert("TotalRevenue", "2024-03-31", 2.0);
        snapshot.insert("NetIncome", "2022-03-31", 3.0);

        assert_eq!(
            snapshot.periods(),
            vec!["2024-03-31", "2023-03-31", "2022-03-31"]
        );
        assert_eq!(snapshot.value("NetIncome", "2022-03-31"), Some(3.0));
        assert_eq!(snapshot.value("NetIncome", "2024-03-31"), None);
    }

    #[test]
    fn test_data_section_from_result() {
        let ok: DataSection<u32> = DataSection::from_result(Ok(7));
        assert_eq!(ok.present(), Some(&7));
        assert!(ok.absent_reason().is_none());

        let err: DataSection<u32> = DataSection::from_result(Err(StockError::upstream(
            DataSource::Screener,
            "INFY",
            "timed out",
        )));
        assert!(!err.is_present());
        assert_eq!(
            err.absent_reason(),
            Some("Screener.in unavailable for INFY: timed out")
        );
    }
}
