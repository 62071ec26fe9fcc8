//! Ticker symbol newtype

use crate::error::{Result, StockError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Uppercase ticker of one listed company, without an exchange suffix
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse user input into a symbol
    ///
    /// Input is trimmed and uppercased. Letters, digits, `&`, `-` and `_`
    /// are accepted (NSE tickers such as `M&M` and `BAJAJ-AUTO` use them).
    pub fn parse(input: &str) -> Result<Self> {
        let symbol = input.trim().to_uppercase();

        if symbol.is_empty() {
            return Err(StockError::InvalidSymbol(
                "symbol must not be empty".to_string(),
            ));
        }

        if symbol.len() > 20 {
            return Err(StockError::InvalidSymbol(format!(
                "{symbol} is longer than 20 characters"
            )));
        }

        if let Some(bad) = symbol
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '&' | '-' | '_')))
        {
            return Err(StockError::InvalidSymbol(format!(
                "{symbol} contains unsupported character {bad:?}"
            )));
        }

        Ok(Self(symbol))
    }

    /// The bare ticker
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Ticker as the market-data provider expects it, e.g. `INFY.NS`
    pub fn provider_symbol(&self, exchange_suffix: &str) -> String {
        format!("{}{exchange_suffix}", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = StockError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl std::str::FromStr for Symbol {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
