//! REPL command parsing

use crate::error::{Result, StockError};

/// Parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch data for a symbol and run the initial analysis
    Analyze { symbol: String },
    /// Show the fetched data again
    Data,
    /// Print the raw report text sent to the LLM
    Report,
    /// Show help
    Help,
    /// Leave the REPL
    Exit,
    /// Follow-up question about the current symbol
    Question { text: String },
}

impl Command {
    /// Parse a command from user input
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(StockError::CommandError("Empty input".to_string()));
        }

        let Some(rest) = input.strip_prefix('/') else {
            return Ok(Command::Question {
                text: input.to_string(),
            });
        };

        let parts: Vec<&str> = rest.split_whitespace().collect();
        let Some((cmd, args)) = parts.split_first() else {
            return Err(StockError::CommandError("Empty command".to_string()));
        };
        let cmd = cmd.to_lowercase();

        match cmd.as_str() {
            "analyze" | "analyse" | "a" => {
                let symbol = args.first().ok_or_else(|| {
                    StockError::CommandError("Missing symbol for analyze command".to_string())
                })?;
                Ok(Command::Analyze {
                    symbol: symbol.to_uppercase(),
                })
            }
            "data" | "d" => Ok(Command::Data),
            "report" | "r" => Ok(Command::Report),
            "help" | "h" | "?" => Ok(Command::Help),
            "exit" | "quit" | "q" => Ok(Command::Exit),
            _ => Err(StockError::CommandError(format!("Unknown command: /{cmd}"))),
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r"
Stock Analyst Commands
======================

  /analyze <symbol>   Fetch data for an NSE symbol and analyse it (e.g. /analyze INFY)
  /data               Show the fetched data again
  /report             Print the raw report text sent to the LLM
  /help               Show this help
  /exit               Exit

Aliases: /a = /analyze   /d = /data   /r = /report   /q = /exit

Anything else is a follow-up question about the current symbol, e.g.
  Is this overvalued?
"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cmd = Command::parse("/analyze infy").unwrap();
        assert_eq!(
            cmd,
            Command::Analyze {
                symbol: "INFY".to_string()
            }
        );

        let cmd = Command::parse("  /A tcs  ").unwrap();
        assert_eq!(
            cmd,
            Command::Analyze {
                symbol: "TCS".to_string()
            }
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("/data").unwrap(), Command::Data);
        assert_eq!(Command::parse("/report").unwrap(), Command::Report);
        assert_eq!(Command::parse("/?").unwrap(), Command::Help);
        assert_eq!(Command::parse("/quit").unwrap(), Command::Exit);
    }

    #[test]
    fn test_parse_question() {
        let cmd = Command::parse("Is this overvalued?").unwrap();
        assert_eq!(
            cmd,
            Command::Question {
                text: "Is this overvalued?".to_string()
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Command::parse("   "), Err(StockError::CommandError(_))));
        assert!(matches!(Command::parse("/"), Err(StockError::CommandError(_))));
        assert!(matches!(Command::parse("/analyze"), Err(StockError::CommandError(_))));
        assert!(matches!(Command::parse("/watch INFY"), Err(StockError::CommandError(_))));
    }
}
