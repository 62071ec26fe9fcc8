//! Stock Analyst CLI
//!
//! An interactive terminal front end: analyse an NSE symbol, then ask
//! follow-up questions about it.
//!
//! # Usage
//!
//! ```bash
//! export ANTHROPIC_API_KEY="sk-ant-..."
//! cargo run --bin stock-analyst -p analyst-stock -- --symbol INFY
//! ```

use analyst_llm::providers::AnthropicProvider;
use analyst_stock::display::{DISCLAIMER, format_data_view};
use analyst_stock::{AnalysisSession, Command, StockAnalyzer, StockConfig, StockError};
use analyst_utils::{LogFormat, init_tracing};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

/// Interactive LLM analysis of NSE-listed stocks
#[derive(Debug, Parser)]
#[command(name = "stock-analyst", version, about)]
struct Args {
    /// Symbol to analyse on startup (e.g. INFY)
    #[arg(long)]
    symbol: Option<String>,

    /// Claude model, overriding ANTHROPIC_MODEL
    #[arg(long)]
    model: Option<String>,

    /// Log output format: text or json
    #[arg(long, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn print_banner(model: &str) {
    println!(
        r"
Stock Analyst
=============
Model: {model}

{DISCLAIMER}

Type /analyze <SYMBOL> to start, /help for all commands.
"
    );
}

/// What the REPL should do after an input line
enum Flow {
    Continue,
    Exit,
}

async fn handle_analyze(analyzer: &StockAnalyzer, session: &mut AnalysisSession, symbol: &str) {
    println!("Fetching data and analysing {}...", symbol.to_uppercase());
    match analyzer.analyze(session, symbol).await {
        Ok(snapshot) => {
            println!("{}", format_data_view(&snapshot.report));
            println!("Analysis\n--------\n{}\n", snapshot.initial_analysis);
        }
        Err(e) => eprintln!("Error: {e}\n"),
    }
}

async fn handle_line(analyzer: &StockAnalyzer, session: &mut AnalysisSession, line: &str) -> Flow {
    let command = match Command::parse(line) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}\n");
            return Flow::Continue;
        }
    };

    match command {
        Command::Analyze { symbol } => handle_analyze(analyzer, session, &symbol).await,
        Command::Data => match session.current() {
            Some(snapshot) => println!("{}", format_data_view(&snapshot.report)),
            None => eprintln!("{}\n", StockError::NoActiveAnalysis),
        },
        Command::Report => match session.current() {
            Some(snapshot) => println!("{}\n", snapshot.report.text()),
            None => eprintln!("{}\n", StockError::NoActiveAnalysis),
        },
        Command::Help => println!("{}", Command::help_text()),
        Command::Exit => return Flow::Exit,
        Command::Question { text } => {
            println!("Thinking...");
            match analyzer.ask(session, &text).await {
                Ok(answer) => println!("{answer}\n"),
                Err(e) => eprintln!("Error: {e}\n"),
            }
        }
    }

    Flow::Continue
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_tracing(args.log_format, "warn,analyst_stock=info");

    let mut builder = StockConfig::builder().with_env()?;
    if let Some(model) = args.model {
        builder = builder.model(model);
    }
    let config = builder.build()?;

    let llm = Arc::new(AnthropicProvider::from_env()?);
    let analyzer = StockAnalyzer::from_config(&config, llm)?;
    let mut session = AnalysisSession::new();

    print_banner(analyzer.model());

    if let Some(symbol) = args.symbol {
        handle_analyze(&analyzer, &mut session, &symbol).await;
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if let Flow::Exit = handle_line(&analyzer, &mut session, input).await {
            println!("Goodbye!");
            break;
        }
    }

    Ok(())
}
