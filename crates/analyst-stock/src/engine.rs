//! Action handlers driven by the REPL

use crate::analysis::AnalysisService;
use crate::api::{MarketDataSource, ScreenerClient, ScreenerSource, YahooFinanceClient};
use crate::config::StockConfig;
use crate::error::{Result, StockError};
use crate::report::ReportAggregator;
use crate::session::{AnalysisSession, SessionSnapshot};
use crate::symbol::Symbol;
use analyst_llm::LLMProvider;
use std::sync::Arc;
use tracing::{info, instrument};

/// Fetches, reports and analyses; session state is passed in by the caller
pub struct StockAnalyzer {
    aggregator: ReportAggregator,
    analysis: AnalysisService,
}

impl StockAnalyzer {
    pub fn new(aggregator: ReportAggregator, analysis: AnalysisService) -> Self {
        Self {
            aggregator,
            analysis,
        }
    }

    /// Wire the live Yahoo and screener.in clients to an LLM provider
    pub fn from_config(config: &StockConfig, llm: Arc<dyn LLMProvider>) -> Result<Self> {
        let market_data: Arc<dyn MarketDataSource> = Arc::new(YahooFinanceClient::new(config)?);
        let screener: Arc<dyn ScreenerSource> = Arc::new(ScreenerClient::new(config)?);

        Ok(Self::new(
            ReportAggregator::new(market_data, screener, config),
            AnalysisService::new(llm, config)?,
        ))
    }

    pub fn model(&self) -> &str {
        self.analysis.model()
    }

    /// Fetch every source for `symbol`, build the report and analyse it
    ///
    /// The session is only updated once the analysis succeeds; on any error
    /// the previous report and analysis stay in place.
    #[instrument(skip(self, session))]
    pub async fn analyze<'s>(
        &self,
        session: &'s mut AnalysisSession,
        symbol: &str,
    ) -> Result<&'s SessionSnapshot> {
        let symbol = Symbol::parse(symbol)?;
        session.update_activity();

        let report = self.aggregator.build_report(&symbol).await;
        if !report.has_data() {
            return Err(StockError::NoData(symbol.to_string()));
        }

        let analysis = self.analysis.initial_analysis(report.text()).await?;
        info!(symbol = %symbol, "Analysis complete");

        session.replace(SessionSnapshot::new(report, analysis));
        session.current().ok_or(StockError::NoActiveAnalysis)
    }

    /// Answer a follow-up question about the current symbol
    #[instrument(skip(self, session))]
    pub async fn ask(&self, session: &mut AnalysisSession, question: &str) -> Result<String> {
        let snapshot = session.current().ok_or(StockError::NoActiveAnalysis)?;
        let answer = self
            .analysis
            .answer_follow_up(snapshot.report.text(), question)
            .await?;

        session.record_follow_up(question.trim(), answer.clone());
        Ok(answer)
    }
}
