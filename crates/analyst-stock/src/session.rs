//! Interactive session state

use crate::report::CombinedReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One answered follow-up question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowUpTurn {
    pub question: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
}

/// Everything produced by one successful analyze action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub report: CombinedReport,
    pub initial_analysis: String,
    /// Kept for display; never sent back to the LLM
    pub follow_ups: Vec<FollowUpTurn>,
}

impl SessionSnapshot {
    pub fn new(report: CombinedReport, initial_analysis: String) -> Self {
        Self {
            report,
            initial_analysis,
            follow_ups: Vec::new(),
        }
    }
}

/// State of one REPL run; lives in memory only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    current: Option<SessionSnapshot>,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            last_active: now,
            current: None,
        }
    }

    pub fn update_activity(&mut self) {
        self.last_active = Utc::now();
    }

    /// The latest successful analysis, if any
    pub fn current(&self) -> Option<&SessionSnapshot> {
        self.current.as_ref()
    }

    /// Replace the current analysis; earlier follow-ups go with it
    pub fn replace(&mut self, snapshot: SessionSnapshot) {
        self.current = Some(snapshot);
        self.update_activity();
    }

    /// Record an answered question against the current analysis
    ///
    /// Returns false when there is no current analysis to attach it to.
    pub fn record_follow_up(&mut self, question: impl Into<String>, answer: impl Into<String>) -> bool {
        let Some(snapshot) = self.current.as_mut() else {
            return false;
        };
        snapshot.follow_ups.push(FollowUpTurn {
            question: question.into(),
            answer: answer.into(),
            timestamp: Utc::now(),
        });
        self.update_activity();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataSection;
    use crate::symbol::Symbol;
    use crate::test_support::screener_report;

    fn snapshot(symbol: &str) -> SessionSnapshot {
        let report = CombinedReport::new(
            Symbol::parse(symbol).unwrap(),
            DataSection::Absent { reason: "down".to_string() },
            DataSection::Absent { reason: "down".to_string() },
            DataSection::Present(screener_report()),
            5,
        );
        SessionSnapshot::new(report, format!("analysis of {symbol}"))
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = AnalysisSession::new();
        assert!(session.current().is_none());
        assert_eq!(session.created_at, session.last_active);
        assert_ne!(session.id, AnalysisSession::new().id);
    }

    #[test]
    fn test_replace_drops_previous_follow_ups() {
        let mut session = AnalysisSession::new();
        assert!(!session.record_follow_up("q", "a"));

        session.replace(snapshot("INFY"));
        assert!(session.record_follow_up("Is this overvalued?", "No."));
        assert_eq!(session.current().unwrap().follow_ups.len(), 1);

        session.replace(snapshot("TCS"));
        let current = session.current().unwrap();
        assert_eq!(current.report.symbol.as_str(), "TCS");
        assert!(current.follow_ups.is_empty());
    }
}
