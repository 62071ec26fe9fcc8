//! LLM analysis of a combined report

use crate::config::StockConfig;
use crate::error::{Result, StockError};
use crate::prompts::{FOLLOW_UP, INITIAL_ANALYSIS, register_prompts};
use analyst_llm::{CompletionRequest, LLMProvider, Message};
use analyst_prompt::PromptRegistry;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Turns report text into analysis text through the LLM
///
/// Each call is a single user message; nothing from earlier calls is sent
/// again apart from the report itself.
pub struct AnalysisService {
    llm: Arc<dyn LLMProvider>,
    prompts: PromptRegistry,
    model: String,
    max_tokens: usize,
}

impl AnalysisService {
    pub fn new(llm: Arc<dyn LLMProvider>, config: &StockConfig) -> Result<Self> {
        let prompts = PromptRegistry::new();
        register_prompts(&prompts)?;

        Ok(Self {
            llm,
            prompts,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Structured analysis of a freshly built report
    #[instrument(skip_all, fields(provider = self.llm.name(), chars = report_text.len()))]
    pub async fn initial_analysis(&self, report_text: &str) -> Result<String> {
        let prompt = self
            .prompts
            .render(INITIAL_ANALYSIS, &json!({ "stock_data": report_text }))?;
        let answer = self.ask_llm(prompt).await?;
        info!("Initial analysis received");
        Ok(answer)
    }

    /// Answer one question about the report
    #[instrument(skip_all, fields(provider = self.llm.name()))]
    pub async fn answer_follow_up(&self, report_text: &str, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(StockError::InvalidInput(
                "question must not be empty".to_string(),
            ));
        }

        let prompt = self.prompts.render(
            FOLLOW_UP,
            &json!({ "stock_data": report_text, "question": question }),
        )?;
        let answer = self.ask_llm(prompt).await?;
        info!("Follow-up answered");
        Ok(answer)
    }

    async fn ask_llm(&self, prompt: String) -> Result<String> {
        debug!("Prompt is {} chars", prompt.len());

        let request = CompletionRequest::builder(&self.model)
            .add_message(Message::user(prompt))
            .max_tokens(self.max_tokens)
            .build();

        let response = self.llm.complete(request).await?;
        debug!(
            stop_reason = ?response.stop_reason,
            tokens = response.usage.total(),
            "LLM response"
        );
        Ok(response.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::FOLLOW_UP_SIGN_OFF;
    use crate::test_support::{MockLlm, llm_reply};
    use analyst_llm::LLMError;

    fn service(llm: MockLlm) -> AnalysisService {
        let config = StockConfig::builder()
            .model("claude-test")
            .max_tokens(512)
            .build()
            .unwrap();
        AnalysisService::new(Arc::new(llm), &config).unwrap()
    }

    fn prompt_of(request: &CompletionRequest) -> String {
        request.messages[0].text().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_initial_analysis() {
        let mut llm = MockLlm::new();
        llm.expect_name().return_const("mock".to_string());
        llm.expect_complete()
            .withf(|request| {
                let prompt = prompt_of(request);
                request.model == "claude-test"
                    && request.max_tokens == 512
                    && request.messages.len() == 1
                    && prompt.contains("Stock Data:\nCompany Name: Infosys Ltd")
                    && prompt.contains("right time to buy, sell or hold")
            })
            .times(1)
            .returning(|_| Ok(llm_reply("## Summary\n- Strong balance sheet")));

        let analysis = service(llm)
            .initial_analysis("Company Name: Infosys Ltd")
            .await
            .unwrap();
        assert_eq!(analysis, "## Summary\n- Strong balance sheet");
    }

    #[tokio::test]
    async fn test_follow_up_prompt_carries_question_and_sign_off() {
        let mut llm = MockLlm::new();
        llm.expect_name().return_const("mock".to_string());
        llm.expect_complete()
            .withf(|request| {
                let prompt = prompt_of(request);
                prompt.contains("REPORT TEXT")
                    && prompt.contains("Is this overvalued?")
                    && prompt.contains(FOLLOW_UP_SIGN_OFF)
            })
            .times(1)
            .returning(|_| Ok(llm_reply("Slightly. These are just advises from our end.")));

        let answer = service(llm)
            .answer_follow_up("REPORT TEXT", "  Is this overvalued?  ")
            .await
            .unwrap();
        assert!(answer.starts_with("Slightly."));
    }

    #[tokio::test]
    async fn test_blank_question_never_reaches_llm() {
        let mut llm = MockLlm::new();
        llm.expect_name().return_const("mock".to_string());
        llm.expect_complete().never();

        let result = service(llm).answer_follow_up("REPORT", "   ").await;
        assert!(matches!(result, Err(StockError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_llm_failure_is_llm_unavailable() {
        let mut llm = MockLlm::new();
        llm.expect_name().return_const("mock".to_string());
        llm.expect_complete()
            .times(1)
            .returning(|_| Err(LLMError::AuthenticationFailed));

        let result = service(llm).initial_analysis("REPORT").await;
        assert!(matches!(
            result,
            Err(StockError::LlmUnavailable(LLMError::AuthenticationFailed))
        ));
    }
}
