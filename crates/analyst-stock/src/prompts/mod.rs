//! Stock analysis prompt templates
//!
//! Two templates drive the LLM:
//! - `stock.initial_analysis`: the full write-up for a freshly fetched report
//! - `stock.follow_up`: one free-form question answered against the same report

use analyst_prompt::{JinjaTemplate, PromptRegistry, Result};

/// Registry name of the initial analysis template
pub const INITIAL_ANALYSIS: &str = "stock.initial_analysis";

/// Registry name of the follow-up question template
pub const FOLLOW_UP: &str = "stock.follow_up";

/// Sentence every follow-up answer is asked to end with
pub const FOLLOW_UP_SIGN_OFF: &str = "These are just advises from our end.";

/// Create the initial analysis template (variables: `stock_data`)
pub fn initial_analysis_prompt() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        INITIAL_ANALYSIS,
        r"You are a financial analyst. Analyze the following stock data and provide:
1. A summary of the company's financial position
2. Key strengths and weaknesses
3. Technical analysis based on the moving averages
4. A recommendation with both short-term and long-term perspectives
5. Whether this is the right time to buy, sell or hold the stock

Formatting instructions:
- Use standard minus signs (-) instead of em dashes or other dash characters
- Keep spacing between numbers and units consistent (e.g. 250 Cr, 12.5 %)
- Show numbers with at most 2 decimal places
- Put a space after every punctuation mark
- Keep font formatting consistent throughout

Stock Data:
{{ stock_data }}

Provide your analysis in a clear, structured format with bullet points and sections.",
    )
}

/// Create the follow-up question template (variables: `stock_data`, `question`)
pub fn follow_up_prompt() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        FOLLOW_UP,
        format!(
            r"You are a financial analyst. Using the following stock data:
{{{{ stock_data }}}}

Please answer this specific question about the stock:
{{{{ question }}}}

Provide a clear and concise answer based on the available data. Do not tell the user to conduct their own study or to consult a financial advisor; give your own view based on your analysis. At the end, mention: {FOLLOW_UP_SIGN_OFF}"
        ),
    )
}

/// Register all stock analysis prompts with the given registry
pub fn register_prompts(registry: &PromptRegistry) -> Result<()> {
    registry.register(initial_analysis_prompt()?);
    registry.register(follow_up_prompt()?);
    Ok(())
}
