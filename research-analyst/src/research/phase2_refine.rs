//! Phase 2: Query refinement
//!
//! When confidence is too low the model is asked for a fresh, smaller query
//! set. The response replaces the previous queries entirely.

use crate::backends::{LanguageModel, LlmError};
use crate::research::parsing::strip_list_marker;
use crate::research::types::Logged;
use crate::workflow_utils::{execute_agent, AgentConfig};

pub const REFINED_QUERY_COUNT: usize = 2;
/// Lines shorter than this after marker stripping are discarded
pub const MIN_REFINED_QUERY_CHARS: usize = 10;

pub fn refinement_prompt(question: &str, strategy: &str) -> String {
    format!(
        r#"The research question is:
{question}

The strategic dimensions are:
{strategy}

Previous evidence was insufficient.

Generate {REFINED_QUERY_COUNT} concise, clean web search queries.
Return ONLY the queries, one per line.
No numbering.
No bullet points.
No explanations.
"#
    )
}

/// Clean each line and keep the first two that look like real queries
pub fn parse_refined_queries(response: &str) -> Vec<String> {
    response
        .lines()
        .map(strip_list_marker)
        .filter(|line| line.chars().count() >= MIN_REFINED_QUERY_CHARS)
        .take(REFINED_QUERY_COUNT)
        .map(str::to_string)
        .collect()
}

/// Ask for a replacement query set
pub async fn refine_queries(
    model: &dyn LanguageModel,
    question: &str,
    strategy: &str,
    iteration: u32,
) -> Result<Logged<Vec<String>>, LlmError> {
    let config = AgentConfig::new(
        format!("refine_{}", iteration),
        "Refinement Agent",
        format!("Generating refined queries (pass {})", iteration),
        refinement_prompt(question, strategy),
    );
    let response = execute_agent(model, config).await?;

    Ok(Logged::new(parse_refined_queries(&response))
        .note("Refinement triggered. Cleaned new queries generated."))
}
