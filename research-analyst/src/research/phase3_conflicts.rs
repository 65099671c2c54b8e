//! Phase 3: Conflict detection across the strongest sources

use crate::backends::{LanguageModel, LlmError};
use crate::research::scoring::top_ranked;
use crate::research::types::{Logged, ScoredItem};
use crate::workflow_utils::{execute_agent, AgentConfig};

pub const CONFLICT_SOURCE_COUNT: usize = 5;

pub fn conflict_prompt(sources: &[&ScoredItem]) -> String {
    let source_list = sources
        .iter()
        .map(|item| item.url.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Based on the following sources:

{source_list}

Identify any conflicting viewpoints or disagreements between them.
Return 3-5 bullet points summarizing the conflicts.
"#
    )
}

/// Ask the model where the top sources disagree. The response is kept verbatim.
pub async fn detect_conflicts(
    model: &dyn LanguageModel,
    scored: &[ScoredItem],
) -> Result<Logged<String>, LlmError> {
    let sources = top_ranked(scored, CONFLICT_SOURCE_COUNT);
    let config = AgentConfig::new(
        "conflicts",
        "Conflict Analyst",
        format!("Comparing viewpoints across {} sources", sources.len()),
        conflict_prompt(&sources),
    );
    let response = execute_agent(model, config).await?;

    Ok(Logged::new(response).note("Conflict analysis completed."))
}
