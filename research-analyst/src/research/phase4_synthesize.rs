//! Phase 4: Report synthesis
//!
//! Builds the final six-section report from the best-scored sources. With no
//! scored evidence the model is not called and a fixed fallback is returned.

use crate::backends::{LanguageModel, LlmError};
use crate::research::scoring::top_ranked;
use crate::research::types::{Logged, ScoredItem};
use crate::workflow_utils::{execute_agent, AgentConfig};

pub const SYNTHESIS_SOURCE_COUNT: usize = 6;
pub const INSUFFICIENT_EVIDENCE_REPORT: &str = "Insufficient evidence to generate report.";

pub const REPORT_SECTIONS: [&str; 6] = [
    "Executive Summary",
    "Key Strategic Insights",
    "Risk & Limitations",
    "Conflicting Perspectives (if any)",
    "Strategic Recommendation",
    "Cited Sources",
];

pub fn synthesis_prompt(question: &str, strategy: &str, sources: &[&ScoredItem]) -> String {
    let source_text = sources
        .iter()
        .map(|item| format!("- {} (score: {})", item.url, item.final_score))
        .collect::<Vec<_>>()
        .join("\n");
    let sections = REPORT_SECTIONS
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}", i + 1, s))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a Strategic Technology Analyst.

Research Question:
{question}

Strategic Dimensions:
{strategy}

Evidence Sources:
{source_text}

Write a structured strategic report with these sections:
{sections}
"#
    )
}

/// Produce the final report text
pub async fn synthesize_report(
    model: &dyn LanguageModel,
    question: &str,
    strategy: &str,
    scored: &[ScoredItem],
) -> Result<Logged<String>, LlmError> {
    if scored.is_empty() {
        return Ok(Logged::new(INSUFFICIENT_EVIDENCE_REPORT.to_string())
            .note("Synthesis skipped: no scored evidence."));
    }

    let sources = top_ranked(scored, SYNTHESIS_SOURCE_COUNT);
    let config = AgentConfig::new(
        "synthesize",
        "Report Writer",
        format!("Synthesizing report from {} sources", sources.len()),
        synthesis_prompt(question, strategy, &sources),
    );
    let response = execute_agent(model, config).await?;

    Ok(Logged::new(response).note("Strategic synthesis report generated."))
}
