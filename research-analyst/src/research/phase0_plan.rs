//! Phase 0: Research planning
//!
//! One model call classifies the question's domain, lists the strategic
//! dimensions to analyse, and proposes the initial search queries. The
//! response is expected to carry `DOMAIN:`, `STRATEGY:` and `QUERIES:`
//! sections; any that are missing stay empty.

use crate::backends::{LanguageModel, LlmError};
use crate::research::parsing::{non_empty_lines, Sections};
use crate::research::types::{Logged, ResearchPlan};
use crate::workflow_utils::{execute_agent, AgentConfig};

pub const DOMAIN_LABEL: &str = "DOMAIN:";
pub const STRATEGY_LABEL: &str = "STRATEGY:";
pub const QUERIES_LABEL: &str = "QUERIES:";

pub const DOMAINS: [&str; 6] = [
    "Technology Evaluation",
    "AI System Analysis",
    "Market Strategy",
    "Policy Analysis",
    "Scientific Research",
    "General Analysis",
];

pub fn planning_prompt(question: &str) -> String {
    let domains = DOMAINS
        .iter()
        .map(|d| format!("   - {}", d))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a Strategic Technology Research Analyst.

Research question:

{question}

Do all of the following in ONE response:

1. Classify the domain as exactly one of:
{domains}

2. Define 5-7 strategic analysis dimensions.

3. Write 4 focused web search queries covering:
   - core evaluation
   - risks and limitations
   - competitive comparison
   - future outlook

Use exactly this layout:

{DOMAIN_LABEL}
<domain>

{STRATEGY_LABEL}
- dimension
- dimension

{QUERIES_LABEL}
1. <query>
2. <query>
3. <query>
4. <query>
"#
    )
}

/// Parse a planning response. Tolerates missing, reordered or padded sections.
pub fn parse_plan(response: &str) -> ResearchPlan {
    let sections = Sections::scan(response, &[DOMAIN_LABEL, STRATEGY_LABEL, QUERIES_LABEL]);

    ResearchPlan {
        domain: sections.get(DOMAIN_LABEL).unwrap_or_default().to_string(),
        strategy: sections.get(STRATEGY_LABEL).unwrap_or_default().to_string(),
        queries: sections
            .get(QUERIES_LABEL)
            .map(non_empty_lines)
            .unwrap_or_default(),
    }
}

/// Classify the question and produce the initial plan
pub async fn plan_research(
    model: &dyn LanguageModel,
    question: &str,
) -> Result<Logged<ResearchPlan>, LlmError> {
    let config = AgentConfig::new(
        "plan",
        "Planning Agent",
        "Classifying domain and drafting search queries",
        planning_prompt(question),
    );
    let response = execute_agent(model, config).await?;

    Ok(Logged::new(parse_plan(&response))
        .note("Analysis plan generated (domain + strategy + queries)."))
}
