//! Language model execution with structured event logging

use research_analyst_sdk::{log_agent_complete, log_agent_failed, log_agent_start};

use crate::backends::{LanguageModel, LlmError};

/// Configuration for one language model call
pub struct AgentConfig {
    /// Task ID this call belongs to
    pub task_id: String,
    /// Agent name (for logging)
    pub agent_name: String,
    /// Description of what this call is doing
    pub description: String,
    /// Prompt sent to the model
    pub prompt: String,
}

impl AgentConfig {
    pub fn new(
        task_id: impl Into<String>,
        agent_name: impl Into<String>,
        description: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            agent_name: agent_name.into(),
            description: description.into(),
            prompt: prompt.into(),
        }
    }
}

/// Run a single completion, emitting agent start/complete/failed events.
///
/// Returns the raw response text; errors are passed through untouched.
pub async fn execute_agent(model: &dyn LanguageModel, config: AgentConfig) -> Result<String, LlmError> {
    log_agent_start!(&config.task_id, &config.agent_name, &config.description);

    match model.complete(&config.prompt).await {
        Ok(response) => {
            log_agent_complete!(
                &config.task_id,
                &config.agent_name,
                format!("{} chars", response.chars().count())
            );
            Ok(response)
        }
        Err(e) => {
            log_agent_failed!(&config.task_id, &config.agent_name, e.to_string());
            Err(e)
        }
    }
}
