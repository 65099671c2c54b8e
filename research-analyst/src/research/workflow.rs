//! Workflow orchestration for the research analyst
//!
//! [`ResearchWorkflow::run`] drives one question through an explicit state
//! machine:
//!
//! ```text
//! Planning -> Gathering -> Scoring -> Evaluating --(refine)--> Refining -> Gathering
//!                                        |
//!                                        +--(stop)--> ConflictDetection -> Synthesis -> Done
//! ```
//!
//! The only guarded transition is out of `Evaluating`, decided by
//! [`decide_after_evaluation`]. Language model failures and fatal search
//! failures abort the run; everything else is absorbed and written to the
//! task's audit log.

use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

use research_analyst_sdk::{
    log_confidence, log_file_saved, log_phase_complete, log_phase_failed, log_phase_start,
    log_state_file,
};

use crate::backends::{LanguageModel, SearchProvider};
use crate::research::{
    phase0_plan::plan_research,
    phase1_gather::gather_evidence,
    phase2_refine::refine_queries,
    phase3_conflicts::detect_conflicts,
    phase4_synthesize::synthesize_report,
    scoring::{evaluate_confidence, score_evidence},
    state::{decide_after_evaluation, Decision, Stage},
    types::ResearchTask,
};

/// Configuration for the research workflow
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Searches in flight at once; 1 keeps gathering strictly sequential
    pub search_concurrency: usize,
    /// Where to write the final task snapshot as YAML, if anywhere
    pub state_dir: Option<PathBuf>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            search_concurrency: 1,
            state_dir: None,
        }
    }
}

/// Runs research questions against a language model and a search provider
pub struct ResearchWorkflow {
    model: Arc<dyn LanguageModel>,
    search: Arc<dyn SearchProvider>,
    config: WorkflowConfig,
}

impl ResearchWorkflow {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        search: Arc<dyn SearchProvider>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            model,
            search,
            config,
        }
    }

    /// Run the full workflow for one question
    ///
    /// # Errors
    ///
    /// Returns an error if the language model fails, if the search backend
    /// rejects our credentials, or if the state snapshot cannot be written.
    /// No partial task is returned in that case.
    pub async fn run(&self, question: &str) -> Result<ResearchTask> {
        let mut task = ResearchTask::new(question);
        let mut stage = Stage::Planning;

        while stage != Stage::Done {
            log_phase_start!(stage.index(), stage.name(), Stage::WORKING.len());

            match self.step(stage, &mut task).await {
                Ok(next) => {
                    log_phase_complete!(stage.index(), stage.name());
                    stage = next;
                }
                Err(e) => {
                    log_phase_failed!(stage.index(), stage.name(), format!("{:#}", e));
                    return Err(e);
                }
            }
        }

        if let Some(dir) = &self.config.state_dir {
            let path = save_task_state(dir, &task).await?;
            log_state_file!(
                Stage::Synthesis.index(),
                path.display().to_string(),
                "Final research task state"
            );
            log_file_saved!(path.display());
        }

        Ok(task)
    }

    /// Execute one stage and return the stage that follows it
    async fn step(&self, stage: Stage, task: &mut ResearchTask) -> Result<Stage> {
        match stage {
            Stage::Planning => {
                let planned = plan_research(self.model.as_ref(), task.question())
                    .await
                    .context("Research planning failed")?;
                let plan = task.absorb(planned);
                task.domain = plan.domain;
                task.strategy = plan.strategy;
                task.queries = plan.queries;
                Ok(Stage::Gathering)
            }
            Stage::Gathering => {
                let gathered = gather_evidence(
                    self.search.clone(),
                    &task.queries,
                    self.config.search_concurrency,
                )
                .await?;
                task.raw_evidence = task.absorb(gathered);
                Ok(Stage::Scoring)
            }
            Stage::Scoring => {
                task.scored_evidence = score_evidence(&task.raw_evidence);
                task.note("Evidence scored using search relevance + credibility heuristics.");
                Ok(Stage::Evaluating)
            }
            Stage::Evaluating => {
                let confidence = evaluate_confidence(&task.scored_evidence);
                task.record_confidence(confidence);
                log_confidence!(task.iteration, confidence);

                let decision = decide_after_evaluation(confidence, task.iteration);
                if let Decision::Stop(reason) = decision {
                    task.note(reason.message());
                }
                Ok(decision.next_stage())
            }
            Stage::Refining => {
                let refined = refine_queries(
                    self.model.as_ref(),
                    task.question(),
                    &task.strategy,
                    task.iteration + 1,
                )
                .await
                .context("Query refinement failed")?;
                task.queries = task.absorb(refined);
                task.iteration += 1;
                Ok(Stage::Gathering)
            }
            Stage::ConflictDetection => {
                let conflicts = detect_conflicts(self.model.as_ref(), &task.scored_evidence)
                    .await
                    .context("Conflict detection failed")?;
                task.conflicts = task.absorb(conflicts);
                Ok(Stage::Synthesis)
            }
            Stage::Synthesis => {
                let report = synthesize_report(
                    self.model.as_ref(),
                    task.question(),
                    &task.strategy,
                    &task.scored_evidence,
                )
                .await
                .context("Report synthesis failed")?;
                task.report = task.absorb(report);
                Ok(Stage::Done)
            }
            Stage::Done => Ok(Stage::Done),
        }
    }
}

/// Write the task as `research_task_<timestamp>.yaml` under `dir`
pub async fn save_task_state(dir: &Path, task: &ResearchTask) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("research_task_{}.yaml", timestamp));
    let yaml = serde_yaml::to_string(task)?;
    fs::write(&path, yaml)
        .await
        .with_context(|| format!("Failed to write state file: {}", path.display()))?;

    Ok(path)
}

/// Load a snapshot written by [`save_task_state`]
pub async fn load_task_state(path: &Path) -> Result<ResearchTask> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read state file: {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse research task YAML from: {}", path.display()))
}
