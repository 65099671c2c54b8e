//! Research workflow module
//!
//! Takes a natural-language question through planning, web search, evidence
//! scoring, confidence evaluation with up to two refinement passes, conflict
//! detection and report synthesis.

pub mod cli;
pub mod parsing;
pub mod phase0_plan;
pub mod phase1_gather;
pub mod phase2_refine;
pub mod phase3_conflicts;
pub mod phase4_synthesize;
pub mod scoring;
pub mod state;
pub mod types;
pub mod workflow;

// Re-export commonly used types
pub use state::{decide_after_evaluation, Decision, Stage, StopReason};
pub use types::{Logged, RawEvidence, ResearchPlan, ResearchTask, ScoredItem};
pub use workflow::{ResearchWorkflow, WorkflowConfig};
