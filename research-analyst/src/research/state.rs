//! Workflow stages and the refine/stop decision

use serde::{Deserialize, Serialize};

/// Loop exits once confidence reaches this value
pub const CONFIDENCE_THRESHOLD: f64 = 0.80;
/// Upper bound on refinement passes per run
pub const MAX_REFINEMENTS: u32 = 2;

/// Stages of a research run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Planning,
    Gathering,
    Scoring,
    Evaluating,
    Refining,
    ConflictDetection,
    Synthesis,
    Done,
}

impl Stage {
    /// Stages that do work, in pipeline order
    pub const WORKING: [Stage; 7] = [
        Stage::Planning,
        Stage::Gathering,
        Stage::Scoring,
        Stage::Evaluating,
        Stage::Refining,
        Stage::ConflictDetection,
        Stage::Synthesis,
    ];

    pub fn index(&self) -> usize {
        match self {
            Stage::Planning => 0,
            Stage::Gathering => 1,
            Stage::Scoring => 2,
            Stage::Evaluating => 3,
            Stage::Refining => 4,
            Stage::ConflictDetection => 5,
            Stage::Synthesis => 6,
            Stage::Done => 7,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Planning => "Plan Research",
            Stage::Gathering => "Gather Evidence",
            Stage::Scoring => "Score Evidence",
            Stage::Evaluating => "Evaluate Confidence",
            Stage::Refining => "Refine Queries",
            Stage::ConflictDetection => "Detect Conflicts",
            Stage::Synthesis => "Synthesize Report",
            Stage::Done => "Done",
        }
    }
}

/// Why the retrieval loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    ConfidenceReached,
    MaxIterations,
}

impl StopReason {
    /// Audit-log line for this exit
    pub fn message(&self) -> &'static str {
        match self {
            StopReason::ConfidenceReached => "Confidence threshold reached.",
            StopReason::MaxIterations => "Max iterations reached.",
        }
    }
}

/// Outcome of the guarded transition out of [`Stage::Evaluating`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Refine,
    Stop(StopReason),
}

impl Decision {
    /// Stage entered after this decision
    pub fn next_stage(&self) -> Stage {
        match self {
            Decision::Refine => Stage::Refining,
            Decision::Stop(_) => Stage::ConflictDetection,
        }
    }
}

/// Refine iff `confidence < 0.80` and `iteration < 2`.
/// Confidence is checked first, so a confident final pass reports
/// `ConfidenceReached` even at the iteration cap.
pub fn decide_after_evaluation(confidence: f64, iteration: u32) -> Decision {
    if confidence >= CONFIDENCE_THRESHOLD {
        Decision::Stop(StopReason::ConfidenceReached)
    } else if iteration >= MAX_REFINEMENTS {
        Decision::Stop(StopReason::MaxIterations)
    } else {
        Decision::Refine
    }
}
