//! Shared event and logging surface for research-analyst workflows.
//!
//! Workflows report progress on two channels:
//!
//! - [`WorkflowLog`] events, serialized as single `__WF_EVENT__:<json>` lines on
//!   stderr so a supervising process can follow a run stage by stage.
//! - Colored console macros (`log_info!`, `log_warning!`, ...) for humans.
//!
//! Event emission is off by default and switched on with [`set_events_enabled`].

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

static EVENTS_ENABLED: AtomicBool = AtomicBool::new(false);

/// Turn structured event emission on or off for this process
pub fn set_events_enabled(enabled: bool) {
    EVENTS_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Whether [`WorkflowLog::emit`] currently writes anything
pub fn events_enabled() -> bool {
    EVENTS_ENABLED.load(Ordering::Relaxed)
}

/// Final status of a workflow run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowStatus {
    Completed,
    Failed,
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Completed => "Completed",
            WorkflowStatus::Failed => "Failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Completed" => Some(WorkflowStatus::Completed),
            "Failed" => Some(WorkflowStatus::Failed),
            _ => None,
        }
    }
}

/// Structured logging events emitted by workflows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowLog {
    /// Stage started
    PhaseStarted {
        phase: usize,
        name: String,
        total_phases: usize,
    },
    /// Stage completed
    PhaseCompleted { phase: usize, name: String },
    /// Stage failed
    PhaseFailed {
        phase: usize,
        name: String,
        error: String,
    },
    /// Task started (one search query)
    TaskStarted {
        phase: usize,
        task_id: String,
        description: String,
        total_tasks: Option<usize>,
    },
    /// Task completed
    TaskCompleted {
        task_id: String,
        result: Option<String>,
    },
    /// Task failed
    TaskFailed { task_id: String, error: String },
    /// Language model call started
    AgentStarted {
        task_id: String,
        agent_name: String,
        description: String,
    },
    /// Language model call completed
    AgentCompleted {
        task_id: String,
        agent_name: String,
        result: Option<String>,
    },
    /// Language model call failed
    AgentFailed {
        task_id: String,
        agent_name: String,
        error: String,
    },
    /// Confidence recomputed after a scoring pass
    ConfidenceEvaluated { iteration: u32, confidence: f64 },
    /// State file created (intermediate outputs)
    StateFileCreated {
        phase: usize,
        file_path: String,
        description: String,
    },
}

impl WorkflowLog {
    /// Wire form of the event: `__WF_EVENT__:<json>`
    pub fn to_line(&self) -> Option<String> {
        serde_json::to_string(self)
            .ok()
            .map(|json| format!("__WF_EVENT__:{}", json))
    }

    /// Parse a line produced by [`WorkflowLog::to_line`]
    pub fn from_line(line: &str) -> Option<Self> {
        let json = line.strip_prefix("__WF_EVENT__:")?;
        serde_json::from_str(json).ok()
    }

    /// Emit this log event to stderr
    pub fn emit(&self) {
        if !events_enabled() {
            return;
        }
        if let Some(line) = self.to_line() {
            use std::io::Write;
            eprintln!("{}", line);
            // Force flush stderr in async/concurrent contexts
            let _ = std::io::stderr().flush();
        }
    }
}

/// Helper macros for workflow logging
#[macro_export]
macro_rules! log_phase_start {
    ($phase:expr, $name:expr, $total:expr) => {
        $crate::WorkflowLog::PhaseStarted {
            phase: $phase,
            name: $name.to_string(),
            total_phases: $total,
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_phase_complete {
    ($phase:expr, $name:expr) => {
        $crate::WorkflowLog::PhaseCompleted {
            phase: $phase,
            name: $name.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_phase_failed {
    ($phase:expr, $name:expr, $error:expr) => {
        $crate::WorkflowLog::PhaseFailed {
            phase: $phase,
            name: $name.to_string(),
            error: $error.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_task_start {
    ($phase:expr, $task_id:expr, $desc:expr) => {
        $crate::WorkflowLog::TaskStarted {
            phase: $phase,
            task_id: $task_id.to_string(),
            description: $desc.to_string(),
            total_tasks: None,
        }
        .emit();
    };
    ($phase:expr, $task_id:expr, $desc:expr, $total:expr) => {
        $crate::WorkflowLog::TaskStarted {
            phase: $phase,
            task_id: $task_id.to_string(),
            description: $desc.to_string(),
            total_tasks: Some($total),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_task_complete {
    ($task_id:expr) => {
        $crate::WorkflowLog::TaskCompleted {
            task_id: $task_id.to_string(),
            result: None,
        }
        .emit();
    };
    ($task_id:expr, $result:expr) => {
        $crate::WorkflowLog::TaskCompleted {
            task_id: $task_id.to_string(),
            result: Some($result.to_string()),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_task_failed {
    ($task_id:expr, $error:expr) => {
        $crate::WorkflowLog::TaskFailed {
            task_id: $task_id.to_string(),
            error: $error.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_agent_start {
    ($task_id:expr, $agent:expr, $desc:expr) => {
        $crate::WorkflowLog::AgentStarted {
            task_id: $task_id.to_string(),
            agent_name: $agent.to_string(),
            description: $desc.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_agent_complete {
    ($task_id:expr, $agent:expr) => {
        $crate::WorkflowLog::AgentCompleted {
            task_id: $task_id.to_string(),
            agent_name: $agent.to_string(),
            result: None,
        }
        .emit();
    };
    ($task_id:expr, $agent:expr, $result:expr) => {
        $crate::WorkflowLog::AgentCompleted {
            task_id: $task_id.to_string(),
            agent_name: $agent.to_string(),
            result: Some($result.to_string()),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_agent_failed {
    ($task_id:expr, $agent:expr, $error:expr) => {
        $crate::WorkflowLog::AgentFailed {
            task_id: $task_id.to_string(),
            agent_name: $agent.to_string(),
            error: $error.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_confidence {
    ($iteration:expr, $confidence:expr) => {
        $crate::WorkflowLog::ConfidenceEvaluated {
            iteration: $iteration,
            confidence: $confidence,
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_state_file {
    ($phase:expr, $path:expr, $desc:expr) => {
        $crate::WorkflowLog::StateFileCreated {
            phase: $phase,
            file_path: $path.to_string(),
            description: $desc.to_string(),
        }
        .emit();
    };
}

// ============================================================================
// Console Logging Macros
// ============================================================================
// Colored console output for human-readable logs, complementing the
// structured WorkflowLog events. Written to stderr so stdout carries only
// the rendered report.
// ============================================================================

/// Logs an informational message.
///
/// # Example
/// ```
/// use research_analyst_sdk::log_info;
/// log_info!("Loading configuration...");
/// ```
///
/// Outputs:
/// ```text
/// ℹ Loading configuration...
/// ```
#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        eprintln!("\x1b[36mℹ {}\x1b[0m", $message);
    };
    ($fmt:expr, $($arg:tt)*) => {
        eprintln!("\x1b[36mℹ {}\x1b[0m", format!($fmt, $($arg)*));
    };
}

/// Logs a warning message.
///
/// # Example
/// ```
/// use research_analyst_sdk::log_warning;
/// log_warning!("Run archive unavailable");
/// ```
///
/// Outputs:
/// ```text
/// ⚠ Warning: Run archive unavailable
/// ```
#[macro_export]
macro_rules! log_warning {
    ($message:expr) => {
        eprintln!("\x1b[33m⚠ Warning: {}\x1b[0m", $message);
    };
    ($fmt:expr, $($arg:tt)*) => {
        eprintln!("\x1b[33m⚠ Warning: {}\x1b[0m", format!($fmt, $($arg)*));
    };
}

/// Logs that a file has been saved.
///
/// # Example
/// ```
/// use research_analyst_sdk::log_file_saved;
/// log_file_saved!("./strategic_analysis.txt");
/// ```
///
/// Outputs:
/// ```text
/// ✓ Saved: ./strategic_analysis.txt
/// ```
#[macro_export]
macro_rules! log_file_saved {
    ($path:expr) => {
        eprintln!("\x1b[32m✓ Saved: {}\x1b[0m", $path);
    };
}
