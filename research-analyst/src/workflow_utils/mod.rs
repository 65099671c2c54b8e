//! Workflow utilities shared by the research stages
//!
//! - **agent**: language model calls with start/complete/failed events
//! - **batch**: bounded parallel execution that keeps input order

pub mod agent;
pub mod batch;

// Re-export commonly used types and functions
pub use agent::{execute_agent, AgentConfig};
pub use batch::{execute_batch, TaskContext};
