//! CLI argument parsing for the research analyst

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Strategic research analyst: plan, search, score, refine and synthesize
#[derive(Parser, Debug)]
#[command(name = "research-analyst", version)]
pub struct Cli {
    /// Emit structured workflow events on stderr
    #[arg(long, global = true)]
    pub events: bool,

    /// Path to the run archive database
    #[arg(long, global = true)]
    pub archive_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Research a question and print the report
    Analyze(AnalyzeArgs),
    /// List archived runs, most recent first
    History {
        /// Maximum number of runs to list
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Show an archived run
    Show {
        /// Run id as printed by `history`
        run_id: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Research question
    pub question: String,

    /// Write the report to this file (or `strategic_analysis.txt` inside this directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of searches to run in parallel (default: 1 for sequential)
    #[arg(long, default_value = "1")]
    pub concurrency: usize,

    /// Directory for the YAML state snapshot
    #[arg(long)]
    pub state_dir: Option<PathBuf>,

    /// Do not store this run in the archive
    #[arg(long)]
    pub no_archive: bool,

    /// Print the final research task as JSON instead of the rendered view
    #[arg(long)]
    pub json: bool,
}

impl From<&AnalyzeArgs> for crate::research::workflow::WorkflowConfig {
    fn from(args: &AnalyzeArgs) -> Self {
        crate::research::workflow::WorkflowConfig {
            search_concurrency: args.concurrency.max(1),
            state_dir: args.state_dir.clone(),
        }
    }
}
