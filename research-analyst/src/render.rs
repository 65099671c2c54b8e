//! Terminal presentation of finished research runs
//!
//! Read-only: nothing here writes back into a [`ResearchTask`].

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::archive::RunSummary;
use crate::research::ResearchTask;

pub const DEFAULT_REPORT_FILE: &str = "strategic_analysis.txt";
/// Evidence rows shown in the ranking section
pub const EVIDENCE_DISPLAY_COUNT: usize = 5;

const RULE_WIDTH: usize = 80;
const BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    High,
    Moderate,
    Low,
}

impl ConfidenceBand {
    pub fn of(confidence: f64) -> Self {
        if confidence >= 0.75 {
            ConfidenceBand::High
        } else if confidence >= 0.5 {
            ConfidenceBand::Moderate
        } else {
            ConfidenceBand::Low
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ConfidenceBand::High => "High confidence in gathered evidence.",
            ConfidenceBand::Moderate => "Moderate confidence. Some uncertainty remains.",
            ConfidenceBand::Low => "Low confidence. Evidence may be weak or conflicting.",
        }
    }
}

/// First line of the report, if any
pub fn executive_summary(report: &str) -> Option<&str> {
    report.lines().next().filter(|line| !line.trim().is_empty())
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n\x1b[1m{}\x1b[0m", title);
}

fn bar(value: f64) -> String {
    let filled = (value.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled)
}

/// Full terminal view of a finished task
pub fn render_task(task: &ResearchTask) -> String {
    let mut out = String::new();
    let rule = "=".repeat(RULE_WIDTH);

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "Research Question: {}", task.question());
    let _ = writeln!(out, "{}", rule);

    heading(&mut out, "Domain");
    let _ = writeln!(out, "{}", task.domain);

    heading(&mut out, "Confidence Score");
    let _ = writeln!(out, "{}", task.confidence);
    let _ = writeln!(out, "{}", ConfidenceBand::of(task.confidence).message());

    heading(&mut out, "Iterations");
    let _ = writeln!(out, "{}", task.iteration);

    if !task.confidence_history.is_empty() {
        heading(&mut out, "Confidence Evolution");
        for (pass, confidence) in task.confidence_history.iter().enumerate() {
            let _ = writeln!(out, "  {:>2}  {:<5}  {}", pass, confidence, bar(*confidence));
        }
    }

    heading(&mut out, "Strategic Dimensions");
    let _ = writeln!(out, "{}", task.strategy);

    heading(&mut out, "Generated Research Queries");
    for query in &task.queries {
        let _ = writeln!(out, "  • {}", query);
    }

    heading(&mut out, "Evidence Ranking");
    let ranked = task.ranked_evidence();
    if ranked.is_empty() {
        let _ = writeln!(out, "No evidence found.");
    } else {
        for item in ranked.iter().take(EVIDENCE_DISPLAY_COUNT) {
            let _ = writeln!(out, "  {:<5}  {}", item.final_score, item.url);
        }
    }

    heading(&mut out, "Agent Thinking Log");
    for line in &task.log {
        let _ = writeln!(out, "  • {}", line);
    }

    let _ = writeln!(out, "\n{}", rule);
    let _ = writeln!(out, "Strategic Intelligence Report");
    let _ = writeln!(out, "{}", rule);

    if let Some(summary) = executive_summary(&task.report) {
        let _ = writeln!(out, "\x1b[32mExecutive Summary: {}\x1b[0m", summary);
    }

    if !task.conflicts.is_empty() {
        heading(&mut out, "Conflicting Perspectives");
        let _ = writeln!(out, "{}", task.conflicts);
    }

    if task.report.is_empty() {
        let _ = writeln!(out, "\nReport not generated.");
    } else {
        let _ = writeln!(out, "\n{}", "-".repeat(RULE_WIDTH));
        let _ = writeln!(out, "{}", task.report);
    }

    out
}

/// Table of archived runs
pub fn render_history(runs: &[RunSummary]) -> String {
    if runs.is_empty() {
        return "No archived runs.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<8}  {:<16}  {:<9}  {:<5}  {:<4}  {}",
        "ID", "STARTED", "STATUS", "CONF", "ITER", "QUESTION"
    );
    for run in runs {
        let id = run.id.to_string();
        let _ = writeln!(
            out,
            "{:<8}  {:<16}  {:<9}  {:<5}  {:<4}  {}",
            &id[..8],
            run.started_at.format("%Y-%m-%d %H:%M").to_string(),
            run.status.as_str(),
            run.confidence,
            run.iteration,
            run.question
        );
    }
    out
}

/// Write the report verbatim. A directory target gets [`DEFAULT_REPORT_FILE`].
pub fn export_report(target: &Path, report: &str) -> Result<PathBuf> {
    let path = if target.is_dir() {
        target.join(DEFAULT_REPORT_FILE)
    } else {
        target.to_path_buf()
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(&path, report)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    Ok(path)
}
