use anyhow::{anyhow, Result};
use chrono::Local;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use research_analyst::archive::{default_archive_path, RunArchive};
use research_analyst::backends::{LanguageModel, OpenAiCompatibleModel, SearchProvider, TavilySearch};
use research_analyst::config::BackendConfig;
use research_analyst::render::{export_report, render_history, render_task};
use research_analyst::research::cli::{AnalyzeArgs, Cli, Command};
use research_analyst::research::{ResearchTask, ResearchWorkflow, WorkflowConfig};
use research_analyst_sdk::{log_file_saved, log_info, log_warning, set_events_enabled};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    set_events_enabled(cli.events);

    let archive_path = cli.archive_path.clone().unwrap_or_else(default_archive_path);

    match cli.command {
        Command::Analyze(args) => analyze(args, &archive_path).await,
        Command::History { limit } => {
            let archive = RunArchive::open(&archive_path)?;
            print!("{}", render_history(&archive.list_runs(limit)?));
            Ok(())
        }
        Command::Show { run_id } => {
            let archive = RunArchive::open(&archive_path)?;
            let run = archive
                .find_run(&run_id)?
                .ok_or_else(|| anyhow!("No archived run matches '{}'", run_id))?;

            match (run.task, run.error) {
                (Some(task), _) => print!("{}", render_task(&task)),
                (None, Some(error)) => {
                    println!("Research Question: {}", run.summary.question);
                    println!("Status: {}", run.summary.status.as_str());
                    println!("Error: {}", error);
                }
                (None, None) => println!("Run {} has no stored payload.", run.summary.id),
            }
            Ok(())
        }
    }
}

async fn analyze(args: AnalyzeArgs, archive_path: &std::path::Path) -> Result<()> {
    let backends = BackendConfig::from_env()?;
    let model = OpenAiCompatibleModel::new(backends.llm.clone(), backends.timeout)?;
    tracing::info!(model = model.model_name(), "Language model configured");
    let model: Arc<dyn LanguageModel> = Arc::new(model);
    let search: Arc<dyn SearchProvider> =
        Arc::new(TavilySearch::new(backends.search.clone(), backends.timeout)?);

    let config: WorkflowConfig = (&args).into();
    let workflow = ResearchWorkflow::new(model, search, config);

    let started_at = Local::now();
    let outcome = workflow.run(&args.question).await;

    if !args.no_archive {
        archive_run(archive_path, &args.question, &outcome, started_at);
    }

    let task = outcome?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        print!("{}", render_task(&task));
    }

    if let Some(target) = &args.output {
        let path = export_report(target, &task.report)?;
        log_file_saved!(path.display());
    }

    Ok(())
}

/// Store the outcome; archive problems never fail the run itself
fn archive_run(
    path: &std::path::Path,
    question: &str,
    outcome: &Result<ResearchTask>,
    started_at: chrono::DateTime<Local>,
) {
    let recorded = RunArchive::open(path).and_then(|archive| match outcome {
        Ok(task) => archive.record_completed(task, started_at),
        Err(e) => archive.record_failed(question, &format!("{:#}", e), started_at),
    });

    match recorded {
        Ok(id) => {
            log_info!("Archived run {}", id);
        }
        Err(e) => {
            log_warning!("Failed to archive run: {:#}", e);
        }
    }
}
