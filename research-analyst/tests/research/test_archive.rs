//! Archiving workflow runs and reading them back

use chrono::Local;
use std::sync::Arc;

use research_analyst::archive::RunArchive;
use research_analyst::render::render_task;
use research_analyst::research::{ResearchWorkflow, WorkflowConfig};
use research_analyst_sdk::WorkflowStatus;

use super::common::{cleanup_temp_dir, create_temp_dir, threshold_hit, ScriptedModel, ScriptedSearch};

#[tokio::test]
async fn test_completed_run_is_archived_and_rendered() {
    let dir = create_temp_dir("archive_completed");
    let model = Arc::new(ScriptedModel::new());
    let search = Arc::new(ScriptedSearch::new(vec![threshold_hit()]));

    let started_at = Local::now();
    let task = ResearchWorkflow::new(model, search, WorkflowConfig::default())
        .run("Will tariffs raise steel prices?")
        .await
        .unwrap();

    let archive = RunArchive::open(&dir.join("runs.db")).unwrap();
    let id = archive.record_completed(&task, started_at).unwrap();

    let runs = archive.list_runs(10).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].id, id);
    assert_eq!(runs[0].status, WorkflowStatus::Completed);
    assert_eq!(runs[0].confidence, task.confidence);

    let prefix = &id.to_string()[..8];
    let stored = archive.find_run(prefix).unwrap().unwrap();
    let stored_task = stored.task.unwrap();
    assert_eq!(stored_task, task);
    assert_eq!(render_task(&stored_task), render_task(&task));

    drop(archive);
    cleanup_temp_dir(&dir);
}

#[test]
fn test_failed_run_is_listed_with_error() {
    let dir = create_temp_dir("archive_failed");
    let archive = RunArchive::open(&dir.join("nested").join("runs.db")).unwrap();

    let id = archive
        .record_failed("Will tariffs raise steel prices?", "Research planning failed", Local::now())
        .unwrap();

    let stored = archive.find_run(&id.to_string()).unwrap().unwrap();
    assert_eq!(stored.summary.status, WorkflowStatus::Failed);
    assert_eq!(stored.error.as_deref(), Some("Research planning failed"));
    assert!(stored.task.is_none());

    drop(archive);
    cleanup_temp_dir(&dir);
}

#[test]
fn test_archive_reopens_existing_database() {
    let dir = create_temp_dir("archive_reopen");
    let path = dir.join("runs.db");

    let id = {
        let archive = RunArchive::open(&path).unwrap();
        archive
            .record_failed("Is edge AI viable?", "timeout", Local::now())
            .unwrap()
    };

    let archive = RunArchive::open(&path).unwrap();
    assert_eq!(archive.schema_version().unwrap(), 1);
    assert_eq!(archive.list_runs(5).unwrap()[0].id, id);

    drop(archive);
    cleanup_temp_dir(&dir);
}
