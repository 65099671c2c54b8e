//! End-to-end runs of the research workflow against scripted backends

use std::sync::Arc;

use research_analyst::research::phase4_synthesize::INSUFFICIENT_EVIDENCE_REPORT;
use research_analyst::research::workflow::load_task_state;
use research_analyst::research::{ResearchWorkflow, WorkflowConfig};

use super::common::{
    cleanup_temp_dir, create_temp_dir, threshold_hit, weak_hit, Failure, PromptKind,
    ScriptedModel, ScriptedSearch, CONFLICT_RESPONSE, REFINE_RESPONSE, REPORT_RESPONSE,
};

const QUESTION: &str = "How will new tariffs affect domestic steel prices?";

fn workflow(model: &Arc<ScriptedModel>, search: &Arc<ScriptedSearch>) -> ResearchWorkflow {
    ResearchWorkflow::new(model.clone(), search.clone(), WorkflowConfig::default())
}

#[tokio::test]
async fn test_low_confidence_stops_after_two_refinements() {
    let model = Arc::new(ScriptedModel::new());
    let search = Arc::new(ScriptedSearch::new(vec![weak_hit()]));

    let task = workflow(&model, &search).run(QUESTION).await.unwrap();

    assert_eq!(task.iteration, 2);
    assert_eq!(task.confidence_history.len(), 3);
    assert!(task.confidence_history.iter().all(|c| *c < 0.8));
    assert_eq!(model.calls(PromptKind::Refine), 2);
    assert_eq!(model.calls(PromptKind::Conflicts), 1);
    assert_eq!(model.calls(PromptKind::Synthesis), 1);

    assert_eq!(task.log.last().map(String::as_str), Some("Strategic synthesis report generated."));
    assert!(task.log.iter().any(|l| l == "Max iterations reached."));
    assert!(!task.log.iter().any(|l| l == "Confidence threshold reached."));

    // The last refinement replaced the planned queries wholesale
    let refined: Vec<String> = REFINE_RESPONSE.lines().map(str::to_string).collect();
    assert_eq!(task.queries, refined);
    assert_eq!(task.conflicts, CONFLICT_RESPONSE);
    assert_eq!(task.report, REPORT_RESPONSE);
}

#[tokio::test]
async fn test_confidence_exactly_at_threshold_exits_loop() {
    let model = Arc::new(ScriptedModel::new());
    let search = Arc::new(ScriptedSearch::new(vec![threshold_hit()]));

    let task = workflow(&model, &search).run(QUESTION).await.unwrap();

    assert_eq!(task.confidence, 0.8);
    assert_eq!(task.confidence_history, vec![0.8]);
    assert_eq!(task.iteration, 0);
    assert_eq!(model.calls(PromptKind::Refine), 0);
    assert!(task.log.iter().any(|l| l == "Confidence threshold reached."));
}

#[tokio::test]
async fn test_plan_populates_task() {
    let model = Arc::new(ScriptedModel::new());
    let search = Arc::new(ScriptedSearch::new(vec![threshold_hit()]));

    let task = workflow(&model, &search).run(QUESTION).await.unwrap();

    assert_eq!(task.question(), QUESTION);
    assert_eq!(task.domain, "Policy Analysis");
    assert_eq!(task.strategy, "- pricing power\n- supply chain exposure");
    assert_eq!(
        task.queries,
        vec![
            "AI".to_string(),
            "impact of tariffs on steel prices".to_string(),
            "steel import volumes 2024".to_string(),
        ]
    );
    assert_eq!(
        task.log.first().map(String::as_str),
        Some("Analysis plan generated (domain + strategy + queries).")
    );
}

#[tokio::test]
async fn test_short_query_skipped_without_search_or_log() {
    let model = Arc::new(ScriptedModel::new());
    let search = Arc::new(ScriptedSearch::new(vec![threshold_hit()]));

    let task = workflow(&model, &search).run(QUESTION).await.unwrap();

    let calls = search.calls();
    assert_eq!(calls.len(), 2);
    assert!(!calls.iter().any(|q| q == "AI"));
    assert!(!task.log.iter().any(|l| l.contains("'AI")));
    assert!(task.raw_evidence.iter().all(|e| e.query != "AI"));
    assert!(task.log.iter().any(|l| l == "Evidence gathered for 2 queries."));
}

#[tokio::test]
async fn test_failed_query_logged_once_and_absent_from_output() {
    let model = Arc::new(ScriptedModel::new());
    let search = Arc::new(
        ScriptedSearch::new(vec![threshold_hit()])
            .failing("impact of tariffs on steel prices", Failure::Transient),
    );

    let task = workflow(&model, &search).run(QUESTION).await.unwrap();

    let failures: Vec<&String> = task
        .log
        .iter()
        .filter(|l| l.starts_with("Search failed for query:"))
        .collect();
    assert_eq!(
        failures,
        vec!["Search failed for query: 'impact of tariffs on steel prices'"]
    );

    let gathered: Vec<&str> = task.raw_evidence.iter().map(|e| e.query.as_str()).collect();
    assert_eq!(gathered, vec!["steel import volumes 2024"]);
    assert_eq!(task.iteration, 0);
}

#[tokio::test]
async fn test_no_evidence_uses_fallback_report() {
    let model = Arc::new(ScriptedModel::new());
    let search = Arc::new(ScriptedSearch::empty());

    let task = workflow(&model, &search).run(QUESTION).await.unwrap();

    assert!(task.scored_evidence.is_empty());
    assert_eq!(task.confidence_history, vec![0.0, 0.0, 0.0]);
    assert_eq!(task.iteration, 2);
    assert_eq!(task.report, INSUFFICIENT_EVIDENCE_REPORT);
    assert_eq!(model.calls(PromptKind::Synthesis), 0);
    assert_eq!(model.calls(PromptKind::Conflicts), 1);
}

#[tokio::test]
async fn test_search_auth_failure_aborts_run() {
    let model = Arc::new(ScriptedModel::new());
    let search = Arc::new(
        ScriptedSearch::new(vec![threshold_hit()])
            .failing("impact of tariffs on steel prices", Failure::Auth),
    );

    let err = workflow(&model, &search).run(QUESTION).await.unwrap_err();

    assert!(format!("{:#}", err).contains("Authentication failed for search provider"));
    assert_eq!(model.calls(PromptKind::Conflicts), 0);
    assert_eq!(model.calls(PromptKind::Synthesis), 0);
}

#[tokio::test]
async fn test_planning_failure_propagates() {
    let model = Arc::new(ScriptedModel::new().failing_on(PromptKind::Plan));
    let search = Arc::new(ScriptedSearch::new(vec![threshold_hit()]));

    let err = workflow(&model, &search).run(QUESTION).await.unwrap_err();

    let message = format!("{:#}", err);
    assert!(message.contains("Research planning failed"));
    assert!(message.contains("Rate limited"));
    assert!(search.calls().is_empty());
}

#[tokio::test]
async fn test_refinement_failure_propagates() {
    let model = Arc::new(ScriptedModel::new().failing_on(PromptKind::Refine));
    let search = Arc::new(ScriptedSearch::new(vec![weak_hit()]));

    let err = workflow(&model, &search).run(QUESTION).await.unwrap_err();

    assert!(format!("{:#}", err).contains("Query refinement failed"));
    assert_eq!(model.calls(PromptKind::Synthesis), 0);
}

#[tokio::test]
async fn test_unparseable_plan_still_completes() {
    let model = Arc::new(ScriptedModel::new().with_response(PromptKind::Plan, "I cannot help with that."));
    let search = Arc::new(ScriptedSearch::new(vec![threshold_hit()]));

    let task = workflow(&model, &search).run(QUESTION).await.unwrap();

    assert_eq!(task.domain, "");
    // Nothing to search until refinement supplies queries
    assert_eq!(task.confidence_history[0], 0.0);
    assert_eq!(task.iteration, 1);
    assert_eq!(task.confidence, 0.8);
}

#[tokio::test]
async fn test_parallel_gather_preserves_query_order() {
    use std::time::Duration;

    let model = Arc::new(ScriptedModel::new());
    let search = Arc::new(
        ScriptedSearch::new(vec![threshold_hit()])
            .delayed("impact of tariffs on steel prices", Duration::from_millis(80)),
    );
    let config = WorkflowConfig {
        search_concurrency: 3,
        ..Default::default()
    };

    let task = ResearchWorkflow::new(model.clone(), search.clone(), config)
        .run(QUESTION)
        .await
        .unwrap();

    let gathered: Vec<&str> = task.raw_evidence.iter().map(|e| e.query.as_str()).collect();
    assert_eq!(
        gathered,
        vec!["impact of tariffs on steel prices", "steel import volumes 2024"]
    );
}

#[tokio::test]
async fn test_state_snapshot_round_trips() {
    let dir = create_temp_dir("state_snapshot");
    let model = Arc::new(ScriptedModel::new());
    let search = Arc::new(ScriptedSearch::new(vec![weak_hit()]));
    let config = WorkflowConfig {
        state_dir: Some(dir.clone()),
        ..Default::default()
    };

    let task = ResearchWorkflow::new(model.clone(), search.clone(), config)
        .run(QUESTION)
        .await
        .unwrap();

    let snapshots: Vec<_> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(snapshots.len(), 1);
    let name = snapshots[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("research_task_") && name.ends_with(".yaml"));

    let loaded = load_task_state(&snapshots[0]).await.unwrap();
    assert_eq!(loaded, task);

    cleanup_temp_dir(&dir);
}
