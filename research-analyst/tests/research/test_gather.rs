//! Tests for evidence gathering against a scripted search backend

use std::sync::Arc;
use std::time::Duration;

use research_analyst::backends::{SearchHit, SearchProvider};
use research_analyst::research::phase1_gather::gather_evidence;

use super::common::{threshold_hit, weak_hit, Failure, ScriptedSearch};

fn queries(list: &[&str]) -> Vec<String> {
    list.iter().map(|q| q.to_string()).collect()
}

#[tokio::test]
async fn test_gather_trims_queries_before_searching() {
    let search = Arc::new(ScriptedSearch::new(vec![weak_hit()]));
    let provider: Arc<dyn SearchProvider> = search.clone();

    let gathered = gather_evidence(provider, &queries(&["   steel tariffs 2024   "]), 1)
        .await
        .unwrap();

    assert_eq!(search.calls(), vec!["steel tariffs 2024".to_string()]);
    assert_eq!(gathered.value.len(), 1);
    assert_eq!(gathered.value[0].query, "steel tariffs 2024");
    assert_eq!(gathered.value[0].response.results, vec![weak_hit()]);
}

#[tokio::test]
async fn test_gather_skips_blank_and_short_queries() {
    let search = Arc::new(ScriptedSearch::new(vec![weak_hit()]));
    let provider: Arc<dyn SearchProvider> = search.clone();

    let gathered = gather_evidence(provider, &queries(&["", "   ", "AI", "123456789"]), 1)
        .await
        .unwrap();

    assert!(search.calls().is_empty());
    assert!(gathered.value.is_empty());
    assert_eq!(gathered.notes, vec!["Evidence gathered for 0 queries.".to_string()]);
}

#[tokio::test]
async fn test_gather_failure_note_is_truncated() {
    let long_query = format!("{} with a long tail of extra words", "x".repeat(60));
    let search = Arc::new(ScriptedSearch::new(vec![weak_hit()]).failing(&long_query, Failure::Transient));
    let provider: Arc<dyn SearchProvider> = search.clone();

    let gathered = gather_evidence(provider, &queries(&[long_query.as_str(), "steel tariffs 2024"]), 1)
        .await
        .unwrap();

    assert_eq!(
        gathered.notes,
        vec![
            format!("Search failed for query: '{}'", "x".repeat(50)),
            "Evidence gathered for 1 queries.".to_string(),
        ]
    );
    assert_eq!(gathered.value.len(), 1);
}

#[tokio::test]
async fn test_gather_auth_failure_is_fatal() {
    let search = Arc::new(ScriptedSearch::new(vec![weak_hit()]).failing("steel tariffs 2024", Failure::Auth));
    let provider: Arc<dyn SearchProvider> = search.clone();

    let result = gather_evidence(provider, &queries(&["steel tariffs 2024"]), 1).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_gather_keeps_empty_result_sets() {
    let search = Arc::new(ScriptedSearch::empty());
    let provider: Arc<dyn SearchProvider> = search.clone();

    let gathered = gather_evidence(provider, &queries(&["steel tariffs 2024"]), 1)
        .await
        .unwrap();

    assert_eq!(gathered.value.len(), 1);
    assert!(gathered.value[0].response.results.is_empty());
}

#[tokio::test]
async fn test_parallel_gather_matches_sequential_output() {
    let list = queries(&[
        "first query about steel",
        "second query about steel",
        "third query about steel",
    ]);
    let build = || {
        Arc::new(
            ScriptedSearch::new(vec![weak_hit()])
                .with_hits("second query about steel", vec![threshold_hit()])
                .with_hits(
                    "third query about steel",
                    vec![SearchHit::new("https://uni.edu/paper", "A 2025 study", 0.7)],
                )
                .delayed("first query about steel", Duration::from_millis(60))
                .delayed("second query about steel", Duration::from_millis(30)),
        )
    };

    let sequential: Arc<dyn SearchProvider> = build();
    let parallel: Arc<dyn SearchProvider> = build();

    let one = gather_evidence(sequential, &list, 1).await.unwrap();
    let many = gather_evidence(parallel, &list, 3).await.unwrap();

    assert_eq!(one.value, many.value);
    assert_eq!(one.notes, many.notes);
    let order: Vec<&str> = many.value.iter().map(|e| e.query.as_str()).collect();
    assert_eq!(
        order,
        vec![
            "first query about steel",
            "second query about steel",
            "third query about steel",
        ]
    );
}
