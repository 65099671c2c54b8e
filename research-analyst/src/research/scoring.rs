//! Evidence scoring and confidence evaluation
//!
//! Scoring blends the backend's relevance with a credibility heuristic:
//!
//! | signal                                         | bonus |
//! |------------------------------------------------|-------|
//! | URL contains `.gov` or `.edu`                  | 0.3   |
//! | content mentions 2023, 2024 or 2025            | 0.2   |
//! | content mentions data/benchmark/report/study   | 0.2   |
//! | content longer than 300 characters             | 0.2   |
//!
//! The heuristic is capped at 1.0 and combined as
//! `final = round3(0.6 * relevance + 0.4 * heuristic)`. Relevance is taken
//! as returned by the backend, so `final` exceeds 1.0 only if relevance does.

use std::cmp::Ordering;

use crate::backends::SearchHit;
use crate::research::types::{RawEvidence, ScoredItem};

pub const RELEVANCE_WEIGHT: f64 = 0.6;
pub const HEURISTIC_WEIGHT: f64 = 0.4;

const CREDIBLE_DOMAINS: [&str; 2] = [".gov", ".edu"];
const RECENT_YEARS: [&str; 3] = ["2023", "2024", "2025"];
const DATA_KEYWORDS: [&str; 4] = ["data", "benchmark", "report", "study"];
const LONG_CONTENT_CHARS: usize = 300;

// Bonuses are counted in tenths so 0.3 + 0.2 + 0.2 + 0.2 is exactly 0.9.
const DOMAIN_BONUS: u32 = 3;
const RECENCY_BONUS: u32 = 2;
const DATA_BONUS: u32 = 2;
const LENGTH_BONUS: u32 = 2;
const MAX_TENTHS: u32 = 10;

/// Round to 3 decimal places.
///
/// Works on the exact decimal expansion, so ties go to the even digit
/// (0.0625 -> 0.062) and 1.0005, stored just below the tie, goes down.
pub fn round3(value: f64) -> f64 {
    format!("{:.3}", value).parse().unwrap_or(value)
}

/// Credibility heuristic for a single hit, in `[0.0, 1.0]`
pub fn heuristic_score(url: &str, content: &str) -> f64 {
    let mut tenths = 0;

    if CREDIBLE_DOMAINS.iter().any(|marker| url.contains(marker)) {
        tenths += DOMAIN_BONUS;
    }
    if RECENT_YEARS.iter().any(|year| content.contains(year)) {
        tenths += RECENCY_BONUS;
    }
    let lowered = content.to_lowercase();
    if DATA_KEYWORDS.iter().any(|word| lowered.contains(word)) {
        tenths += DATA_BONUS;
    }
    if content.chars().count() > LONG_CONTENT_CHARS {
        tenths += LENGTH_BONUS;
    }

    f64::from(tenths.min(MAX_TENTHS)) / 10.0
}

/// Blend backend relevance with a heuristic score
pub fn final_score(relevance: f64, heuristic: f64) -> f64 {
    round3(RELEVANCE_WEIGHT * relevance + HEURISTIC_WEIGHT * heuristic)
}

fn score_hit(query: &str, hit: &SearchHit) -> ScoredItem {
    let heuristic = heuristic_score(&hit.url, &hit.content);
    ScoredItem {
        query: query.to_string(),
        url: hit.url.clone(),
        final_score: final_score(hit.score, heuristic),
        tavily_relevance: hit.score,
        heuristic_score: heuristic,
    }
}

/// Flatten gathered responses into scored items, one per hit, in input order
pub fn score_evidence(raw: &[RawEvidence]) -> Vec<ScoredItem> {
    raw.iter()
        .flat_map(|evidence| {
            evidence
                .response
                .results
                .iter()
                .map(move |hit| score_hit(&evidence.query, hit))
        })
        .collect()
}

/// Mean final score rounded to 3 places; 0.0 when there is no evidence
pub fn evaluate_confidence(scored: &[ScoredItem]) -> f64 {
    if scored.is_empty() {
        return 0.0;
    }
    let total: f64 = scored.iter().map(|item| item.final_score).sum();
    round3(total / scored.len() as f64)
}

/// The `limit` best items by final score. Ties keep their original order.
pub fn top_ranked(scored: &[ScoredItem], limit: usize) -> Vec<&ScoredItem> {
    let mut ranked: Vec<&ScoredItem> = scored.iter().collect();
    ranked.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(limit);
    ranked
}
