//! Data structures for research runs

use serde::{Deserialize, Serialize};

use crate::backends::SearchResponse;

/// Search response for one query, as collected by the gatherer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvidence {
    pub query: String,
    pub response: SearchResponse,
}

/// One ranked evidence record derived from a single search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    /// Query that produced this hit
    pub query: String,
    /// May be empty when the backend omits it
    pub url: String,
    pub final_score: f64,
    /// Backend relevance, kept as returned
    pub tavily_relevance: f64,
    pub heuristic_score: f64,
}

/// Parsed output of the query planner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchPlan {
    pub domain: String,
    pub strategy: String,
    pub queries: Vec<String>,
}

/// A component result plus the audit lines it wants appended
#[derive(Debug, Clone, PartialEq)]
pub struct Logged<T> {
    pub value: T,
    pub notes: Vec<String>,
}

impl<T> Logged<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            notes: Vec::new(),
        }
    }

    pub fn note(mut self, line: impl Into<String>) -> Self {
        self.notes.push(line.into());
        self
    }
}

/// Full state of one research run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchTask {
    question: String,
    pub domain: String,
    pub strategy: String,
    pub queries: Vec<String>,
    pub raw_evidence: Vec<RawEvidence>,
    pub scored_evidence: Vec<ScoredItem>,
    pub confidence: f64,
    pub confidence_history: Vec<f64>,
    pub iteration: u32,
    pub conflicts: String,
    pub report: String,
    /// Audit trail; never consulted for control decisions
    pub log: Vec<String>,
}

impl ResearchTask {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            domain: String::new(),
            strategy: String::new(),
            queries: Vec::new(),
            raw_evidence: Vec::new(),
            scored_evidence: Vec::new(),
            confidence: 0.0,
            confidence_history: Vec::new(),
            iteration: 0,
            conflicts: String::new(),
            report: String::new(),
            log: Vec::new(),
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// Append one line to the audit trail
    pub fn note(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
    }

    /// Take ownership of a component result, appending its audit lines
    pub fn absorb<T>(&mut self, logged: Logged<T>) -> T {
        self.log.extend(logged.notes);
        logged.value
    }

    /// Record a freshly evaluated confidence
    pub fn record_confidence(&mut self, confidence: f64) {
        self.confidence = confidence;
        self.confidence_history.push(confidence);
        self.note(format!("Confidence evaluated: {}", confidence));
    }

    /// Scored evidence ordered by final score, highest first
    pub fn ranked_evidence(&self) -> Vec<&ScoredItem> {
        crate::research::scoring::top_ranked(&self.scored_evidence, self.scored_evidence.len())
    }
}
