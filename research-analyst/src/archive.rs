//! SQLite archive of finished research runs
//!
//! Every run the CLI executes is stored with its outcome so it can be listed
//! with `history` and re-rendered with `show` later. Completed runs keep the
//! full [`ResearchTask`] as JSON; failed runs keep the error message.
//!
//! # Database Schema
//!
//! 1. **runs** - one row per run (id, timestamps, question, headline metrics, status)
//! 2. **schema_version** - schema version for migrations

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use research_analyst_sdk::WorkflowStatus;

use crate::research::ResearchTask;

/// Default archive location in the platform data directory
pub fn default_archive_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "research-analyst", "research-analyst") {
        proj_dirs.data_dir().join("runs.db")
    } else {
        PathBuf::from(".research-analyst-runs.db")
    }
}

/// Headline data for one archived run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub id: Uuid,
    pub question: String,
    pub domain: String,
    pub confidence: f64,
    pub iteration: u32,
    pub status: WorkflowStatus,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

/// An archived run with its stored payload
#[derive(Debug, Clone)]
pub struct ArchivedRun {
    pub summary: RunSummary,
    pub task: Option<ResearchTask>,
    pub error: Option<String>,
}

/// Database wrapper for run persistence
pub struct RunArchive {
    conn: Connection,
}

impl RunArchive {
    /// Open (and create if needed) the archive at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        let archive = Self { conn };
        archive.initialize_schema()?;
        Ok(archive)
    }

    /// Create an in-memory archive (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let archive = Self {
            conn: Connection::open_in_memory()?,
        };
        archive.initialize_schema()?;
        Ok(archive)
    }

    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS runs (
                id TEXT PRIMARY KEY,
                question TEXT NOT NULL,
                domain TEXT NOT NULL DEFAULT '',
                confidence REAL NOT NULL DEFAULT 0,
                iteration INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL,
                error TEXT,
                task_json TEXT,
                started_at TEXT NOT NULL,
                finished_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_runs_started_at ON runs(started_at DESC);

            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            INSERT OR IGNORE INTO schema_version (version) VALUES (1);
            "#,
        )?;
        Ok(())
    }

    /// Current schema version
    pub fn schema_version(&self) -> Result<i32> {
        let version: i32 =
            self.conn
                .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
        Ok(version)
    }

    /// Store a finished run and return its id
    pub fn record_completed(&self, task: &ResearchTask, started_at: DateTime<Local>) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let task_json = serde_json::to_string(task)?;

        self.conn.execute(
            r#"
            INSERT INTO runs (
                id, question, domain, confidence, iteration, status,
                error, task_json, started_at, finished_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, ?7, ?8, ?9)
            "#,
            params![
                id.to_string(),
                task.question(),
                task.domain,
                task.confidence,
                task.iteration,
                WorkflowStatus::Completed.as_str(),
                task_json,
                started_at.to_rfc3339(),
                Local::now().to_rfc3339(),
            ],
        )?;

        Ok(id)
    }

    /// Store a run that aborted with `error`
    pub fn record_failed(
        &self,
        question: &str,
        error: &str,
        started_at: DateTime<Local>,
    ) -> Result<Uuid> {
        let id = Uuid::new_v4();

        self.conn.execute(
            r#"
            INSERT INTO runs (id, question, status, error, started_at, finished_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                id.to_string(),
                question,
                WorkflowStatus::Failed.as_str(),
                error,
                started_at.to_rfc3339(),
                Local::now().to_rfc3339(),
            ],
        )?;

        Ok(id)
    }

    /// Most recent runs first
    pub fn list_runs(&self, limit: usize) -> Result<Vec<RunSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, question, domain, confidence, iteration, status, started_at, finished_at
            FROM runs
            ORDER BY started_at DESC, rowid DESC
            LIMIT ?1
            "#,
        )?;

        let runs = stmt
            .query_map(params![limit as i64], map_summary_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(runs)
    }

    /// Look up a run by full id or unique id prefix
    pub fn find_run(&self, id_or_prefix: &str) -> Result<Option<ArchivedRun>> {
        let needle = id_or_prefix.trim().to_lowercase();
        if needle.is_empty() {
            return Err(anyhow!("Run id must not be empty"));
        }

        let mut stmt = self.conn.prepare(
            r#"
            SELECT id FROM runs
            WHERE id LIKE ?1 || '%'
            LIMIT 2
            "#,
        )?;
        let ids = stmt
            .query_map(params![needle], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        match ids.as_slice() {
            [] => Ok(None),
            [id] => self.get_run(id),
            _ => Err(anyhow!("Run id prefix '{}' is ambiguous", id_or_prefix)),
        }
    }

    fn get_run(&self, id: &str) -> Result<Option<ArchivedRun>> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT id, question, domain, confidence, iteration, status, started_at, finished_at,
                       error, task_json
                FROM runs
                WHERE id = ?1
                "#,
                params![id],
                |row| {
                    let summary = map_summary_row(row)?;
                    let error: Option<String> = row.get(8)?;
                    let task_json: Option<String> = row.get(9)?;
                    Ok((summary, error, task_json))
                },
            )
            .optional()?;

        let Some((summary, error, task_json)) = row else {
            return Ok(None);
        };
        let task = task_json
            .map(|json| serde_json::from_str::<ResearchTask>(&json))
            .transpose()?;

        Ok(Some(ArchivedRun {
            summary,
            task,
            error,
        }))
    }
}

fn parse_time(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Map a database row to RunSummary
fn map_summary_row(row: &Row) -> rusqlite::Result<RunSummary> {
    let id_str: String = row.get(0)?;
    let status_str: String = row.get(5)?;
    let started_at_str: String = row.get(6)?;
    let finished_at_str: String = row.get(7)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let status = WorkflowStatus::parse(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            rusqlite::types::Type::Text,
            format!("unknown status: {}", status_str).into(),
        )
    })?;

    Ok(RunSummary {
        id,
        question: row.get(1)?,
        domain: row.get(2)?,
        confidence: row.get(3)?,
        iteration: row.get(4)?,
        status,
        started_at: parse_time(6, &started_at_str)?,
        finished_at: parse_time(7, &finished_at_str)?,
    })
}
