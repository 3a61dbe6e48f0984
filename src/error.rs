//! Error types for the planner, tracker and store

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the persistence layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database file {path} is corrupt: {source}")]
    CorruptState {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize database: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced to the presentation layer
#[derive(Debug, Error)]
pub enum GuardianError {
    #[error("Deadline {deadline} must be after {today}")]
    InvalidDeadline { deadline: NaiveDate, today: NaiveDate },

    #[error("Unknown category '{0}' (expected presentation, essay, exam-prep or short-assignment)")]
    InvalidCategory(String),

    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Username must not be empty")]
    InvalidUsername,

    #[error("Task {0} not found")]
    TaskNotFound(usize),

    #[error("Step {step} not found in task {task}")]
    StepNotFound { task: usize, step: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T, E = GuardianError> = std::result::Result<T, E>;
