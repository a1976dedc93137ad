//! Export task models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Lifecycle of an export task: `InProgress` moves once to `Completed` or
/// `Failed` and never changes again.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportStatus {
    InProgress,
    Completed,
    Failed,
}

impl ExportStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExportStatus::InProgress)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportStatus::InProgress => "IN_PROGRESS",
            ExportStatus::Completed => "COMPLETED",
            ExportStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task handle returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportTask {
    pub task_id: String,
    pub status: ExportStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportConfig {
    /// How long a finished task stays readable
    pub ttl: Duration,
    /// Upper bound on how long a status read waits for the task to finish.
    /// `None` waits until it does.
    pub status_wait_timeout: Option<Duration>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            status_wait_timeout: None,
        }
    }
}
