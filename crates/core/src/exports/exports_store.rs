//! In-memory registry of export tasks.

use log::debug;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::watch;

use super::exports_model::ExportStatus;
use crate::errors::{ExportError, Result};

enum TaskOutcome {
    Completed(Vec<u8>),
    Failed,
}

impl TaskOutcome {
    fn status(&self) -> ExportStatus {
        match self {
            TaskOutcome::Completed(_) => ExportStatus::Completed,
            TaskOutcome::Failed => ExportStatus::Failed,
        }
    }
}

struct TaskEntry {
    signal: watch::Receiver<ExportStatus>,
    outcome: Option<TaskOutcome>,
    finished_at: Option<Instant>,
}

/// Result of looking a task up without waiting.
pub(crate) enum TaskPoll {
    Finished(ExportStatus),
    /// Still running; the receiver fires once with the terminal status.
    Pending(watch::Receiver<ExportStatus>),
}

/// Write side of a task. Consumed by [`ExportTaskStore::complete`], so a task
/// can only be finished once.
pub struct TaskCompletion {
    task_id: String,
    sender: watch::Sender<ExportStatus>,
}

impl TaskCompletion {
    pub fn task_id(&self) -> &str {
        &self.task_id
    }
}

/// Registry of export tasks shared by request handlers and background units.
///
/// The lock is held only for map access and never across an `.await`.
#[derive(Default)]
pub struct ExportTaskStore {
    tasks: Mutex<HashMap<String, TaskEntry>>,
}

impl ExportTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tasks(&self) -> MutexGuard<'_, HashMap<String, TaskEntry>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds an `InProgress` task and hands back its completion handle.
    pub fn register(&self, task_id: &str) -> TaskCompletion {
        let (sender, signal) = watch::channel(ExportStatus::InProgress);
        self.tasks().insert(
            task_id.to_string(),
            TaskEntry {
                signal,
                outcome: None,
                finished_at: None,
            },
        );
        TaskCompletion {
            task_id: task_id.to_string(),
            sender,
        }
    }

    /// Records the outcome, then wakes every waiter. Callers log the error of
    /// a failed run; only the status is kept. The outcome is stored
    /// before the signal fires so woken readers find it in the map.
    pub fn complete(&self, completion: TaskCompletion, result: Result<Vec<u8>>) -> ExportStatus {
        let outcome = match result {
            Ok(data) => TaskOutcome::Completed(data),
            Err(_) => TaskOutcome::Failed,
        };
        let status = outcome.status();
        {
            let mut tasks = self.tasks();
            match tasks.get_mut(&completion.task_id) {
                Some(entry) => {
                    entry.outcome = Some(outcome);
                    entry.finished_at = Some(Instant::now());
                }
                None => debug!(
                    "Export task {} was evicted before it finished",
                    completion.task_id
                ),
            }
        }
        completion.sender.send_replace(status);
        status
    }

    pub(crate) fn poll(&self, task_id: &str) -> Result<TaskPoll> {
        let tasks = self.tasks();
        let entry = tasks
            .get(task_id)
            .ok_or_else(|| ExportError::TaskNotFound(task_id.to_string()))?;
        Ok(match &entry.outcome {
            Some(outcome) => TaskPoll::Finished(outcome.status()),
            None => TaskPoll::Pending(entry.signal.clone()),
        })
    }

    /// Current status without waiting.
    pub fn status(&self, task_id: &str) -> Result<ExportStatus> {
        Ok(match self.poll(task_id)? {
            TaskPoll::Finished(status) => status,
            TaskPoll::Pending(_) => ExportStatus::InProgress,
        })
    }

    /// Bytes of a completed task.
    pub fn file(&self, task_id: &str) -> Result<Vec<u8>> {
        let tasks = self.tasks();
        let entry = tasks
            .get(task_id)
            .ok_or_else(|| ExportError::TaskNotFound(task_id.to_string()))?;
        match &entry.outcome {
            Some(TaskOutcome::Completed(data)) => Ok(data.clone()),
            other => Err(ExportError::FileNotReady {
                task_id: task_id.to_string(),
                status: other
                    .as_ref()
                    .map_or(ExportStatus::InProgress, TaskOutcome::status)
                    .to_string(),
            }
            .into()),
        }
    }

    /// Drops tasks that finished more than `ttl` ago. Running tasks are kept.
    pub fn evict_expired(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut tasks = self.tasks();
        let before = tasks.len();
        tasks.retain(|_, entry| {
            entry
                .finished_at
                .map_or(true, |finished| now.duration_since(finished) < ttl)
        });
        before - tasks.len()
    }

    pub fn len(&self) -> usize {
        self.tasks().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks().is_empty()
    }
}
