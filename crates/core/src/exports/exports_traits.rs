use async_trait::async_trait;

use super::exports_model::ExportStatus;
use crate::errors::Result;

/// Trait for CSV export operations
#[async_trait]
pub trait ExportServiceTrait: Send + Sync {
    /// Builds the quotes CSV in the calling task.
    fn generate_csv(&self) -> Result<Vec<u8>>;
    /// Starts a background export and returns its task id immediately.
    fn start_export(&self) -> Result<String>;
    /// Waits for the task to finish on first read (bounded by the configured
    /// timeout) and serves the cached status afterwards.
    async fn export_status(&self, task_id: &str) -> Result<ExportStatus>;
    /// CSV bytes of a completed task.
    fn export_file(&self, task_id: &str) -> Result<Vec<u8>>;
    /// Drops finished tasks older than the configured TTL.
    fn evict_expired(&self) -> usize;
}
