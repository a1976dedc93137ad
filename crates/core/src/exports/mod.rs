//! CSV exports - synchronous generation and background export tasks.

mod exports_model;
mod exports_service;
mod exports_store;
mod exports_traits;


pub use exports_model::{ExportConfig, ExportStatus, ExportTask};
pub use exports_service::{generate_csv, ExportService};
pub use exports_store::{ExportTaskStore, TaskCompletion};
pub use exports_traits::ExportServiceTrait;
