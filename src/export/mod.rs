//! Periodic shipping of the record store to the administrator.

pub mod task;

pub use task::{ExportHandle, ExportOutcome, ExportTask};
