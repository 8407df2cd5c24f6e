//! Bridge between the UI thread and the tokio backend worker.

pub mod commands;
pub mod runtime;
