//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the library components to perform user tasks.

pub mod export_replay;

// Re-export main command functions
pub use export_replay::{execute_export_replay, trace_argument, ExportReplayArgs, Outcome};
