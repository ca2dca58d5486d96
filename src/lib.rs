//! gapit
//!
//! Command-line client for the GAPIS graphics debugging service.
//!
//! The `export_replay` verb loads a recorded graphics trace into GAPIS,
//! picks a replay device, and has GAPIS write the replay instruction
//! stream and its assets to a directory.
//!
//! ```bash
//! gapit export_replay --gapis http://localhost:40000 --out replay_export trace.gfxtrace
//! ```

pub mod commands;
pub mod resolver;
pub mod rpc;
pub mod session;
pub mod utils;
