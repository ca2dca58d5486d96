//! Export replay command implementation.
//!
//! The export_replay command:
//! 1. Validates that exactly one trace file was given
//! 2. Opens a GAPIS session
//! 3. Loads the capture
//! 4. Resolves the replay device
//! 5. Asks GAPIS to export the replay instructions and assets
//!
//! The session is closed on every path once it has been opened.

use crate::resolver::{absolute_capture_path, load_capture, resolve_device};
use crate::rpc::{Connect, Gapis};
use crate::session::Session;
use crate::utils::config::{default_export_dir, ConnectionConfig};
use crate::utils::{Context, ExportReplayError};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Arguments for the export_replay command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ExportReplayArgs {
    /// Positional arguments left after flag parsing
    pub traces: Vec<PathBuf>,

    /// How to reach GAPIS and which replay device to prefer
    pub connection: ConnectionConfig,

    /// Where GAPIS should write the exported replay
    pub out: PathBuf,
}

impl Default for ExportReplayArgs {
    fn default() -> Self {
        Self {
            traces: Vec::new(),
            connection: ConnectionConfig::default(),
            out: default_export_dir(),
        }
    }
}

/// How a non-failing invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// GAPIS wrote the replay to `destination`
    Exported { destination: PathBuf },

    /// The invocation was malformed; show the message and usage
    Usage(String),
}

/// Check the positional argument count and return the single trace path.
///
/// `Err` carries the usage message.
pub fn trace_argument(traces: &[PathBuf]) -> Result<&Path, String> {
    match traces {
        [trace] => Ok(trace.as_path()),
        _ => Err(format!(
            "Exactly one gfx trace file expected, got {}",
            traces.len()
        )),
    }
}

/// Execute the export_replay command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// One `ExportReplayError` variant per failing step. A wrong argument count
/// is not an error; it yields `Outcome::Usage` without connecting.
pub fn execute_export_replay<K: Connect>(
    ctx: &Context,
    connector: &K,
    args: &ExportReplayArgs,
) -> Result<Outcome, ExportReplayError> {
    let trace = match trace_argument(&args.traces) {
        Ok(trace) => trace,
        Err(usage) => {
            warn!("{}", usage);
            return Ok(Outcome::Usage(usage));
        }
    };

    let start_time = Instant::now();
    let capture_path = absolute_capture_path(trace);

    info!("Step 1/4: Connecting to GAPIS...");
    let session = Session::open(ctx, connector, &args.connection)
        .map_err(ExportReplayError::Connect)?;

    info!("Step 2/4: Loading capture {}...", capture_path.display());
    let capture =
        load_capture(ctx, &*session, &capture_path).map_err(ExportReplayError::Load)?;

    info!("Step 3/4: Resolving replay device...");
    let device = resolve_device(
        ctx,
        &*session,
        &capture,
        args.connection.gapir_device.as_deref(),
    )
    .map_err(ExportReplayError::Device)?;

    info!("Step 4/4: Exporting replay to {}...", args.out.display());
    session
        .export_replay(ctx, &capture, &device, &args.out)
        .map_err(ExportReplayError::Export)?;

    session.close();

    info!(
        "✓ Replay exported to {} in {:.2}s",
        args.out.display(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(Outcome::Exported {
        destination: args.out.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_argument_single() {
        let traces = vec![PathBuf::from("trace.gfxtrace")];
        assert_eq!(trace_argument(&traces), Ok(Path::new("trace.gfxtrace")));
    }

    #[test]
    fn test_trace_argument_none() {
        assert_eq!(
            trace_argument(&[]),
            Err("Exactly one gfx trace file expected, got 0".to_string())
        );
    }

    #[test]
    fn test_trace_argument_many() {
        let traces = vec![PathBuf::from("a.gfxtrace"), PathBuf::from("b.gfxtrace")];
        assert_eq!(
            trace_argument(&traces),
            Err("Exactly one gfx trace file expected, got 2".to_string())
        );
    }

    #[test]
    fn test_default_args() {
        let args = ExportReplayArgs::default();
        assert!(args.traces.is_empty());
        assert_eq!(args.out, PathBuf::from("replay_export"));
        assert_eq!(args.connection.gapis, "http://localhost:40000");
    }
}
