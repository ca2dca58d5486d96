//! Turns the trace-file argument into a server-side capture handle.

use crate::rpc::{CaptureRef, Gapis};
use crate::utils::{Context, GapisError};
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Resolve `raw` to an absolute path.
///
/// A path that cannot be resolved (usually a missing file) is only logged;
/// the raw argument is returned so that loading surfaces the real error.
pub fn absolute_capture_path(raw: &Path) -> PathBuf {
    match std::fs::canonicalize(raw) {
        Ok(path) => {
            debug!("Resolved capture path: {}", path.display());
            path
        }
        Err(e) => {
            warn!("Could not find capture file: {} ({})", raw.display(), e);
            raw.to_path_buf()
        }
    }
}

/// Load the capture at `path` through `gapis`
pub fn load_capture<G: Gapis + ?Sized>(
    ctx: &Context,
    gapis: &G,
    path: &Path,
) -> Result<CaptureRef, GapisError> {
    gapis.load_capture(ctx, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_existing_file_becomes_absolute() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "trace").unwrap();

        let resolved = absolute_capture_path(file.path());

        assert!(resolved.is_absolute());
        assert_eq!(resolved, std::fs::canonicalize(file.path()).unwrap());
    }

    #[test]
    fn test_missing_file_falls_back_to_argument() {
        let raw = Path::new("definitely/not/here/missing.gfxtrace");
        assert_eq!(absolute_capture_path(raw), raw.to_path_buf());
    }
}
