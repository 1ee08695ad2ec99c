use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, warn};

use super::optimizer::SpawnOutcome;

pub const ARCHIVE_NAME: &str = "optimized.zip";

/// Bundle the successful outputs into a single archive.
///
/// Invocation: `<bin> -0 --junk-paths optimized.zip <outputs...>`, with the
/// working directory set to the output subdirectory. Store-only (`-0`)
/// because the optimizer already compressed the payloads; `--junk-paths`
/// flattens the entries to bare file names.
pub async fn archive_outputs(
    bin: &str,
    output_dir: &Path,
    outputs: &[PathBuf],
) -> SpawnOutcome {
    debug!(
        bin = bin,
        entries = outputs.len(),
        output_dir = %output_dir.display(),
        "Invoking archiver"
    );

    let result = Command::new(bin)
        .arg("-0")
        .arg("--junk-paths")
        .arg(ARCHIVE_NAME)
        .args(outputs)
        .current_dir(output_dir)
        .output()
        .await;

    match result {
        Ok(out) => {
            if !out.status.success() {
                warn!(
                    bin = bin,
                    exit_code = ?out.status.code(),
                    stderr = %String::from_utf8_lossy(&out.stderr).trim(),
                    "Archiver exited with failure"
                );
            }
            SpawnOutcome::Completed(out.status)
        }
        Err(e) => {
            warn!(bin = bin, error = %e, "Failed to start archiver");
            SpawnOutcome::FailedToStart(e)
        }
    }
}
