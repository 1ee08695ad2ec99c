use std::path::Path;
use std::process::ExitStatus;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::models::CompressionLevel;

/// Result of one external invocation.
///
/// A failed launch and a non-zero exit are distinct for logging purposes,
/// but both mean "no usable output" to the caller.
#[derive(Debug)]
pub enum SpawnOutcome {
    Completed(ExitStatus),
    FailedToStart(std::io::Error),
}

impl SpawnOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, SpawnOutcome::Completed(status) if status.success())
    }

    pub fn describe(&self) -> String {
        match self {
            SpawnOutcome::Completed(status) => match status.code() {
                Some(code) => format!("process exited with code {}", code),
                None => "process terminated by signal".to_string(),
            },
            SpawnOutcome::FailedToStart(e) => format!("process could not be started: {}", e),
        }
    }
}

/// Run the external optimizer over one staged upload.
///
/// Invocation: `<bin> -dBATCH -dNOPAUSE -dCompressFonts=true
/// -dPDFSETTINGS=/<profile> <input> <output>`, with the working directory set
/// to the request's staging area. Success means a zero exit status.
pub async fn optimize_file(
    bin: &str,
    level: CompressionLevel,
    workdir: &Path,
    input: &Path,
    output: &Path,
) -> SpawnOutcome {
    debug!(
        bin = bin,
        profile = level.profile(),
        input = %input.display(),
        output = %output.display(),
        "Invoking optimizer"
    );

    let result = Command::new(bin)
        .arg("-dBATCH")
        .arg("-dNOPAUSE")
        .arg("-dCompressFonts=true")
        .arg(format!("-dPDFSETTINGS=/{}", level.profile()))
        .arg(input)
        .arg(output)
        .current_dir(workdir)
        .output()
        .await;

    match result {
        Ok(out) => {
            if !out.status.success() {
                warn!(
                    bin = bin,
                    exit_code = ?out.status.code(),
                    stderr = %String::from_utf8_lossy(&out.stderr).trim(),
                    "Optimizer exited with failure"
                );
            }
            SpawnOutcome::Completed(out.status)
        }
        Err(e) => {
            warn!(bin = bin, error = %e, "Failed to start optimizer");
            SpawnOutcome::FailedToStart(e)
        }
    }
}
