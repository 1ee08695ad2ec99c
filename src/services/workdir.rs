use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub const DIR_PREFIX: &str = "pdf-optimizer";
pub const OUTPUT_SUBDIR: &str = "optimized";

/// Temporary directory exclusively owned by one request.
///
/// Created before any upload is written; removed exactly once via [`close`]
/// after the response payload has been read out of it. Collision resistance
/// across concurrent requests comes from the uuid in the name, so no locking
/// is needed. The `Drop` impl is a safety net for panics and early returns;
/// on the normal path `close` runs first and `Drop` does nothing.
///
/// [`close`]: WorkDir::close
pub struct WorkDir {
    path: PathBuf,
    closed: bool,
}

impl WorkDir {
    pub async fn create(temp_root: &Path) -> AppResult<Self> {
        let path = temp_root.join(format!("{}-{}", DIR_PREFIX, Uuid::new_v4()));
        fs::create_dir_all(&path).await.map_err(|e| {
            AppError::staging(format!("failed to create working directory: {}", e))
        })?;
        debug!(workdir = %path.display(), "Created working directory");
        Ok(Self {
            path,
            closed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the subdirectory that receives per-file outputs and the archive.
    pub async fn create_output_dir(&self) -> AppResult<PathBuf> {
        let output_dir = self.path.join(OUTPUT_SUBDIR);
        fs::create_dir_all(&output_dir).await.map_err(|e| {
            AppError::staging(format!("failed to create output directory: {}", e))
        })?;
        Ok(output_dir)
    }

    /// Write one upload's bytes into the directory. Staged files use
    /// positional names so hostile client-supplied names never reach the
    /// filesystem at this stage.
    pub async fn stage(&self, index: usize, content: &[u8]) -> AppResult<PathBuf> {
        let staged = self.path.join(format!("upload-{}.pdf", index));
        fs::write(&staged, content)
            .await
            .map_err(|e| AppError::staging(format!("failed to stage upload: {}", e)))?;
        Ok(staged)
    }

    /// Remove the directory tree. Best effort: the response outcome is
    /// already decided, so a removal failure is logged and swallowed.
    pub async fn close(mut self) {
        self.closed = true;
        match fs::remove_dir_all(&self.path).await {
            Ok(()) => debug!(workdir = %self.path.display(), "Removed working directory"),
            Err(e) => warn!(
                workdir = %self.path.display(),
                error = %e,
                "Failed to remove working directory"
            ),
        }
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        if !self.closed {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}
