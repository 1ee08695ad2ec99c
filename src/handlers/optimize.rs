use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tokio::fs;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{CompressionLevel, UploadedPdf};
use crate::services::{archiver, optimizer, WorkDir, ARCHIVE_NAME};

const FILE_FIELD: &str = "pdf";
const COMPRESSION_FIELD: &str = "compression";
const PDF_CONTENT_TYPE: &str = "application/pdf";
const ZIP_CONTENT_TYPE: &str = "application/zip";

/// POST / — stage the uploads, optimize them in parallel, and respond with a
/// single PDF (one upload) or a zip archive (several).
///
/// The working directory is removed exactly once on every path, success or
/// failure, after the response payload has been read out of it.
pub async fn optimize_handler(
    State(config): State<Arc<Config>>,
    multipart: Multipart,
) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string()[..8].to_string();

    info!(request_id = %request_id, "Starting optimization request");

    let workdir = match WorkDir::create(&config.temp_root).await {
        Ok(workdir) => workdir,
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Could not create working directory");
            return e.into_response();
        }
    };

    let result = process_request(&config, &workdir, multipart, &request_id).await;

    workdir.close().await;

    match result {
        Ok(payload) => {
            info!(
                request_id = %request_id,
                file_name = %payload.file_name,
                bytes = payload.body.len(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Request completed successfully"
            );
            payload.into_response()
        }
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "Request failed");
            e.into_response()
        }
    }
}

/// The fully optimized response payload, read into memory before the working
/// directory is removed.
pub struct OptimizedPayload {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl IntoResponse for OptimizedPayload {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(self.content_type),
        );
        // Responses carry user-uploaded content; intermediaries must never
        // cache them.
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate, proxy-revalidate"),
        );
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
        headers.insert(
            header::HeaderName::from_static("surrogate-control"),
            HeaderValue::from_static("no-store"),
        );

        let disposition = format!("attachment; filename=\"{}\"", self.file_name.replace('"', ""));
        let disposition = HeaderValue::from_str(&disposition)
            .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
        headers.insert(header::CONTENT_DISPOSITION, disposition);

        (StatusCode::OK, headers, self.body).into_response()
    }
}

async fn process_request(
    config: &Config,
    workdir: &WorkDir,
    mut multipart: Multipart,
    request_id: &str,
) -> AppResult<OptimizedPayload> {
    let (uploads, level) = stage_uploads(workdir, &mut multipart).await?;

    if uploads.is_empty() {
        return Err(AppError::NoValidUploads);
    }

    info!(
        request_id = %request_id,
        file_count = uploads.len(),
        profile = level.profile(),
        "Uploads staged"
    );

    let upload_count = uploads.len();
    let output_dir = workdir.create_output_dir().await?;
    let output_paths = plan_output_paths(&output_dir, &uploads);

    // Fan out one optimizer invocation per upload, join on all. A failed
    // invocation excludes that file from the batch instead of aborting it.
    let mut join_set: JoinSet<Option<(usize, String, PathBuf)>> = JoinSet::new();
    for (index, (upload, output_path)) in uploads.into_iter().zip(output_paths).enumerate() {
        let bin = config.optimizer_bin.clone();
        let cwd = workdir.path().to_path_buf();
        let request_id = request_id.to_string();
        join_set.spawn(async move {
            let outcome =
                optimizer::optimize_file(&bin, level, &cwd, &upload.staged_path, &output_path)
                    .await;
            if outcome.succeeded() {
                debug!(
                    request_id = %request_id,
                    file = %upload.original_name,
                    "File optimized"
                );
                Some((index, upload.original_name, output_path))
            } else {
                warn!(
                    request_id = %request_id,
                    file = %upload.original_name,
                    outcome = %outcome.describe(),
                    "Excluding file from batch"
                );
                None
            }
        });
    }

    let mut successes: Vec<(usize, String, PathBuf)> = Vec::new();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(Some(success)) => successes.push(success),
            Ok(None) => {}
            Err(e) => error!(request_id = %request_id, error = %e, "Optimizer task panicked"),
        }
    }
    successes.sort_by_key(|(index, _, _)| *index);

    if successes.is_empty() {
        return Err(AppError::OptimizationFailed);
    }

    // Degenerate batch: a lone upload streams back as a PDF under its
    // original name, skipping the archiver entirely.
    if upload_count == 1 {
        let (_, original_name, output_path) = successes.remove(0);
        let body = fs::read(&output_path).await.map_err(|e| {
            AppError::internal(format!("failed to read optimized file: {}", e))
        })?;
        return Ok(OptimizedPayload {
            file_name: original_name,
            content_type: PDF_CONTENT_TYPE,
            body,
        });
    }

    let outputs: Vec<PathBuf> = successes
        .iter()
        .map(|(_, _, path)| path.clone())
        .collect();
    let outcome = archiver::archive_outputs(&config.archiver_bin, &output_dir, &outputs).await;
    if !outcome.succeeded() {
        return Err(AppError::archiving(outcome.describe()));
    }

    let archive_path = output_dir.join(ARCHIVE_NAME);
    let body = fs::read(&archive_path)
        .await
        .map_err(|e| AppError::archiving(format!("failed to read archive: {}", e)))?;

    Ok(OptimizedPayload {
        file_name: ARCHIVE_NAME.to_string(),
        content_type: ZIP_CONTENT_TYPE,
        body,
    })
}

/// Read the multipart body, staging every accepted `pdf` part and picking up
/// the optional `compression` field. File parts that do not declare a PDF
/// content type are dropped silently, not rejected; unrelated form fields are
/// ignored.
async fn stage_uploads(
    workdir: &WorkDir,
    multipart: &mut Multipart,
) -> AppResult<(Vec<UploadedPdf>, CompressionLevel)> {
    let mut uploads = Vec::new();
    let mut level = CompressionLevel::Default;

    while let Some(field) = multipart.next_field().await.map_err(|e| AppError::Multipart {
        message: e.to_string(),
    })? {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some(FILE_FIELD) if field.file_name().is_some() => {
                let original_name =
                    sanitize_file_name(field.file_name().unwrap_or_default());
                let content_type = field.content_type().map(str::to_string);

                if content_type.as_deref() != Some(PDF_CONTENT_TYPE) {
                    debug!(
                        file = %original_name,
                        content_type = ?content_type,
                        "Dropping non-PDF file part"
                    );
                    continue;
                }

                let data = field.bytes().await.map_err(|e| AppError::Multipart {
                    message: e.to_string(),
                })?;
                if data.is_empty() {
                    debug!(file = %original_name, "Dropping empty file part");
                    continue;
                }

                let staged_path = workdir.stage(uploads.len(), &data).await?;
                uploads.push(UploadedPdf {
                    original_name,
                    staged_path,
                });
            }
            Some(COMPRESSION_FIELD) => {
                let value = field.text().await.map_err(|e| AppError::Multipart {
                    message: e.to_string(),
                })?;
                level = CompressionLevel::parse(Some(value.trim()));
            }
            _ => {}
        }
    }

    Ok((uploads, level))
}

/// Assign each upload its output path before the fan-out. The first
/// occurrence of a name gets the plain name; each later duplicate gains one
/// leading underscore per prior occurrence, so no two invocations can ever
/// target the same path regardless of completion order.
fn plan_output_paths(output_dir: &Path, uploads: &[UploadedPdf]) -> Vec<PathBuf> {
    let mut taken: HashSet<String> = HashSet::new();
    uploads
        .iter()
        .map(|upload| {
            let mut name = upload.original_name.clone();
            while !taken.insert(name.clone()) {
                name.insert(0, '_');
            }
            output_dir.join(name)
        })
        .collect()
}

/// Reduce a client-supplied file name to its final path component, falling
/// back to a fixed name when nothing usable remains.
fn sanitize_file_name(raw: &str) -> String {
    Path::new(raw)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("upload.pdf")
        .to_string()
}
