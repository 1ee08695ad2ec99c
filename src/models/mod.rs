use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Quality profile handed to the optimizer's `-dPDFSETTINGS` flag.
///
/// Parsing is total: unrecognized or absent client input falls back to
/// `Default` instead of erroring, so a malformed form value can never fail a
/// request on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    Best,
    Medium,
    Low,
    Default,
}

impl CompressionLevel {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("best") => CompressionLevel::Best,
            Some("medium") => CompressionLevel::Medium,
            Some("low") => CompressionLevel::Low,
            _ => CompressionLevel::Default,
        }
    }

    /// Ghostscript quality profile name, without the leading slash.
    pub fn profile(self) -> &'static str {
        match self {
            CompressionLevel::Best => "screen",
            CompressionLevel::Medium => "printer",
            CompressionLevel::Low => "prepress",
            CompressionLevel::Default => "default",
        }
    }
}

/// One accepted file part, staged to disk inside the request's working
/// directory. The client-supplied name is kept only for output naming and
/// the download response; the staged file itself uses a positional name.
#[derive(Debug, Clone)]
pub struct UploadedPdf {
    pub original_name: String,
    pub staged_path: PathBuf,
}

/// JSON envelope returned for every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub request_id: String,
    pub timestamp: String,
}
