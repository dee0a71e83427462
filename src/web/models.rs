//! Contains the data models for API requests and responses.

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;
use crate::octo::{FileDetail, FileSummary, JobState, PrinterState};

/// Response body of `GET /`.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OverviewResponse {
    pub job_state: JobState,
    pub printer_state: PrinterState,
    pub local_files: Vec<FileSummary>,
}

/// Response body of `GET /files`.
#[derive(Serialize, Deserialize, Debug)]
pub struct FileListResponse {
    pub files: Vec<FileSummary>,
}

/// Response body of `GET /files/{filename}`.
#[derive(Serialize, Deserialize, Debug)]
pub struct FileResponse {
    pub file: FileDetail,
}

/// Response body of `POST /print_file`: the upstream path of the file now printing.
#[derive(Serialize, Deserialize, Debug)]
pub struct PrintFileResponse {
    pub file: String,
}

/// Represents a request to print a stored file, by name stem (no `.gcode`).
#[derive(Deserialize, Debug, Default)]
pub struct PrintFileRequest {
    #[serde(default)]
    pub filename: Option<String>,
}

pub const INVALID_FILENAME: &str = "Invalid Filename";

/// Returns the filename as given, or a validation failure when it is missing or blank.
pub fn require_filename(filename: Option<&str>) -> Result<&str, BridgeError> {
    match filename {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(BridgeError::ValidationFailed(INVALID_FILENAME.to_string())),
    }
}
