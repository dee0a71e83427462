//! Upstream payload schemas and the normalized records exposed by the bridge.
//!
//! Every upstream field is optional at every level of nesting. Normalization is
//! a plain `From` conversion: fields are renamed and flattened, never defaulted,
//! so a missing upstream value stays missing in the JSON we hand out.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Upstream (raw) shapes
// ---------------------------------------------------------------------------

/// Response of `GET /printer`.
#[derive(Debug, Default, Deserialize)]
pub struct RawPrinterResponse {
    #[serde(default)]
    pub state: Option<RawPrinterStateText>,
    #[serde(default)]
    pub temperature: Option<RawTemperature>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawPrinterStateText {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawTemperature {
    #[serde(default)]
    pub bed: Option<RawTemperatureReading>,
    #[serde(default)]
    pub tool0: Option<RawTemperatureReading>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawTemperatureReading {
    #[serde(default)]
    pub actual: Option<f64>,
    #[serde(default)]
    pub target: Option<f64>,
}

/// Response of `GET /job`.
#[derive(Debug, Default, Deserialize)]
pub struct RawJobResponse {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub job: Option<RawJob>,
    #[serde(default)]
    pub progress: Option<RawProgress>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawJob {
    #[serde(default)]
    pub file: Option<RawJobFile>,
    #[serde(default, rename = "estimatedPrintTime")]
    pub estimated_print_time: Option<f64>,
    #[serde(default)]
    pub filament: Option<RawFilament>,
}

/// Older firmware reports the job file as a bare name, newer as an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawJobFile {
    Name(String),
    Details {
        #[serde(default)]
        name: Option<String>,
    },
}

impl RawJobFile {
    pub fn into_name(self) -> Option<String> {
        match self {
            RawJobFile::Name(name) => Some(name),
            RawJobFile::Details { name } => name,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawFilament {
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub tool0: Option<RawFilamentUsage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawFilamentUsage {
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
}

impl RawFilament {
    fn length(&self) -> Option<f64> {
        self.length.or_else(|| self.tool0.as_ref().and_then(|t| t.length))
    }

    fn volume(&self) -> Option<f64> {
        self.volume.or_else(|| self.tool0.as_ref().and_then(|t| t.volume))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawProgress {
    #[serde(default)]
    pub completion: Option<f64>,
    #[serde(default, rename = "printTime")]
    pub print_time: Option<f64>,
    #[serde(default, rename = "printTimeLeft")]
    pub print_time_left: Option<f64>,
}

/// Response of `GET /files`.
#[derive(Debug, Default, Deserialize)]
pub struct RawFileList {
    #[serde(default)]
    pub files: Option<Vec<RawFile>>,
}

/// One stored file; also the response of `GET /files/local/{name}`.
#[derive(Debug, Default, Deserialize)]
pub struct RawFile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub refs: Option<RawRefs>,
    #[serde(default, rename = "gcodeAnalysis")]
    pub gcode_analysis: Option<RawGcodeAnalysis>,
    #[serde(default)]
    pub print: Option<RawPrintHistory>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawRefs {
    #[serde(default)]
    pub download: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawGcodeAnalysis {
    #[serde(default, rename = "estimatedPrintTime")]
    pub estimated_print_time: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawPrintHistory {
    #[serde(default)]
    pub failure: Option<u32>,
    #[serde(default)]
    pub success: Option<u32>,
    #[serde(default)]
    pub last: Option<RawLastPrint>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawLastPrint {
    /// Unix timestamp of the last print.
    #[serde(default)]
    pub date: Option<f64>,
    #[serde(default)]
    pub success: Option<bool>,
}

// ---------------------------------------------------------------------------
// Normalized records
// ---------------------------------------------------------------------------

/// Live machine status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bed_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bed_temp_target: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printer_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printer_temp_target: Option<f64>,
}

/// Current or most recent print job. Durations are in seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_current: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_estimate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_remaining: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filament_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filament_volume: Option<f64>,
}

/// One entry of the stored file listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_estimate: Option<f64>,
}

/// One stored file together with its print history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_estimate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    pub stats: FileStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_failure: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_success: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_print: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_print_succeeded: Option<bool>,
}

/// Outcome of a select-and-print command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintCommandResult {
    pub success: bool,
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PrintCommandResult {
    pub fn printed(file: String) -> Self {
        Self { success: true, file, error: None }
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

impl From<RawPrinterResponse> for PrinterState {
    fn from(raw: RawPrinterResponse) -> Self {
        let temperature = raw.temperature.unwrap_or_default();
        let bed = temperature.bed.unwrap_or_default();
        let tool = temperature.tool0.unwrap_or_default();
        Self {
            state: raw.state.and_then(|s| s.text),
            bed_temp: bed.actual,
            bed_temp_target: bed.target,
            printer_temp: tool.actual,
            printer_temp_target: tool.target,
        }
    }
}

impl From<RawJobResponse> for JobState {
    fn from(raw: RawJobResponse) -> Self {
        let job = raw.job.unwrap_or_default();
        let progress = raw.progress.unwrap_or_default();
        let filament = job.filament.unwrap_or_default();
        Self {
            state: raw.state,
            duration_current: progress.print_time,
            duration_estimate: job.estimated_print_time,
            duration_remaining: progress.print_time_left,
            duration_percent: progress.completion,
            file_name: job.file.and_then(RawJobFile::into_name),
            filament_length: filament.length(),
            filament_volume: filament.volume(),
        }
    }
}

impl From<RawFile> for FileSummary {
    fn from(raw: RawFile) -> Self {
        Self {
            file_name: raw.name,
            file_url: raw.refs.and_then(|r| r.download),
            file_size: raw.size,
            duration_estimate: raw.gcode_analysis.and_then(|g| g.estimated_print_time),
        }
    }
}

impl From<RawFile> for FileDetail {
    fn from(raw: RawFile) -> Self {
        let print = raw.print.unwrap_or_default();
        let last = print.last.unwrap_or_default();
        Self {
            file_name: raw.name,
            file_size: raw.size,
            duration_estimate: raw.gcode_analysis.and_then(|g| g.estimated_print_time),
            file_url: raw.refs.and_then(|r| r.download),
            stats: FileStats {
                count_failure: print.failure,
                count_success: print.success,
                last_print: last.date,
                last_print_succeeded: last.success,
            },
        }
    }
}

impl From<RawFileList> for Vec<FileSummary> {
    fn from(raw: RawFileList) -> Self {
        raw.files
            .unwrap_or_default()
            .into_iter()
            .map(FileSummary::from)
            .collect()
    }
}
