// src/octo/mock.rs - Synthetic printer for running without hardware
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rand::Rng;

use super::{FileDetail, FileStats, FileSummary, JobState, PrinterApi, PrinterState, local_file_path};
use crate::error::{BridgeError, Result};

/// How far into the job the mock print already is when the process starts.
const HEAD_START: Duration = Duration::from_secs(600);
const DOWNLOAD_BASE: &str = "http://octoprint.mock/downloads";

const BED_TARGET: f64 = 60.0;
const TOOL_TARGET: f64 = 210.0;

struct MockFile {
    name: &'static str,
    size: u64,
    estimate: f64,
    failures: u32,
    successes: u32,
    last_date: Option<f64>,
    last_success: Option<bool>,
}

const MOCK_FILES: &[MockFile] = &[
    MockFile {
        name: "BobRoss.gcode",
        size: 2_457_600,
        estimate: 7200.0,
        failures: 1,
        successes: 3,
        last_date: Some(1_565_000_000.0),
        last_success: Some(true),
    },
    MockFile {
        name: "Benchy.gcode",
        size: 1_843_200,
        estimate: 5400.0,
        failures: 0,
        successes: 12,
        last_date: Some(1_564_900_000.0),
        last_success: Some(true),
    },
    MockFile {
        name: "CalibrationCube.gcode",
        size: 409_600,
        estimate: 1500.0,
        failures: 2,
        successes: 0,
        last_date: Some(1_564_800_000.0),
        last_success: Some(false),
    },
];

const MOCK_JOB_FILE: &str = "BobRoss.gcode";

impl MockFile {
    fn download_url(&self) -> String {
        format!("{}{}", DOWNLOAD_BASE, local_file_path(self.name))
    }
}

/// Serves canned files and a job that advances with wall-clock time.
///
/// The job clock starts when the mock is built, which happens once at startup,
/// so elapsed, remaining and percent stay consistent across calls.
pub struct MockPrinter {
    started: Instant,
    print_window: Duration,
}

impl MockPrinter {
    pub fn new(print_window: Duration) -> Self {
        Self::with_start(Instant::now(), print_window)
    }

    pub fn with_start(started: Instant, print_window: Duration) -> Self {
        Self { started, print_window }
    }

    fn head_start(&self) -> Duration {
        HEAD_START.min(self.print_window / 2)
    }

    /// Seconds into the job at `now`, clamped to the print window.
    fn progress_at(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started);
        (self.head_start() + elapsed)
            .as_secs_f64()
            .min(self.print_window.as_secs_f64())
    }

    fn state_label_at(&self, now: Instant) -> String {
        let printing = self.progress_at(now) < self.print_window.as_secs_f64();
        if printing { "Printing" } else { "Operational" }.to_string()
    }

    /// Printer state as observed at `now`. Temperatures are jittered on every call.
    pub fn printer_state_at(&self, now: Instant) -> PrinterState {
        PrinterState {
            state: Some(self.state_label_at(now)),
            bed_temp: Some(jitter(BED_TARGET, 0.5)),
            bed_temp_target: Some(BED_TARGET),
            printer_temp: Some(jitter(TOOL_TARGET, 1.5)),
            printer_temp_target: Some(TOOL_TARGET),
        }
    }

    /// Job state as observed at `now`.
    pub fn job_state_at(&self, now: Instant) -> JobState {
        let window = self.print_window.as_secs_f64();
        let current = self.progress_at(now);

        JobState {
            state: Some(self.state_label_at(now)),
            duration_current: Some(current),
            duration_estimate: Some(window),
            duration_remaining: Some(window - current),
            duration_percent: Some(current / window),
            file_name: Some(MOCK_JOB_FILE.to_string()),
            filament_length: Some(4210.7),
            filament_volume: Some(10.13),
        }
    }

    fn find(filename: &str) -> Option<&'static MockFile> {
        MOCK_FILES.iter().find(|f| f.name == filename)
    }
}

fn jitter(target: f64, spread: f64) -> f64 {
    let reading = target + rand::rng().random_range(-spread..=spread);
    (reading * 10.0).round() / 10.0
}

#[async_trait]
impl PrinterApi for MockPrinter {
    async fn fetch_printer_state(&self) -> Result<PrinterState> {
        Ok(self.printer_state_at(Instant::now()))
    }

    async fn fetch_job_state(&self) -> Result<JobState> {
        Ok(self.job_state_at(Instant::now()))
    }

    async fn fetch_local_files(&self) -> Result<Vec<FileSummary>> {
        Ok(MOCK_FILES
            .iter()
            .map(|f| FileSummary {
                file_name: Some(f.name.to_string()),
                file_url: Some(f.download_url()),
                file_size: Some(f.size),
                duration_estimate: Some(f.estimate),
            })
            .collect())
    }

    async fn fetch_local_file(&self, filename: &str) -> Result<FileDetail> {
        let file = Self::find(filename).ok_or_else(|| {
            BridgeError::UpstreamUnavailable(format!(
                "HTTP status client error (404 Not Found) for {}",
                local_file_path(filename)
            ))
        })?;
        Ok(FileDetail {
            file_name: Some(file.name.to_string()),
            file_size: Some(file.size),
            duration_estimate: Some(file.estimate),
            file_url: Some(file.download_url()),
            stats: FileStats {
                count_failure: Some(file.failures),
                count_success: Some(file.successes),
                last_print: file.last_date,
                last_print_succeeded: file.last_success,
            },
        })
    }

    async fn select_and_print(&self, file_name: &str) -> Result<()> {
        tracing::info!("Mock print command accepted for {}", file_name);
        Ok(())
    }
}
