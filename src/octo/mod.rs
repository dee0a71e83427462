//! Upstream printer API access.
//!
//! [`PrinterApi`] is the capability set the web layer depends on. It has two
//! implementations, chosen once at startup by [`connect`]: [`LiveClient`]
//! talks HTTP to the printer control server, [`MockPrinter`] serves synthetic
//! data so the bridge can run without a printer attached.

pub mod live;
pub mod mock;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{ConfigError, OctoPrintConfig};
use crate::error::{BridgeError, Result};

pub use live::LiveClient;
pub use mock::MockPrinter;
pub use models::{FileDetail, FileStats, FileSummary, JobState, PrintCommandResult, PrinterState};

/// Extension appended to the name stem passed to [`PrinterApi::print_file`].
pub const GCODE_EXTENSION: &str = ".gcode";

/// Upstream path prefix of files stored on the printer host.
pub const LOCAL_FILES_PATH: &str = "/files/local";

/// Upstream path of a locally stored file, e.g. `/files/local/BobRoss.gcode`.
pub fn local_file_path(file_name: &str) -> String {
    format!("{}/{}", LOCAL_FILES_PATH, file_name)
}

#[async_trait]
pub trait PrinterApi: Send + Sync {
    async fn fetch_printer_state(&self) -> Result<PrinterState>;

    async fn fetch_job_state(&self) -> Result<JobState>;

    async fn fetch_local_files(&self) -> Result<Vec<FileSummary>>;

    async fn fetch_local_file(&self, filename: &str) -> Result<FileDetail>;

    /// Send the select-and-print command for a file known to be listed.
    async fn select_and_print(&self, file_name: &str) -> Result<()>;

    /// Print `<name_stem>.gcode` if the printer host has it stored.
    ///
    /// The listing check runs before any command is sent; a missing file fails
    /// with [`BridgeError::FileNotFound`] without touching the command endpoint.
    async fn print_file(&self, name_stem: &str) -> Result<PrintCommandResult> {
        let file_name = format!("{}{}", name_stem, GCODE_EXTENSION);

        let files = self.fetch_local_files().await?;
        if !files
            .iter()
            .any(|f| f.file_name.as_deref() == Some(file_name.as_str()))
        {
            return Err(BridgeError::FileNotFound(file_name));
        }

        self.select_and_print(&file_name).await?;
        let path = local_file_path(&file_name);
        tracing::info!("Print started: {}", path);
        Ok(PrintCommandResult::printed(path))
    }
}

/// Build the upstream client selected by the configuration.
pub fn connect(config: &OctoPrintConfig) -> std::result::Result<Arc<dyn PrinterApi>, ConfigError> {
    if config.mock {
        tracing::info!("Mock mode enabled; upstream at {} will not be contacted", config.url);
        Ok(Arc::new(MockPrinter::new(config.mock_print_window())))
    } else {
        tracing::info!("Upstream printer API: {}", config.url);
        Ok(Arc::new(LiveClient::new(config)?))
    }
}
