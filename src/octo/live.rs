//! HTTP client for the printer control server.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use super::models::{RawFile, RawFileList, RawJobResponse, RawPrinterResponse};
use super::{FileDetail, FileSummary, JobState, LOCAL_FILES_PATH, PrinterApi, PrinterState};
use crate::config::{ConfigError, OctoPrintConfig};
use crate::error::{BridgeError, Result};

const API_KEY_HEADER: &str = "x-api-key";

/// Talks to one upstream printer API. Every request carries the API key.
pub struct LiveClient {
    base_url: String,
    client: Client,
}

impl LiveClient {
    pub fn new(config: &OctoPrintConfig) -> std::result::Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| ConfigError::Invalid("octoprint.api_key is not a valid header value".to_string()))?;
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::Invalid(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn file_url(&self, filename: &str) -> String {
        self.url(&format!("{}/{}", LOCAL_FILES_PATH, urlencoding::encode(filename)))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        tracing::debug!("GET {}", url);
        let resp = self.client.get(&url).send().await?.error_for_status()?;
        let value = resp.json::<T>().await?;
        Ok(value)
    }
}

#[async_trait]
impl PrinterApi for LiveClient {
    async fn fetch_printer_state(&self) -> Result<PrinterState> {
        let raw: RawPrinterResponse = self.get_json(self.url("/printer")).await?;
        Ok(raw.into())
    }

    async fn fetch_job_state(&self) -> Result<JobState> {
        let raw: RawJobResponse = self.get_json(self.url("/job")).await?;
        Ok(raw.into())
    }

    async fn fetch_local_files(&self) -> Result<Vec<FileSummary>> {
        let raw: RawFileList = self.get_json(self.url("/files")).await?;
        Ok(raw.into())
    }

    async fn fetch_local_file(&self, filename: &str) -> Result<FileDetail> {
        let raw: RawFile = self.get_json(self.file_url(filename)).await?;
        Ok(raw.into())
    }

    async fn select_and_print(&self, file_name: &str) -> Result<()> {
        let url = self.file_url(file_name);
        tracing::debug!("POST {} (select + print)", url);
        let resp = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "command": "select", "print": true }))
            .send()
            .await?;

        match resp.status() {
            StatusCode::NO_CONTENT => Ok(()),
            status => {
                tracing::warn!("Print command for {} rejected with {}", file_name, status);
                Err(BridgeError::PrintCommandFailed(status.as_u16()))
            }
        }
    }
}
