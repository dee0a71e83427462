//! Defines the Axum API routes and handlers.
//!
//! Each handler delegates to the upstream client. Failures become responses
//! through [`BridgeError`]'s `IntoResponse`: 422 for missing input, 500 with
//! the failure message for anything the upstream side reports.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Form, FromRequest, Path, Request, State},
    http::header::CONTENT_TYPE,
    routing::{get, post},
};

use crate::error::BridgeError;
use crate::octo::{JobState, PrinterApi};
use crate::web::models::{
    FileListResponse, FileResponse, INVALID_FILENAME, OverviewResponse, PrintFileRequest,
    PrintFileResponse, require_filename,
};

pub type AppState = Arc<dyn PrinterApi>;

/// Creates the Axum router with all the API endpoints.
pub fn create_router(api: AppState) -> Router {
    Router::new()
        .route("/", get(overview))
        .route("/stats", get(job_stats))
        .route("/files", get(list_files))
        .route("/files/", get(missing_filename))
        .route("/files/{filename}", get(file_detail))
        .route("/print_file", post(print_file))
        .with_state(api)
}

/// GET / -- printer state, job state and file listing in one response.
async fn overview(State(api): State<AppState>) -> Result<Json<OverviewResponse>, BridgeError> {
    let (printer_state, job_state, local_files) = tokio::try_join!(
        api.fetch_printer_state(),
        api.fetch_job_state(),
        api.fetch_local_files(),
    )?;
    Ok(Json(OverviewResponse { job_state, printer_state, local_files }))
}

/// GET /stats
async fn job_stats(State(api): State<AppState>) -> Result<Json<JobState>, BridgeError> {
    Ok(Json(api.fetch_job_state().await?))
}

/// GET /files
async fn list_files(State(api): State<AppState>) -> Result<Json<FileListResponse>, BridgeError> {
    let files = api.fetch_local_files().await?;
    Ok(Json(FileListResponse { files }))
}

/// GET /files/ -- an empty filename segment never reaches the upstream client.
async fn missing_filename() -> BridgeError {
    BridgeError::ValidationFailed(INVALID_FILENAME.to_string())
}

/// GET /files/{filename}
async fn file_detail(
    State(api): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<FileResponse>, BridgeError> {
    let filename = require_filename(Some(&filename))?;
    let file = api.fetch_local_file(filename).await?;
    Ok(Json(FileResponse { file }))
}

/// POST /print_file
async fn print_file(
    State(api): State<AppState>,
    payload: PrintFileRequest,
) -> Result<Json<PrintFileResponse>, BridgeError> {
    let filename = require_filename(payload.filename.as_deref())?;
    let result = api.print_file(filename).await?;
    Ok(Json(PrintFileResponse { file: result.file }))
}

/// Accepts the print request as JSON or as an urlencoded form.
impl<S> FromRequest<S> for PrintFileRequest
where
    S: Send + Sync,
{
    type Rejection = BridgeError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        let parsed = if is_form {
            Form::<PrintFileRequest>::from_request(req, state)
                .await
                .map(|Form(body)| body)
                .map_err(|e| e.to_string())
        } else {
            Json::<PrintFileRequest>::from_request(req, state)
                .await
                .map(|Json(body)| body)
                .map_err(|e| e.to_string())
        };

        parsed.map_err(|reason| {
            tracing::debug!("Rejected print request body: {}", reason);
            BridgeError::ValidationFailed(INVALID_FILENAME.to_string())
        })
    }
}
