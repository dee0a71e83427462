//! Integration tests for the web API routes

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt; // for .collect().await
use octo_bridge::error::{BridgeError, Result};
use octo_bridge::octo::{FileDetail, FileStats, FileSummary, JobState, PrinterApi, PrinterState};
use octo_bridge::web::api::create_router;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::util::ServiceExt; // for `oneshot`

/// Canned upstream that counts every call made through it.
#[derive(Default)]
struct StubApi {
    calls: AtomicUsize,
    print_commands: AtomicUsize,
    fail_job: bool,
}

impl StubApi {
    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl PrinterApi for StubApi {
    async fn fetch_printer_state(&self) -> Result<PrinterState> {
        self.hit();
        Ok(PrinterState {
            state: Some("Operational".to_string()),
            bed_temp: Some(60.1),
            ..Default::default()
        })
    }

    async fn fetch_job_state(&self) -> Result<JobState> {
        self.hit();
        if self.fail_job {
            return Err(BridgeError::UpstreamUnavailable("printer offline".to_string()));
        }
        Ok(JobState {
            state: Some("Printing".to_string()),
            duration_current: Some(120.0),
            file_name: Some("BobRoss.gcode".to_string()),
            ..Default::default()
        })
    }

    async fn fetch_local_files(&self) -> Result<Vec<FileSummary>> {
        self.hit();
        Ok(vec![FileSummary {
            file_name: Some("BobRoss.gcode".to_string()),
            file_size: Some(2048),
            ..Default::default()
        }])
    }

    async fn fetch_local_file(&self, filename: &str) -> Result<FileDetail> {
        self.hit();
        if filename != "BobRoss.gcode" {
            return Err(BridgeError::UpstreamUnavailable(format!("404 Not Found for {}", filename)));
        }
        Ok(FileDetail {
            file_name: Some(filename.to_string()),
            stats: FileStats { count_success: Some(3), ..Default::default() },
            ..Default::default()
        })
    }

    async fn select_and_print(&self, _file_name: &str) -> Result<()> {
        self.hit();
        self.print_commands.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

async fn send(stub: Arc<StubApi>, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let app = create_router(stub);
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

fn post_json(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/print_file")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_overview_combines_all_three() {
    let stub = Arc::new(StubApi::default());
    let (status, body) = send(stub.clone(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["printerState"]["state"], "Operational");
    assert_eq!(json["jobState"]["durationCurrent"], 120.0);
    assert_eq!(json["localFiles"][0]["fileName"], "BobRoss.gcode");
    assert_eq!(stub.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_overview_fails_when_any_fetch_fails() {
    let stub = Arc::new(StubApi { fail_job: true, ..Default::default() });
    let (status, body) = send(stub, get("/")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("printer offline"), "unexpected body: {}", text);
}

#[tokio::test]
async fn test_stats_returns_job_state() {
    let stub = Arc::new(StubApi::default());
    let (status, body) = send(stub, get("/stats")).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        json,
        json!({ "state": "Printing", "durationCurrent": 120.0, "fileName": "BobRoss.gcode" })
    );
}

#[tokio::test]
async fn test_stats_failure_is_server_error() {
    let stub = Arc::new(StubApi { fail_job: true, ..Default::default() });
    let (status, body) = send(stub, get("/stats")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(String::from_utf8(body).unwrap(), "Upstream unavailable: printer offline");
}

#[tokio::test]
async fn test_files_wraps_listing() {
    let stub = Arc::new(StubApi::default());
    let (status, body) = send(stub, get("/files")).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, json!({ "files": [{ "fileName": "BobRoss.gcode", "fileSize": 2048 }] }));
}

#[tokio::test]
async fn test_file_detail() {
    let stub = Arc::new(StubApi::default());
    let (status, body) = send(stub, get("/files/BobRoss.gcode")).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["file"]["fileName"], "BobRoss.gcode");
    assert_eq!(json["file"]["stats"]["countSuccess"], 3);
}

#[tokio::test]
async fn test_file_detail_unknown_file() {
    let stub = Arc::new(StubApi::default());
    let (status, body) = send(stub, get("/files/Missing.gcode")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(String::from_utf8(body).unwrap().contains("404 Not Found"));
}

#[tokio::test]
async fn test_file_detail_empty_segment_is_rejected() {
    let stub = Arc::new(StubApi::default());
    for uri in ["/files/", "/files/%20"] {
        let (status, body) = send(stub.clone(), get(uri)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "uri {}", uri);
        assert_eq!(String::from_utf8(body).unwrap(), "Invalid Filename");
    }
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_file_detail_forwards_padded_name_unchanged() {
    let stub = Arc::new(StubApi::default());
    let (status, body) = send(stub.clone(), get("/files/%20BobRoss.gcode%20")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "Upstream unavailable: 404 Not Found for  BobRoss.gcode "
    );
    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_print_file_forwards_padded_name_unchanged() {
    let stub = Arc::new(StubApi::default());
    let (status, body) = send(stub.clone(), post_json(json!({ "filename": "  BobRoss  " }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(String::from_utf8(body).unwrap(), "Local file not found:   BobRoss  .gcode");
    assert_eq!(stub.print_commands.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_print_file_missing_filename() {
    let stub = Arc::new(StubApi::default());
    for payload in [json!({}), json!({ "filename": "" }), json!({ "filename": null })] {
        let (status, body) = send(stub.clone(), post_json(payload)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(String::from_utf8(body).unwrap(), "Invalid Filename");
    }
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_print_file_malformed_body() {
    let stub = Arc::new(StubApi::default());
    let request = Request::builder()
        .method("POST")
        .uri("/print_file")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(stub.clone(), request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_print_file_json() {
    let stub = Arc::new(StubApi::default());
    let (status, body) = send(stub.clone(), post_json(json!({ "filename": "BobRoss" }))).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, json!({ "file": "/files/local/BobRoss.gcode" }));
    assert_eq!(stub.print_commands.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_print_file_form() {
    let stub = Arc::new(StubApi::default());
    let request = Request::builder()
        .method("POST")
        .uri("/print_file")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("filename=BobRoss"))
        .unwrap();
    let (status, body) = send(stub.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["file"], "/files/local/BobRoss.gcode");
}

#[tokio::test]
async fn test_print_file_not_listed() {
    let stub = Arc::new(StubApi::default());
    let (status, body) = send(stub.clone(), post_json(json!({ "filename": "Nope" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(String::from_utf8(body).unwrap(), "Local file not found: Nope.gcode");
    assert_eq!(stub.print_commands.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_app_serves_static_files_and_cors() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>printer</h1>").unwrap();
    let app = octo_bridge::web::app(Arc::new(StubApi::default()), Some(dir.path()));

    let response = app.clone().oneshot(get("/index.html")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["cache-control"], "public, max-age=31557600");
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"<h1>printer</h1>");

    let request = Request::builder()
        .uri("/files")
        .header("origin", "http://dashboard.local")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert!(response.headers().get("cache-control").is_none());
}
