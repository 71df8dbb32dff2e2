//! End-to-end HTTP tests
//!
//! A shell script stands in for `soffice`: it checks the argument layout
//! (per-job profile first), then writes `%PDF-1.4` followed by the input
//! bytes to `<outdir>/<input name>.pdf`. Inputs containing `FAIL` make it exit 1,
//! inputs containing `SILENT` make it exit 0 without output.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use axum::http::{Method, StatusCode};
use axum_test::TestServer;
use pdf_converter_server::config::Config;
use pdf_converter_server::{build_router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;

const FAKE_SOFFICE: &str = r#"#!/bin/sh
case "$1" in
    -env:UserInstallation=file://*) shift ;;
    *) echo "expected per-job profile" >&2; exit 2 ;;
esac
[ "$1" = "--headless" ] || { echo "expected --headless" >&2; exit 2; }
[ "$2" = "--convert-to" ] || { echo "expected --convert-to" >&2; exit 2; }
[ "$3" = "pdf:writer_pdf_Export:ExportFonts=1" ] || { echo "bad filter $3" >&2; exit 2; }
[ "$5" = "--outdir" ] || { echo "expected --outdir" >&2; exit 2; }
input="$4"
outdir="$6"
if grep -q FAIL "$input"; then
    echo "Error: source file could not be loaded" >&2
    exit 1
fi
if grep -q SILENT "$input"; then
    exit 0
fi
{ printf '%%PDF-1.4\n'; cat "$input"; } > "$outdir/$(basename "$input").pdf"
"#;

/// Written once so no test forks while another still holds the script open.
fn fake_soffice() -> &'static Path {
    static SCRIPT: OnceLock<(TempDir, PathBuf)> = OnceLock::new();
    let (_, path) = SCRIPT.get_or_init(|| {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("soffice");
        fs::write(&path, FAKE_SOFFICE).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        (dir, path)
    });
    path
}

fn test_server(scratch: &Path, configure: impl FnOnce(&mut Config)) -> TestServer {
    let mut config = Config::default();
    config.converter.program = fake_soffice().to_string_lossy().into_owned();
    config.converter.scratch_dir = scratch.to_path_buf();
    configure(&mut config);

    TestServer::new(build_router(AppState::new(config))).unwrap()
}

fn scratch_entries(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect()
}

#[tokio::test]
async fn test_liveness() {
    let scratch = TempDir::new().unwrap();
    let server = test_server(scratch.path(), |_| {});

    let response = server.get("/").await;
    response.assert_status_ok();
    assert!(response.as_bytes().is_empty());

    let response = server.method(Method::HEAD, "/").await;
    response.assert_status_ok();
    assert!(response.as_bytes().is_empty());

    assert!(scratch_entries(scratch.path()).is_empty());
}

#[tokio::test]
async fn test_convert_document() {
    let scratch = TempDir::new().unwrap();
    let server = test_server(scratch.path(), |_| {});

    let response = server
        .post("/convert")
        .bytes("Quarterly report\n".as_bytes().into())
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header("content-type"),
        "application/octet-stream"
    );
    assert_eq!(response.as_bytes().as_ref(), b"%PDF-1.4\nQuarterly report\n");
    assert!(scratch_entries(scratch.path()).is_empty());
}

#[tokio::test]
async fn test_empty_body_rejected() {
    let scratch = TempDir::new().unwrap();
    let server = test_server(scratch.path(), |_| {});

    let response = server.post("/convert").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({"message": "No request body found."}));
    assert!(scratch_entries(scratch.path()).is_empty());
}

#[tokio::test]
async fn test_converter_exit_failure() {
    let scratch = TempDir::new().unwrap();
    let server = test_server(scratch.path(), |_| {});

    let response = server.post("/convert").bytes("FAIL".as_bytes().into()).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({"message": "The input data could not be converted to PDF."})
    );
    assert!(scratch_entries(scratch.path()).is_empty());
}

#[tokio::test]
async fn test_converter_missing_output() {
    let scratch = TempDir::new().unwrap();
    let server = test_server(scratch.path(), |_| {});

    let response = server.post("/convert").bytes("SILENT".as_bytes().into()).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({"message": "The input data could not be converted to PDF."})
    );
    assert!(scratch_entries(scratch.path()).is_empty());
}

#[tokio::test]
async fn test_missing_converter_is_internal_error() {
    let scratch = TempDir::new().unwrap();
    let server = test_server(scratch.path(), |config| {
        config.converter.program = "/nonexistent/program/soffice".to_string();
    });

    let response = server.post("/convert").bytes("document".as_bytes().into()).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert_eq!(body["message"], "An internal server error was encountered");
    assert!(body["context"]
        .as_str()
        .unwrap()
        .contains("/nonexistent/program/soffice"));
    assert!(scratch_entries(scratch.path()).is_empty());
}

#[tokio::test]
async fn test_error_context_can_be_hidden() {
    let scratch = TempDir::new().unwrap();
    let server = test_server(scratch.path(), |config| {
        config.converter.program = "/nonexistent/program/soffice".to_string();
        config.server.expose_error_context = false;
    });

    let response = server.post("/convert").bytes("document".as_bytes().into()).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({"message": "An internal server error was encountered"})
    );
}

#[tokio::test]
async fn test_unwritable_scratch_dir_is_internal_error() {
    let scratch = TempDir::new().unwrap();
    let missing = scratch.path().join("gone");
    let server = test_server(&missing, |_| {});

    let response = server.post("/convert").bytes("document".as_bytes().into()).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert_eq!(body["message"], "An internal server error was encountered");
    assert!(body["context"].as_str().unwrap().contains("stage"));
}

#[tokio::test]
async fn test_body_limit() {
    let scratch = TempDir::new().unwrap();
    let server = test_server(scratch.path(), |config| {
        config.server.max_body_bytes = 16;
    });

    let response = server
        .post("/convert")
        .bytes(vec![b'x'; 64].into())
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert!(scratch_entries(scratch.path()).is_empty());
}

#[tokio::test]
async fn test_concurrent_conversions() {
    use std::future::IntoFuture;

    let scratch = TempDir::new().unwrap();
    let server = test_server(scratch.path(), |_| {});

    let bodies: Vec<String> = (0..10)
        .map(|i| format!("payload for request {:02}\n", i))
        .collect();

    let requests = bodies.iter().map(|body| {
        server
            .post("/convert")
            .bytes(body.clone().into_bytes().into())
            .into_future()
    });
    let responses = futures::future::join_all(requests).await;

    for (body, response) in bodies.iter().zip(responses) {
        response.assert_status_ok();
        let expected = format!("%PDF-1.4\n{}", body);
        assert_eq!(response.as_bytes().as_ref(), expected.as_bytes());
    }
    assert!(scratch_entries(scratch.path()).is_empty());
}
