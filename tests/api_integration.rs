//! Integration tests for the HTTP API
//!
//! Requests are driven through the router directly; one test goes over a
//! real TCP socket to cover the connection loop.

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request, Response, StatusCode};
use memfit::api::{handle, serve, AppState};
use memfit::Limits;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const TEXTBOOK: &str =
    r#"{"blocks": [100, 500, 200, 300, 600], "processes": [212, 417, 112, 426]}"#;

/// Helper to build a request with a body
fn request(method: Method, uri: &str, body: &str) -> Request<Full<Bytes>> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

async fn call(state: &AppState, method: Method, uri: &str, body: &str) -> Response<Full<Bytes>> {
    handle(request(method, uri, body), state).await
}

async fn json_body(response: Response<Full<Bytes>>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_json(state: &AppState, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = call(state, Method::POST, uri, body).await;
    let status = response.status();
    (status, json_body(response).await)
}

#[tokio::test]
async fn test_first_fit_endpoint() {
    let state = AppState::default();
    let (status, body) = post_json(&state, "/firstfit", TEXTBOOK).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "algorithm": "First Fit",
            "allocation": [
                "Process 1 (212 KB) -> Block 2",
                "Process 2 (417 KB) -> Block 5",
                "Process 3 (112 KB) -> Block 2",
                "Process 4 (426 KB) -> Not Allocated"
            ],
            "remaining_blocks": [100, 176, 200, 300, 183]
        })
    );
}

#[tokio::test]
async fn test_best_fit_endpoint() {
    let state = AppState::default();
    let (status, body) = post_json(&state, "/bestfit", TEXTBOOK).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["algorithm"], "Best Fit");
    assert_eq!(body["allocation"][0], "Process 1 (212 KB) -> Block 4");
    assert_eq!(body["allocation"][3], "Process 4 (426 KB) -> Block 5");
    assert_eq!(body["remaining_blocks"], json!([100, 83, 88, 88, 174]));
}

#[tokio::test]
async fn test_worst_fit_endpoint() {
    let state = AppState::default();
    let (status, body) = post_json(&state, "/worstfit", TEXTBOOK).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["algorithm"], "Worst Fit");
    assert_eq!(body["allocation"][2], "Process 3 (112 KB) -> Block 5");
    assert_eq!(body["remaining_blocks"], json!([100, 83, 200, 300, 276]));
}

#[tokio::test]
async fn test_compare_endpoint() {
    let state = AppState::default();
    let (status, body) = post_json(&state, "/compare", TEXTBOOK).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "comparison_type": "Memory Utilization Based",
            "total_memory": 1700,
            "First Fit": {
                "allocated_processes": 3,
                "allocated_memory": 741,
                "wasted_memory": 959,
                "utilization_percent": 43.59
            },
            "Best Fit": {
                "allocated_processes": 4,
                "allocated_memory": 1167,
                "wasted_memory": 533,
                "utilization_percent": 68.65
            },
            "Worst Fit": {
                "allocated_processes": 3,
                "allocated_memory": 741,
                "wasted_memory": 959,
                "utilization_percent": 43.59
            },
            "best_algorithm": "Best Fit"
        })
    );
}

#[tokio::test]
async fn test_compare_matches_single_endpoints() {
    let state = AppState::default();
    let input = r#"{"blocks": [30, 10, 20, 60], "processes": [10, 15, 20, 40, 5]}"#;
    let (_, comparison) = post_json(&state, "/compare", input).await;

    for (route, name) in [
        ("/firstfit", "First Fit"),
        ("/bestfit", "Best Fit"),
        ("/worstfit", "Worst Fit"),
    ] {
        let (_, single) = post_json(&state, route, input).await;
        let wasted: u64 = single["remaining_blocks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_u64().unwrap())
            .sum();
        let allocated = single["allocation"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|line| !line.as_str().unwrap().ends_with("Not Allocated"))
            .count();

        assert_eq!(comparison[name]["wasted_memory"], wasted, "{}", name);
        assert_eq!(comparison[name]["allocated_processes"], allocated, "{}", name);
    }
}

#[tokio::test]
async fn test_empty_blocks() {
    let state = AppState::default();
    let (status, body) = post_json(&state, "/firstfit", r#"{"blocks": [], "processes": [10]}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["allocation"], json!(["Process 1 (10 KB) -> Not Allocated"]));
    assert_eq!(body["remaining_blocks"], json!([]));
}

#[tokio::test]
async fn test_exact_fit() {
    let state = AppState::default();
    let (_, body) = post_json(&state, "/bestfit", r#"{"blocks": [50], "processes": [50]}"#).await;

    assert_eq!(body["allocation"], json!(["Process 1 (50 KB) -> Block 1"]));
    assert_eq!(body["remaining_blocks"], json!([0]));
}

#[tokio::test]
async fn test_compare_zero_memory() {
    let state = AppState::default();
    let (status, body) = post_json(&state, "/compare", r#"{"blocks": [0, 0], "processes": []}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_memory"], 0);
    for name in ["First Fit", "Best Fit", "Worst Fit"] {
        assert_eq!(body[name]["utilization_percent"], 0.0);
    }
    assert_eq!(body["best_algorithm"], "First Fit");
}

#[tokio::test]
async fn test_malformed_requests_are_bad_requests() {
    let state = AppState::default();
    let cases = [
        "not json",
        r#"{"blocks": [1, 2]}"#,
        r#"{"processes": [1]}"#,
        r#"{"blocks": 5, "processes": [1]}"#,
        r#"{"blocks": [-5], "processes": [1]}"#,
        r#"{"blocks": [1.5], "processes": [1]}"#,
        r#"{"blocks": ["10"], "processes": [1]}"#,
    ];

    for case in cases {
        for route in ["/firstfit", "/bestfit", "/worstfit", "/compare"] {
            let (status, body) = post_json(&state, route, case).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", route, case);
            assert!(body["error"].is_string(), "{} {}", route, case);
        }
    }
}

#[tokio::test]
async fn test_overflowing_totals_rejected() {
    let state = AppState::default();
    let body = format!(r#"{{"blocks": [{}, 1], "processes": []}}"#, u64::MAX);
    let (status, json) = post_json(&state, "/compare", &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("overflows"));
}

#[tokio::test]
async fn test_entry_limits_enforced() {
    let state = AppState::new(
        Limits {
            max_blocks: 2,
            max_processes: 2,
        },
        64 * 1024,
        None,
    );
    let (status, _) = post_json(&state, "/firstfit", r#"{"blocks": [1, 2, 3], "processes": []}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_body_size_limit() {
    let state = AppState::new(Limits::default(), 16, None);
    let response = call(&state, Method::POST, "/compare", TEXTBOOK).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_status_routes() {
    let state = AppState::default();

    for uri in ["/", "/health"] {
        let response = call(&state, Method::GET, uri, "").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "memfit");
    }
}

#[tokio::test]
async fn test_head_answered_like_get() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("script.js"), "let chart;").unwrap();
    let state = AppState::new(Limits::default(), 64 * 1024, Some(dir.path().to_path_buf()));

    for uri in ["/", "/health", "/script.js"] {
        let response = call(&state, Method::HEAD, uri, "").await;
        assert_eq!(response.status(), StatusCode::OK, "HEAD {}", uri);
    }

    let response = call(&state, Method::HEAD, "/missing.js", "").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = call(&state, Method::HEAD, "/compare", "").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_route_and_wrong_method() {
    let state = AppState::default();

    let response = call(&state, Method::POST, "/nextfit", TEXTBOOK).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = call(&state, Method::GET, "/compare", "").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = call(&state, Method::PUT, "/firstfit", TEXTBOOK).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = call(&state, Method::GET, "/missing.js", "").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_headers() {
    let state = AppState::default();

    let response = call(&state, Method::OPTIONS, "/compare", "").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");

    let response = call(&state, Method::POST, "/firstfit", TEXTBOOK).await;
    assert_eq!(response.headers()["access-control-allow-origin"], "*");

    let response = call(&state, Method::POST, "/firstfit", "oops").await;
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_serves_frontend_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>memfit</h1>").unwrap();
    std::fs::write(dir.path().join("script.js"), "let chart;").unwrap();

    let state = AppState::new(Limits::default(), 64 * 1024, Some(dir.path().to_path_buf()));

    let response = call(&state, Method::GET, "/", "").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/html; charset=utf-8");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"<h1>memfit</h1>");

    let response = call(&state, Method::GET, "/script.js", "").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/javascript; charset=utf-8"
    );

    let response = call(&state, Method::GET, "/../Cargo.toml", "").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Health stays JSON even with a frontend
    let response = call(&state, Method::GET, "/health", "").await;
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn test_frontend_dir_without_index_serves_status() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(Limits::default(), 64 * 1024, Some(dir.path().to_path_buf()));

    let response = call(&state, Method::GET, "/", "").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn test_server_over_tcp() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(serve(listener, Arc::new(AppState::default()), async move {
        let _ = shutdown_rx.await;
    }));

    let body = r#"{"blocks": [50], "processes": [50]}"#;
    let raw = format!(
        "POST /firstfit HTTP/1.1\r\nHost: {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        addr,
        body.len(),
        body
    );

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200 OK"), "{}", response);
    assert!(response.contains("Process 1 (50 KB) -> Block 1"), "{}", response);

    shutdown_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
