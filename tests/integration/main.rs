//! Integration tests for gitrat
//!
//! These tests verify that the store, watcher and router work together
//! against dataset files on disk.

use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use gitrat_core::{MemoryStore, SnapshotStore, build_forest, dataset_path};
use gitrat_server::{ServerState, create_router};
use gitrat_watcher::{WatchEvent, apply_event};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

fn platform_dataset() -> Value {
    json!({
        "nodes": [
            { "id": 10, "name": "platform", "_data": { "type": "group" } },
            { "id": 11, "name": "infra", "_data": { "type": "subgroup" } },
            { "id": 12, "name": "k8s", "_data": { "type": "code", "description": "cluster config" } },
            { "id": 13, "name": "docs", "_data": { "type": "code" } },
            { "id": 20, "name": "scratch", "_data": { "type": "code" } }
        ],
        "edges": [
            { "from": 11, "to": 10, "label": "ownedby" },
            { "from": 12, "to": 11, "label": "ownedby" },
            { "from": 13, "to": 10, "label": "ownedby" },
            { "from": 20, "to": 404, "label": "ownedby" }
        ]
    })
}

fn write_dataset(dir: &Path, name: &str, dataset: &Value) {
    std::fs::write(dataset_path(dir, name), dataset.to_string()).unwrap();
}

async fn get_json(app: &axum::Router, path: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_gitrat"))
        .arg("version")
        .output()
        .expect("Failed to execute gitrat");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

/// Test that `check` reads a dataset from the cache directory
#[test]
fn test_cli_check() {
    let root = TempDir::new().unwrap();
    let cache = root.path().join(".gitrat");
    std::fs::create_dir(&cache).unwrap();
    write_dataset(&cache, "gitrat", &platform_dataset());

    let output = Command::new(env!("CARGO_BIN_EXE_gitrat"))
        .args(["check", "--root"])
        .arg(root.path())
        .env_remove("GITRAT_CACHE_DIR")
        .env_remove("GITRAT_DATASET")
        .output()
        .expect("Failed to execute gitrat");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("1 groups, 1 subgroups, 3 projects"));
    assert!(stdout.contains("no anomalies"));
}

/// Test that the API serves a dataset loaded from disk
#[tokio::test]
async fn test_api_over_loaded_dataset() {
    let cache = TempDir::new().unwrap();
    write_dataset(cache.path(), "gitrat", &platform_dataset());

    let store = Arc::new(MemoryStore::new());
    assert_eq!(store.load_dir(cache.path()).unwrap(), 1);
    let app = create_router(Arc::new(ServerState::new(store, "gitrat")));

    let (status, body) = get_json(&app, "/api/tree/infra").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body[0]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["platform", "infra", "k8s"]);
    assert_eq!(body[1].as_array().unwrap().len(), 2);

    let (status, body) = get_json(&app, "/api/list").await;
    assert_eq!(status, StatusCode::OK);
    let roots = body.as_array().unwrap();
    assert_eq!(roots.len(), 2);
    assert_eq!(roots[0]["type"], "container");
    assert_eq!(roots[0]["children"][0]["node"]["name"], "infra");
    assert_eq!(roots[0]["children"][1]["type"], "leaf");
    assert_eq!(roots[1]["node"]["name"], "scratch");

    let (status, body) = get_json(&app, "/api/projects/name/k8s").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["attributes"]["description"], "cluster config");
}

/// Test that a rewritten dataset file is picked up by the API
#[tokio::test]
async fn test_watcher_reload_visible_through_api() {
    let cache = TempDir::new().unwrap();
    let store = Arc::new(MemoryStore::new());
    let app = create_router(Arc::new(ServerState::new(store.clone(), "gitrat")));

    let (status, _) = get_json(&app, "/api/list").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let path = dataset_path(cache.path(), "gitrat");
    write_dataset(cache.path(), "gitrat", &platform_dataset());
    assert!(apply_event(&store, &WatchEvent::Changed(path.clone())));

    let (status, body) = get_json(&app, "/api/list").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    std::fs::remove_file(&path).unwrap();
    assert!(apply_event(&store, &WatchEvent::Removed(path)));
    let (status, _) = get_json(&app, "/api/list").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

/// Test that a snapshot held by a reader survives a reload
#[test]
fn test_reload_does_not_disturb_readers() {
    let cache = TempDir::new().unwrap();
    let path = dataset_path(cache.path(), "gitrat");
    write_dataset(cache.path(), "gitrat", &platform_dataset());

    let store = MemoryStore::new();
    store.load_file("gitrat", &path).unwrap();
    let held = store.snapshot("gitrat").unwrap();

    write_dataset(cache.path(), "gitrat", &json!({ "nodes": [], "edges": [] }));
    store.load_file("gitrat", &path).unwrap();

    assert_eq!(held.node_count(), 5);
    assert_eq!(build_forest(&held).unwrap().len(), 2);
    assert_eq!(store.snapshot("gitrat").unwrap().node_count(), 0);
}
