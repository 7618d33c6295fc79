//! Integration test: HTTP daemon client against a local JSON API stub.

mod common;

use bvmirror_core::daemon::{DaemonClient, DaemonError, HttpDaemonClient, TaskStatus};

fn client(base: &str) -> HttpDaemonClient {
    HttpDaemonClient::new(base, "/app/Downloads/")
}

#[tokio::test]
async fn server_info_reports_version() {
    let (base, _created) = common::daemon_server::start();
    let version = client(&base).server_info().await.unwrap();
    assert_eq!(version, "1.0.0-test");
}

#[tokio::test]
async fn resolve_returns_id_and_filename() {
    let (base, _created) = common::daemon_server::start();
    let resolved = client(&base)
        .resolve("https://files.example.com/data/BTCUSDT-trades-2023-01.zip")
        .await
        .unwrap();
    assert_eq!(resolved.id, "rid-1");
    assert_eq!(resolved.filename, "BTCUSDT-trades-2023-01.zip");
}

#[tokio::test]
async fn resolve_failure_surfaces_api_code() {
    let (base, _created) = common::daemon_server::start();
    let err = client(&base)
        .resolve("https://files.example.com/missing.zip")
        .await
        .unwrap_err();
    match err {
        DaemonError::Api { call, code, .. } => {
            assert_eq!(call, "resolve");
            assert_eq!(code, 1);
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn create_task_joins_daemon_download_root() {
    let (base, created) = common::daemon_server::start();
    let handle = client(&base)
        .create_task("rid-1", "BTCUSDT-trades-2023-01.zip", "data/spot/monthly/trades/BTCUSDT")
        .await
        .unwrap();
    assert_eq!(handle, "task-1");

    let bodies = created.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["rid"], "rid-1");
    assert_eq!(bodies[0]["opt"]["name"], "BTCUSDT-trades-2023-01.zip");
    assert_eq!(
        bodies[0]["opt"]["path"],
        "/app/Downloads/data/spot/monthly/trades/BTCUSDT"
    );
}

#[tokio::test]
async fn task_listing_and_status() {
    let (base, _created) = common::daemon_server::start();
    let client = client(&base);

    let all = client.list_tasks(None).await.unwrap();
    assert_eq!(all, vec!["task-1".to_string()]);
    let running = client.list_tasks(Some(TaskStatus::Running)).await.unwrap();
    assert_eq!(running.len(), 1);

    let status = client.get_status("task-1").await.unwrap();
    assert_eq!(status, TaskStatus::Done);

    client.clear_all().await.unwrap();
}
