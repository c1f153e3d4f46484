//! End-to-end replay against the mock Okapi server

use std::path::Path;
use std::time::Duration;

use rollover_replay::{run_from_config, Config, Credentials, ReplayError};
use serde_json::json;
use uuid::Uuid;

use super::common::fixtures::{
    doubled_failure_line, failure_line, noise_line, po_line, write_log,
};
use super::common::mock_okapi::{MockOkapi, TOKEN};

const TENANT: &str = "diku";

fn config(okapi: &MockOkapi, log: &Path) -> Config {
    Config {
        log_path: log.to_path_buf(),
        base_url: okapi.base_url.clone(),
        tenant: TENANT.to_string(),
        credentials: Credentials::new("diku_admin", "admin"),
        request_timeout: Some(Duration::from_secs(10)),
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[tokio::test]
async fn test_log_without_failures_only_logs_in() {
    let okapi = MockOkapi::start().await;
    let lines: Vec<String> = (0..50).map(noise_line).collect();
    let log = write_log(&lines);

    let summary = run_from_config(&config(&okapi, log.path())).await.unwrap();

    let requests = okapi.requests();
    assert_eq!(requests.len(), 1, "Only the login call is expected");
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/bl-users/login");
    assert_eq!(requests[0].tenant.as_deref(), Some(TENANT));
    assert_eq!(
        requests[0].body,
        json!({"username": "diku_admin", "password": "admin"})
    );
    assert_eq!(summary.lines, 50);
    assert_eq!(summary.parsed, 0);
}

#[tokio::test]
async fn test_each_failure_line_becomes_one_put() {
    let okapi = MockOkapi::start().await;
    let first = po_line(&new_id());
    let second = po_line(&new_id());
    let log = write_log(&[
        noise_line(1),
        failure_line(&first),
        noise_line(2),
        failure_line(&second),
    ]);

    let summary = run_from_config(&config(&okapi, log.path())).await.unwrap();

    let puts = okapi.puts();
    assert_eq!(puts.len(), 2);
    for (put, payload) in puts.iter().zip([&first, &second]) {
        let id = payload["id"].as_str().unwrap();
        assert_eq!(put.path, format!("/orders-storage/po-lines/{id}"));
        assert_eq!(put.tenant.as_deref(), Some(TENANT));
        assert_eq!(put.token.as_deref(), Some(TOKEN));
        assert_eq!(put.content_type.as_deref(), Some("application/json"));
        assert_eq!(&put.body, payload, "Body must be the recovered record");
    }
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 0);
}

#[tokio::test]
async fn test_puts_follow_file_order_without_overlap() {
    let okapi = MockOkapi::builder()
        .delay(Duration::from_millis(10))
        .start()
        .await;
    let ids: Vec<String> = (0..15).map(|_| new_id()).collect();
    let lines: Vec<String> = ids
        .iter()
        .enumerate()
        .flat_map(|(n, id)| [noise_line(n), failure_line(&po_line(id))])
        .collect();
    let log = write_log(&lines);

    run_from_config(&config(&okapi, log.path())).await.unwrap();

    let requests = okapi.requests();
    assert_eq!(requests[0].path, "/bl-users/login", "Login must come first");
    let replayed: Vec<String> = okapi
        .puts()
        .iter()
        .map(|put| put.path.trim_start_matches("/orders-storage/po-lines/").to_string())
        .collect();
    assert_eq!(replayed, ids);
    assert_eq!(okapi.max_in_flight(), 1, "Requests must never overlap");
}

#[tokio::test]
async fn test_doubled_quote_payload_is_repaired() {
    let okapi = MockOkapi::start().await;
    let payload = po_line(&new_id());
    let log = write_log(&[doubled_failure_line(&payload)]);

    run_from_config(&config(&okapi, log.path())).await.unwrap();

    let puts = okapi.puts();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].body, payload);
}

#[tokio::test]
async fn test_malformed_payload_is_skipped() {
    let okapi = MockOkapi::start().await;
    let good = po_line(&new_id());
    let truncated = r#"2023-07-01 ERROR Exception calling PUT /orders-storage/po-lines/abc {"id": "abc"#;
    let broken_json = r#"2023-07-01 ERROR Exception calling PUT /orders-storage/po-lines/abc {"id": "abc", }"#;
    let log = write_log(&[
        truncated.to_string(),
        broken_json.to_string(),
        failure_line(&good),
    ]);

    let summary = run_from_config(&config(&okapi, log.path())).await.unwrap();

    let puts = okapi.puts();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].body, good);
    assert_eq!(summary.dropped, 2);
}

#[tokio::test]
async fn test_rejected_put_does_not_stop_replay() {
    let rejected = new_id();
    let okapi = MockOkapi::builder()
        .put_status(&rejected, 422)
        .start()
        .await;
    let before = new_id();
    let after = new_id();
    let log = write_log(&[
        failure_line(&po_line(&before)),
        failure_line(&po_line(&rejected)),
        failure_line(&po_line(&after)),
    ]);

    let summary = run_from_config(&config(&okapi, log.path())).await.unwrap();

    let paths: Vec<String> = okapi.puts().into_iter().map(|put| put.path).collect();
    assert_eq!(
        paths,
        vec![
            format!("/orders-storage/po-lines/{before}"),
            format!("/orders-storage/po-lines/{rejected}"),
            format!("/orders-storage/po-lines/{after}"),
        ]
    );
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
}

#[tokio::test]
async fn test_login_failure_replays_nothing() {
    let okapi = MockOkapi::builder().login_status(401).start().await;
    let log = write_log(&[
        failure_line(&po_line(&new_id())),
        failure_line(&po_line(&new_id())),
    ]);

    let result = run_from_config(&config(&okapi, log.path())).await;

    match result {
        Err(err @ ReplayError::Status { .. }) => {
            assert_eq!(err.status().map(|status| status.as_u16()), Some(401));
        }
        other => panic!("Expected login rejection, got {other:?}"),
    }
    assert!(okapi.puts().is_empty(), "No PUT may follow a failed login");
}

#[tokio::test]
async fn test_login_without_token_replays_nothing() {
    let okapi = MockOkapi::builder().without_token().start().await;
    let log = write_log(&[failure_line(&po_line(&new_id()))]);

    let result = run_from_config(&config(&okapi, log.path())).await;

    assert!(matches!(result, Err(ReplayError::MissingToken)));
    assert!(okapi.puts().is_empty());
}

#[tokio::test]
async fn test_put_timeout_is_an_isolated_failure() {
    let slow = new_id();
    let after = new_id();
    let okapi = MockOkapi::builder()
        .put_delay(&slow, Duration::from_millis(500))
        .start()
        .await;
    let log = write_log(&[failure_line(&po_line(&slow)), failure_line(&po_line(&after))]);
    let config = Config {
        request_timeout: Some(Duration::from_millis(50)),
        ..config(&okapi, log.path())
    };

    let summary = run_from_config(&config).await.unwrap();

    let paths: Vec<String> = okapi.puts().into_iter().map(|put| put.path).collect();
    assert_eq!(
        paths,
        vec![
            format!("/orders-storage/po-lines/{slow}"),
            format!("/orders-storage/po-lines/{after}"),
        ]
    );
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.succeeded, 1);
}

#[tokio::test]
async fn test_login_timeout_replays_nothing() {
    let okapi = MockOkapi::builder()
        .login_delay(Duration::from_millis(500))
        .start()
        .await;
    let log = write_log(&[failure_line(&po_line(&new_id()))]);
    let config = Config {
        request_timeout: Some(Duration::from_millis(50)),
        ..config(&okapi, log.path())
    };

    let result = run_from_config(&config).await;

    match result {
        Err(ReplayError::Http(err)) => assert!(err.is_timeout(), "Expected a timeout, got {err}"),
        other => panic!("Expected login timeout, got {other:?}"),
    }
    assert!(okapi.puts().is_empty(), "No PUT may follow a timed-out login");
}
