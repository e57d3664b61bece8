#![allow(clippy::unwrap_used)]
// Integration tests for the `Monitor` state machine using wiremock.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use thinqly_api::{Auth, Gateway, LgedmClient, Monitor, Session};

fn envelope(data: serde_json::Value) -> serde_json::Value {
    json!({ "lgedmRoot": data })
}

async fn setup() -> (MockServer, Session) {
    let server = MockServer::start().await;
    let client = LgedmClient::new().unwrap();
    let gateway = Gateway {
        auth_base: format!("{}/emp", server.uri()),
        api_root: server.uri(),
        oauth_root: format!("{}/oauth", server.uri()),
        country: "US".into(),
        language: "en-US".into(),
    };
    let auth = Auth::new(gateway, Some("access-token".into()), "refresh-token".into());
    let session = Session::new(client, auth, "session-1".into());
    (server, session)
}

fn start_mock(work_id: &str) -> Mock {
    Mock::given(method("POST"))
        .and(path("/rti/rtiMon"))
        .and(body_partial_json(json!({ "lgedmRoot": { "cmdOpt": "Start" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "returnCd": "0000",
            "workId": work_id,
        }))))
}

fn stop_mock() -> Mock {
    Mock::given(method("POST"))
        .and(path("/rti/rtiMon"))
        .and(body_partial_json(json!({ "lgedmRoot": { "cmdOpt": "Stop" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({ "returnCd": "0000" }))))
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_start_then_stop() {
    let (server, session) = setup().await;

    start_mock("work-1").expect(1).mount(&server).await;
    stop_mock().expect(1).mount(&server).await;

    let mut monitor = Monitor::new(session, "dev-1");
    assert!(!monitor.is_active());

    monitor.start().await.unwrap();
    assert!(monitor.is_active());
    assert_eq!(monitor.work_id().unwrap().as_str(), "work-1");

    monitor.stop().await.unwrap();
    assert!(!monitor.is_active());
}

#[tokio::test]
async fn test_double_start_is_an_error() {
    let (server, session) = setup().await;

    start_mock("work-1").expect(1).mount(&server).await;
    stop_mock().mount(&server).await;

    let mut monitor = Monitor::new(session, "dev-1");
    monitor.start().await.unwrap();

    let err = monitor.start().await.unwrap_err();
    assert!(matches!(err, thinqly_api::Error::MonitorActive { .. }));
    // The original work item is untouched.
    assert_eq!(monitor.work_id().unwrap().as_str(), "work-1");

    monitor.stop().await.unwrap();
}

// stop() twice in a row, or before start(), never throws and never
// issues an RPC -- no mocks are mounted, so any request would 404.
#[tokio::test]
async fn test_stop_is_idempotent() {
    let (_server, session) = setup().await;

    let mut monitor = Monitor::new(session, "dev-1");
    monitor.stop().await.unwrap();
    monitor.stop().await.unwrap();
    assert!(!monitor.is_active());
}

#[tokio::test]
async fn test_poll_when_stopped_is_none_without_rpc() {
    let (_server, session) = setup().await;

    let mut monitor = Monitor::new(session, "dev-1");
    assert_eq!(monitor.poll().await.unwrap(), None);
}

// ── Polling ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_poll_returns_decoded_payload() {
    let (server, session) = setup().await;

    start_mock("work-1").mount(&server).await;
    stop_mock().mount(&server).await;
    Mock::given(method("POST"))
        .and(path("/rti/rtiResult"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "returnCd": "0000",
            "workList": {
                "deviceId": "dev-1",
                "workId": "work-1",
                "returnCode": "0000",
                "returnData": "AQID",
            },
        }))))
        .mount(&server)
        .await;

    let mut monitor = Monitor::new(session, "dev-1");
    monitor.start().await.unwrap();

    assert_eq!(monitor.poll().await.unwrap(), Some(vec![1, 2, 3]));
    assert!(monitor.is_active());

    monitor.stop().await.unwrap();
}

// A dead work item must be recovered with exactly one stop + one start
// RPC pair before poll() returns, the recovery must be invisible to the
// caller (Ok(None)), and the work id must change.
#[tokio::test]
async fn test_poll_restarts_dead_work_item() {
    let (server, session) = setup().await;

    // First registration hands out work-1; the restart hands out work-2.
    start_mock("work-1").up_to_n_times(1).expect(1).mount(&server).await;
    start_mock("work-2").expect(1).mount(&server).await;
    stop_mock().expect(1).mount(&server).await;

    Mock::given(method("POST"))
        .and(path("/rti/rtiResult"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "returnCd": "0000",
            "workList": { "deviceId": "dev-1", "workId": "work-1", "returnCode": "0010" },
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let mut monitor = Monitor::new(session, "dev-1");
    monitor.start().await.unwrap();
    assert_eq!(monitor.work_id().unwrap().as_str(), "work-1");

    let polled = monitor.poll().await.unwrap();

    assert_eq!(polled, None);
    assert!(monitor.is_active());
    assert_eq!(monitor.work_id().unwrap().as_str(), "work-2");

    server.verify().await;
}

// Errors other than a dead work item must propagate untouched -- an
// offline device is not recoverable by restarting the monitor.
#[tokio::test]
async fn test_poll_propagates_other_errors() {
    let (server, session) = setup().await;

    start_mock("work-1").mount(&server).await;
    Mock::given(method("POST"))
        .and(path("/rti/rtiResult"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({ "returnCd": "0106" }))))
        .mount(&server)
        .await;

    let mut monitor = Monitor::new(session, "dev-1");
    monitor.start().await.unwrap();

    let err = monitor.poll().await.unwrap_err();
    assert!(matches!(err, thinqly_api::Error::NotConnected));
    // Still active: the work item did not die, the device is just offline.
    assert!(monitor.is_active());

    stop_mock().mount(&server).await;
    monitor.stop().await.unwrap();
}
