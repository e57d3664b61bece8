#![allow(clippy::unwrap_used)]
// Integration tests for `Session` RPCs using wiremock.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use thinqly_api::{Auth, ConfigCategory, Error, Gateway, LgedmClient, Session};

// ── Helpers ─────────────────────────────────────────────────────────

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

// ── Device listing ──────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices() {
    let (server, session) = setup().await;

    let body = envelope(json!({
        "returnCd": "0000",
        "item": [
            { "deviceId": "dev-1", "modelNm": "RAC_056905_WW", "alias": "AC", "deviceType": 401 },
            { "deviceId": "dev-2", "modelNm": "F4V9RWP2E", "alias": "Washer", "deviceType": 201 },
        ],
    }));

    Mock::given(method("POST"))
        .and(path("/device/deviceList"))
        .and(header("x-thinq-token", "access-token"))
        .and(header("x-thinq-jsessionId", "session-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let devices = session.list_devices().await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].device_id, "dev-1");
    assert_eq!(devices[1].alias, "Washer");
}

#[tokio::test]
async fn test_list_devices_normalizes_singular_item() {
    let (server, session) = setup().await;

    // The API sometimes returns a lone object where a list is documented.
    let body = envelope(json!({
        "returnCd": "0000",
        "item": { "deviceId": "dev-1", "modelNm": "RAC_056905_WW", "deviceType": 401 },
    }));

    Mock::given(method("POST"))
        .and(path("/device/deviceList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let devices = session.list_devices().await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].device_id, "dev-1");
}

#[tokio::test]
async fn test_list_devices_empty_when_item_absent() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/device/deviceList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({ "returnCd": "0000" }))))
        .mount(&server)
        .await;

    assert!(session.list_devices().await.unwrap().is_empty());
}

// ── Envelope return codes ───────────────────────────────────────────

#[tokio::test]
async fn test_return_code_0102_is_not_logged_in() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({ "returnCd": "0102" }))))
        .mount(&server)
        .await;

    let err = session.list_devices().await.unwrap_err();
    assert!(matches!(err, Error::NotLoggedIn));
    assert!(err.is_auth_expired());
}

#[tokio::test]
async fn test_return_code_0106_is_not_connected() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({ "returnCd": "0106" }))))
        .mount(&server)
        .await;

    let err = session.list_devices().await.unwrap_err();
    assert!(matches!(err, Error::NotConnected));
}

#[tokio::test]
async fn test_other_return_codes_carry_code_and_message() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "returnCd": "0010",
            "returnMsg": "quota exceeded",
        }))))
        .mount(&server)
        .await;

    match session.list_devices().await {
        Err(Error::Api { code, message }) => {
            assert_eq!(code, "0010");
            assert_eq!(message, "quota exceeded");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_envelope_is_deserialization_error() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .mount(&server)
        .await;

    let err = session.list_devices().await.unwrap_err();
    assert!(matches!(err, Error::Deserialization { .. }));
}

// ── Monitoring RPCs ─────────────────────────────────────────────────

#[tokio::test]
async fn test_start_monitor_returns_server_work_id() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rti/rtiMon"))
        .and(body_partial_json(json!({ "lgedmRoot": { "cmd": "Mon", "cmdOpt": "Start", "deviceId": "dev-1" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "returnCd": "0000",
            "workId": "work-abc",
        }))))
        .mount(&server)
        .await;

    let work_id = session.start_monitor("dev-1").await.unwrap();
    assert_eq!(work_id.as_str(), "work-abc");
}

#[tokio::test]
async fn test_poll_monitor_pending_work_is_none() {
    let (server, session) = setup().await;

    // No returnCode inside the work entry: the work item hasn't produced
    // anything yet.
    Mock::given(method("POST"))
        .and(path("/rti/rtiResult"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "returnCd": "0000",
            "workList": { "deviceId": "dev-1", "workId": "w" },
        }))))
        .mount(&server)
        .await;

    let data = session
        .poll_monitor("dev-1", &"w".to_owned().into())
        .await
        .unwrap();
    assert_eq!(data, None);
}

#[tokio::test]
async fn test_poll_monitor_no_payload_is_none() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rti/rtiResult"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "returnCd": "0000",
            "workList": { "deviceId": "dev-1", "workId": "w", "returnCode": "0000" },
        }))))
        .mount(&server)
        .await;

    let data = session
        .poll_monitor("dev-1", &"w".to_owned().into())
        .await
        .unwrap();
    assert_eq!(data, None);
}

#[tokio::test]
async fn test_poll_monitor_decodes_base64_payload() {
    let (server, session) = setup().await;

    // base64("\x01\x02\x03")
    Mock::given(method("POST"))
        .and(path("/rti/rtiResult"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "returnCd": "0000",
            "workList": {
                "deviceId": "dev-1",
                "workId": "w",
                "returnCode": "0000",
                "returnData": "AQID",
            },
        }))))
        .mount(&server)
        .await;

    let data = session
        .poll_monitor("dev-1", &"w".to_owned().into())
        .await
        .unwrap();
    assert_eq!(data, Some(vec![1, 2, 3]));
}

#[tokio::test]
async fn test_poll_monitor_dead_work_item_is_monitor_error() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rti/rtiResult"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "returnCd": "0000",
            "workList": { "deviceId": "dev-1", "workId": "w", "returnCode": "0010" },
        }))))
        .mount(&server)
        .await;

    match session.poll_monitor("dev-1", &"w".to_owned().into()).await {
        Err(Error::Monitor { device_id, code }) => {
            assert_eq!(device_id, "dev-1");
            assert_eq!(code, "0010");
        }
        other => panic!("expected Monitor error, got: {other:?}"),
    }
}

// ── Control RPCs ────────────────────────────────────────────────────

#[tokio::test]
async fn test_set_device_control() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rti/rtiControl"))
        .and(body_partial_json(json!({ "lgedmRoot": {
            "cmd": "Control",
            "cmdOpt": "Set",
            "deviceId": "dev-1",
            "value": { "OpMode": "1" },
        } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({ "returnCd": "0000" }))))
        .mount(&server)
        .await;

    session
        .set_device_control("dev-1", json!({ "OpMode": "1" }))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_device_config() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rti/rtiControl"))
        .and(body_partial_json(json!({ "lgedmRoot": {
            "cmd": "Config",
            "cmdOpt": "Get",
            "value": "Filter",
            "deviceId": "dev-1",
        } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "returnCd": "0000",
            "returnData": "eyJGaWx0ZXIiOiAxfQ==",
        }))))
        .mount(&server)
        .await;

    let data = session
        .get_device_config("dev-1", "Filter", ConfigCategory::Config)
        .await
        .unwrap();
    assert_eq!(data, "eyJGaWx0ZXIiOiAxfQ==");
}
