#![allow(clippy::unwrap_used)]
// Integration tests for gateway discovery and the token lifecycle.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use thinqly_api::{Auth, Error, Gateway, LgedmClient};

fn envelope(data: serde_json::Value) -> serde_json::Value {
    json!({ "lgedmRoot": data })
}

fn gateway_for(server: &MockServer) -> Gateway {
    Gateway {
        auth_base: format!("{}/emp", server.uri()),
        api_root: server.uri(),
        oauth_root: server.uri(),
        country: "US".into(),
        language: "en-US".into(),
    }
}

// ── Gateway discovery ───────────────────────────────────────────────

#[tokio::test]
async fn test_discover_reads_endpoint_triple() {
    let server = MockServer::start().await;
    let client = LgedmClient::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/api/common/gatewayUriList"))
        .and(body_partial_json(json!({ "lgedmRoot": {
            "countryCode": "US",
            "langCode": "en-US",
        } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "returnCd": "0000",
            "empUri": "https://us.m.lgaccount.com",
            "thinqUri": "https://us.lgthinq.com:46030/api",
            "oauthUri": "https://us.lgeapi.com",
        }))))
        .mount(&server)
        .await;

    let url = format!("{}/api/common/gatewayUriList", server.uri());
    let gateway = Gateway::discover_at(&client, &url, "US", "en-US")
        .await
        .unwrap();

    assert_eq!(gateway.auth_base, "https://us.m.lgaccount.com");
    assert_eq!(gateway.api_root, "https://us.lgthinq.com:46030/api");
    assert_eq!(gateway.oauth_root, "https://us.lgeapi.com");
    assert_eq!(gateway.country, "US");
}

#[tokio::test]
async fn test_discover_surfaces_api_errors() {
    let server = MockServer::start().await;
    let client = LgedmClient::new().unwrap();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "returnCd": "0009",
            "returnMsg": "unsupported country",
        }))))
        .mount(&server)
        .await;

    let url = format!("{}/api/common/gatewayUriList", server.uri());
    let err = Gateway::discover_at(&client, &url, "XX", "xx-XX")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Api { code, .. } if code == "0009"));
}

// ── Refresh exchange ────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_sends_signed_form_request() {
    let server = MockServer::start().await;
    let client = LgedmClient::new().unwrap();
    let auth = Auth::new(gateway_for(&server), None, "refresh-tok".into());

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(header("lgemp-x-app-key", "LGAO221A02"))
        .and(header_exists("lgemp-x-signature"))
        .and(header_exists("lgemp-x-date"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 1,
            "access_token": "fresh-access",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let refreshed = auth.refresh(&client).await.unwrap();

    // New access token, same refresh token (refresh tokens never rotate),
    // and the original value is untouched.
    assert_eq!(refreshed.access_token.as_deref(), Some("fresh-access"));
    assert_eq!(refreshed.refresh_token, "refresh-tok");
    assert_eq!(auth.access_token, None);
}

#[tokio::test]
async fn test_refresh_rejection_is_token_error() {
    let server = MockServer::start().await;
    let client = LgedmClient::new().unwrap();
    let auth = Auth::new(gateway_for(&server), None, "expired-tok".into());

    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": 0 })))
        .mount(&server)
        .await;

    let err = auth.refresh(&client).await.unwrap_err();
    assert!(matches!(err, Error::Token));
}

// ── Session bootstrap ───────────────────────────────────────────────

#[tokio::test]
async fn test_start_session_returns_session_and_devices() {
    let server = MockServer::start().await;
    let client = LgedmClient::new().unwrap();
    let auth = Auth::new(gateway_for(&server), Some("access".into()), "refresh".into());

    Mock::given(method("POST"))
        .and(path("/member/login"))
        .and(body_partial_json(json!({ "lgedmRoot": {
            "loginType": "EMP",
            "token": "access",
        } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "returnCd": "0000",
            "jsessionId": "sess-42",
            "items": [
                { "deviceId": "dev-1", "deviceType": 401 },
                { "deviceId": "dev-2", "deviceType": 201 },
            ],
        }))))
        .mount(&server)
        .await;

    let (session, devices) = auth.start_session(&client).await.unwrap();

    assert_eq!(session.session_id(), "sess-42");
    assert_eq!(devices.len(), 2);
}

#[tokio::test]
async fn test_start_session_normalizes_singular_items() {
    let server = MockServer::start().await;
    let client = LgedmClient::new().unwrap();
    let auth = Auth::new(gateway_for(&server), Some("access".into()), "refresh".into());

    Mock::given(method("POST"))
        .and(path("/member/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "returnCd": "0000",
            "jsessionId": "sess-43",
            "items": { "deviceId": "dev-1", "deviceType": 401 },
        }))))
        .mount(&server)
        .await;

    let (_, devices) = auth.start_session(&client).await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].device_id, "dev-1");
}

#[tokio::test]
async fn test_start_session_without_access_token_fails() {
    let server = MockServer::start().await;
    let client = LgedmClient::new().unwrap();
    let auth = Auth::new(gateway_for(&server), None, "refresh".into());

    let err = auth.start_session(&client).await.unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }));
}
