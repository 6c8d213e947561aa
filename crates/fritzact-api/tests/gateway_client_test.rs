#![allow(clippy::unwrap_used)]
// Integration tests for `GatewayClient` using wiremock.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fritzact_api::{
    Error, GatewayClient, SessionId, SwitchCommand, TlsMode, TransportConfig, login_response,
};

const SENTINEL_CHALLENGE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<SessionInfo><SID>0000000000000000</SID><Challenge>1234567z</Challenge><BlockTime>0</BlockTime><Rights></Rights></SessionInfo>"#;

const LOGGED_IN: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<SessionInfo><SID>a1b2c3d4e5f60718</SID><Challenge>1234567z</Challenge><BlockTime>0</BlockTime>
<Rights><Name>HomeAuto</Name><Access>2</Access></Rights></SessionInfo>"#;

const BLOCKED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<SessionInfo><SID>0000000000000000</SID><Challenge>9c2e71f0</Challenge><BlockTime>60</BlockTime><Rights></Rights></SessionInfo>"#;

const REFUSED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<SessionInfo><SID>0000000000000000</SID><Challenge>9c2e71f0</Challenge><BlockTime>0</BlockTime><Rights></Rights></SessionInfo>"#;

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, GatewayClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = GatewayClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn live_sid() -> SessionId {
    SessionId::new("a1b2c3d4e5f60718")
}

fn xml(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/xml")
        .set_body_string(body)
}

// ── Session probe ───────────────────────────────────────────────────

#[tokio::test]
async fn test_probe_with_live_sid() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/login_sid.lua"))
        .and(query_param("sid", "a1b2c3d4e5f60718"))
        .respond_with(xml(LOGGED_IN))
        .expect(1)
        .mount(&server)
        .await;

    let info = client.probe_session(Some(&live_sid())).await.unwrap();
    assert_eq!(info.sid, live_sid());
    assert_eq!(info.rights.len(), 1);
}

#[tokio::test]
async fn test_probe_never_sends_sentinel() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/login_sid.lua"))
        .respond_with(xml(SENTINEL_CHALLENGE))
        .expect(1)
        .mount(&server)
        .await;

    let info = client
        .probe_session(Some(&SessionId::invalid()))
        .await
        .unwrap();
    assert!(!info.sid.is_valid());
    assert_eq!(info.challenge.as_deref(), Some("1234567z"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.query().is_none());
}

// ── Login ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_sends_challenge_response() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/login_sid.lua"))
        .and(query_param("username", "admin"))
        .and(query_param(
            "response",
            "1234567z-0a2ffec43723b838ee9464d6614da5fb",
        ))
        .respond_with(xml(LOGGED_IN))
        .expect(1)
        .mount(&server)
        .await;

    let secret: SecretString = "pw".to_string().into();
    let info = client.login("admin", &secret, "1234567z").await.unwrap();
    assert_eq!(info.sid.as_str(), "a1b2c3d4e5f60718");
}

#[tokio::test]
async fn test_login_blocked() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/login_sid.lua"))
        .respond_with(xml(BLOCKED))
        .mount(&server)
        .await;

    let secret: SecretString = "wrong".to_string().into();
    let result = client.login("admin", &secret, "1234567z").await;

    assert!(
        matches!(result, Err(Error::LoginBlocked { block_time_secs: 60 })),
        "expected LoginBlocked, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_refused_without_block() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/login_sid.lua"))
        .respond_with(xml(REFUSED))
        .mount(&server)
        .await;

    let secret: SecretString = "wrong".to_string().into();
    let result = client.login("admin", &secret, "1234567z").await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_rejects_wide_password_before_network() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(xml(LOGGED_IN))
        .expect(0)
        .mount(&server)
        .await;

    let secret: SecretString = "snow☃".to_string().into();
    let result = client.login("admin", &secret, "1234567z").await;
    assert!(matches!(result, Err(Error::CredentialEncoding)));
}

#[tokio::test]
async fn test_logout() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/login_sid.lua"))
        .and(query_param("logout", "1"))
        .and(query_param("sid", "a1b2c3d4e5f60718"))
        .respond_with(xml(REFUSED))
        .expect(1)
        .mount(&server)
        .await;

    client.logout(&live_sid()).await.unwrap();
}

// ── Switch commands ─────────────────────────────────────────────────

#[tokio::test]
async fn test_switch_command_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/webservices/homeautoswitch.lua"))
        .and(query_param("switchcmd", "setswitchtoggle"))
        .and(query_param("sid", "a1b2c3d4e5f60718"))
        .and(query_param("ain", "08761 0000434"))
        .respond_with(ResponseTemplate::new(200).set_body_string("1\n"))
        .expect(1)
        .mount(&server)
        .await;

    let response = client
        .switch_command(
            &live_sid(),
            SwitchCommand::SetSwitchToggle,
            Some("08761 0000434"),
            None,
        )
        .await
        .unwrap();
    assert_eq!(response, "1");
}

#[tokio::test]
async fn test_set_point_carries_param() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/webservices/homeautoswitch.lua"))
        .and(query_param("switchcmd", "sethkrtsoll"))
        .and(query_param("param", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_string("42\n"))
        .expect(1)
        .mount(&server)
        .await;

    let response = client
        .switch_command(
            &live_sid(),
            SwitchCommand::SetHkrTsoll,
            Some("09995 0123456"),
            Some("42"),
        )
        .await
        .unwrap();
    assert_eq!(response, "42");
}

#[tokio::test]
async fn test_switch_command_requires_session() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = client
        .switch_command(
            &SessionId::invalid(),
            SwitchCommand::SetSwitchOn,
            Some("08761 0000434"),
            None,
        )
        .await;
    assert!(matches!(result, Err(Error::NotAuthenticated)));
}

#[tokio::test]
async fn test_http_error_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/webservices/homeautoswitch.lua"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let result = client
        .switch_command(
            &live_sid(),
            SwitchCommand::SetSwitchOff,
            Some("08761 0000434"),
            None,
        )
        .await;

    match result {
        Err(ref e @ Error::HttpStatus { status, .. }) => {
            assert_eq!(status, 403);
            assert!(e.is_protocol());
            assert!(!e.is_connectivity());
        }
        other => panic!("expected HttpStatus, got: {other:?}"),
    }
}

// ── Device list ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_device_list_infos() {
    let (server, client) = setup().await;

    let body = r#"<devicelist version="1">
<device identifier="08761 0000434" id="17" functionbitmask="2944" fwversion="03.33" manufacturer="AVM" productname="FRITZ!DECT 200">
  <present>1</present><name>Lamp</name>
  <switch><state>1</state><mode>manuell</mode><lock>0</lock></switch>
</device>
<device identifier="09995 0123456" id="18" functionbitmask="320" fwversion="03.54" manufacturer="AVM" productname="Comet DECT">
  <present>0</present><name>Office</name>
  <hkr><tsoll>40</tsoll><komfort>42</komfort><absenk>32</absenk></hkr>
</device>
</devicelist>"#;

    Mock::given(method("GET"))
        .and(path("/webservices/homeautoswitch.lua"))
        .and(query_param("switchcmd", "getdevicelistinfos"))
        .respond_with(xml(body))
        .expect(1)
        .mount(&server)
        .await;

    let devices = client.device_list_infos(&live_sid()).await.unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].name.as_deref(), Some("Lamp"));
    assert_eq!(
        devices[1].hkr.as_ref().unwrap().tsoll.as_deref(),
        Some("40")
    );
}

#[tokio::test]
async fn test_device_list_malformed_xml() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/webservices/homeautoswitch.lua"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<devicelist><device>"))
        .mount(&server)
        .await;

    let result = client.device_list_infos(&live_sid()).await;
    assert!(matches!(result, Err(Error::Xml { .. })));
}

// ── Transport ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_timeout_is_connectivity_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(xml(LOGGED_IN).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let transport = TransportConfig {
        tls: TlsMode::System,
        timeout: Duration::from_millis(200),
    };
    let client = GatewayClient::new(Url::parse(&server.uri()).unwrap(), &transport).unwrap();

    let err = client.probe_session(None).await.unwrap_err();
    assert!(err.is_connectivity(), "expected connectivity error, got: {err:?}");
    assert!(matches!(err, Error::Timeout { .. }));
}

#[tokio::test]
async fn test_unreachable_gateway() {
    // Nothing listens on the discard port.
    let client = GatewayClient::with_client(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:9").unwrap(),
    );
    let err = client.probe_session(None).await.unwrap_err();
    assert!(err.is_connectivity(), "expected connectivity error, got: {err:?}");
}

#[test]
fn test_scenario_c_response() {
    let response = login_response("1234567z", "pw").unwrap();
    assert_eq!(response, "1234567z-0a2ffec43723b838ee9464d6614da5fb");
}
