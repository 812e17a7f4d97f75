//! Endpoint tests for the backend API client.

use flightdeck::api::ApiClient;
use flightdeck::config::ClientConfig;
use flightdeck::error::FlightdeckError;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&ClientConfig::new(server.uri())).expect("build client")
}

#[tokio::test]
async fn login_returns_redirect_and_state() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({ "account": "Main" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "redirectURL": "https://login.example.com/authorize?state=abc",
            "state": "abc"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let start = client(&server).login("Main").await.expect("login");
    assert_eq!(start.state, "abc");
    assert!(start.redirect_url.contains("authorize"));
}

#[tokio::test]
async fn add_character_returns_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/add-character"))
        .and(body_json(json!({ "account": "Main" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "redirectURL": "https://login.example.com/authorize?state=def"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let start = client(&server)
        .add_character("Main")
        .await
        .expect("add character");
    assert!(start.redirect_url.contains("state=def"));
}

#[tokio::test]
async fn finalize_login_reports_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/finalize-login"))
        .and(query_param("state", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let finalized = client(&server).finalize_login("abc").await.expect("finalize");
    assert!(finalized);
}

#[tokio::test]
async fn finalize_login_maps_unauthorized_to_not_ready() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/finalize-login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "error": "call back not yet completed" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let finalized = client(&server).finalize_login("abc").await.expect("finalize");
    assert!(!finalized);
}

#[tokio::test]
async fn finalize_login_surfaces_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/finalize-login"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "failed to set session" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server).finalize_login("abc").await;
    match result {
        Err(FlightdeckError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "failed to set session");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn app_data_maps_unauthorized_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/app-data"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "not logged in" })))
        .expect(1)
        .mount(&server)
        .await;

    let data = client(&server).app_data().await.expect("app data");
    assert!(data.is_none());
}

#[tokio::test]
async fn app_data_parses_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/app-data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "LoggedIn": true,
            "AccountData": {
                "Accounts": [{
                    "Name": "Main",
                    "Status": "Alpha",
                    "ID": 1,
                    "Visible": true,
                    "Characters": [{
                        "Character": { "CharacterID": 77, "CharacterName": "Pilot" }
                    }]
                }],
                "Associations": []
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let data = client(&server)
        .app_data()
        .await
        .expect("app data")
        .expect("snapshot present");
    assert!(data.logged_in);
    assert!(data.has_character(77));
}

#[tokio::test]
async fn app_data_no_cache_hits_uncached_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/app-data-no-cache"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "LoggedIn": false })))
        .expect(1)
        .mount(&server)
        .await;

    let data = client(&server)
        .app_data_no_cache()
        .await
        .expect("app data")
        .expect("snapshot present");
    assert!(!data.logged_in);
}

#[tokio::test]
async fn logout_succeeds_on_ok_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).logout().await.expect("logout");
}
