//! REST client tests against a local mock server.

mod common;

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{TEST_GUILD, TEST_SESSION};
use guild_dash::adapters::mock::RecordingSurface;
use guild_dash::adapters::ReqwestHttpClient;
use guild_dash::api::ApiClient;
use guild_dash::error::RequestError;
use guild_dash::models::GuildSettingsUpdate;
use guild_dash::traits::{Method, ToastKind};

fn api_for(server: &MockServer) -> (ApiClient, Arc<RecordingSurface>) {
    let surface = Arc::new(RecordingSurface::dashboard());
    let api = ApiClient::new(
        &server.uri(),
        Arc::new(ReqwestHttpClient::new()),
        surface.clone(),
    )
    .unwrap()
    .with_session_cookie(TEST_SESSION);
    (api, surface)
}

#[tokio::test]
async fn test_request_sends_session_cookie_and_json_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/guilds"))
        .and(header("Cookie", format!("session={}", TEST_SESSION).as_str()))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "guilds": [{"id": TEST_GUILD, "name": "Tavern", "icon": null, "owner": true, "permissions": 8}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (api, surface) = api_for(&server);
    let list = api.load_guilds().await.unwrap();
    assert_eq!(list.guilds.len(), 1);
    assert_eq!(list.guilds[0].name, "Tavern");
    assert!(surface.toasts().is_empty());
}

#[tokio::test]
async fn test_error_detail_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/guilds/{}", TEST_GUILD)))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"detail": "Not authorized"})),
        )
        .mount(&server)
        .await;

    let (api, surface) = api_for(&server);
    let err = api
        .request(&format!("/api/guilds/{}", TEST_GUILD), Method::Get, None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Not authorized");
    assert_eq!(err.status(), Some(403));

    assert!(api.load_guild_data(TEST_GUILD).await.is_none());
    assert_eq!(
        surface.last_toast(),
        Some(("Failed to load guild data".to_string(), ToastKind::Error))
    );
}

#[tokio::test]
async fn test_error_without_detail_is_generic() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let (api, _surface) = api_for(&server);
    let err = api.request("/api/guilds", Method::Get, None).await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed");
}

#[tokio::test]
async fn test_connection_failure() {
    // Reserve a free port, then close it so nothing is listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let surface = Arc::new(RecordingSurface::dashboard());
    let api = ApiClient::new(&uri, Arc::new(ReqwestHttpClient::new()), surface).unwrap();
    let err = api.request("/api/guilds", Method::Get, None).await.unwrap_err();
    assert!(matches!(err, RequestError::Connection(_)));
}

#[tokio::test]
async fn test_members_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/guilds/{}/members", TEST_GUILD)))
        .and(query_param("limit", "50"))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "members": [{
                "id": "222222222222222222",
                "guild_id": TEST_GUILD,
                "xp": 4200,
                "level": 7,
                "coins": 15,
                "messages_count": 310
            }],
            "limit": 50,
            "offset": 100
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (api, _surface) = api_for(&server);
    let page = api.load_guild_members(TEST_GUILD, 50, 100).await.unwrap();
    assert_eq!(page.offset, 100);
    assert_eq!(page.members[0].level, 7);
}

#[tokio::test]
async fn test_patch_sends_only_set_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(format!("/api/guilds/{}", TEST_GUILD)))
        .and(body_json(json!({"log_channel_id": 333333333333333333u64})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Guild settings updated successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (api, surface) = api_for(&server);
    let mut update = GuildSettingsUpdate::new();
    assert!(update.set_id_field("log_channel_id", 333333333333333333));

    let message = api.update_guild_settings(TEST_GUILD, &update).await;
    assert_eq!(message.as_deref(), Some("Guild settings updated successfully"));
    assert_eq!(
        surface.last_toast(),
        Some((
            "Guild settings updated successfully".to_string(),
            ToastKind::Success
        ))
    );
}

#[tokio::test]
async fn test_reset_failure_toast() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/guilds/{}/reset", TEST_GUILD)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Guild not found"})))
        .mount(&server)
        .await;

    let (api, surface) = api_for(&server);
    assert!(api.reset_guild_settings(TEST_GUILD).await.is_none());
    assert_eq!(
        surface.last_toast(),
        Some(("Failed to reset guild settings".to_string(), ToastKind::Error))
    );
}
