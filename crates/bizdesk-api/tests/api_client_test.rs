#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bizdesk_api::{ApiClient, CONNECTIVITY_MESSAGE, Error, NoToken, StaticToken, TokenProvider};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClientRecord {
    id: u64,
    company_name: String,
}

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup_with(tokens: Arc<dyn TokenProvider>) -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::with_client(reqwest::Client::new(), &server.uri(), tokens).unwrap();
    (server, client)
}

async fn setup() -> (MockServer, ApiClient) {
    setup_with(Arc::new(StaticToken::new("tok-123"))).await
}

// ── Token handling ──────────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_token_attached() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/clients"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": 1, "companyName": "Acme" }],
            "meta": { "page": 1, "limit": 10, "total": 1 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client.list::<ClientRecord>("clients", 1, 10).await.unwrap();

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].id, 1);
    assert_eq!(page.data[0].company_name, "Acme");
}

#[tokio::test]
async fn test_anonymous_request_has_no_auth_header() {
    let (server, client) = setup_with(Arc::new(NoToken)).await;

    Mock::given(method("POST"))
        .and(path("/auth/forgot-password"))
        .and(body_json(json!({ "email": "a@b.co" })))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.forgot_password("a@b.co").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

// ── Collections ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_sends_page_and_limit() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page", "3"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "meta": { "page": 3, "limit": 10, "total": 20 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client
        .list::<serde_json::Value>("products", 3, 10)
        .await
        .unwrap();

    assert!(page.data.is_empty());
    let meta = page.meta.unwrap();
    assert_eq!(meta.page, 3);
    assert_eq!(meta.total, 20);
}

#[tokio::test]
async fn test_list_integrations_by_client() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/integrations"))
        .and(query_param("clientId", "c-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "i-1", "clientId": "c-9", "label": "FTP", "value": "user:pw" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let page = client
        .list_integrations::<serde_json::Value>("c-9")
        .await
        .unwrap();

    assert_eq!(page.data.len(), 1);
    assert!(page.meta.is_none());
}

#[tokio::test]
async fn test_create_unwraps_data_envelope() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/clients"))
        .and(body_json(json!({ "companyName": "Globex" })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "data": { "id": 5, "companyName": "Globex" } })),
        )
        .mount(&server)
        .await;

    let created: ClientRecord = client
        .create_record("clients", &json!({ "companyName": "Globex" }))
        .await
        .unwrap();

    assert_eq!(created.id, 5);
}

#[tokio::test]
async fn test_update_uses_patch() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/clients/5"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": 5, "companyName": "Initech" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let updated: ClientRecord = client
        .update_record("clients", "5", &json!({ "companyName": "Initech" }))
        .await
        .unwrap();

    assert_eq!(updated.company_name, "Initech");
}

#[tokio::test]
async fn test_delete_record() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/integrations/X"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "deleted": true })))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_record("integrations", "X").await.unwrap();
}

#[tokio::test]
async fn test_base_url_with_path_prefix() {
    let server = MockServer::start().await;
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        &format!("{}/api/v1", server.uri()),
        Arc::new(NoToken),
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v1/sales/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7 })))
        .expect(1)
        .mount(&server)
        .await;

    let sale: serde_json::Value = client.get_record("sales", "7").await.unwrap();
    assert_eq!(sale["id"], 7);
}

// ── Error normalization ─────────────────────────────────────────────

#[tokio::test]
async fn test_server_message_is_preserved() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/clients"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "Client already exists" })),
        )
        .mount(&server)
        .await;

    let result = client
        .create_record::<serde_json::Value, _>("clients", &json!({ "companyName": "Acme" }))
        .await;

    match result {
        Err(Error::Api {
            status, message, ..
        }) => {
            assert_eq!(status, 409);
            assert_eq!(message, "Client already exists");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_message_list_is_joined() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/employees"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": ["email must be an email", "firstName should not be empty"],
            "error": "Bad Request"
        })))
        .mount(&server)
        .await;

    let err = client
        .create_record::<serde_json::Value, _>("employees", &json!({}))
        .await
        .unwrap_err();

    assert_eq!(
        err.user_message(),
        "email must be an email; firstName should not be empty"
    );
}

#[tokio::test]
async fn test_generic_fallback_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sales"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client
        .list::<serde_json::Value>("sales", 1, 10)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.user_message(), "Request failed with status 500");
}

#[tokio::test]
async fn test_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid token" })))
        .mount(&server)
        .await;

    let err = client.me::<serde_json::Value>().await.unwrap_err();

    assert!(err.is_unauthorized(), "expected Unauthorized, got: {err:?}");
    assert_eq!(err.user_message(), "Invalid token");
}

#[tokio::test]
async fn test_password_reset_flag_on_error_status() {
    let (server, client) = setup_with(Arc::new(NoToken)).await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "You must reset your password",
            "requiresPasswordReset": true
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "old-password".to_string().into();
    let result = client
        .login::<serde_json::Value>("staff@example.com", &secret)
        .await;

    assert!(
        matches!(result, Err(Error::PasswordResetRequired { .. })),
        "expected PasswordResetRequired, got: {result:?}"
    );
}

#[tokio::test]
async fn test_password_reset_flag_on_success_status() {
    let (server, client) = setup_with(Arc::new(NoToken)).await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "passwordResetRequired": true })),
        )
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "old-password".to_string().into();
    let result = client
        .login::<serde_json::Value>("staff@example.com", &secret)
        .await;

    assert!(matches!(result, Err(Error::PasswordResetRequired { .. })));
}

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup_with(Arc::new(NoToken)).await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "staff@example.com", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "jwt-abc",
            "user": { "id": 1, "email": "staff@example.com" }
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "hunter2".to_string().into();
    let resp = client
        .login::<serde_json::Value>("staff@example.com", &secret)
        .await
        .unwrap();

    use secrecy::ExposeSecret;
    assert_eq!(resp.access_token.expose_secret(), "jwt-abc");
    assert_eq!(resp.user["email"], "staff@example.com");
}

#[tokio::test]
async fn test_network_failure_is_generic() {
    // Nothing listens on port 9 on loopback in CI containers.
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        "http://127.0.0.1:9",
        Arc::new(NoToken),
    )
    .unwrap();

    let err = client
        .list::<serde_json::Value>("clients", 1, 10)
        .await
        .unwrap_err();

    assert!(err.is_network(), "expected network error, got: {err:?}");
    assert_eq!(err.user_message(), CONNECTIVITY_MESSAGE);
}
