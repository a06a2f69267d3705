#![allow(clippy::unwrap_used)]
// Route guard and auth slice against a mock API.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bizdesk_api::TokenProvider;
use bizdesk_core::{
    ClientConfig, CoreError, Dashboard, ErrorKind, GuardDecision, GuardState, LoginRequest,
    MemorySessionStorage, StoredSession,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn dashboard(server: &MockServer, storage: MemorySessionStorage) -> Dashboard {
    let config = ClientConfig::new(Url::parse(&server.uri()).unwrap());
    Dashboard::new(config, storage).unwrap()
}

fn stored(token: &str) -> MemorySessionStorage {
    MemorySessionStorage::with_session(StoredSession {
        token: token.into(),
        user: None,
    })
}

fn login(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.into(),
        password: SecretString::from(password.to_owned()),
    }
}

async fn mount_me(server: &MockServer, status: u16) {
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "email": "staff@example.com", "firstName": "Ada"
        }))
    } else {
        ResponseTemplate::new(status).set_body_json(json!({ "message": "Invalid token" }))
    };
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(template)
        .mount(server)
        .await;
}

// ── Guard ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_no_token_on_protected_route_redirects_to_login() {
    let server = MockServer::start().await;
    let dash = dashboard(&server, MemorySessionStorage::new());

    let decision = dash.guard().evaluate("/clients").await;

    assert_eq!(decision, GuardDecision::Redirect("/login".into()));
    assert_eq!(dash.guard().state(), GuardState::Unauthenticated);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_no_token_on_public_route_renders() {
    let server = MockServer::start().await;
    let dash = dashboard(&server, MemorySessionStorage::new());

    assert_eq!(
        dash.guard().evaluate("/forgot-password").await,
        GuardDecision::Render
    );
}

#[tokio::test]
async fn test_stored_token_is_probed_then_restored() {
    let server = MockServer::start().await;
    mount_me(&server, 200).await;
    let dash = dashboard(&server, stored("jwt-ok"));
    assert!(!dash.session().is_authenticated());

    let decision = dash.guard().evaluate("/clients").await;

    assert_eq!(decision, GuardDecision::Render);
    assert_eq!(dash.guard().state(), GuardState::Authenticated);
    assert!(dash.session().is_authenticated());
    assert_eq!(dash.session().user().unwrap().email, "staff@example.com");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].headers.get("authorization").unwrap(),
        "Bearer jwt-ok"
    );
}

#[tokio::test]
async fn test_authenticated_user_is_sent_home_from_login() {
    let server = MockServer::start().await;
    let dash = dashboard(&server, stored("jwt-ok"));
    dash.init().unwrap();

    assert_eq!(
        dash.guard().evaluate("/login").await,
        GuardDecision::Redirect("/".into())
    );
    // Already authenticated: no probe needed.
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_token_is_torn_down() {
    let server = MockServer::start().await;
    mount_me(&server, 401).await;
    let dash = dashboard(&server, stored("jwt-expired"));

    let decision = dash.guard().evaluate("/sales").await;

    assert_eq!(decision, GuardDecision::Redirect("/login".into()));
    assert!(!dash.session().is_authenticated());
    assert!(dash.session().bearer_token().is_none());
}

#[tokio::test]
async fn test_rejected_token_on_public_route_still_renders() {
    let server = MockServer::start().await;
    mount_me(&server, 401).await;
    let dash = dashboard(&server, stored("jwt-expired"));

    assert_eq!(dash.guard().evaluate("/login").await, GuardDecision::Render);
    assert!(dash.session().stored_token().is_none());
}

#[tokio::test]
async fn test_handle_unauthorized_clears_session() {
    let server = MockServer::start().await;
    let dash = dashboard(&server, stored("jwt-ok"));
    dash.init().unwrap();

    let decision = dash.guard().handle_unauthorized("/products");

    assert_eq!(decision, GuardDecision::Redirect("/login".into()));
    assert!(!dash.session().is_authenticated());
    assert_eq!(dash.guard().state(), GuardState::Unauthenticated);
}

// ── Auth slice ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_establishes_session_used_by_later_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "jwt-new",
            "user": { "id": 3, "email": "staff@example.com" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .and(header("authorization", "Bearer jwt-new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let dash = dashboard(&server, MemorySessionStorage::new());
    let user = dash
        .auth()
        .login(&login(" staff@example.com ", "hunter2"))
        .await
        .unwrap();

    assert_eq!(user.email, "staff@example.com");
    let state = dash.auth().state();
    assert!(state.is_authenticated);
    assert!(!state.is_loading);
    assert_eq!(
        dash.session().stored_token().unwrap().expose_secret(),
        "jwt-new"
    );

    dash.store().clients.fetch_list(1, 10).await.unwrap();
}

#[tokio::test]
async fn test_login_flags_password_reset() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "Password change required",
            "code": "PASSWORD_RESET_REQUIRED"
        })))
        .mount(&server)
        .await;

    let dash = dashboard(&server, MemorySessionStorage::new());
    let err = dash
        .auth()
        .login(&login("staff@example.com", "temp"))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::PasswordResetRequired { .. }));
    let state = dash.auth().state();
    assert!(state.password_reset_required);
    assert!(!state.is_authenticated);
    assert_eq!(state.error.as_deref(), Some("Password change required"));
}

#[tokio::test]
async fn test_login_validation_skips_network() {
    let server = MockServer::start().await;
    let dash = dashboard(&server, MemorySessionStorage::new());

    let err = dash.auth().login(&login("nope", "")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.field_errors().unwrap().len(), 2);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_logout_clears_session_and_cached_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "id": 1, "companyName": "Acme" }])),
        )
        .mount(&server)
        .await;

    let dash = dashboard(&server, stored("jwt-ok"));
    dash.init().unwrap();
    dash.store().clients.fetch_list(1, 10).await.unwrap();
    assert_eq!(dash.store().clients.snapshot().items.len(), 1);

    dash.auth().logout().unwrap();

    assert!(!dash.session().is_authenticated());
    assert!(dash.session().stored_token().is_none());
    assert!(dash.store().clients.snapshot().items.is_empty());
    assert!(!dash.auth().state().is_authenticated);
}
