#![allow(clippy::unwrap_used)]
// Slice and page-container behaviour against a mock API.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bizdesk_core::{
    Client, ClientConfig, ClientIntegration, CoreError, CreateClientRequest, Dashboard, EntityId,
    ErrorKind, FetchOutcome, MemorySessionStorage, StoredSession,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn signed_in() -> MemorySessionStorage {
    MemorySessionStorage::with_session(StoredSession {
        token: "jwt-1".into(),
        user: None,
    })
}

fn dashboard(server: &MockServer) -> Dashboard {
    let config = ClientConfig::new(Url::parse(&server.uri()).unwrap());
    let dash = Dashboard::new(config, signed_in()).unwrap();
    dash.init().unwrap();
    dash
}

fn client_page(page: u32, names: &[&str]) -> serde_json::Value {
    let data: Vec<_> = names
        .iter()
        .enumerate()
        .map(|(i, name)| json!({ "id": i + 1, "companyName": name }))
        .collect();
    json!({ "data": data, "meta": { "page": page, "limit": 10, "total": 25 } })
}

async fn requests_to(server: &MockServer, verb: &str, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == verb && r.url.path() == route)
        .count()
}

/// `page` query values of every list request, in arrival order.
async fn pages_requested(server: &MockServer, route: &str) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == "GET" && r.url.path() == route)
        .filter_map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "page")
                .map(|(_, v)| v.into_owned())
        })
        .collect()
}

// ── Fetching ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_list_sends_token_and_applies_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "10"))
        .and(header("authorization", "Bearer jwt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(client_page(1, &["Acme", "Globex"])))
        .expect(1)
        .mount(&server)
        .await;

    let dash = dashboard(&server);
    let mut page = dash.page::<Client>();
    assert_eq!(page.mount().await.unwrap(), FetchOutcome::Applied);

    let state = page.state();
    assert!(!state.is_loading);
    assert_eq!(state.items.len(), 2);
    let meta = state.pagination.unwrap();
    assert_eq!((meta.page, meta.total), (1, 25));
}

#[tokio::test]
async fn test_fetch_failure_keeps_previous_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(client_page(1, &["Acme"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "db down" })))
        .mount(&server)
        .await;

    let dash = dashboard(&server);
    let mut page = dash.page::<Client>();
    page.mount().await.unwrap();

    let err = page.set_page(2).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);

    let state = page.state();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].company_name, "Acme");
    assert_eq!(state.error.as_deref(), Some("db down"));
    assert_eq!(state.pagination.unwrap().page, 1);

    page.unmount();
    assert!(page.state().error.is_none());
}

#[tokio::test]
async fn test_slow_page_does_not_overwrite_newer_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(client_page(1, &["Old"]))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(client_page(2, &["New"])))
        .mount(&server)
        .await;

    let dash = dashboard(&server);
    let slice = Arc::clone(&dash.store().clients);

    let slow = tokio::spawn({
        let slice = Arc::clone(&slice);
        async move { slice.fetch_list(1, 10).await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(slice.fetch_list(2, 10).await.unwrap(), FetchOutcome::Applied);
    assert_eq!(slow.await.unwrap().unwrap(), FetchOutcome::Superseded);

    let state = slice.snapshot();
    assert_eq!(state.items[0].company_name, "New");
    assert_eq!(state.pagination.unwrap().page, 2);
}

// ── Integrations scope ──────────────────────────────────────────────

#[tokio::test]
async fn test_switching_client_never_shows_previous_integrations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/integrations"))
        .and(query_param("clientId", "client-a"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([
                    { "id": "a1", "clientId": "client-a", "label": "FTP", "value": "a" }
                ]))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/integrations"))
        .and(query_param("clientId", "client-b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "b1", "clientId": "client-b", "label": "VPN", "value": "b" },
            { "id": "b2", "clientId": "client-b", "label": "SSH", "value": "b" }
        ])))
        .mount(&server)
        .await;

    let dash = dashboard(&server);
    let slice = Arc::clone(&dash.store().integrations);
    let watcher = slice.subscribe();

    let first = tokio::spawn({
        let slice = Arc::clone(&slice);
        async move { slice.select_scope(EntityId::from("client-a"), 10).await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    slice
        .select_scope(EntityId::from("client-b"), 10)
        .await
        .unwrap();
    assert_eq!(first.await.unwrap().unwrap(), FetchOutcome::Superseded);

    let state = watcher.latest();
    assert_eq!(state.scope, Some(EntityId::from("client-b")));
    assert_eq!(state.items.len(), 2);
    assert!(
        state
            .items
            .iter()
            .all(|i: &ClientIntegration| i.client_id == EntityId::from("client-b"))
    );
}

#[tokio::test]
async fn test_select_scope_clears_rows_before_fetch_resolves() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/integrations"))
        .and(query_param("clientId", "c-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "x", "clientId": "c-1", "label": "FTP", "value": "pw" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/integrations"))
        .and(query_param("clientId", "c-2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let dash = dashboard(&server);
    let slice = Arc::clone(&dash.store().integrations);
    slice.select_scope(EntityId::from("c-1"), 10).await.unwrap();
    assert_eq!(slice.snapshot().items.len(), 1);

    let pending = tokio::spawn({
        let slice = Arc::clone(&slice);
        async move { slice.select_scope(EntityId::from("c-2"), 10).await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let mid = slice.snapshot();
    assert!(mid.is_loading);
    assert!(mid.items.is_empty());
    assert_eq!(mid.scope, Some(EntityId::from("c-2")));

    pending.await.unwrap().unwrap();
    assert!(!slice.snapshot().is_loading);
}

#[tokio::test]
async fn test_lookup_from_previous_client_is_not_selected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/integrations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/integrations/a9"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": "a9", "clientId": "client-a", "label": "FTP", "value": "a" }))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/integrations/b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({ "id": "b1", "clientId": "client-b", "label": "VPN", "value": "b" }),
        ))
        .mount(&server)
        .await;

    let dash = dashboard(&server);
    let slice = Arc::clone(&dash.store().integrations);
    slice
        .select_scope(EntityId::from("client-a"), 10)
        .await
        .unwrap();

    let lookup = tokio::spawn({
        let slice = Arc::clone(&slice);
        async move { slice.fetch_one(&EntityId::from("a9")).await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    slice
        .select_scope(EntityId::from("client-b"), 10)
        .await
        .unwrap();

    // The caller still gets its record; the new scope's state does not.
    assert_eq!(lookup.await.unwrap().unwrap().id, EntityId::from("a9"));
    let state = slice.snapshot();
    assert_eq!(state.scope, Some(EntityId::from("client-b")));
    assert!(state.selected.is_none());

    slice.fetch_one(&EntityId::from("b1")).await.unwrap();
    assert_eq!(
        slice.snapshot().selected.as_ref().map(|i| i.id.clone()),
        Some(EntityId::from("b1"))
    );
}

#[tokio::test]
async fn test_scope_on_unscoped_collection_is_unsupported() {
    let server = MockServer::start().await;
    let dash = dashboard(&server);
    let err = dash
        .store()
        .clients
        .select_scope(EntityId::from(1_i64), 10)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Unsupported { .. }));
}

// ── Dialog flow ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_refetches_current_page_once_then_closes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(client_page(1, &["Acme"])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/clients"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": 99, "companyName": "Globex" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dash = dashboard(&server);
    let mut page = dash.page::<Client>();
    page.mount().await.unwrap();
    assert_eq!(requests_to(&server, "GET", "/clients").await, 1);

    page.open_create();
    let created = page
        .submit_create(&CreateClientRequest {
            company_name: "Globex".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(created.company_name, "Globex");
    assert_eq!(requests_to(&server, "GET", "/clients").await, 2);
    assert!(!page.dialog().is_open());
}

#[tokio::test]
async fn test_blank_company_name_never_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let dash = dashboard(&server);
    let mut page = dash.page::<Client>();
    page.open_create();

    let err = page
        .submit_create(&CreateClientRequest::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(page.dialog().is_open());
    assert!(page.dialog().field_errors.get("companyName").is_some());
    assert!(page.dialog().error.is_none());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_refetches_current_page_once_then_closes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(client_page(2, &["Acme"])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/clients/1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": 1, "companyName": "Acme Ltd" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dash = dashboard(&server);
    let mut page = dash.page::<Client>();
    page.set_page(2).await.unwrap();
    page.open_edit(&EntityId::from(1_i64)).await.unwrap();

    let updated = page
        .submit_update(&bizdesk_core::UpdateClientRequest {
            company_name: Some("Acme Ltd".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(updated.company_name, "Acme Ltd");
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].method.as_str(), "PATCH");
    assert_eq!(requests[2].method.as_str(), "GET");
    assert_eq!(pages_requested(&server, "/clients").await, ["2", "2"]);
    assert!(!page.dialog().is_open());
}

#[tokio::test]
async fn test_failed_lookup_is_reported_on_the_dialog_not_the_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(client_page(1, &["Acme"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/clients/99"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "boom" })))
        .expect(1)
        .mount(&server)
        .await;

    let dash = dashboard(&server);
    let mut page = dash.page::<Client>();
    page.mount().await.unwrap();

    let err = page.open_edit(&EntityId::from(99_i64)).await.unwrap_err();
    assert_eq!(err.to_string(), "boom");

    assert!(!page.dialog().is_open());
    assert_eq!(page.dialog().error.as_deref(), Some("boom"));
    let state = page.state();
    assert!(state.error.is_none());
    assert_eq!(state.items.len(), 1);
}

#[tokio::test]
async fn test_failed_update_keeps_dialog_open_with_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(client_page(1, &["Acme"])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/clients/1"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "Name already taken" })),
        )
        .mount(&server)
        .await;

    let dash = dashboard(&server);
    let mut page = dash.page::<Client>();
    page.mount().await.unwrap();
    page.open_edit(&EntityId::from(1_i64)).await.unwrap();

    let err = page
        .submit_update(&bizdesk_core::UpdateClientRequest {
            company_name: Some("Globex".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Name already taken");
    assert!(page.dialog().is_open());
    assert_eq!(page.dialog().error.as_deref(), Some("Name already taken"));
    // Mutation failures stay out of the list error.
    assert!(page.state().error.is_none());
    assert_eq!(requests_to(&server, "GET", "/clients").await, 1);
}

#[tokio::test]
async fn test_delete_integration_refetches_selected_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/integrations"))
        .and(query_param("clientId", "c-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "X", "clientId": "c-7", "label": "FTP", "value": "pw" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/integrations/X"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let dash = dashboard(&server);
    let mut page = dash.page::<ClientIntegration>();
    page.select_client(EntityId::from("c-7")).await.unwrap();
    page.open_delete(&EntityId::from("X")).await.unwrap();
    page.confirm_delete().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].method.as_str(), "DELETE");
    assert_eq!(requests[1].url.path(), "/integrations/X");
    assert_eq!(requests[2].method.as_str(), "GET");
    assert_eq!(requests[2].url.query(), Some("clientId=c-7"));
    assert!(!page.dialog().is_open());
}

#[tokio::test]
async fn test_search_filters_current_page_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(client_page(1, &["Acme", "Globex", "Acme West"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dash = dashboard(&server);
    let mut page = dash.page::<Client>();
    page.mount().await.unwrap();

    page.set_search("acme");
    assert_eq!(page.visible_rows().len(), 2);
    page.set_search("");
    assert_eq!(page.visible_rows().len(), 3);
    assert_eq!(page.state().pagination.unwrap().total, 25);
}

// ── Pagination ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_next_page_stops_at_last_page() {
    let server = MockServer::start().await;
    // 25 rows at 10 per page: three pages.
    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(client_page(1, &["Acme"])))
        .mount(&server)
        .await;

    let dash = dashboard(&server);
    let mut page = dash.page::<Client>();
    page.mount().await.unwrap();

    assert_eq!(page.next_page().await.unwrap(), FetchOutcome::Applied);
    assert_eq!(page.next_page().await.unwrap(), FetchOutcome::Applied);
    assert_eq!(page.page(), 3);

    assert_eq!(page.next_page().await.unwrap(), FetchOutcome::Skipped);
    assert_eq!(page.page(), 3);
    assert_eq!(pages_requested(&server, "/clients").await, ["1", "2", "3"]);
}

#[tokio::test]
async fn test_prev_page_stops_at_first_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(client_page(1, &["Acme"])))
        .mount(&server)
        .await;

    let dash = dashboard(&server);
    let mut page = dash.page::<Client>();
    page.mount().await.unwrap();

    assert_eq!(page.prev_page().await.unwrap(), FetchOutcome::Skipped);
    assert_eq!(page.page(), 1);

    page.set_page(2).await.unwrap();
    assert_eq!(page.prev_page().await.unwrap(), FetchOutcome::Applied);
    assert_eq!(page.page(), 1);
    assert_eq!(pages_requested(&server, "/clients").await, ["1", "2", "1"]);
}
