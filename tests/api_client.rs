//! End-to-end tests for the API client over a real HTTP transport.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use petspot_core::application::use_cases::{DiscoveryService, SessionService};
use petspot_core::domain::value_objects::Coordinate;
use petspot_core::infrastructure::auth::{AuthGate, BearerToken, InMemoryTokenStore};
use petspot_core::infrastructure::http::{ApiClient, HttpTransport, ReqwestTransport};
use petspot_core::{ErrorKind, Recovery, RemoteResult};
use reqwest::Url;
use serde_json::{Value, json};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(base: &str, store: &InMemoryTokenStore) -> ApiClient {
    let gate = AuthGate::init(Arc::new(store.clone())).await;
    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(2_000).unwrap());
    ApiClient::new(Url::parse(base).unwrap(), transport, Arc::new(gate))
}

#[tokio::test]
async fn login_then_authenticated_request_carries_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "ana@example.com", "password": "hunter2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pets"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "p1"}])))
        .expect(1)
        .mount(&server)
        .await;

    let store = InMemoryTokenStore::new();
    let client = client_for(&server.uri(), &store).await;
    let session = SessionService::new(client.clone());

    assert!(session.login("ana@example.com", "hunter2").await.is_success());
    assert_eq!(store.snapshot().await, Some(BearerToken::new("abc")));

    let pets: RemoteResult<Vec<Value>> = client.get("pets").await;
    assert_eq!(pets.into_result().unwrap().len(), 1);
}

#[tokio::test]
async fn not_found_is_client_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pets/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such pet"))
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), &InMemoryTokenStore::new()).await;
    let result: RemoteResult<Value> = client.get("pets/missing").await;

    let err = result.error().unwrap();
    assert_eq!(err.kind(), ErrorKind::ClientError);
    assert_eq!(err.http_status(), Some(404));
    assert_eq!(err.message(), Some("no such pet"));
    assert_eq!(err.recovery(), Recovery::CorrectRequest);
}

#[tokio::test]
async fn service_unavailable_is_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), &InMemoryTokenStore::new()).await;
    let result: RemoteResult<Value> = client.get("anything").await;

    let err = result.error().unwrap();
    assert_eq!(err.kind(), ErrorKind::ServerError);
    assert_eq!(err.http_status(), Some(503));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn refused_connection_is_transport() {
    let client = client_for("http://127.0.0.1:1/", &InMemoryTokenStore::new()).await;
    let result: RemoteResult<Value> = client.get("pets").await;

    let err = result.error().unwrap();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.http_status(), None);
    assert_eq!(err.recovery(), Recovery::CheckConnection);
}

#[tokio::test]
async fn unauthorized_clears_token_and_notifies_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .expect(2)
        .mount(&server)
        .await;

    let store = InMemoryTokenStore::with_token("abc");
    let client = client_for(&server.uri(), &store).await;
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    client.gate().on_session_invalidated(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let first: RemoteResult<Value> = client.get("cart").await;
    assert_eq!(first.error().unwrap().recovery(), Recovery::Reauthenticate);
    let second: RemoteResult<Value> = client.get("cart").await;
    assert!(second.is_error());

    assert_eq!(client.gate().token().await, None);
    assert_eq!(store.snapshot().await, None);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn nearby_search_ranks_server_candidates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/providers/nearby"))
        .and(query_param("lat", "0"))
        .and(query_param("lon", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "v2", "name": "Closed", "location": {"lat": 0.0005, "lon": 0.0},
             "openNow": false},
            {"id": "v1", "name": "Open", "location": {"lat": 0.001, "lon": 0.0}, "openNow": true}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), &InMemoryTokenStore::new()).await;
    let discovery = DiscoveryService::new(client, NonZeroUsize::new(10).unwrap());
    let origin = Coordinate::new(0.0, 0.0).unwrap();

    let ranked = discovery
        .search_nearby(origin, &discovery.default_filter().open_now_only())
        .await
        .into_result()
        .unwrap();

    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked.entries()[0].provider().id().as_str(), "v1");
    assert_eq!(ranked.entries()[0].distance_meters(), 111);
}
