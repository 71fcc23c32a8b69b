//! Shared helpers for registry integration tests
#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;

use registry::{DescriptorStore, InMemoryStore, RegistryServer, RegistryState, fixtures};

pub fn test_address() -> SocketAddr {
    "127.0.0.1:0".parse().unwrap()
}

/// Router over the three-entry fixture catalog
pub fn fixture_router() -> Router {
    let store = InMemoryStore::new(fixtures::fixture_catalog().unwrap());
    router_for(store)
}

pub fn router_for<S: DescriptorStore + 'static>(store: S) -> Router {
    let server = RegistryServer::new(store, test_address());
    server.build_router(Arc::new(RegistryState::new(test_address())))
}

/// Issue a GET and decode the JSON body
pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(router, request).await
}

/// Issue a POST with a raw body and decode the JSON response
pub async fn post_json(router: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Names in a `data` array, in response order
pub fn data_names(json: &Value) -> Vec<String> {
    json["data"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["name"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
