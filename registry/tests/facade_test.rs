//! Integration tests for the registry facade routes
//!
//! Requests are driven in-process through the axum router.

use axum::http::StatusCode;
use serde_json::json;

use registry::traits::MockDescriptorStore;
use registry::{Catalog, InMemoryStore, RegistryError};

mod common;
use common::{data_names, fixture_router, get_json, post_json, router_for};

const LIST: &str = "/nacos/v3/admin/ai/mcp/list";
const GET: &str = "/nacos/v3/admin/ai/mcp";
const SEARCH: &str = "/nacos/v3/admin/ai/mcp/search";
const TOOLS: &str = "/nacos/v3/admin/ai/mcp/tools";

#[tokio::test]
async fn test_list_defaults_pagination() {
    let router = fixture_router();

    let (status, json) = get_json(&router, LIST).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["code"], 200);
    assert_eq!(json["message"], "success");
    assert_eq!(json["data"]["pageNo"], 1);
    assert_eq!(json["data"]["pageSize"], 100);
    assert_eq!(json["data"]["totalCount"], 3);
    assert_eq!(json["data"]["pageItems"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_items_are_summaries() {
    let router = fixture_router();

    let (_, json) = get_json(&router, LIST).await;
    let first = &json["data"]["pageItems"][0];

    assert_eq!(first["name"], "exact-server-name");
    assert_eq!(first["enabled"], true);
    assert_eq!(first["protocol"], "stdio");
    assert!(first["createTime"].is_string());
    assert!(first["updateTime"].is_string());
    assert!(first.get("localServerConfig").is_none());
}

#[tokio::test]
async fn test_list_paginates() {
    let router = fixture_router();

    let (status, json) = get_json(&router, &format!("{LIST}?pageNo=2&pageSize=2")).await;

    assert_eq!(status, StatusCode::OK);
    let items = json["data"]["pageItems"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "file-server");
    assert_eq!(json["data"]["totalCount"], 3);
}

#[tokio::test]
async fn test_list_beyond_last_page_is_empty_success() {
    let router = fixture_router();

    let (status, json) = get_json(&router, &format!("{LIST}?pageNo=9&pageSize=10")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["pageItems"], json!([]));
    assert_eq!(json["data"]["totalCount"], 3);
}

#[tokio::test]
async fn test_list_non_numeric_pagination_uses_defaults() {
    let router = fixture_router();

    let (status, json) = get_json(&router, &format!("{LIST}?pageNo=abc&pageSize=")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["pageNo"], 1);
    assert_eq!(json["data"]["pageSize"], 100);
    assert_eq!(json["data"]["pageItems"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_repeated_pagination_keys_use_first_value() {
    let router = fixture_router();

    let (status, json) = get_json(&router, &format!("{LIST}?pageNo=1&pageNo=2&pageSize=2&pageSize=1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["code"], 200);
    assert_eq!(json["data"]["pageNo"], 1);
    assert_eq!(json["data"]["pageSize"], 2);
    assert_eq!(json["data"]["pageItems"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_fractional_or_suffixed_pagination_uses_defaults() {
    let router = fixture_router();

    let (status, json) = get_json(&router, &format!("{LIST}?pageNo=2abc&pageSize=1.5")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["pageNo"], 1);
    assert_eq!(json["data"]["pageSize"], 100);
}

#[tokio::test]
async fn test_list_empty_catalog_is_success() {
    let router = router_for(InMemoryStore::new(Catalog::new()));

    let (status, json) = get_json(&router, LIST).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["code"], 200);
    assert_eq!(json["data"]["pageItems"], json!([]));
    assert_eq!(json["data"]["totalCount"], 0);
}

#[tokio::test]
async fn test_get_hit_returns_full_descriptor() {
    let router = fixture_router();

    let (status, json) = get_json(&router, &format!("{GET}?mcpName=exact-server-name")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["code"], 200);
    assert_eq!(json["message"], "success");
    assert_eq!(json["data"]["name"], "exact-server-name");
    assert_eq!(json["data"]["backendEndpoints"], json!([]));
    assert_eq!(json["data"]["localServerConfig"]["command"], "node");
    assert_eq!(json["data"]["localServerConfig"]["args"], json!(["test-server.js"]));
}

#[tokio::test]
async fn test_get_miss_is_domain_not_found() {
    let router = fixture_router();

    let (status, json) = get_json(&router, &format!("{GET}?mcpName=no-such-name")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({"code": 404, "message": "MCP server not found", "data": null}));
}

#[tokio::test]
async fn test_get_without_name_is_not_found() {
    let router = fixture_router();

    let (status, json) = get_json(&router, GET).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["data"].is_null());
}

#[tokio::test]
async fn test_get_repeated_name_uses_first_value() {
    let router = fixture_router();

    let (status, json) = get_json(&router, &format!("{GET}?mcpName=file-server&mcpName=no-such-name")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "file-server");
}

#[tokio::test]
async fn test_search_by_description() {
    let router = fixture_router();

    let (status, json) = get_json(&router, &format!("{SEARCH}?keyword=database")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data_names(&json), vec!["database-query-server"]);
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let router = fixture_router();

    let (_, lower) = get_json(&router, &format!("{SEARCH}?keyword=database")).await;
    let (_, upper) = get_json(&router, &format!("{SEARCH}?keyword=DATABASE")).await;

    assert_eq!(lower["data"], upper["data"]);
}

#[tokio::test]
async fn test_search_without_keyword_returns_everything() {
    let router = fixture_router();

    let (_, missing) = get_json(&router, SEARCH).await;
    let (_, empty) = get_json(&router, &format!("{SEARCH}?keyword=")).await;

    assert_eq!(data_names(&missing), vec!["exact-server-name", "database-query-server", "file-server"]);
    assert_eq!(missing["data"], empty["data"]);
}

#[tokio::test]
async fn test_search_repeated_keyword_uses_first_value() {
    let router = fixture_router();

    let (status, json) = get_json(&router, &format!("{SEARCH}?keyword=database&keyword=blockchain")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(data_names(&json), vec!["database-query-server"]);
}

#[tokio::test]
async fn test_search_unmatched_keyword_is_empty_success() {
    let router = fixture_router();

    let (status, json) = get_json(&router, &format!("{SEARCH}?keyword=blockchain")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"], json!([]));
}

#[tokio::test]
async fn test_tools_update_acknowledges_count() {
    let router = fixture_router();
    let body = json!({"mcpName": "file-server", "tools": [{"name": "read"}, {"name": "write"}]});

    let (status, json) = post_json(&router, TOOLS, &body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["code"], 200);
    assert_eq!(json["message"], "Tools updated successfully");
    assert_eq!(json["data"], json!({"mcpName": "file-server", "toolsCount": 2}));
}

#[tokio::test]
async fn test_tools_update_without_tools_counts_zero() {
    let router = fixture_router();

    let (status, json) = post_json(&router, TOOLS, r#"{"mcpName":"file-server"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["toolsCount"], 0);
}

#[tokio::test]
async fn test_tools_update_is_idempotent() {
    let router = fixture_router();
    let body = json!({"mcpName": "database-query-server", "tools": [{"name": "query"}]}).to_string();
    let get_uri = format!("{GET}?mcpName=database-query-server");

    post_json(&router, TOOLS, &body).await;
    let (_, after_first) = get_json(&router, &get_uri).await;
    let (_, list_first) = get_json(&router, LIST).await;

    post_json(&router, TOOLS, &body).await;
    let (_, after_second) = get_json(&router, &get_uri).await;
    let (_, list_second) = get_json(&router, LIST).await;

    assert_eq!(after_first, after_second);
    assert_eq!(list_first, list_second);
    assert_eq!(after_second["data"]["tools"], json!([{"name": "query"}]));
}

#[tokio::test]
async fn test_tools_update_unknown_name_is_rejected() {
    let router = fixture_router();

    let (status, json) = post_json(&router, TOOLS, r#"{"mcpName":"ghost","tools":[]}"#).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], 404);
    assert!(json["data"].is_null());
}

#[tokio::test]
async fn test_tools_update_unknown_name_in_permissive_mode() {
    let store = InMemoryStore::new(registry::fixtures::fixture_catalog().unwrap())
        .with_permissive_tools_update(true);
    let router = router_for(store);

    let (status, json) = post_json(&router, TOOLS, r#"{"mcpName":"ghost"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"], json!({"mcpName": "ghost", "toolsCount": 0}));
}

#[tokio::test]
async fn test_tools_update_malformed_body_is_bad_request() {
    let router = fixture_router();

    let (not_json, json) = post_json(&router, TOOLS, "{not json").await;
    assert_eq!(not_json, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], 400);
    assert!(json["data"].is_null());

    let (missing_name, _) = post_json(&router, TOOLS, r#"{"tools":[]}"#).await;
    assert_eq!(missing_name, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_store_failure_is_distinct_from_not_found() {
    let mut store = MockDescriptorStore::new();
    store
        .expect_get()
        .returning(|_| Err(RegistryError::InternalError("disk on fire".to_string())));
    store.expect_search().returning(|_| Ok(vec![]));
    let router = router_for(store);

    let (status, json) = get_json(&router, &format!("{GET}?mcpName=file-server")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({"code": 500, "message": "Registry internal error", "data": null}));

    let (status, _) = get_json(&router, &format!("{SEARCH}?keyword=x")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_tools_update_forwards_empty_tools_to_store() {
    let mut store = MockDescriptorStore::new();
    store
        .expect_update_tools()
        .withf(|name, tools| name == "file-server" && tools.is_empty())
        .times(1)
        .returning(|name, tools| {
            Ok(shared::ToolsUpdateAck {
                mcp_name: name.to_string(),
                tools_count: tools.len(),
            })
        });
    let router = router_for(store);

    let (status, json) = post_json(&router, TOOLS, r#"{"mcpName":"file-server","tools":null}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["toolsCount"], 0);
}

#[tokio::test]
async fn test_health_check() {
    let router = fixture_router();

    let (status, json) = get_json(&router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}
