//! Registry facade HTTP handlers
//!
//! Domain misses are answered with a 404 envelope; store malfunctions with a
//! 500 envelope, so callers can tell the two apart.

use axum::{
    extract::{RawQuery, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde_json::{Value, json};
use std::sync::Arc;

use shared::messages::{MSG_INTERNAL, MSG_TOOLS_UPDATED};
use shared::{
    ApiResponse, PageData, PageRequest, ProcessId, ServiceDescriptor, ToolsUpdateAck,
    ToolsUpdateRequest, process_debug, process_error,
};

use crate::error::RegistryError;
use crate::state::RegistryState;
use crate::traits::DescriptorStore;

pub const LIST_PATH: &str = "/nacos/v3/admin/ai/mcp/list";
pub const GET_PATH: &str = "/nacos/v3/admin/ai/mcp";
pub const SEARCH_PATH: &str = "/nacos/v3/admin/ai/mcp/search";
pub const TOOLS_PATH: &str = "/nacos/v3/admin/ai/mcp/tools";
pub const HEALTH_PATH: &str = "/health";

type Reply<T> = (StatusCode, Json<ApiResponse<T>>);

/// State shared by all facade handlers
pub struct RegistryApp<S> {
    pub store: Arc<S>,
    pub state: Arc<RegistryState>,
}

impl<S> Clone for RegistryApp<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            state: Arc::clone(&self.state),
        }
    }
}

/// Query parameters decoded without rejecting anything: repeated keys keep
/// their first value and malformed escapes are kept literally.
#[derive(Debug, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|query| url::form_urlencoded::parse(query.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self { pairs }
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

fn ok<T>(data: T) -> Reply<T> {
    (StatusCode::OK, Json(ApiResponse::success(data)))
}

fn not_found<T>() -> Reply<T> {
    (StatusCode::NOT_FOUND, Json(ApiResponse::not_found()))
}

fn internal_error<T>(operation: &str, err: &RegistryError) -> Reply<T> {
    process_error!(ProcessId::current(), "Registry {} failed: {}", operation, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::failure(500, MSG_INTERNAL)),
    )
}

/// GET list?pageNo&pageSize
pub async fn list_servers<S>(
    State(app): State<RegistryApp<S>>,
    RawQuery(raw): RawQuery,
) -> Reply<PageData>
where
    S: DescriptorStore + 'static,
{
    let query = QueryParams::parse(raw.as_deref());
    let page = PageRequest::from_raw(query.first("pageNo"), query.first("pageSize"));
    process_debug!(
        ProcessId::current(),
        "Received MCP list request (pageNo={}, pageSize={})",
        page.page_no,
        page.page_size
    );

    match app.store.list(page).await {
        Ok(data) => ok(data),
        Err(err) => internal_error("list", &err),
    }
}

/// GET ?mcpName
pub async fn get_server<S>(
    State(app): State<RegistryApp<S>>,
    RawQuery(raw): RawQuery,
) -> Reply<ServiceDescriptor>
where
    S: DescriptorStore + 'static,
{
    let query = QueryParams::parse(raw.as_deref());
    let Some(name) = query.first("mcpName") else {
        return not_found();
    };
    process_debug!(ProcessId::current(), "Received request for MCP server: {}", name);

    match app.store.get(name).await {
        Ok(Some(descriptor)) => ok(descriptor),
        Ok(None) => not_found(),
        Err(err) => internal_error("get", &err),
    }
}

/// GET search?keyword
pub async fn search_servers<S>(
    State(app): State<RegistryApp<S>>,
    RawQuery(raw): RawQuery,
) -> Reply<Vec<ServiceDescriptor>>
where
    S: DescriptorStore + 'static,
{
    let query = QueryParams::parse(raw.as_deref());
    let keyword = query.first("keyword").unwrap_or_default();
    process_debug!(ProcessId::current(), "Received search request for keyword: {}", keyword);

    match app.store.search(keyword).await {
        Ok(found) => ok(found),
        Err(err) => internal_error("search", &err),
    }
}

/// POST tools {mcpName, tools?}
pub async fn update_tools<S>(
    State(app): State<RegistryApp<S>>,
    payload: Result<Json<ToolsUpdateRequest>, JsonRejection>,
) -> Reply<ToolsUpdateAck>
where
    S: DescriptorStore + 'static,
{
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure(400, rejection.body_text())),
            );
        }
    };

    let tools = request.tools.unwrap_or_default();
    process_debug!(
        ProcessId::current(),
        "Received tools update for {} ({} tools)",
        request.mcp_name,
        tools.len()
    );

    match app.store.update_tools(&request.mcp_name, tools).await {
        Ok(ack) => (
            StatusCode::OK,
            Json(ApiResponse::with_message(MSG_TOOLS_UPDATED, ack)),
        ),
        Err(err) if err.is_not_found() => not_found(),
        Err(err) => internal_error("tools update", &err),
    }
}

/// Health check endpoint
pub async fn health_check<S>(State(app): State<RegistryApp<S>>) -> Json<Value>
where
    S: DescriptorStore + 'static,
{
    Json(json!({
        "status": "healthy",
        "uptime": app.state.get_uptime_seconds(),
    }))
}
