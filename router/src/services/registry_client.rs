//! HTTP implementation of `RegistryClient` against the registry facade

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use shared::{ApiResponse, PageData, PageRequest, ProcessId, ServiceDescriptor, process_debug};

use crate::error::{RouterError, RouterResult};
use crate::traits::RegistryClient;

const LIST_PATH: &str = "nacos/v3/admin/ai/mcp/list";
const GET_PATH: &str = "nacos/v3/admin/ai/mcp";
const SEARCH_PATH: &str = "nacos/v3/admin/ai/mcp/search";

pub struct HttpRegistryClient {
    http: reqwest::Client,
    list_url: Url,
    get_url: Url,
    search_url: Url,
}

impl HttpRegistryClient {
    pub fn new(base_url: &Url, request_timeout: Duration) -> RouterResult<Self> {
        let mut base = base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = reqwest::Client::builder().timeout(request_timeout).build()?;

        Ok(Self {
            http,
            list_url: base.join(LIST_PATH)?,
            get_url: base.join(GET_PATH)?,
            search_url: base.join(SEARCH_PATH)?,
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: &Url,
        query: &[(&str, String)],
    ) -> RouterResult<Option<T>> {
        process_debug!(ProcessId::current(), "GET {} {:?}", url, query);
        let response = self.http.get(url.clone()).query(query).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            // Only the registry's own miss envelope means "no such service"
            return match response.json::<ApiResponse<Value>>().await {
                Ok(envelope) if envelope.code == 404 => Ok(None),
                _ => Err(RouterError::registry(format!(
                    "{} returned 404 without a registry envelope",
                    url.path()
                ))),
            };
        }
        if !status.is_success() {
            return Err(RouterError::registry(format!("{} returned {}", url.path(), status)));
        }

        let envelope: ApiResponse<T> = response.json().await.map_err(|e| {
            RouterError::registry(format!("malformed payload from {}: {}", url.path(), e))
        })?;
        if !envelope.is_success() {
            return Err(RouterError::registry(format!(
                "{} answered code {}: {}",
                url.path(),
                envelope.code,
                envelope.message
            )));
        }
        Ok(envelope.data)
    }

    fn required<T>(data: Option<T>, url: &Url) -> RouterResult<T> {
        data.ok_or_else(|| RouterError::registry(format!("{} returned no data", url.path())))
    }
}

#[async_trait]
impl RegistryClient for HttpRegistryClient {
    async fn list(&self, page: PageRequest) -> RouterResult<PageData> {
        let query = [
            ("pageNo", page.page_no.to_string()),
            ("pageSize", page.page_size.to_string()),
        ];
        let data = self.fetch(&self.list_url, &query).await?;
        Self::required(data, &self.list_url)
    }

    async fn get(&self, name: &str) -> RouterResult<Option<ServiceDescriptor>> {
        self.fetch(&self.get_url, &[("mcpName", name.to_string())]).await
    }

    async fn search(&self, keyword: &str) -> RouterResult<Vec<ServiceDescriptor>> {
        let data = self
            .fetch(&self.search_url, &[("keyword", keyword.to_string())])
            .await?;
        Self::required(data, &self.search_url)
    }
}
