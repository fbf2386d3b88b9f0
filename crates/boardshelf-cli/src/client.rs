//! reqwest implementation of the catalog API

use std::cell::RefCell;
use std::time::Duration;

use async_trait::async_trait;
use boardshelf_core::api::{games_path, FACETS_PATH};
use boardshelf_core::{refresh_path, CatalogApi, CatalogError, FacetCatalog, GameRecord, RefreshSummary};
use serde::de::DeserializeOwned;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub base_url: String,
    pub timeout: Duration,
}

pub struct HttpCatalogApi {
    config: HttpConfig,
    client: reqwest::Client,
    last_refresh: RefCell<Option<RefreshSummary>>,
}

fn network(e: reqwest::Error) -> CatalogError {
    CatalogError::Network(e.to_string())
}

impl HttpCatalogApi {
    pub fn new(config: HttpConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("Boardshelf/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self { config, client, last_refresh: RefCell::new(None) })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Send a request and return the body of a 2xx response
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, CatalogError> {
        let response = request.send().await.map_err(network)?;
        let status = response.status();
        let body = response.text().await.map_err(network)?;

        if !status.is_success() {
            return Err(CatalogError::Server { status: status.as_u16(), body });
        }
        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);
        let body = self.send(self.client.get(&url)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Summary from the last successful refresh, if the server sent one
    pub fn last_refresh(&self) -> Option<RefreshSummary> {
        self.last_refresh.borrow().clone()
    }
}

#[async_trait(?Send)]
impl CatalogApi for HttpCatalogApi {
    async fn facets(&self) -> Result<FacetCatalog, CatalogError> {
        self.get_json(FACETS_PATH).await
    }

    async fn games(&self, query: &[(&'static str, String)]) -> Result<Vec<GameRecord>, CatalogError> {
        self.get_json(&games_path(query)).await
    }

    async fn refresh(&self, username: Option<&str>) -> Result<(), CatalogError> {
        let url = self.url(&refresh_path(username));
        tracing::debug!("POST {}", url);
        let body = self.send(self.client.post(&url)).await?;
        *self.last_refresh.borrow_mut() = RefreshSummary::from_body(&body);
        Ok(())
    }
}
