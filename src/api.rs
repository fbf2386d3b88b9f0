//! Catalog API over the browser's fetch

use async_trait::async_trait;
use boardshelf_core::api::{games_path, FACETS_PATH};
use boardshelf_core::{refresh_path, CatalogApi, CatalogError, FacetCatalog, GameRecord};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{console, Request, RequestInit, RequestMode, Response};

/// API base URL. Empty means same origin.
const HTTP_API_BASE: &str = match option_env!("BOARDSHELF_API_BASE") {
    Some(base) => base,
    None => "",
};

fn js_error(e: JsValue) -> String {
    format!("{:?}", e)
}

async fn fetch(method: &str, path: &str) -> Result<Response, CatalogError> {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);

    let url = format!("{}{}", HTTP_API_BASE, path);
    console::log_1(&format!("fetch: {} {}", method, url).into());
    let request = Request::new_with_str_and_init(&url, &opts)
        .map_err(|e| CatalogError::Network(js_error(e)))?;

    let window = web_sys::window().ok_or_else(|| CatalogError::Network("No window".to_string()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| {
            console::error_1(&format!("fetch: {} failed: {:?}", url, e).into());
            CatalogError::Network(js_error(e))
        })?;

    let resp: Response = resp_value
        .dyn_into()
        .map_err(|e| CatalogError::Network(js_error(e)))?;

    if !resp.ok() {
        return Err(CatalogError::Server { status: resp.status(), body: resp.status_text() });
    }
    Ok(resp)
}

async fn http_get<T: DeserializeOwned>(path: &str) -> Result<T, CatalogError> {
    let resp = fetch("GET", path).await?;

    let json = JsFuture::from(resp.json().map_err(|e| CatalogError::Malformed(js_error(e)))?)
        .await
        .map_err(|e| CatalogError::Malformed(js_error(e)))?;

    serde_wasm_bindgen::from_value(json).map_err(|e| {
        console::error_1(&format!("http_get: {} did not decode: {}", path, e).into());
        CatalogError::Malformed(e.to_string())
    })
}

pub struct FetchApi;

#[async_trait(?Send)]
impl CatalogApi for FetchApi {
    async fn facets(&self) -> Result<FacetCatalog, CatalogError> {
        http_get(FACETS_PATH).await
    }

    async fn games(&self, query: &[(&'static str, String)]) -> Result<Vec<GameRecord>, CatalogError> {
        http_get(&games_path(query)).await
    }

    async fn refresh(&self, username: Option<&str>) -> Result<(), CatalogError> {
        fetch("POST", &refresh_path(username)).await.map(|_| ())
    }
}
