//! The remote catalog API as seen by the browser
//!
//! Transport lives with the caller: the wasm frontend goes through `fetch`,
//! the CLI through reqwest. Both implement `CatalogApi`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::model::{FacetCatalog, GameRecord};
use crate::query::to_query_string;

pub const FACETS_PATH: &str = "/api/facets";
pub const GAMES_PATH: &str = "/api/games";
pub const REFRESH_PATH: &str = "/api/refresh";

/// Everything runs on one cooperative thread, so futures need not be `Send`.
#[async_trait(?Send)]
pub trait CatalogApi {
    /// `GET /api/facets`
    async fn facets(&self) -> Result<FacetCatalog, CatalogError>;

    /// `GET /api/games?<query>`
    async fn games(&self, query: &[(&'static str, String)]) -> Result<Vec<GameRecord>, CatalogError>;

    /// `POST /api/refresh[?username=]`. Any 2xx is success; the body is not needed.
    async fn refresh(&self, username: Option<&str>) -> Result<(), CatalogError>;
}

/// Path and query for a games request
pub fn games_path(query: &[(&'static str, String)]) -> String {
    if query.is_empty() {
        GAMES_PATH.to_string()
    } else {
        format!("{}?{}", GAMES_PATH, to_query_string(query))
    }
}

/// Path for a refresh. A blank username leaves the choice to the server.
pub fn refresh_path(username: Option<&str>) -> String {
    match username.map(str::trim).filter(|u| !u.is_empty()) {
        Some(user) => format!("{}?username={}", REFRESH_PATH, urlencoding::encode(user)),
        None => REFRESH_PATH.to_string(),
    }
}

/// Body of a successful refresh, when the server sends one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub username: String,
    pub total_in_collection: u64,
    pub total_hydrated: u64,
    #[serde(default)]
    pub cached: bool,
}

impl RefreshSummary {
    /// Best-effort decode; the refresh succeeded either way
    pub fn from_body(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_path() {
        assert_eq!(refresh_path(None), "/api/refresh");
        assert_eq!(refresh_path(Some("  ")), "/api/refresh");
        assert_eq!(refresh_path(Some("meeple fan")), "/api/refresh?username=meeple%20fan");
    }

    #[test]
    fn test_games_path() {
        assert_eq!(games_path(&[]), "/api/games");
        assert_eq!(
            games_path(&[("players", "4".to_string()), ("search", "root".to_string())]),
            "/api/games?players=4&search=root"
        );
    }

    #[test]
    fn test_refresh_summary_optional() {
        let summary = RefreshSummary::from_body(
            r#"{"username": "alice", "total_in_collection": 120, "total_hydrated": 118, "cached": true}"#,
        )
        .unwrap();
        assert_eq!(summary.total_hydrated, 118);
        assert!(RefreshSummary::from_body("").is_none());
    }
}
