//! One API connection plus the loader, pipeline and refresh controller that use it

use std::rc::Rc;

use crate::api::CatalogApi;
use crate::error::CatalogError;
use crate::facets::FacetCatalogLoader;
use crate::filter::FilterState;
use crate::model::{FacetCatalog, GameRecord};
use crate::pipeline::{QueryOutcome, QueryPipeline};
use crate::refresh::{RefreshController, RefreshReport};
use crate::render::{render, RenderedView};

pub struct CatalogSession<A> {
    api: A,
    facets: FacetCatalogLoader,
    pipeline: QueryPipeline,
    refresh: RefreshController,
}

impl<A: CatalogApi> CatalogSession<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            facets: FacetCatalogLoader::new(),
            pipeline: QueryPipeline::new(),
            refresh: RefreshController::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn catalog(&self) -> Option<Rc<FacetCatalog>> {
        self.facets.current()
    }

    pub fn results(&self) -> Rc<Vec<GameRecord>> {
        self.pipeline.results()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh.is_busy()
    }

    pub async fn load_facets(&self) -> Result<Rc<FacetCatalog>, CatalogError> {
        self.facets.load(&self.api).await
    }

    pub async fn query(&self, state: &FilterState) -> QueryOutcome {
        self.pipeline.run(&self.api, state).await
    }

    pub async fn refresh<F>(&self, username: Option<&str>, current_state: F) -> Result<RefreshReport, CatalogError>
    where
        F: FnOnce() -> FilterState,
    {
        self.refresh
            .refresh(&self.api, username, &self.facets, &self.pipeline, current_state)
            .await
    }

    /// Render the current result set for `state`'s view mode and sort
    pub fn render(&self, state: &FilterState) -> RenderedView {
        render(&self.pipeline.results(), state.view_mode(), state.sort_column(), state.sort_direction())
    }
}
