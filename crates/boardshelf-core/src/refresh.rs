//! Refresh of the upstream collection, then facets and results

use std::cell::Cell;

use crate::api::CatalogApi;
use crate::error::CatalogError;
use crate::facets::FacetCatalogLoader;
use crate::filter::FilterState;
use crate::pipeline::{QueryOutcome, QueryPipeline};

/// What happened after a successful refresh call
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshReport {
    /// Set when the facet reload failed; the previous catalog is still in place
    pub facets_error: Option<CatalogError>,
    pub query: QueryOutcome,
}

/// Clears the in-flight flag however the refresh ends
struct InFlight<'a>(&'a Cell<bool>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Runs at most one refresh at a time.
#[derive(Debug, Default)]
pub struct RefreshController {
    in_flight: Cell<bool>,
}

impl RefreshController {
    pub fn new() -> Self {
        Self::default()
    }

    /// While true the trigger should be disabled
    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }

    /// Refresh the collection for `username` (blank means the server default).
    ///
    /// A second call while one is running fails with `RefreshInProgress`. On
    /// success the facet catalog is reloaded and the games query re-run with
    /// whatever `current_state` returns at that point. On failure nothing else
    /// is touched.
    pub async fn refresh<A, F>(
        &self,
        api: &A,
        username: Option<&str>,
        loader: &FacetCatalogLoader,
        pipeline: &QueryPipeline,
        current_state: F,
    ) -> Result<RefreshReport, CatalogError>
    where
        A: CatalogApi + ?Sized,
        F: FnOnce() -> FilterState,
    {
        if self.in_flight.replace(true) {
            tracing::warn!("Refresh requested while another is running");
            return Err(CatalogError::RefreshInProgress);
        }
        let _guard = InFlight(&self.in_flight);

        let username = username.map(str::trim).filter(|u| !u.is_empty());
        tracing::info!(username = username.unwrap_or("<server default>"), "Refreshing collection");

        if let Err(e) = api.refresh(username).await {
            tracing::warn!("Refresh failed: {}", e);
            return Err(e);
        }

        let facets_error = loader.load(api).await.err();
        let state = current_state();
        let query = pipeline.run(api, &state).await;
        tracing::info!(?query, "Refresh complete");

        Ok(RefreshReport { facets_error, query })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{catalog, game, FakeApi};
    use futures::executor::block_on;

    #[test]
    fn test_success_reloads_facets_and_results() {
        let api = FakeApi::default();
        api.push_refresh(Ok(()));
        api.push_facets(Ok(catalog(&[("Engine Building", 5)])));
        api.push_games(Ok(vec![game(1, "Wingspan")]));

        let controller = RefreshController::new();
        let loader = FacetCatalogLoader::new();
        let pipeline = QueryPipeline::new();

        let report = block_on(controller.refresh(&api, Some(" alice "), &loader, &pipeline, FilterState::default))
            .unwrap();

        assert_eq!(report, RefreshReport { facets_error: None, query: QueryOutcome::Applied(1) });
        assert_eq!(*api.refresh_users.borrow(), vec![Some("alice".to_string())]);
        assert!(loader.current().unwrap().mechanics.contains_key("Engine Building"));
        assert_eq!(pipeline.results()[0].name, "Wingspan");
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_failure_leaves_state_and_reenables() {
        let api = FakeApi::default();
        api.push_facets(Ok(catalog(&[("Drafting", 2)])));
        api.push_games(Ok(vec![game(1, "7 Wonders")]));
        api.push_refresh(Err(CatalogError::Server { status: 500, body: "BGG timeout".into() }));

        let loader = FacetCatalogLoader::new();
        let pipeline = QueryPipeline::new();
        block_on(loader.load(&api)).unwrap();
        block_on(pipeline.run(&api, &FilterState::default()));

        let controller = RefreshController::new();
        let err = block_on(controller.refresh(&api, None, &loader, &pipeline, FilterState::default))
            .unwrap_err();

        assert!(matches!(err, CatalogError::Server { status: 500, .. }));
        assert!(!controller.is_busy());
        assert_eq!(loader.current().unwrap().mechanics.get("Drafting"), Some(&2));
        assert_eq!(pipeline.results()[0].name, "7 Wonders");
        assert_eq!(*api.refresh_users.borrow(), vec![None]);
    }

    #[test]
    fn test_concurrent_refresh_rejected() {
        let api = FakeApi::default();
        let reply = api.defer_refresh();
        api.push_facets(Ok(catalog(&[])));
        api.push_games(Ok(vec![]));

        let controller = RefreshController::new();
        let loader = FacetCatalogLoader::new();
        let pipeline = QueryPipeline::new();

        let (first, second, ()) = block_on(async {
            futures::join!(
                controller.refresh(&api, None, &loader, &pipeline, FilterState::default),
                async {
                    assert!(controller.is_busy());
                    controller.refresh(&api, None, &loader, &pipeline, FilterState::default).await
                },
                async move {
                    reply.send(Ok(())).unwrap();
                },
            )
        });

        assert!(first.is_ok());
        assert_eq!(second, Err(CatalogError::RefreshInProgress));
        assert_eq!(api.refresh_users.borrow().len(), 1);
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_requery_uses_state_at_completion() {
        let api = FakeApi::default();
        api.push_refresh(Ok(()));
        api.push_facets(Ok(catalog(&[])));
        api.push_games(Ok(vec![]));

        let controller = RefreshController::new();
        let loader = FacetCatalogLoader::new();
        let pipeline = QueryPipeline::new();

        let mut store = crate::filter::FilterStore::new();
        store.toggle_mechanic("Racing");
        block_on(controller.refresh(&api, None, &loader, &pipeline, || store.snapshot().clone())).unwrap();

        assert_eq!(*api.queries.borrow(), vec!["mechanics=Racing".to_string()]);
    }
}
