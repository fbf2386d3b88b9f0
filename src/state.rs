//! Shared UI state: the filter store, the catalog session and the signals the
//! components render from.
//!
//! The filter store is the only place filters change. Its change notification
//! mirrors the snapshot into a signal (so every view re-renders) and starts a
//! games query when a filter, not just the display, changed.

use std::rc::Rc;

use boardshelf_core::{
    BadgeAction, CatalogSession, FacetCatalog, FilterField, FilterState, FilterStore, GameRecord,
    QueryOutcome, SearchDraft,
};
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::console;

use crate::api::FetchApi;

const SEARCH_DEBOUNCE_MS: u32 = 250;

#[derive(Clone, Copy)]
pub struct CatalogState {
    store: StoredValue<FilterStore, LocalStorage>,
    session: StoredValue<Rc<CatalogSession<FetchApi>>, LocalStorage>,
    search_draft: StoredValue<SearchDraft, LocalStorage>,
    search_timer: StoredValue<Option<Timeout>, LocalStorage>,
    pub filters: ReadSignal<FilterState>,
    pub games: ReadSignal<Vec<GameRecord>>,
    pub facets: ReadSignal<Option<FacetCatalog>>,
    pub refreshing: ReadSignal<bool>,
    pub notice: ReadSignal<Option<String>>,
    set_games: WriteSignal<Vec<GameRecord>>,
    set_facets: WriteSignal<Option<FacetCatalog>>,
    set_refreshing: WriteSignal<bool>,
    set_notice: WriteSignal<Option<String>>,
}

impl CatalogState {
    pub fn new() -> Self {
        let (filters, set_filters) = signal(FilterState::default());
        let (games, set_games) = signal(Vec::<GameRecord>::new());
        let (facets, set_facets) = signal::<Option<FacetCatalog>>(None);
        let (refreshing, set_refreshing) = signal(false);
        let (notice, set_notice) = signal::<Option<String>>(None);

        let state = Self {
            store: StoredValue::new_local(FilterStore::new()),
            session: StoredValue::new_local(Rc::new(CatalogSession::new(FetchApi))),
            search_draft: StoredValue::new_local(SearchDraft::new()),
            search_timer: StoredValue::new_local(None),
            filters,
            games,
            facets,
            refreshing,
            notice,
            set_games,
            set_facets,
            set_refreshing,
            set_notice,
        };

        state.store.update_value(|store| {
            store.subscribe(move |snapshot, change| {
                set_filters.set(snapshot.clone());
                if change.requires_query() {
                    state.requery(snapshot.clone());
                }
            });
        });

        state
    }

    /// Load facets, then run the first query
    pub fn start(self) {
        let session = self.session.get_value();
        let initial = self.store.with_value(|s| s.snapshot().clone());
        spawn_local(async move {
            self.load_facets(&session).await;
            let outcome = session.query(&initial).await;
            self.apply(&session, outcome);
        });
    }

    async fn load_facets(self, session: &CatalogSession<FetchApi>) {
        match session.load_facets().await {
            Ok(catalog) => {
                console::log_1(&format!("Loaded {} mechanics", catalog.mechanics.len()).into());
                self.set_facets.set(Some((*catalog).clone()));
            }
            Err(e) => console::error_1(&format!("Failed to load facets: {}", e).into()),
        }
    }

    fn requery(self, filters: FilterState) {
        let session = self.session.get_value();
        spawn_local(async move {
            let outcome = session.query(&filters).await;
            self.apply(&session, outcome);
        });
    }

    fn apply(self, session: &CatalogSession<FetchApi>, outcome: QueryOutcome) {
        if let Some(e) = outcome.error() {
            console::error_1(&format!("Failed to load games: {}", e).into());
        }
        if outcome.changed_results() {
            self.set_games.set(session.results().to_vec());
        }
    }

    /// Run a mutation against the filter store
    pub fn mutate(self, f: impl FnOnce(&mut FilterStore)) {
        self.store.update_value(f);
    }

    pub fn set_field(self, field: FilterField, value: String) {
        self.mutate(|store| {
            if let Err(e) = store.set(field, &value) {
                console::error_1(&e.to_string().into());
            }
        });
    }

    /// Search is applied after typing pauses
    pub fn set_search_debounced(self, value: String) {
        let ticket = self.search_draft.with_value(|d| d.edit());
        let timer = Timeout::new(SEARCH_DEBOUNCE_MS, move || {
            if self.search_draft.with_value(|d| d.commit(ticket)) {
                self.set_field(FilterField::Search, value);
            }
        });
        // Replacing the previous timer drops and cancels it
        self.search_timer.set_value(Some(timer));
    }

    fn cancel_pending_search(self) {
        self.search_draft.with_value(|d| d.cancel());
        self.search_timer.set_value(None);
    }

    pub fn clear_search(self) {
        self.cancel_pending_search();
        self.set_field(FilterField::Search, String::new());
    }

    /// Reset every filter, including search text still waiting to apply
    pub fn clear(self) {
        self.cancel_pending_search();
        self.mutate(|store| store.clear());
    }

    pub fn apply_badge(self, action: BadgeAction) {
        self.mutate(|store| store.apply_badge(&action));
    }

    pub fn dismiss_notice(self) {
        self.set_notice.set(None);
    }

    /// Ask for a username and refresh the collection
    pub fn refresh(self) {
        if self.refreshing.get_untracked() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let username = match window
            .prompt_with_message_and_default("BGG username (leave blank to use the server default):", "")
        {
            Ok(Some(name)) => name,
            // Cancelled
            Ok(None) => return,
            Err(e) => {
                console::error_1(&e);
                return;
            }
        };

        let session = self.session.get_value();
        let store = self.store;
        self.set_refreshing.set(true);
        self.set_notice.set(None);

        spawn_local(async move {
            let result = session
                .refresh(Some(&username), move || store.with_value(|s| s.snapshot().clone()))
                .await;
            self.set_refreshing.set(session.is_refreshing());

            match result {
                Ok(report) => {
                    if let Some(catalog) = session.catalog() {
                        self.set_facets.set(Some((*catalog).clone()));
                    }
                    if let Some(e) = &report.facets_error {
                        console::error_1(&format!("Failed to reload facets: {}", e).into());
                    }
                    self.apply(&session, report.query);
                    self.set_notice.set(Some("Collection refreshed.".to_string()));
                }
                Err(e) => {
                    console::error_1(&format!("Refresh failed: {}", e).into());
                    self.set_notice.set(Some(format!("Refresh failed. {}", e.user_message())));
                }
            }
        });
    }
}
