//! Shared fixtures for unit tests

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;
use futures::channel::oneshot;

use crate::api::CatalogApi;
use crate::error::CatalogError;
use crate::model::{FacetCatalog, GameRecord};

pub fn game(id: i64, name: &str) -> GameRecord {
    GameRecord { id, name: name.to_string(), ..Default::default() }
}

pub fn catalog(mechanics: &[(&str, u64)]) -> FacetCatalog {
    FacetCatalog {
        mechanics: mechanics.iter().map(|(n, c)| (n.to_string(), *c)).collect(),
        ..Default::default()
    }
}

type GamesReply = Result<Vec<GameRecord>, CatalogError>;

/// Scripted `CatalogApi`.
///
/// Facet and refresh replies are popped in order. Game replies either come
/// from `games` immediately or, when `pending_games` has entries, wait on a
/// oneshot the test resolves whenever it wants.
#[derive(Default)]
pub struct FakeApi {
    pub facets: RefCell<VecDeque<Result<FacetCatalog, CatalogError>>>,
    pub games: RefCell<VecDeque<GamesReply>>,
    pub pending_games: RefCell<VecDeque<oneshot::Receiver<GamesReply>>>,
    pub refreshes: RefCell<VecDeque<Result<(), CatalogError>>>,
    pub pending_refresh: RefCell<Option<oneshot::Receiver<Result<(), CatalogError>>>>,
    pub queries: RefCell<Vec<String>>,
    pub refresh_users: RefCell<Vec<Option<String>>>,
}

impl FakeApi {
    pub fn push_facets(&self, reply: Result<FacetCatalog, CatalogError>) {
        self.facets.borrow_mut().push_back(reply);
    }

    pub fn push_games(&self, reply: GamesReply) {
        self.games.borrow_mut().push_back(reply);
    }

    pub fn push_refresh(&self, reply: Result<(), CatalogError>) {
        self.refreshes.borrow_mut().push_back(reply);
    }

    /// Queue a games reply the test resolves later through the returned sender
    pub fn defer_games(&self) -> oneshot::Sender<GamesReply> {
        let (tx, rx) = oneshot::channel();
        self.pending_games.borrow_mut().push_back(rx);
        tx
    }

    pub fn defer_refresh(&self) -> oneshot::Sender<Result<(), CatalogError>> {
        let (tx, rx) = oneshot::channel();
        *self.pending_refresh.borrow_mut() = Some(rx);
        tx
    }
}

fn dropped() -> CatalogError {
    CatalogError::Network("reply dropped".into())
}

#[async_trait(?Send)]
impl CatalogApi for FakeApi {
    async fn facets(&self) -> Result<FacetCatalog, CatalogError> {
        self.facets.borrow_mut().pop_front().unwrap_or_else(|| Err(dropped()))
    }

    async fn games(&self, query: &[(&'static str, String)]) -> Result<Vec<GameRecord>, CatalogError> {
        self.queries.borrow_mut().push(crate::query::to_query_string(query));
        let pending = self.pending_games.borrow_mut().pop_front();
        match pending {
            Some(rx) => rx.await.unwrap_or_else(|_| Err(dropped())),
            None => self.games.borrow_mut().pop_front().unwrap_or_else(|| Err(dropped())),
        }
    }

    async fn refresh(&self, username: Option<&str>) -> Result<(), CatalogError> {
        self.refresh_users.borrow_mut().push(username.map(str::to_string));
        let pending = self.pending_refresh.borrow_mut().take();
        match pending {
            Some(rx) => rx.await.unwrap_or_else(|_| Err(dropped())),
            None => self.refreshes.borrow_mut().pop_front().unwrap_or(Ok(())),
        }
    }
}
