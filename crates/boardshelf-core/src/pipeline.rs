//! Query pipeline with stale-response protection
//!
//! Each query takes a ticket from a monotonically increasing sequence. When the
//! response arrives, it is only applied if its ticket is still the latest one
//! issued; anything older is dropped so it can never paint over newer results.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::api::CatalogApi;
use crate::error::CatalogError;
use crate::filter::FilterState;
use crate::model::GameRecord;
use crate::query::{serialize, to_query_string};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn number(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: Cell<u64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        let next = self.latest.get() + 1;
        self.latest.set(next);
        Ticket(next)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest.get()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Results replaced with this many records
    Applied(usize),
    /// The response was unreadable; results replaced with an empty set
    Emptied(CatalogError),
    /// The request failed; previous results left as they were
    Kept(CatalogError),
    /// A newer query was issued before this one resolved; nothing written
    Superseded,
}

impl QueryOutcome {
    /// Whether the displayed result set should be repainted
    pub fn changed_results(&self) -> bool {
        matches!(self, QueryOutcome::Applied(_) | QueryOutcome::Emptied(_))
    }

    pub fn error(&self) -> Option<&CatalogError> {
        match self {
            QueryOutcome::Emptied(e) | QueryOutcome::Kept(e) => Some(e),
            _ => None,
        }
    }
}

/// Sole writer of the current result set
#[derive(Debug, Default)]
pub struct QueryPipeline {
    sequencer: RequestSequencer,
    results: RefCell<Rc<Vec<GameRecord>>>,
}

impl QueryPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last applied result set, in server order
    pub fn results(&self) -> Rc<Vec<GameRecord>> {
        Rc::clone(&self.results.borrow())
    }

    fn replace(&self, games: Vec<GameRecord>) {
        *self.results.borrow_mut() = Rc::new(games);
    }

    pub async fn run<A: CatalogApi + ?Sized>(&self, api: &A, state: &FilterState) -> QueryOutcome {
        let ticket = self.sequencer.issue();
        let query = serialize(state);
        tracing::debug!(ticket = ticket.number(), query = %to_query_string(&query), "Querying games");

        let reply = api.games(&query).await;

        if !self.sequencer.is_latest(ticket) {
            tracing::debug!(ticket = ticket.number(), "Discarding superseded games response");
            return QueryOutcome::Superseded;
        }

        match reply {
            Ok(games) => {
                let count = games.len();
                self.replace(games);
                tracing::debug!(ticket = ticket.number(), count, "Applied games response");
                QueryOutcome::Applied(count)
            }
            Err(e) if e.is_malformed() => {
                tracing::warn!("Games response unreadable, showing no results: {}", e);
                self.replace(Vec::new());
                QueryOutcome::Emptied(e)
            }
            Err(e) => {
                tracing::warn!("Games query failed, keeping previous results: {}", e);
                QueryOutcome::Kept(e)
            }
        }
    }
}
