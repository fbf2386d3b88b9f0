//! Boardshelf Core - filter state, query building, sorting and view models
//!
//! Everything here is UI-toolkit free. The browser frontend and the CLI both
//! attach their own widgets and transport on top of these modules.

pub mod api;
pub mod error;
pub mod facets;
pub mod filter;
pub mod model;
pub mod pipeline;
pub mod query;
pub mod refresh;
pub mod render;
pub mod session;
pub mod sort;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{refresh_path, CatalogApi, RefreshSummary};
pub use error::CatalogError;
pub use facets::{FacetCatalogLoader, RankedFacet, TagWeight};
pub use filter::{Change, FilterField, FilterState, FilterStore, InvalidFilter, MultiField, SearchDraft, ViewMode};
pub use model::{FacetCatalog, FacetKind, GameRecord};
pub use pipeline::{QueryOutcome, QueryPipeline, RequestSequencer, Ticket};
pub use query::{serialize, to_query_string, QueryPairs};
pub use refresh::{RefreshController, RefreshReport};
pub use render::{render, BadgeAction, RenderedView};
pub use session::CatalogSession;
pub use sort::{sort_games, MissingKeys, SortColumn, SortDirection};
