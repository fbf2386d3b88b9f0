//! Filter state and the store that owns it
//!
//! `FilterState` is a plain snapshot. All mutation goes through `FilterStore`,
//! which notifies subscribers after every change so a single entry point can
//! decide whether to re-query or only re-render.

use std::cell::Cell;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::FacetKind;
use crate::pipeline::{RequestSequencer, Ticket};
use crate::render::BadgeAction;
use crate::sort::{SortColumn, SortDirection};

/// Scalar (single text box) filter fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    YearMin,
    YearMax,
    Players,
    TimeMax,
    WeightMin,
    WeightMax,
    RatingMin,
    Search,
}

impl FilterField {
    pub const ALL: [FilterField; 8] = [
        FilterField::YearMin,
        FilterField::YearMax,
        FilterField::Players,
        FilterField::TimeMax,
        FilterField::WeightMin,
        FilterField::WeightMax,
        FilterField::RatingMin,
        FilterField::Search,
    ];

    pub fn key(self) -> &'static str {
        match self {
            FilterField::YearMin => "year_min",
            FilterField::YearMax => "year_max",
            FilterField::Players => "players",
            FilterField::TimeMax => "time_max",
            FilterField::WeightMin => "weight_min",
            FilterField::WeightMax => "weight_max",
            FilterField::RatingMin => "rating_min",
            FilterField::Search => "search",
        }
    }

    pub fn is_numeric(self) -> bool {
        self != FilterField::Search
    }

    /// Years, player counts and minutes are whole numbers
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            FilterField::YearMin | FilterField::YearMax | FilterField::Players | FilterField::TimeMax
        )
    }

    fn accepts(self, value: &str) -> bool {
        if self.is_integer() {
            value.parse::<i64>().is_ok()
        } else if self.is_numeric() {
            value.parse::<f64>().is_ok_and(f64::is_finite)
        } else {
            true
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FilterField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterField::ALL
            .into_iter()
            .find(|f| f.key() == s.trim())
            .ok_or_else(|| format!("unknown filter '{}'", s))
    }
}

/// Multi-select facet fields. Mechanics are a set and handled separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MultiField {
    Categories,
    Designers,
    Artists,
    Publishers,
}

impl MultiField {
    pub const ALL: [MultiField; 4] = [
        MultiField::Categories,
        MultiField::Designers,
        MultiField::Artists,
        MultiField::Publishers,
    ];

    pub fn facet(self) -> FacetKind {
        match self {
            MultiField::Categories => FacetKind::Categories,
            MultiField::Designers => FacetKind::Designers,
            MultiField::Artists => FacetKind::Artists,
            MultiField::Publishers => FacetKind::Publishers,
        }
    }

    pub fn key(self) -> &'static str {
        self.facet().key()
    }
}

impl TryFrom<FacetKind> for MultiField {
    type Error = FacetKind;

    fn try_from(kind: FacetKind) -> Result<Self, Self::Error> {
        match kind {
            FacetKind::Categories => Ok(MultiField::Categories),
            FacetKind::Designers => Ok(MultiField::Designers),
            FacetKind::Artists => Ok(MultiField::Artists),
            FacetKind::Publishers => Ok(MultiField::Publishers),
            FacetKind::Mechanics => Err(kind),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Tile,
    List,
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "tile" | "grid" => Ok(ViewMode::Tile),
            "list" | "table" => Ok(ViewMode::List),
            other => Err(format!("unknown view mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} expects a number, got '{value}'")]
pub struct InvalidFilter {
    pub field: FilterField,
    pub value: String,
}

/// What kind of mutation just happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// A filter changed; the result set is stale
    Filters,
    /// Sort column or direction changed
    Sort,
    ViewMode,
}

impl Change {
    pub fn requires_query(self) -> bool {
        self == Change::Filters
    }
}

/// Current selections, inputs, sort and view preference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    selected_mechanics: BTreeSet<String>,
    categories: Vec<String>,
    designers: Vec<String>,
    artists: Vec<String>,
    publishers: Vec<String>,
    year_min: Option<String>,
    year_max: Option<String>,
    players: Option<String>,
    time_max: Option<String>,
    weight_min: Option<String>,
    weight_max: Option<String>,
    rating_min: Option<String>,
    search: Option<String>,
    sort_column: Option<SortColumn>,
    sort_direction: SortDirection,
    view_mode: ViewMode,
}

impl FilterState {
    pub fn selected_mechanics(&self) -> &BTreeSet<String> {
        &self.selected_mechanics
    }

    pub fn is_mechanic_selected(&self, name: &str) -> bool {
        self.selected_mechanics.contains(name)
    }

    pub fn multi(&self, field: MultiField) -> &[String] {
        match field {
            MultiField::Categories => &self.categories,
            MultiField::Designers => &self.designers,
            MultiField::Artists => &self.artists,
            MultiField::Publishers => &self.publishers,
        }
    }

    pub fn get(&self, field: FilterField) -> Option<&str> {
        self.scalar(field).as_deref()
    }

    pub fn sort_column(&self) -> Option<SortColumn> {
        self.sort_column
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    fn scalar(&self, field: FilterField) -> &Option<String> {
        match field {
            FilterField::YearMin => &self.year_min,
            FilterField::YearMax => &self.year_max,
            FilterField::Players => &self.players,
            FilterField::TimeMax => &self.time_max,
            FilterField::WeightMin => &self.weight_min,
            FilterField::WeightMax => &self.weight_max,
            FilterField::RatingMin => &self.rating_min,
            FilterField::Search => &self.search,
        }
    }

    fn scalar_mut(&mut self, field: FilterField) -> &mut Option<String> {
        match field {
            FilterField::YearMin => &mut self.year_min,
            FilterField::YearMax => &mut self.year_max,
            FilterField::Players => &mut self.players,
            FilterField::TimeMax => &mut self.time_max,
            FilterField::WeightMin => &mut self.weight_min,
            FilterField::WeightMax => &mut self.weight_max,
            FilterField::RatingMin => &mut self.rating_min,
            FilterField::Search => &mut self.search,
        }
    }

    fn multi_mut(&mut self, field: MultiField) -> &mut Vec<String> {
        match field {
            MultiField::Categories => &mut self.categories,
            MultiField::Designers => &mut self.designers,
            MultiField::Artists => &mut self.artists,
            MultiField::Publishers => &mut self.publishers,
        }
    }

    /// True when no filter is set (sort and view mode are not filters)
    pub fn is_empty(&self) -> bool {
        self.selected_mechanics.is_empty()
            && MultiField::ALL.iter().all(|f| self.multi(*f).is_empty())
            && FilterField::ALL.iter().all(|f| self.get(*f).is_none())
    }

    /// Active filters as `(key, display)` pairs, lists joined with ", "
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.selected_mechanics.is_empty() {
            let names: Vec<&str> = self.selected_mechanics.iter().map(String::as_str).collect();
            pairs.push((FacetKind::Mechanics.key(), names.join(", ")));
        }
        for field in MultiField::ALL {
            let values = self.multi(field);
            if !values.is_empty() {
                pairs.push((field.key(), values.join(", ")));
            }
        }
        for field in FilterField::ALL {
            if let Some(value) = self.get(field) {
                pairs.push((field.key(), value.to_string()));
            }
        }
        pairs
    }
}

pub type Listener = Box<dyn FnMut(&FilterState, Change)>;

/// Owner of the one `FilterState`.
///
/// Every mutation is synchronous and ends by calling each subscriber with the
/// new snapshot and the kind of change.
#[derive(Default)]
pub struct FilterStore {
    state: FilterState,
    listeners: Vec<Listener>,
}

impl fmt::Debug for FilterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: FilterState) -> Self {
        Self { state, listeners: Vec::new() }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&FilterState, Change) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn snapshot(&self) -> &FilterState {
        &self.state
    }

    fn notify(&mut self, change: Change) {
        for listener in self.listeners.iter_mut() {
            listener(&self.state, change);
        }
    }

    /// Set a scalar field. Blank input unsets it; numeric fields must parse.
    pub fn set(&mut self, field: FilterField, value: &str) -> Result<(), InvalidFilter> {
        let value = value.trim();
        if value.is_empty() {
            self.unset(field);
            return Ok(());
        }
        if !field.accepts(value) {
            return Err(InvalidFilter { field, value: value.to_string() });
        }
        *self.state.scalar_mut(field) = Some(value.to_string());
        self.notify(Change::Filters);
        Ok(())
    }

    pub fn unset(&mut self, field: FilterField) {
        *self.state.scalar_mut(field) = None;
        self.notify(Change::Filters);
    }

    /// Replace the selection of a multi-select field. Blank and duplicate values are dropped.
    pub fn set_multi(&mut self, field: MultiField, values: Vec<String>) {
        let mut seen = BTreeSet::new();
        let values = values
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty() && seen.insert(v.clone()))
            .collect();
        *self.state.multi_mut(field) = values;
        self.notify(Change::Filters);
    }

    /// Make `name` the only selected category
    pub fn select_category(&mut self, name: &str) {
        self.set_multi(MultiField::Categories, vec![name.to_string()]);
    }

    /// Flip membership of `name` in the selected mechanics
    pub fn toggle_mechanic(&mut self, name: &str) {
        if !self.state.selected_mechanics.remove(name) {
            self.state.selected_mechanics.insert(name.to_string());
        }
        self.notify(Change::Filters);
    }

    /// Apply a click on a rendered badge
    pub fn apply_badge(&mut self, action: &BadgeAction) {
        match action {
            BadgeAction::ToggleMechanic(name) => self.toggle_mechanic(name),
            BadgeAction::SelectCategory(name) => self.select_category(name),
        }
    }

    pub fn set_sort(&mut self, column: Option<SortColumn>, direction: SortDirection) {
        self.state.sort_column = column;
        self.state.sort_direction = direction;
        self.notify(Change::Sort);
    }

    /// Column header activation: flip direction on the active column,
    /// otherwise switch to `column` ascending.
    pub fn activate_column(&mut self, column: SortColumn) {
        let direction = if self.state.sort_column == Some(column) {
            self.state.sort_direction.reversed()
        } else {
            SortDirection::Asc
        };
        self.set_sort(Some(column), direction);
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.state.view_mode = mode;
        self.notify(Change::ViewMode);
    }

    /// Reset every filter and the sort. The view mode is a display preference and survives.
    pub fn clear(&mut self) {
        let view_mode = self.state.view_mode;
        self.state = FilterState { view_mode, ..FilterState::default() };
        self.notify(Change::Filters);
    }
}

/// Search text that has been typed but not yet applied.
///
/// Each edit takes a ticket. A delayed apply only goes through with the
/// latest ticket, and `cancel` voids whatever is pending, so a reset cannot be
/// undone by a late timer.
#[derive(Debug, Default)]
pub struct SearchDraft {
    sequencer: RequestSequencer,
    pending: Cell<Option<Ticket>>,
}

impl SearchDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edit(&self) -> Ticket {
        let ticket = self.sequencer.issue();
        self.pending.set(Some(ticket));
        ticket
    }

    /// True once for the latest edit, if it was not cancelled
    pub fn commit(&self, ticket: Ticket) -> bool {
        if self.pending.get() == Some(ticket) && self.sequencer.is_latest(ticket) {
            self.pending.set(None);
            true
        } else {
            false
        }
    }

    pub fn cancel(&self) {
        self.sequencer.issue();
        self.pending.set(None);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_store() -> (FilterStore, Rc<RefCell<Vec<Change>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = FilterStore::new();
        let sink = Rc::clone(&seen);
        store.subscribe(move |_, change| sink.borrow_mut().push(change));
        (store, seen)
    }

    #[test]
    fn test_toggle_mechanic_twice_restores() {
        let mut store = FilterStore::new();
        store.toggle_mechanic("Deck Building");
        let before = store.snapshot().selected_mechanics().clone();

        store.toggle_mechanic("Worker Placement");
        assert!(store.snapshot().is_mechanic_selected("Worker Placement"));
        store.toggle_mechanic("Worker Placement");

        assert_eq!(store.snapshot().selected_mechanics(), &before);
    }

    #[test]
    fn test_clear_preserves_view_mode() {
        let mut store = FilterStore::new();
        store.set_view_mode(ViewMode::List);
        store.toggle_mechanic("Drafting");
        store.set_multi(MultiField::Designers, vec!["Uwe Rosenberg".into()]);
        store.set(FilterField::YearMin, "2010").unwrap();
        store.set(FilterField::Search, "farm").unwrap();
        store.activate_column(SortColumn::Year);

        store.clear();

        let state = store.snapshot();
        assert!(state.is_empty());
        assert_eq!(state.sort_column(), None);
        assert_eq!(state.sort_direction(), SortDirection::Asc);
        assert_eq!(state.view_mode(), ViewMode::List);
    }

    #[test]
    fn test_every_mutation_notifies() {
        let (mut store, seen) = recording_store();
        store.toggle_mechanic("Auction");
        store.set(FilterField::Players, "4").unwrap();
        store.activate_column(SortColumn::Name);
        store.set_view_mode(ViewMode::List);
        store.clear();

        assert_eq!(
            *seen.borrow(),
            vec![Change::Filters, Change::Filters, Change::Sort, Change::ViewMode, Change::Filters]
        );
        assert!(Change::Filters.requires_query());
        assert!(!Change::Sort.requires_query());
    }

    #[test]
    fn test_blank_value_unsets() {
        let mut store = FilterStore::new();
        store.set(FilterField::TimeMax, "90").unwrap();
        assert_eq!(store.snapshot().get(FilterField::TimeMax), Some("90"));
        store.set(FilterField::TimeMax, "   ").unwrap();
        assert_eq!(store.snapshot().get(FilterField::TimeMax), None);
    }

    #[test]
    fn test_numeric_validation() {
        let (mut store, seen) = recording_store();
        let err = store.set(FilterField::WeightMin, "heavy").unwrap_err();
        assert_eq!(err.field, FilterField::WeightMin);
        assert_eq!(store.snapshot().get(FilterField::WeightMin), None);
        assert!(seen.borrow().is_empty());

        store.set(FilterField::Search, "heavy").unwrap();
        assert_eq!(store.snapshot().get(FilterField::Search), Some("heavy"));
    }

    #[test]
    fn test_rejects_non_finite_and_fractional_numbers() {
        let (mut store, seen) = recording_store();
        assert!(store.set(FilterField::YearMin, "NaN").is_err());
        assert!(store.set(FilterField::Players, "inf").is_err());
        assert!(store.set(FilterField::WeightMax, "infinity").is_err());
        assert!(store.set(FilterField::RatingMin, "NaN").is_err());
        assert!(store.set(FilterField::TimeMax, "90.5").is_err());
        assert!(store.set(FilterField::YearMax, "1e3").is_err());
        assert!(store.snapshot().is_empty());
        assert!(seen.borrow().is_empty());

        store.set(FilterField::WeightMin, "2.5").unwrap();
        store.set(FilterField::Players, "4").unwrap();
        assert_eq!(store.snapshot().get(FilterField::WeightMin), Some("2.5"));
        assert_eq!(store.snapshot().get(FilterField::Players), Some("4"));
    }

    #[test]
    fn test_activate_column_toggles() {
        let mut store = FilterStore::new();
        store.activate_column(SortColumn::Weight);
        assert_eq!(store.snapshot().sort_direction(), SortDirection::Asc);
        store.activate_column(SortColumn::Weight);
        assert_eq!(store.snapshot().sort_direction(), SortDirection::Desc);
        store.activate_column(SortColumn::Name);
        assert_eq!(store.snapshot().sort_column(), Some(SortColumn::Name));
        assert_eq!(store.snapshot().sort_direction(), SortDirection::Asc);
    }

    #[test]
    fn test_badges() {
        let mut store = FilterStore::new();
        store.set_multi(MultiField::Categories, vec!["Economic".into(), "Farming".into()]);
        store.apply_badge(&BadgeAction::SelectCategory("Fantasy".into()));
        assert_eq!(store.snapshot().multi(MultiField::Categories), ["Fantasy".to_string()]);

        store.apply_badge(&BadgeAction::ToggleMechanic("Set Collection".into()));
        assert!(store.snapshot().is_mechanic_selected("Set Collection"));
        store.apply_badge(&BadgeAction::ToggleMechanic("Set Collection".into()));
        assert!(store.snapshot().selected_mechanics().is_empty());
    }

    #[test]
    fn test_set_multi_drops_blanks_and_duplicates() {
        let mut store = FilterStore::new();
        store.set_multi(
            MultiField::Publishers,
            vec!["Z-Man".into(), "".into(), "Z-Man".into(), " Lookout ".into()],
        );
        assert_eq!(
            store.snapshot().multi(MultiField::Publishers),
            ["Z-Man".to_string(), "Lookout".to_string()]
        );
    }

    #[test]
    fn test_summary() {
        let mut store = FilterStore::new();
        store.toggle_mechanic("Tile Placement");
        store.toggle_mechanic("Area Majority");
        store.set(FilterField::RatingMin, "7.5").unwrap();

        assert_eq!(
            store.snapshot().summary(),
            vec![
                ("mechanics", "Area Majority, Tile Placement".to_string()),
                ("rating_min", "7.5".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_draft_only_latest_edit_commits() {
        let draft = SearchDraft::new();
        let first = draft.edit();
        let second = draft.edit();
        assert!(!draft.commit(first));
        assert!(draft.commit(second));
        assert!(!draft.commit(second));
        assert!(!draft.is_pending());
    }

    #[test]
    fn test_clear_voids_pending_search() {
        let (mut store, seen) = recording_store();
        let draft = SearchDraft::new();
        store.toggle_mechanic("Drafting");

        let typed = draft.edit();
        draft.cancel();
        store.clear();

        // The delayed apply fires after the reset
        if draft.commit(typed) {
            store.set(FilterField::Search, "azul").unwrap();
        }
        assert!(store.snapshot().is_empty());
        assert_eq!(seen.borrow().len(), 2);
    }
}
