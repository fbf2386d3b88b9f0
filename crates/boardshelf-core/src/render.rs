//! Result set to view models for the tile and list layouts
//!
//! `render` is pure: it builds a complete new view every time and the caller
//! replaces whatever it showed before. Attaching click handlers is the
//! caller's job; badges only carry the `BadgeAction` to feed back into the
//! filter store.

use crate::filter::ViewMode;
use crate::model::GameRecord;
use crate::sort::{sort_games, MissingKeys, SortColumn, SortDirection};

pub const PLACEHOLDER: &str = "—";
const UNKNOWN: &str = "?";
/// Mechanics shown on a tile
pub const TILE_MECHANIC_BADGES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadgeAction {
    ToggleMechanic(String),
    /// Replace the category selection with just this one
    SelectCategory(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub action: BadgeAction,
}

impl Badge {
    fn mechanic(name: &str) -> Self {
        Badge { label: name.to_string(), action: BadgeAction::ToggleMechanic(name.to_string()) }
    }

    fn category(name: &str) -> Self {
        Badge { label: name.to_string(), action: BadgeAction::SelectCategory(name.to_string()) }
    }
}

/// Display strings shared by both layouts. Absent values become placeholders, never 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub id: i64,
    pub name: String,
    pub image_url: Option<String>,
    pub year: String,
    pub players: String,
    pub playing_time: String,
    pub weight: String,
    pub avg_rating: String,
    pub bayes_rating: String,
    pub my_rating: String,
}

fn or_placeholder<T: ToString>(value: Option<T>, placeholder: &str) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| placeholder.to_string())
}

fn two_decimals(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| PLACEHOLDER.to_string())
}

impl GameSummary {
    pub fn from_record(game: &GameRecord) -> Self {
        GameSummary {
            id: game.id,
            name: game.name.clone(),
            image_url: game.image_url().map(str::to_string),
            year: or_placeholder(game.year, PLACEHOLDER),
            players: format!(
                "{}–{}",
                or_placeholder(game.min_players, UNKNOWN),
                or_placeholder(game.max_players, UNKNOWN)
            ),
            playing_time: format!("{} min", or_placeholder(game.playing_time, UNKNOWN)),
            weight: two_decimals(game.weight),
            avg_rating: two_decimals(game.avg_rating),
            bayes_rating: two_decimals(game.bayes_rating),
            my_rating: or_placeholder(game.my_rating, PLACEHOLDER),
        }
    }

    /// `2017 • 1–4 players • 120 min • weight 3.86`
    pub fn meta_line(&self) -> String {
        format!(
            "{} • {} players • {} • weight {}",
            self.year, self.players, self.playing_time, self.weight
        )
    }

    /// `Rating: 8.11 (Bayes: 7.95) • My: 9`
    pub fn rating_line(&self) -> String {
        format!("Rating: {} (Bayes: {}) • My: {}", self.avg_rating, self.bayes_rating, self.my_rating)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileCard {
    pub summary: GameSummary,
    pub badges: Vec<Badge>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub summary: GameSummary,
    pub mechanics: Vec<Badge>,
    pub categories: Vec<Badge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    Ascending,
    Descending,
    Unsorted,
}

impl SortIndicator {
    pub fn symbol(self) -> &'static str {
        match self {
            SortIndicator::Ascending => "▲",
            SortIndicator::Descending => "▼",
            SortIndicator::Unsorted => "",
        }
    }

    /// Value for `aria-sort`
    pub fn aria(self) -> &'static str {
        match self {
            SortIndicator::Ascending => "ascending",
            SortIndicator::Descending => "descending",
            SortIndicator::Unsorted => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnHeader {
    pub column: SortColumn,
    pub indicator: SortIndicator,
}

impl ColumnHeader {
    pub fn label(&self) -> &'static str {
        self.column.label()
    }
}

pub fn column_headers(sort_column: Option<SortColumn>, direction: SortDirection) -> Vec<ColumnHeader> {
    SortColumn::ALL
        .into_iter()
        .map(|column| {
            let indicator = match (sort_column == Some(column), direction) {
                (true, SortDirection::Asc) => SortIndicator::Ascending,
                (true, SortDirection::Desc) => SortIndicator::Descending,
                (false, _) => SortIndicator::Unsorted,
            };
            ColumnHeader { column, indicator }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedView {
    Tiles(Vec<TileCard>),
    Table { headers: Vec<ColumnHeader>, rows: Vec<ListRow> },
}

impl RenderedView {
    pub fn len(&self) -> usize {
        match self {
            RenderedView::Tiles(cards) => cards.len(),
            RenderedView::Table { rows, .. } => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `12 game(s)`
    pub fn stats_line(&self) -> String {
        format!("{} game(s)", self.len())
    }
}

fn tile(game: &GameRecord) -> TileCard {
    TileCard {
        summary: GameSummary::from_record(game),
        badges: game.mechanics.iter().take(TILE_MECHANIC_BADGES).map(|m| Badge::mechanic(m)).collect(),
    }
}

fn row(game: &GameRecord) -> ListRow {
    ListRow {
        summary: GameSummary::from_record(game),
        mechanics: game.mechanics.iter().map(|m| Badge::mechanic(m)).collect(),
        categories: game.categories.iter().map(|c| Badge::category(c)).collect(),
    }
}

/// Build the view for a result set.
///
/// Tiles keep the input order. The table is sorted first.
pub fn render(
    games: &[GameRecord],
    view_mode: ViewMode,
    sort_column: Option<SortColumn>,
    sort_direction: SortDirection,
) -> RenderedView {
    render_with(games, view_mode, sort_column, sort_direction, MissingKeys::default())
}

pub fn render_with(
    games: &[GameRecord],
    view_mode: ViewMode,
    sort_column: Option<SortColumn>,
    sort_direction: SortDirection,
    missing: MissingKeys,
) -> RenderedView {
    match view_mode {
        ViewMode::Tile => RenderedView::Tiles(games.iter().map(tile).collect()),
        ViewMode::List => RenderedView::Table {
            headers: column_headers(sort_column, sort_direction),
            rows: sort_games(games, sort_column, sort_direction, missing)
                .into_iter()
                .map(row)
                .collect(),
        },
    }
}
