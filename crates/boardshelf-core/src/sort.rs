//! Client-side sorting for the list view

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::model::GameRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Name,
    Year,
    Players,
    PlayingTime,
    Weight,
    AvgRating,
    BayesRating,
    MyRating,
}

impl SortColumn {
    pub const ALL: [SortColumn; 8] = [
        SortColumn::Name,
        SortColumn::Year,
        SortColumn::Players,
        SortColumn::PlayingTime,
        SortColumn::Weight,
        SortColumn::AvgRating,
        SortColumn::BayesRating,
        SortColumn::MyRating,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::Year => "year",
            SortColumn::Players => "players",
            SortColumn::PlayingTime => "playing_time",
            SortColumn::Weight => "weight",
            SortColumn::AvgRating => "avg_rating",
            SortColumn::BayesRating => "bayes_rating",
            SortColumn::MyRating => "my_rating",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Name => "Name",
            SortColumn::Year => "Year",
            SortColumn::Players => "Players",
            SortColumn::PlayingTime => "Time",
            SortColumn::Weight => "Weight",
            SortColumn::AvgRating => "Rating",
            SortColumn::BayesRating => "Bayes",
            SortColumn::MyRating => "My rating",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortColumn::ALL
            .into_iter()
            .find(|c| c.key() == s.trim())
            .ok_or_else(|| format!("unknown sort column '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

/// How absent numeric fields become sort keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingKeys {
    /// Absent values have no key and go after every present value, in both directions
    #[default]
    SortLast,
    /// Absent values sort as 0
    AsZero,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SortKey<'a> {
    Text(&'a str),
    Number(f64),
    Missing,
}

fn numeric(value: Option<f64>, missing: MissingKeys) -> SortKey<'static> {
    match (value, missing) {
        (Some(v), _) => SortKey::Number(v),
        (None, MissingKeys::AsZero) => SortKey::Number(0.0),
        (None, MissingKeys::SortLast) => SortKey::Missing,
    }
}

fn sort_key(game: &GameRecord, column: SortColumn, missing: MissingKeys) -> SortKey<'_> {
    match column {
        SortColumn::Name => SortKey::Text(&game.name),
        SortColumn::Year => numeric(game.year.map(f64::from), missing),
        SortColumn::Players => numeric(game.min_players.map(f64::from), missing),
        SortColumn::PlayingTime => numeric(game.playing_time.map(f64::from), missing),
        SortColumn::Weight => numeric(game.weight, missing),
        SortColumn::AvgRating => numeric(game.avg_rating, missing),
        SortColumn::BayesRating => numeric(game.bayes_rating, missing),
        SortColumn::MyRating => numeric(game.my_rating, missing),
    }
}

fn fold_case(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

/// Case-folded with diacritics stripped, so `É` files next to `e`
fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase)
}

/// Locale-style string ordering: base letters first, then accents (plain
/// before accented), then case (lowercase before uppercase).
pub fn collate(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| fold_case(a).cmp(fold_case(b)))
        .then_with(|| b.cmp(a))
}

fn compare(a: SortKey<'_>, b: SortKey<'_>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
        // Missing keys ignore direction
        (SortKey::Missing, _) => Ordering::Greater,
        (_, SortKey::Missing) => Ordering::Less,
        (SortKey::Number(x), SortKey::Number(y)) => {
            direction.apply(x.total_cmp(&y))
        }
        (SortKey::Text(x), SortKey::Text(y)) => direction.apply(collate(x, y)),
        _ => Ordering::Equal,
    }
}

/// Sort a result set for display.
///
/// Returns a new sequence of references; the input is untouched. With no
/// column the input order is kept. The sort is stable, so equal keys keep
/// their server order.
pub fn sort_games<'a>(
    games: &'a [GameRecord],
    column: Option<SortColumn>,
    direction: SortDirection,
    missing: MissingKeys,
) -> Vec<&'a GameRecord> {
    let mut sorted: Vec<&GameRecord> = games.iter().collect();
    if let Some(column) = column {
        sorted.sort_by(|a, b| {
            compare(sort_key(a, column, missing), sort_key(b, column, missing), direction)
        });
    }
    sorted
}
