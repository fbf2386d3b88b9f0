//! Records returned by the catalog API

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single board game as served by `GET /api/games`.
///
/// Read-only on this side. Every numeric field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub min_players: Option<u32>,
    #[serde(default)]
    pub max_players: Option<u32>,
    #[serde(default)]
    pub playing_time: Option<u32>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub avg_rating: Option<f64>,
    #[serde(default)]
    pub bayes_rating: Option<f64>,
    #[serde(default)]
    pub my_rating: Option<f64>,
    #[serde(default)]
    pub mechanics: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub designers: Vec<String>,
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub publishers: Vec<String>,
}

impl GameRecord {
    /// Thumbnail if present, otherwise the full image
    pub fn image_url(&self) -> Option<&str> {
        self.thumbnail
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.image.as_deref().filter(|s| !s.is_empty()))
    }
}

/// The filterable facet categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FacetKind {
    Mechanics,
    Categories,
    Designers,
    Artists,
    Publishers,
}

impl FacetKind {
    pub const ALL: [FacetKind; 5] = [
        FacetKind::Mechanics,
        FacetKind::Categories,
        FacetKind::Designers,
        FacetKind::Artists,
        FacetKind::Publishers,
    ];

    /// Key used both in the facets payload and in the games query
    pub fn key(self) -> &'static str {
        match self {
            FacetKind::Mechanics => "mechanics",
            FacetKind::Categories => "categories",
            FacetKind::Designers => "designers",
            FacetKind::Artists => "artists",
            FacetKind::Publishers => "publishers",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FacetKind::Mechanics => "Mechanics",
            FacetKind::Categories => "Categories",
            FacetKind::Designers => "Designers",
            FacetKind::Artists => "Artists",
            FacetKind::Publishers => "Publishers",
        }
    }
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FacetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FacetKind::ALL
            .into_iter()
            .find(|k| k.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown facet '{}'", s))
    }
}

/// Snapshot of `GET /api/facets`: value name to occurrence count per category.
///
/// Counts are unsigned so a negative count fails to decode. Replaced wholesale
/// on every successful load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCatalog {
    pub mechanics: BTreeMap<String, u64>,
    pub categories: BTreeMap<String, u64>,
    pub designers: BTreeMap<String, u64>,
    pub artists: BTreeMap<String, u64>,
    pub publishers: BTreeMap<String, u64>,

    // Distribution facets. Informational only, never used as filters.
    #[serde(default)]
    pub years: BTreeMap<String, u64>,
    #[serde(default)]
    pub player_counts: BTreeMap<String, u64>,
    #[serde(default)]
    pub time_buckets: BTreeMap<String, u64>,
    #[serde(default)]
    pub weight_buckets: BTreeMap<String, u64>,
}

impl FacetCatalog {
    pub fn get(&self, kind: FacetKind) -> &BTreeMap<String, u64> {
        match kind {
            FacetKind::Mechanics => &self.mechanics,
            FacetKind::Categories => &self.categories,
            FacetKind::Designers => &self.designers,
            FacetKind::Artists => &self.artists,
            FacetKind::Publishers => &self.publishers,
        }
    }

    /// Distribution facets with their display labels
    pub fn distributions(&self) -> [(&'static str, &BTreeMap<String, u64>); 4] {
        [
            ("Years", &self.years),
            ("Player counts", &self.player_counts),
            ("Playing time", &self.time_buckets),
            ("Weight", &self.weight_buckets),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_record_missing_fields() {
        let game: GameRecord = serde_json::from_str(r#"{"id": 7, "name": "Azul"}"#).unwrap();
        assert_eq!(game.name, "Azul");
        assert_eq!(game.year, None);
        assert!(game.mechanics.is_empty());
        assert_eq!(game.image_url(), None);
    }

    #[test]
    fn test_game_record_nulls_and_floats() {
        let game: GameRecord = serde_json::from_str(
            r#"{"id": 1, "name": "Brass", "year": null, "weight": 3.9, "avg_rating": 8,
                "thumbnail": "", "image": "https://img/brass.png"}"#,
        )
        .unwrap();
        assert_eq!(game.year, None);
        assert_eq!(game.weight, Some(3.9));
        assert_eq!(game.avg_rating, Some(8.0));
        assert_eq!(game.image_url(), Some("https://img/brass.png"));
    }

    #[test]
    fn test_facet_catalog_requires_core_facets() {
        let missing = serde_json::from_str::<FacetCatalog>(r#"{"mechanics": {}}"#);
        assert!(missing.is_err());

        let catalog: FacetCatalog = serde_json::from_str(
            r#"{"mechanics": {"Dice Rolling": 3}, "categories": {}, "designers": {},
                "artists": {}, "publishers": {}}"#,
        )
        .unwrap();
        assert_eq!(catalog.get(FacetKind::Mechanics).get("Dice Rolling"), Some(&3));
        assert!(catalog.years.is_empty());
    }

    #[test]
    fn test_negative_count_rejected() {
        let bad = serde_json::from_str::<FacetCatalog>(
            r#"{"mechanics": {"X": -1}, "categories": {}, "designers": {},
                "artists": {}, "publishers": {}}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_facet_kind_parse() {
        assert_eq!("Designers".parse::<FacetKind>(), Ok(FacetKind::Designers));
        assert!("years".parse::<FacetKind>().is_err());
    }
}
