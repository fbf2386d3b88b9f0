//! Facet catalog loading, ranking and tag-cloud weights

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::api::CatalogApi;
use crate::error::CatalogError;
use crate::model::FacetCatalog;

/// Smallest tag scale, used for the least frequent value
pub const TAG_SCALE_BASE: f64 = 0.85;
/// Added on top of the base for the most frequent value
pub const TAG_SCALE_RANGE: f64 = 0.9;
pub const TAG_BASE_FONT_PX: f64 = 14.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedFacet {
    pub name: String,
    pub count: u64,
}

impl RankedFacet {
    /// Select option text, e.g. `Worker Placement (12)`
    pub fn option_label(&self) -> String {
        format!("{} ({})", self.name, self.count)
    }
}

/// Values ordered by descending count.
///
/// Ties keep name order because the input map is ordered and the sort is stable.
pub fn ranked(values: &BTreeMap<String, u64>) -> Vec<RankedFacet> {
    let mut ranked: Vec<RankedFacet> = values
        .iter()
        .map(|(name, count)| RankedFacet { name: name.clone(), count: *count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagWeight {
    pub name: String,
    pub count: u64,
    pub scale: f64,
}

impl TagWeight {
    pub fn font_size(&self) -> String {
        format!("{:.1}px", TAG_BASE_FONT_PX * self.scale)
    }
}

/// `base + (count / max) * range`, where `max` is the top count of the category
pub fn tag_scale(count: u64, max_count: u64) -> f64 {
    if max_count == 0 {
        return TAG_SCALE_BASE;
    }
    TAG_SCALE_BASE + (count as f64 / max_count as f64) * TAG_SCALE_RANGE
}

/// Ranked tags with their visual weight
pub fn tag_cloud(values: &BTreeMap<String, u64>) -> Vec<TagWeight> {
    let ranked = ranked(values);
    let max_count = ranked.first().map(|r| r.count).unwrap_or(0);
    ranked
        .into_iter()
        .map(|r| TagWeight { scale: tag_scale(r.count, max_count), name: r.name, count: r.count })
        .collect()
}

/// Holds the last successfully loaded catalog.
///
/// Only `load` replaces it, and only on success: a failed load leaves the
/// previous snapshot in place and hands the error back.
#[derive(Debug, Default)]
pub struct FacetCatalogLoader {
    current: RefCell<Option<Rc<FacetCatalog>>>,
}

impl FacetCatalogLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Rc<FacetCatalog>> {
        self.current.borrow().clone()
    }

    pub async fn load<A: CatalogApi + ?Sized>(&self, api: &A) -> Result<Rc<FacetCatalog>, CatalogError> {
        match api.facets().await {
            Ok(catalog) => {
                let catalog = Rc::new(catalog);
                tracing::info!(
                    mechanics = catalog.mechanics.len(),
                    categories = catalog.categories.len(),
                    "Loaded facet catalog"
                );
                *self.current.borrow_mut() = Some(Rc::clone(&catalog));
                Ok(catalog)
            }
            Err(e) => {
                tracing::warn!("Failed to load facets, keeping previous catalog: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{catalog, FakeApi};
    use futures::executor::block_on;

    fn counts(pairs: &[(&str, u64)]) -> BTreeMap<String, u64> {
        pairs.iter().map(|(n, c)| (n.to_string(), *c)).collect()
    }

    #[test]
    fn test_ranked_descending_with_stable_ties() {
        let out = ranked(&counts(&[("Dice", 2), ("Auction", 5), ("Bluffing", 2), ("Cards", 9)]));
        let names: Vec<&str> = out.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Cards", "Auction", "Bluffing", "Dice"]);
        assert_eq!(out[1].option_label(), "Auction (5)");
    }

    #[test]
    fn test_tag_scale() {
        assert_eq!(tag_scale(10, 10), TAG_SCALE_BASE + TAG_SCALE_RANGE);
        assert_eq!(tag_scale(5, 10), TAG_SCALE_BASE + 0.45);
        assert_eq!(tag_scale(0, 0), TAG_SCALE_BASE);
    }

    #[test]
    fn test_tag_cloud() {
        let cloud = tag_cloud(&counts(&[("Worker Placement", 4), ("Dice Rolling", 2)]));
        assert_eq!(cloud[0].name, "Worker Placement");
        assert_eq!(cloud[0].font_size(), "24.5px");
        assert_eq!(cloud[1].font_size(), "18.2px");

        assert!(tag_cloud(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn test_failed_load_keeps_previous() {
        let api = FakeApi::default();
        api.push_facets(Ok(catalog(&[("Drafting", 3)])));
        api.push_facets(Err(CatalogError::Server { status: 500, body: String::new() }));

        let loader = FacetCatalogLoader::new();
        assert!(loader.current().is_none());

        block_on(loader.load(&api)).unwrap();
        let err = block_on(loader.load(&api)).unwrap_err();
        assert_eq!(err, CatalogError::Server { status: 500, body: String::new() });

        let current = loader.current().unwrap();
        assert_eq!(current.mechanics.get("Drafting"), Some(&3));
    }
}
