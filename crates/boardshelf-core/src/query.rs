//! FilterState to `/api/games` query parameters

use crate::filter::{FilterField, FilterState, MultiField};
use crate::model::FacetKind;

pub type QueryPairs = Vec<(&'static str, String)>;

fn push_list<'a>(pairs: &mut QueryPairs, key: &'static str, values: impl IntoIterator<Item = &'a String>) {
    let joined = values
        .into_iter()
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(",");
    if !joined.is_empty() {
        pairs.push((key, joined));
    }
}

/// Build the query pairs for a filter state.
///
/// A field is present only when it has a value; lists are joined with a bare
/// comma (a comma inside a value is not escaped). Sort and view mode are
/// client-side and never sent. Pure: the same state always gives the same pairs
/// in the same order.
pub fn serialize(state: &FilterState) -> QueryPairs {
    let mut pairs = QueryPairs::new();
    push_list(&mut pairs, FacetKind::Mechanics.key(), state.selected_mechanics());
    for field in MultiField::ALL {
        push_list(&mut pairs, field.key(), state.multi(field));
    }
    for field in FilterField::ALL {
        if let Some(value) = state.get(field).filter(|v| !v.is_empty()) {
            pairs.push((field.key(), value.to_string()));
        }
    }
    pairs
}

/// Form-encode pairs (`+` for spaces), e.g. `mechanics=Worker+Placement&year_min=2010`
pub fn to_query_string(pairs: &[(&'static str, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", form_encode(k), form_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn form_encode(s: &str) -> String {
    urlencoding::encode(s).replace("%20", "+")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterStore, ViewMode};
    use crate::sort::SortColumn;

    #[test]
    fn test_worker_placement_scenario() {
        let mut store = FilterStore::new();
        store.toggle_mechanic("Worker Placement");
        store.set(FilterField::YearMin, "2010").unwrap();

        let pairs = serialize(store.snapshot());
        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(&("mechanics", "Worker Placement".to_string())));
        assert!(pairs.contains(&("year_min", "2010".to_string())));
        assert_eq!(to_query_string(&pairs), "mechanics=Worker+Placement&year_min=2010");
    }

    #[test]
    fn test_empty_state_serializes_nothing() {
        let mut store = FilterStore::new();
        store.set_view_mode(ViewMode::List);
        store.activate_column(SortColumn::Weight);
        store.set(FilterField::Search, "").unwrap();
        store.set_multi(MultiField::Artists, vec![]);

        assert!(serialize(store.snapshot()).is_empty());
        assert_eq!(to_query_string(&serialize(store.snapshot())), "");
    }

    #[test]
    fn test_no_empty_values_emitted() {
        let mut store = FilterStore::new();
        store.toggle_mechanic("Drafting");
        store.toggle_mechanic("Hand Management");
        store.set_multi(MultiField::Categories, vec!["Card Game".into(), "".into()]);
        store.set_multi(MultiField::Designers, vec![]);
        store.set(FilterField::Players, "3").unwrap();
        store.set(FilterField::WeightMax, " ").unwrap();

        let pairs = serialize(store.snapshot());
        assert!(pairs.iter().all(|(_, v)| !v.is_empty()));
        assert_eq!(
            pairs,
            vec![
                ("mechanics", "Drafting,Hand Management".to_string()),
                ("categories", "Card Game".to_string()),
                ("players", "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_deterministic() {
        let mut a = FilterStore::new();
        a.toggle_mechanic("Trick-taking");
        a.toggle_mechanic("Bidding");
        a.set_multi(MultiField::Publishers, vec!["Rio Grande".into(), "KOSMOS".into()]);
        a.set(FilterField::Search, "crew & co").unwrap();

        let mut b = FilterStore::new();
        b.toggle_mechanic("Bidding");
        b.toggle_mechanic("Trick-taking");
        b.set_multi(MultiField::Publishers, vec!["Rio Grande".into(), "KOSMOS".into()]);
        b.set(FilterField::Search, "crew & co").unwrap();

        let first = to_query_string(&serialize(a.snapshot()));
        assert_eq!(first, to_query_string(&serialize(a.snapshot())));
        assert_eq!(first, to_query_string(&serialize(b.snapshot())));
        assert_eq!(
            first,
            "mechanics=Bidding%2CTrick-taking&publishers=Rio+Grande%2CKOSMOS&search=crew+%26+co"
        );
    }

    #[test]
    fn test_embedded_comma_not_escaped_in_pairs() {
        let mut store = FilterStore::new();
        store.set_multi(MultiField::Designers, vec!["Smith, Jr.".into(), "Lee".into()]);
        let pairs = serialize(store.snapshot());
        assert_eq!(pairs, vec![("designers", "Smith, Jr.,Lee".to_string())]);
    }
}
