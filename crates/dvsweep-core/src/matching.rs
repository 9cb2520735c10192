//! Matching empty data views against their archival counterparts.
//!
//! The only linkage between a data view and its historically-preserved
//! version is the naming convention: a view titled `T` is archived under the
//! title `hist_T` in the archival space. There is no foreign key.

use crate::model::DataView;
use std::collections::HashMap;

/// Title prefix of an archival counterpart.
pub const HISTORICAL_PREFIX: &str = "hist_";

/// Per-empty-record match outcome. Ephemeral: produced by
/// [`match_historical`], consumed once by the decision engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalMatch {
    /// Title of the empty data view (empty string when absent).
    pub title: String,
    /// Id of the empty data view.
    pub data_view_id: String,
    /// Id of the archival counterpart, or `None` when no counterpart
    /// exists.
    pub historical_id: Option<String>,
}

/// Computes, per empty data view, whether an archival counterpart exists.
///
/// A lookup table is built from the historical titles first, so the cost is
/// one pass over each collection rather than a per-item search. Duplicate
/// historical titles cannot occur under the naming convention unless the
/// upstream data is already inconsistent; when they do, the last record in
/// iteration order wins.
///
/// The output is stable: one result per input, in input order.
pub fn match_historical(empty: &[DataView], historical: &[DataView]) -> Vec<HistoricalMatch> {
    let mut titles: HashMap<&str, &str> = HashMap::with_capacity(historical.len());
    for dv in historical {
        titles.insert(dv.title(), dv.id.as_str());
    }

    empty
        .iter()
        .map(|dv| {
            let expected = format!("{}{}", HISTORICAL_PREFIX, dv.title());
            HistoricalMatch {
                title: dv.title().to_string(),
                data_view_id: dv.id.clone(),
                historical_id: titles.get(expected.as_str()).map(|id| (*id).to_string()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn view(id: &str, title: &str) -> DataView {
        serde_json::from_value(json!({"id": id, "attributes": {"title": title}})).unwrap()
    }

    fn historical_set() -> Vec<DataView> {
        vec![view("h1", "hist_orders"), view("h2", "hist_other")]
    }

    #[test]
    fn finds_counterpart_by_prefixed_title() {
        let results = match_historical(&[view("e1", "orders")], &historical_set());
        assert_eq!(
            results,
            vec![HistoricalMatch {
                title: "orders".to_string(),
                data_view_id: "e1".to_string(),
                historical_id: Some("h1".to_string()),
            }]
        );
    }

    #[test]
    fn missing_counterpart_yields_none() {
        let results = match_historical(&[view("e2", "unknown")], &historical_set());
        assert_eq!(
            results,
            vec![HistoricalMatch {
                title: "unknown".to_string(),
                data_view_id: "e2".to_string(),
                historical_id: None,
            }]
        );
    }

    #[test]
    fn output_order_follows_input_order() {
        let empty = vec![view("e2", "unknown"), view("e1", "orders")];
        let results = match_historical(&empty, &historical_set());
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].data_view_id, "e2");
        assert_eq!(results[1].data_view_id, "e1");
    }

    #[test]
    fn duplicate_historical_titles_last_write_wins() {
        let historical = vec![view("h1", "hist_orders"), view("h9", "hist_orders")];
        let results = match_historical(&[view("e1", "orders")], &historical);
        assert_eq!(results[0].historical_id, Some("h9".to_string()));
    }

    #[test]
    fn absent_title_defaults_to_empty_string() {
        let empty: DataView = serde_json::from_value(json!({"id": "e3"})).unwrap();
        let historical = vec![view("h5", "hist_")];
        let results = match_historical(&[empty], &historical);
        assert_eq!(results[0].title, "");
        assert_eq!(results[0].historical_id, Some("h5".to_string()));
    }
}
