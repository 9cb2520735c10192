//! Empty / non-empty classification of data views.
//!
//! A data view is "empty" when it carries no discovered fields. The remote
//! API encodes that state inconsistently across versions: the `fields` key
//! may be missing, an empty array, or the literal string `"[]"` (older
//! instances store the field list as a JSON-encoded string). All encodings
//! are normalized in one place.

use crate::model::DataView;
use serde_json::Value;

/// Decides emptiness of a `fields` attribute, exhaustively over every JSON
/// shape it has been observed to take. Total: never fails, every input is
/// exactly one of empty / non-empty.
pub fn fields_are_empty(fields: &Option<Value>) -> bool {
    match fields {
        None | Some(Value::Null) => true,
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        // Legacy encoding: the field list serialized into a string. The
        // two-character "[]" is an empty list; any other non-empty string
        // carries at least one field.
        Some(Value::String(s)) => s.is_empty() || s == "[]",
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(_)) => false,
    }
}

/// True when the data view has no discovered fields. Records without an
/// `attributes` object classify as empty, not as an error.
pub fn is_empty(view: &DataView) -> bool {
    fields_are_empty(&view.attributes.fields)
}

/// Splits a collection into (empty, non-empty), preserving relative order
/// within each half.
pub fn partition_by_fields(views: Vec<DataView>) -> (Vec<DataView>, Vec<DataView>) {
    views.into_iter().partition(is_empty)
}

/// The empty data views of a collection.
pub fn empty_data_views(views: &[DataView]) -> Vec<&DataView> {
    views.iter().filter(|dv| is_empty(dv)).collect()
}

/// The non-empty data views of a collection.
pub fn non_empty_data_views(views: &[DataView]) -> Vec<&DataView> {
    views.iter().filter(|dv| !is_empty(dv)).collect()
}

/// Ids of the empty data views, in collection order.
pub fn empty_data_view_ids(views: &[DataView]) -> Vec<String> {
    views
        .iter()
        .filter(|dv| is_empty(dv))
        .map(|dv| dv.id.clone())
        .collect()
}
