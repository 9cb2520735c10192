//! Canonicalization and deduplication of fetched saved objects.
//!
//! The admin API can return the same object more than once within a single
//! bulk page. Two raw objects are duplicates iff their canonical serialized
//! forms (recursively key-sorted JSON) are byte-identical; distinct ids are
//! never merged, even when two objects share a title.

use crate::error::Result;
use crate::model::DataView;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Returns a copy of `value` with every object's keys in sorted order,
/// recursively.
fn canonical_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, &Value> = map.iter().collect();
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), canonical_value(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonical_value).collect()),
        other => other.clone(),
    }
}

/// Serializes `value` to its canonical string form (sorted keys).
pub fn canonical_form(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(&canonical_value(value))?)
}

/// Collapses byte-identical saved objects and deserializes the survivors
/// into [`DataView`] records.
///
/// Output order is unspecified; callers must not depend on fetch order.
pub fn dedupe_saved_objects(raw: Vec<Value>) -> Result<Vec<DataView>> {
    let mut unique = BTreeSet::new();
    for object in &raw {
        unique.insert(canonical_form(object)?);
    }

    let mut views = Vec::with_capacity(unique.len());
    for canonical in unique {
        views.push(serde_json::from_str::<DataView>(&canonical)?);
    }
    Ok(views)
}
