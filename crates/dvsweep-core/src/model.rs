//! Domain model for Kibana data-view ("index-pattern") saved objects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One remote index-pattern saved object.
///
/// Records are created and owned exclusively by the remote Kibana instance;
/// this application only reads them and conditionally requests deletion.
/// Unknown keys are retained via `extra` so deduplication always operates on
/// the full attribute set, not a lossy projection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataView {
    /// Unique within a space, immutable once created remotely.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub attributes: DataViewAttributes,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `attributes` object of a data view.
///
/// `fields` is kept as raw JSON: depending on the Kibana version it arrives
/// as a structured array, a JSON-encoded string, or not at all. Emptiness is
/// decided by [`crate::classify::fields_are_empty`], never here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DataViewAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DataView {
    /// The human-readable name used as the matching key. Absent titles are
    /// treated as the empty string.
    pub fn title(&self) -> &str {
        self.attributes.title.as_deref().unwrap_or("")
    }
}
