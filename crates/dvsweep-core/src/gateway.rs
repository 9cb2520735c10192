//! Saved-object gateway trait.
//!
//! Defines the interface to the remote admin API. The core never performs
//! HTTP itself; implementations live in the infrastructure crate and test
//! doubles stand in for them in unit tests.

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Terminal state of a deletion request.
///
/// The backing store soft-deletes asynchronously, so "accepted" counts as
/// success. A missing id is reported separately: retrying a deletion that
/// already happened must not look like a hard failure to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The remote accepted the deletion (status 200, 202 or 204).
    Deleted,
    /// The object no longer exists (status 404).
    AlreadyGone,
}

/// Gateway to the saved-objects admin API.
///
/// # Implementation Notes
///
/// Implementations should:
/// - Bound every call with a request timeout
/// - Map transport and status failures into typed [`crate::SweepError`]
///   variants at the call site
#[async_trait]
pub trait SavedObjectGateway: Send + Sync {
    /// Fetches all index-pattern saved objects of a space in one bulk page
    /// and returns them raw, exactly as the API serialized them.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Value>)`: The `saved_objects` array of the response
    /// - `Err(SweepError::Retrieval)`: Transport failure or non-2xx status
    async fn find_index_patterns(&self, space_id: &str) -> Result<Vec<Value>>;

    /// Requests deletion of one index-pattern saved object.
    ///
    /// # Returns
    ///
    /// - `Ok(DeleteOutcome)`: The remote accepted the deletion, or the
    ///   object was already gone
    /// - `Err(SweepError::Deletion)`: Any other status or a transport
    ///   failure
    async fn delete_index_pattern(&self, space_id: &str, id: &str) -> Result<DeleteOutcome>;
}
