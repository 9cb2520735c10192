//! Reconciliation of empty data views against their archival counterparts.
//!
//! Drives the fixed sequence of one run: fetch both spaces, classify,
//! match, then walk the match results and delete or alert. Only the bulk
//! fetches are fatal; every decision-phase failure is recorded in the
//! report and the run moves on to the next item.

use chrono::Utc;
use dvsweep_core::classify::partition_by_fields;
use dvsweep_core::config::{NotificationMode, SweepConfig};
use dvsweep_core::dedup::dedupe_saved_objects;
use dvsweep_core::error::Result;
use dvsweep_core::gateway::{DeleteOutcome, SavedObjectGateway};
use dvsweep_core::matching::{HISTORICAL_PREFIX, HistoricalMatch, match_historical};
use dvsweep_core::model::DataView;
use dvsweep_core::notify::{Notification, Notifier};
use std::fmt::Write as _;
use std::sync::Arc;

/// Terminal action taken for one empty data view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemAction {
    /// The remote accepted the deletion. `already_gone` marks ids that had
    /// disappeared before we asked; retries land here, not in a failure.
    Deleted { already_gone: bool },
    /// No archival counterpart; the view was kept and reported.
    Alerted,
    /// Deletion was attempted and failed.
    DeleteFailed { message: String },
    /// A per-item alert could not be delivered.
    AlertFailed { message: String },
}

/// One line of the run's outcome trace.
#[derive(Debug, Clone)]
pub struct ItemReport {
    pub title: String,
    pub data_view_id: String,
    pub historical_id: Option<String>,
    pub action: ItemAction,
}

/// Everything a run did, in decision order.
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    /// Records with discovered fields; they exit the pipeline at
    /// classification and are never touched.
    pub non_empty: usize,
    /// Raw duplicate objects collapsed during fetch normalization, both
    /// spaces combined.
    pub duplicates_removed: usize,
    pub items: Vec<ItemReport>,
    /// Set when the summary email could not be delivered.
    pub summary_error: Option<String>,
}

impl ReconcileReport {
    pub fn deleted_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.action, ItemAction::Deleted { .. }))
            .count()
    }

    pub fn alerted_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.action, ItemAction::Alerted))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| {
                matches!(
                    item.action,
                    ItemAction::DeleteFailed { .. } | ItemAction::AlertFailed { .. }
                )
            })
            .count()
    }

    /// Human-readable trace of every decision, one line per empty data
    /// view.
    pub fn render_trace(&self) -> String {
        let mut out = String::new();
        for item in &self.items {
            let counterpart = item.historical_id.as_deref().unwrap_or("not found");
            let action = match &item.action {
                ItemAction::Deleted { already_gone: false } => "deleted".to_string(),
                ItemAction::Deleted { already_gone: true } => "already gone".to_string(),
                ItemAction::Alerted => "alerted".to_string(),
                ItemAction::DeleteFailed { message } => format!("delete failed: {}", message),
                ItemAction::AlertFailed { message } => format!("alert failed: {}", message),
            };
            let _ = writeln!(
                out,
                "{} (ID: {}) -> archival counterpart: {} [{}]",
                item.title, item.data_view_id, counterpart, action
            );
        }
        let _ = writeln!(
            out,
            "{} empty processed, {} deleted, {} without counterpart, {} failed, {} non-empty untouched",
            self.items.len(),
            self.deleted_count(),
            self.alerted_count(),
            self.failed_count(),
            self.non_empty
        );
        if self.duplicates_removed > 0 {
            let _ = writeln!(out, "{} duplicate records collapsed", self.duplicates_removed);
        }
        if let Some(error) = &self.summary_error {
            let _ = writeln!(out, "summary delivery failed: {}", error);
        }
        out
    }
}

/// The decision engine of one reconciliation run.
pub struct Reconciler {
    gateway: Arc<dyn SavedObjectGateway>,
    notifier: Arc<dyn Notifier>,
    config: SweepConfig,
}

impl Reconciler {
    pub fn new(
        gateway: Arc<dyn SavedObjectGateway>,
        notifier: Arc<dyn Notifier>,
        config: SweepConfig,
    ) -> Self {
        Self {
            gateway,
            notifier,
            config,
        }
    }

    /// Runs one full reconciliation pass.
    ///
    /// Each record moves through fetch → classification → matching →
    /// terminal action exactly once; there are no backward transitions and
    /// item outcomes are independent of each other.
    pub async fn run(&self) -> Result<ReconcileReport> {
        let (views, source_duplicates) = self.fetch_space(&self.config.spaces.source).await?;
        let (historical, archive_duplicates) =
            self.fetch_space(&self.config.spaces.archive).await?;
        let duplicates_removed = source_duplicates + archive_duplicates;

        let (empty, non_empty) = partition_by_fields(views);
        tracing::info!(
            space = %self.config.spaces.source,
            empty = empty.len(),
            non_empty = non_empty.len(),
            "classified data views"
        );

        let matches = match_historical(&empty, &historical);

        let mut items = Vec::with_capacity(matches.len());
        for matched in &matches {
            let action = match &matched.historical_id {
                Some(_) => self.delete_empty(matched).await,
                None => self.handle_unmatched(matched).await,
            };
            items.push(ItemReport {
                title: matched.title.clone(),
                data_view_id: matched.data_view_id.clone(),
                historical_id: matched.historical_id.clone(),
                action,
            });
        }

        let mut report = ReconcileReport {
            non_empty: non_empty.len(),
            duplicates_removed,
            items,
            summary_error: None,
        };

        if self.config.notification_mode == NotificationMode::Summary && !report.items.is_empty() {
            let notification = summary_notification(&report.items);
            if let Err(e) = self.notifier.send(&notification).await {
                tracing::warn!(error = %e, "summary delivery failed");
                report.summary_error = Some(e.to_string());
            }
        }

        Ok(report)
    }

    /// One bulk fetch of a space, collapsed to unique records. Returns the
    /// deduplicated views and the number of duplicates dropped.
    async fn fetch_space(&self, space_id: &str) -> Result<(Vec<DataView>, usize)> {
        let raw = self.gateway.find_index_patterns(space_id).await?;
        let fetched = raw.len();
        let views = dedupe_saved_objects(raw)?;
        let duplicates = fetched - views.len();
        Ok((views, duplicates))
    }

    async fn delete_empty(&self, matched: &HistoricalMatch) -> ItemAction {
        match self
            .gateway
            .delete_index_pattern(&self.config.spaces.source, &matched.data_view_id)
            .await
        {
            Ok(DeleteOutcome::Deleted) => {
                tracing::info!(
                    id = %matched.data_view_id,
                    title = %matched.title,
                    "deleted empty data view"
                );
                ItemAction::Deleted { already_gone: false }
            }
            Ok(DeleteOutcome::AlreadyGone) => {
                tracing::warn!(
                    id = %matched.data_view_id,
                    "data view was already gone; counting as deleted"
                );
                ItemAction::Deleted { already_gone: true }
            }
            Err(e) => {
                tracing::warn!(id = %matched.data_view_id, error = %e, "deletion failed");
                ItemAction::DeleteFailed {
                    message: e.to_string(),
                }
            }
        }
    }

    async fn handle_unmatched(&self, matched: &HistoricalMatch) -> ItemAction {
        if self.config.notification_mode == NotificationMode::Summary {
            // Reported in the single summary email at the end of the run.
            tracing::info!(
                id = %matched.data_view_id,
                title = %matched.title,
                "no archival counterpart; queued for summary"
            );
            return ItemAction::Alerted;
        }

        let notification = alert_notification(matched, &self.config);
        match self.notifier.send(&notification).await {
            Ok(()) => {
                tracing::info!(
                    id = %matched.data_view_id,
                    title = %matched.title,
                    "no archival counterpart; alert sent"
                );
                ItemAction::Alerted
            }
            Err(e) => {
                tracing::warn!(id = %matched.data_view_id, error = %e, "alert delivery failed");
                ItemAction::AlertFailed {
                    message: e.to_string(),
                }
            }
        }
    }
}

/// Builds the per-item alert for an empty data view with no counterpart.
pub fn alert_notification(matched: &HistoricalMatch, config: &SweepConfig) -> Notification {
    let subject = format!(
        "Empty data view without archival counterpart: {}",
        matched.title
    );
    let body = format!(
        "The data view '{}' (ID: {}) in space '{}' has no discovered fields,\n\
         and no '{}{}' counterpart exists in space '{}'.\n\
         It was NOT deleted and needs manual attention.\n",
        matched.title,
        matched.data_view_id,
        config.spaces.source,
        HISTORICAL_PREFIX,
        matched.title,
        config.spaces.archive,
    );
    Notification::new(subject, body)
}

/// Builds the single summary email of a run.
///
/// The two sections are derived from the same match outcomes the decision
/// loop acted on, so the reported categories always mirror what was
/// actually attempted.
pub fn summary_notification(items: &[ItemReport]) -> Notification {
    let with_version: Vec<&ItemReport> =
        items.iter().filter(|i| i.historical_id.is_some()).collect();
    let without_version: Vec<&ItemReport> =
        items.iter().filter(|i| i.historical_id.is_none()).collect();

    let subject = format!(
        "Data view reconciliation: {} with archival version, {} without",
        with_version.len(),
        without_version.len()
    );

    let mut body = String::new();
    let _ = writeln!(body, "Reconciliation run finished at {}.", Utc::now().to_rfc3339());
    let _ = writeln!(body);
    let _ = writeln!(
        body,
        "Empty data views with an archival counterpart (deletion attempted): {}",
        with_version.len()
    );
    for item in &with_version {
        let counterpart = item.historical_id.as_deref().unwrap_or_default();
        match &item.action {
            ItemAction::DeleteFailed { message } => {
                let _ = writeln!(
                    body,
                    "  - {} (ID: {}) -> {} [deletion FAILED: {}]",
                    item.title, item.data_view_id, counterpart, message
                );
            }
            ItemAction::Deleted { already_gone: true } => {
                let _ = writeln!(
                    body,
                    "  - {} (ID: {}) -> {} [already gone]",
                    item.title, item.data_view_id, counterpart
                );
            }
            _ => {
                let _ = writeln!(
                    body,
                    "  - {} (ID: {}) -> {} [deleted]",
                    item.title, item.data_view_id, counterpart
                );
            }
        }
    }
    let _ = writeln!(body);
    let _ = writeln!(
        body,
        "Empty data views without an archival counterpart (kept): {}",
        without_version.len()
    );
    for item in &without_version {
        let _ = writeln!(body, "  - {} (ID: {})", item.title, item.data_view_id);
    }

    Notification::new(subject, body)
}
