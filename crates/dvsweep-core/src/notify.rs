//! Notifier trait.

use crate::error::Result;
use async_trait::async_trait;

/// A structured message for human recipients. Recipients are fixed per run
/// and belong to the notifier's configuration, not the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Synchronous delivery of alerts and summaries.
///
/// Failures are reported as [`crate::SweepError::Notification`] and never
/// retried; a failed delivery does not roll back any deletion that preceded
/// it.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<()>;
}
