pub mod classify;
pub mod config;
pub mod dedup;
pub mod error;
pub mod gateway;
pub mod matching;
pub mod model;
pub mod notify;

// Re-export common types
pub use config::{NotificationMode, SweepConfig};
pub use error::{Result, SweepError};
pub use gateway::{DeleteOutcome, SavedObjectGateway};
pub use matching::HistoricalMatch;
pub use model::DataView;
pub use notify::{Notification, Notifier};
