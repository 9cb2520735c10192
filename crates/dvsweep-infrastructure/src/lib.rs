pub mod config;
pub mod kibana_client;
pub mod smtp_notifier;

pub use kibana_client::KibanaClient;
pub use smtp_notifier::SmtpNotifier;
