//! Run configuration.
//!
//! One [`SweepConfig`] value is resolved per reconciliation run and passed
//! into each component at construction. There is no process-wide
//! configuration state.

use crate::error::{Result, SweepError};
use serde::{Deserialize, Serialize};

/// Bulk fetch page size. The admin API is queried once per space with this
/// limit; true pagination is out of scope.
pub const FIND_PAGE_SIZE: u32 = 10_000;

fn default_source_space() -> String {
    "default".to_string()
}

fn default_archive_space() -> String {
    "co".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_timeout_secs() -> u64 {
    30
}

/// Complete configuration for one reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    pub kibana: KibanaConfig,
    #[serde(default)]
    pub spaces: SpaceConfig,
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub notification_mode: NotificationMode,
    /// Upper bound on every individual network call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Connection settings for the admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KibanaConfig {
    /// Base URL of the Kibana instance, e.g. `https://kibana.example.com`.
    pub base_url: String,
    /// Bearer token for the `Authorization` header. Optional for instances
    /// that authenticate at the network layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
}

/// The two spaces a run operates on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceConfig {
    /// Space audited for empty data views.
    #[serde(default = "default_source_space")]
    pub source: String,
    /// Space holding the `hist_`-prefixed archival counterparts.
    #[serde(default = "default_archive_space")]
    pub archive: String,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            source: default_source_space(),
            archive: default_archive_space(),
        }
    }
}

/// Settings for the SMTP notifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    /// Kept out of config files in most deployments; filled from the
    /// environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Sender address.
    pub from: String,
    /// Alert and summary recipients.
    pub recipients: Vec<String>,
}

/// How unmatched empty data views are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationMode {
    /// One alert email per unmatched data view.
    PerItem,
    /// A single email enumerating every decision of the run.
    #[default]
    Summary,
}

impl SweepConfig {
    /// Checks the invariants the components rely on. Called once after
    /// resolution, before any network call.
    pub fn validate(&self) -> Result<()> {
        if self.kibana.base_url.trim().is_empty() {
            return Err(SweepError::config("kibana.base_url must not be empty"));
        }
        if self.spaces.source.trim().is_empty() {
            return Err(SweepError::config("spaces.source must not be empty"));
        }
        if self.spaces.archive.trim().is_empty() {
            return Err(SweepError::config("spaces.archive must not be empty"));
        }
        if self.smtp.host.trim().is_empty() {
            return Err(SweepError::config("smtp.host must not be empty"));
        }
        if self.smtp.recipients.is_empty() {
            return Err(SweepError::config("smtp.recipients must not be empty"));
        }
        if self.request_timeout_secs == 0 {
            return Err(SweepError::config("request_timeout_secs must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SweepConfig {
        SweepConfig {
            kibana: KibanaConfig {
                base_url: "https://kibana.example.com".to_string(),
                api_token: Some("token".to_string()),
            },
            spaces: SpaceConfig::default(),
            smtp: SmtpConfig {
                host: "smtp.example.com".to_string(),
                port: 587,
                username: "ops".to_string(),
                password: None,
                from: "ops@example.com".to_string(),
                recipients: vec!["admin@example.com".to_string()],
            },
            notification_mode: NotificationMode::Summary,
            request_timeout_secs: 30,
        }
    }

    #[test]
    fn default_spaces_match_observed_deployment() {
        let spaces = SpaceConfig::default();
        assert_eq!(spaces.source, "default");
        assert_eq!(spaces.archive, "co");
    }

    #[test]
    fn valid_config_passes() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let mut cfg = config();
        cfg.kibana.base_url = "  ".to_string();
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, SweepError::Config(_)));
    }

    #[test]
    fn missing_recipients_are_rejected() {
        let mut cfg = config();
        cfg.smtp.recipients.clear();
        assert!(cfg.validate().is_err());
    }
}
