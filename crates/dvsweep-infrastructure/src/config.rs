//! Configuration resolution.
//!
//! Mirrors the deployment reality of the tool: an optional TOML file
//! (`~/.config/dvsweep/config.toml`) carries the stable settings, and
//! environment variables fill in or override anything — secrets in
//! particular are expected to arrive via the environment. The resolved
//! [`SweepConfig`] is validated once and then passed into each component.

use dvsweep_core::config::{
    KibanaConfig, NotificationMode, SmtpConfig, SpaceConfig, SweepConfig,
};
use dvsweep_core::error::{Result, SweepError};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

const ENV_KIBANA_URL: &str = "DVSWEEP_KIBANA_URL";
const ENV_KIBANA_TOKEN: &str = "DVSWEEP_KIBANA_TOKEN";
const ENV_SOURCE_SPACE: &str = "DVSWEEP_SOURCE_SPACE";
const ENV_ARCHIVE_SPACE: &str = "DVSWEEP_ARCHIVE_SPACE";
const ENV_SMTP_HOST: &str = "DVSWEEP_SMTP_HOST";
const ENV_SMTP_PORT: &str = "DVSWEEP_SMTP_PORT";
const ENV_SMTP_USERNAME: &str = "DVSWEEP_SMTP_USERNAME";
const ENV_SMTP_PASSWORD: &str = "DVSWEEP_SMTP_PASSWORD";
const ENV_SMTP_FROM: &str = "DVSWEEP_SMTP_FROM";
const ENV_SMTP_RECIPIENTS: &str = "DVSWEEP_SMTP_RECIPIENTS";
const ENV_NOTIFICATION_MODE: &str = "DVSWEEP_NOTIFICATION_MODE";
const ENV_TIMEOUT_SECS: &str = "DVSWEEP_TIMEOUT_SECS";

/// Partial configuration as read from the TOML file. Everything is
/// optional here; the environment completes it.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    kibana: FileKibana,
    #[serde(default)]
    spaces: FileSpaces,
    #[serde(default)]
    smtp: FileSmtp,
    notification_mode: Option<NotificationMode>,
    request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct FileKibana {
    base_url: Option<String>,
    api_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileSpaces {
    source: Option<String>,
    archive: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileSmtp {
    host: Option<String>,
    port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    from: Option<String>,
    recipients: Option<Vec<String>>,
}

/// Resolves the configuration for one run from the default config file and
/// the process environment, then validates it.
pub fn resolve() -> Result<SweepConfig> {
    let file = load_file(default_config_path())?;
    let env: HashMap<String, String> = std::env::vars().collect();
    let config = from_sources(file, &env)?;
    config.validate()?;
    Ok(config)
}

/// Platform config file location, `<config dir>/dvsweep/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dvsweep").join("config.toml"))
}

/// Reads and parses the config file. A missing or empty file is not an
/// error; an unreadable or unparsable one is.
pub fn load_file(path: Option<PathBuf>) -> Result<FileConfig> {
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };
    if !path.exists() {
        return Ok(FileConfig::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| SweepError::config(format!("failed to read {:?}: {}", path, e)))?;
    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    toml::from_str(&content)
        .map_err(|e| SweepError::config(format!("failed to parse {:?}: {}", path, e)))
}

/// Merges file and environment into a complete configuration. The
/// environment always wins over the file.
pub fn from_sources(file: FileConfig, env: &HashMap<String, String>) -> Result<SweepConfig> {
    let defaults = SpaceConfig::default();

    let base_url = env
        .get(ENV_KIBANA_URL)
        .cloned()
        .or(file.kibana.base_url)
        .ok_or_else(|| {
            SweepError::config(format!(
                "kibana base URL missing: set {} or kibana.base_url",
                ENV_KIBANA_URL
            ))
        })?;

    let smtp_host = env
        .get(ENV_SMTP_HOST)
        .cloned()
        .or(file.smtp.host)
        .ok_or_else(|| {
            SweepError::config(format!(
                "SMTP host missing: set {} or smtp.host",
                ENV_SMTP_HOST
            ))
        })?;

    let smtp_from = env
        .get(ENV_SMTP_FROM)
        .cloned()
        .or(file.smtp.from)
        .ok_or_else(|| {
            SweepError::config(format!(
                "SMTP sender missing: set {} or smtp.from",
                ENV_SMTP_FROM
            ))
        })?;

    let recipients = match env.get(ENV_SMTP_RECIPIENTS) {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        None => file.smtp.recipients.unwrap_or_default(),
    };

    let notification_mode = match env.get(ENV_NOTIFICATION_MODE).map(String::as_str) {
        Some("per_item") => NotificationMode::PerItem,
        Some("summary") => NotificationMode::Summary,
        Some(other) => {
            return Err(SweepError::config(format!(
                "{} must be 'per_item' or 'summary', got '{}'",
                ENV_NOTIFICATION_MODE, other
            )));
        }
        None => file.notification_mode.unwrap_or_default(),
    };

    let request_timeout_secs = match env.get(ENV_TIMEOUT_SECS) {
        Some(raw) => raw.parse::<u64>().map_err(|_| {
            SweepError::config(format!("{} must be an integer, got '{}'", ENV_TIMEOUT_SECS, raw))
        })?,
        None => file.request_timeout_secs.unwrap_or(30),
    };

    let smtp_port = match env.get(ENV_SMTP_PORT) {
        Some(raw) => raw.parse::<u16>().map_err(|_| {
            SweepError::config(format!("{} must be a port number, got '{}'", ENV_SMTP_PORT, raw))
        })?,
        None => file.smtp.port.unwrap_or(587),
    };

    Ok(SweepConfig {
        kibana: KibanaConfig {
            base_url,
            api_token: env.get(ENV_KIBANA_TOKEN).cloned().or(file.kibana.api_token),
        },
        spaces: SpaceConfig {
            source: env
                .get(ENV_SOURCE_SPACE)
                .cloned()
                .or(file.spaces.source)
                .unwrap_or(defaults.source),
            archive: env
                .get(ENV_ARCHIVE_SPACE)
                .cloned()
                .or(file.spaces.archive)
                .unwrap_or(defaults.archive),
        },
        smtp: SmtpConfig {
            host: smtp_host,
            port: smtp_port,
            username: env
                .get(ENV_SMTP_USERNAME)
                .cloned()
                .or(file.smtp.username)
                .unwrap_or_default(),
            password: env.get(ENV_SMTP_PASSWORD).cloned().or(file.smtp.password),
            from: smtp_from,
            recipients,
        },
        notification_mode,
        request_timeout_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_config(content: &str) -> FileConfig {
        toml::from_str(content).unwrap()
    }

    fn full_file() -> FileConfig {
        file_config(
            r#"
            [kibana]
            base_url = "https://kibana.example.com"

            [smtp]
            host = "smtp.example.com"
            from = "ops@example.com"
            recipients = ["admin@example.com"]
            "#,
        )
    }

    #[test]
    fn file_alone_resolves_with_defaults() {
        let config = from_sources(full_file(), &HashMap::new()).unwrap();
        assert_eq!(config.kibana.base_url, "https://kibana.example.com");
        assert_eq!(config.spaces.source, "default");
        assert_eq!(config.spaces.archive, "co");
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.notification_mode, NotificationMode::Summary);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn environment_overrides_file() {
        let env = HashMap::from([
            (ENV_KIBANA_URL.to_string(), "https://other.example.com".to_string()),
            (ENV_KIBANA_TOKEN.to_string(), "secret".to_string()),
            (ENV_ARCHIVE_SPACE.to_string(), "cold".to_string()),
            (ENV_NOTIFICATION_MODE.to_string(), "per_item".to_string()),
        ]);
        let config = from_sources(full_file(), &env).unwrap();
        assert_eq!(config.kibana.base_url, "https://other.example.com");
        assert_eq!(config.kibana.api_token.as_deref(), Some("secret"));
        assert_eq!(config.spaces.archive, "cold");
        assert_eq!(config.notification_mode, NotificationMode::PerItem);
    }

    #[test]
    fn recipients_parse_from_comma_list() {
        let env = HashMap::from([(
            ENV_SMTP_RECIPIENTS.to_string(),
            "a@example.com, b@example.com,,".to_string(),
        )]);
        let config = from_sources(full_file(), &env).unwrap();
        assert_eq!(config.smtp.recipients, vec!["a@example.com", "b@example.com"]);
    }

    #[test]
    fn missing_base_url_is_a_config_error() {
        let file = file_config(
            r#"
            [smtp]
            host = "smtp.example.com"
            from = "ops@example.com"
            recipients = ["admin@example.com"]
            "#,
        );
        let err = from_sources(file, &HashMap::new()).unwrap_err();
        assert!(matches!(err, SweepError::Config(_)));
    }

    #[test]
    fn invalid_notification_mode_is_rejected() {
        let env = HashMap::from([(ENV_NOTIFICATION_MODE.to_string(), "both".to_string())]);
        assert!(from_sources(full_file(), &env).is_err());
    }

    #[test]
    fn missing_file_resolves_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_file(Some(dir.path().join("config.toml"))).unwrap();
        assert!(loaded.kibana.base_url.is_none());
    }

    #[test]
    fn unparsable_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "kibana = ][").unwrap();
        assert!(load_file(Some(path)).is_err());
    }
}
