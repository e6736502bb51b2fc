//! Watchlist and publishing configuration.
//!
//! The default configuration is embedded at compile time from
//! `seed_data/watchlist.yml`. A YAML file with the same shape can be
//! passed instead. Upload credentials never live in the seed file: they
//! come from `STOCKPAGE_FTP_USERNAME` and `STOCKPAGE_FTP_PASSWORD`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::FixedOffset;
use serde::Deserialize;
use thiserror::Error;
use twse_mis_api::{Client, StockQuery};

const DEFAULT_CONFIG: &str = include_str!("../seed_data/watchlist.yml");

pub const ENV_ENDPOINT: &str = "STOCKPAGE_ENDPOINT";
pub const ENV_FTP_USERNAME: &str = "STOCKPAGE_FTP_USERNAME";
pub const ENV_FTP_PASSWORD: &str = "STOCKPAGE_FTP_PASSWORD";

/// Error types for configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config YAML: {0}")]
    YamlParse(#[from] serde_yml::Error),
    #[error("UTC offset of {0} hours is out of range (-23..=23)")]
    InvalidOffset(i32),
    #[error("No publish target configured")]
    MissingPublishTarget,
    #[error("FTP credentials missing: set STOCKPAGE_FTP_USERNAME and STOCKPAGE_FTP_PASSWORD")]
    MissingCredentials,
}

/// Top-level configuration.
#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the MIS quote host.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Symbols listed on the primary exchange.
    #[serde(default)]
    pub listed: Vec<String>,

    /// Symbols traded over the counter.
    #[serde(default)]
    pub otc: Vec<String>,

    /// Where the rendered page is written. Overwritten on every run.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Fixed offset applied to update timestamps. No DST handling.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,

    #[serde(default = "default_page_title")]
    pub page_title: String,

    /// Per-request timeout for the quote fetch, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub publish: Option<PublishConfig>,
}

/// FTP upload target.
#[derive(Deserialize, Clone)]
pub struct PublishConfig {
    pub host: String,

    #[serde(default = "default_ftp_port")]
    pub port: u16,

    /// Absolute path of the uploaded file on the remote host.
    pub remote_path: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

impl fmt::Debug for PublishConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("remote_path", &self.remote_path)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

fn default_endpoint() -> String {
    "https://mis.twse.com.tw".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("index.html")
}

fn default_utc_offset_hours() -> i32 {
    8
}

fn default_page_title() -> String {
    "Watchlist".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_ftp_port() -> u16 {
    21
}

impl AppConfig {
    /// Loads the config from `path`, or the embedded default when `None`,
    /// then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|source| {
                    ConfigError::Read {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                Self::from_yaml(&content)?
            }
            None => Self::embedded()?,
        };
        config.apply_overrides(non_empty_var);
        Ok(config)
    }

    /// The embedded default watchlist, without environment overrides.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_yaml(DEFAULT_CONFIG)
    }

    /// Parses and validates YAML content.
    pub fn from_yaml(yaml_content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_yml::from_str(yaml_content)?;
        config.utc_offset()?;
        Ok(config)
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(publish) = self.publish.as_mut() {
            if let Some(username) = lookup(ENV_FTP_USERNAME) {
                publish.username = Some(username);
            }
            if let Some(password) = lookup(ENV_FTP_PASSWORD) {
                publish.password = Some(password);
            }
        }
    }

    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        if !(-23..=23).contains(&self.utc_offset_hours) {
            return Err(ConfigError::InvalidOffset(self.utc_offset_hours));
        }
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .ok_or(ConfigError::InvalidOffset(self.utc_offset_hours))
    }

    /// An API client pointed at the configured endpoint.
    pub fn client(&self) -> Client {
        Client::with_base_url(&self.endpoint)
            .with_timeout(Duration::from_secs(self.request_timeout_secs))
    }

    /// The quote query for the configured watchlist.
    pub fn query(&self) -> StockQuery {
        StockQuery::default()
            .with_listed(self.listed.iter().cloned())
            .with_otc(self.otc.iter().cloned())
    }

    /// The publish target, checked for credentials.
    pub fn publish_target(&self) -> Result<&PublishConfig, ConfigError> {
        let publish = self
            .publish
            .as_ref()
            .ok_or(ConfigError::MissingPublishTarget)?;
        publish.credentials()?;
        Ok(publish)
    }
}

impl PublishConfig {
    /// Returns `(username, password)` when both are set.
    pub fn credentials(&self) -> Result<(&str, &str), ConfigError> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() => Ok((user, pass)),
            _ => Err(ConfigError::MissingCredentials),
        }
    }
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn embedded_config_loads() {
        let config = AppConfig::embedded().unwrap();
        assert_eq!(config.listed, vec!["0050", "0056", "2330", "2317", "1216"]);
        assert_eq!(config.otc, vec!["6547", "6180"]);
        assert_eq!(config.output_path, PathBuf::from("index.html"));
        assert_eq!(config.utc_offset_hours, 8);
        let publish = config.publish.as_ref().unwrap();
        assert_eq!(publish.port, 21);
        assert_eq!(publish.remote_path, "/public_html/index.html");
        assert!(publish.username.is_none());
        assert!(publish.password.is_none());
    }

    #[test]
    fn embedded_query_matches_watchlist() {
        let config = AppConfig::embedded().unwrap();
        assert_eq!(
            config.query().ex_ch(),
            "tse_0050.tw|tse_0056.tw|tse_2330.tw|tse_2317.tw|tse_1216.tw|otc_6547.tw|otc_6180.tw"
        );
    }

    #[test]
    fn minimal_yaml_uses_defaults() {
        let config = AppConfig::from_yaml("listed: [\"2330\"]\n").unwrap();
        assert_eq!(config.endpoint, "https://mis.twse.com.tw");
        assert!(config.otc.is_empty());
        assert_eq!(config.utc_offset_hours, 8);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.publish.is_none());
    }

    #[test]
    fn request_timeout_is_configurable() {
        let config = AppConfig::from_yaml("request_timeout_secs: 5\n").unwrap();
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        let err = AppConfig::from_yaml("utc_offset_hours: 30\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOffset(30)));
    }

    #[test]
    fn negative_offset_is_accepted() {
        let config = AppConfig::from_yaml("utc_offset_hours: -5\n").unwrap();
        assert_eq!(config.utc_offset().unwrap().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        let err = AppConfig::from_yaml("listed: [unclosed\n").unwrap_err();
        assert!(matches!(err, ConfigError::YamlParse(_)));
    }

    #[test]
    fn overrides_fill_credentials() {
        let mut config = AppConfig::embedded().unwrap();
        config.apply_overrides(lookup_from(&[
            (ENV_FTP_USERNAME, "alice"),
            (ENV_FTP_PASSWORD, "secret"),
            (ENV_ENDPOINT, "http://localhost:8080"),
        ]));
        assert_eq!(config.endpoint, "http://localhost:8080");
        let publish = config.publish_target().unwrap();
        assert_eq!(publish.credentials().unwrap(), ("alice", "secret"));
    }

    #[test]
    fn publish_target_requires_both_credentials() {
        let mut config = AppConfig::embedded().unwrap();
        config.apply_overrides(lookup_from(&[(ENV_FTP_USERNAME, "alice")]));
        assert!(matches!(
            config.publish_target(),
            Err(ConfigError::MissingCredentials)
        ));
    }

    #[test]
    fn publish_target_missing() {
        let config = AppConfig::from_yaml("listed: []\n").unwrap();
        assert!(matches!(
            config.publish_target(),
            Err(ConfigError::MissingPublishTarget)
        ));
    }

    #[test]
    fn debug_redacts_password() {
        let mut config = AppConfig::embedded().unwrap();
        config.apply_overrides(lookup_from(&[
            (ENV_FTP_USERNAME, "alice"),
            (ENV_FTP_PASSWORD, "hunter2"),
        ]));
        let debug = format!("{:?}", config.publish.unwrap());
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/watchlist.yml"))).unwrap_err();
        match err {
            ConfigError::Read { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/watchlist.yml"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
