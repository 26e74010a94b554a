//! Panel configuration (`config.toml`).

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use intranet_api::PanelClient;
use intranet_api::auth::CookieTokenProvider;
use intranet_api::auth::DEFAULT_TOKEN_COOKIE;
use intranet_ui::table::DEFAULT_PAGE_SIZE;
use intranet_ui::table::TableState;
use serde::Deserialize;
use serde::Serialize;
use simplelog::LevelFilter;

use crate::paths;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings read from `config.toml`. Every field has a default, so an
/// empty or missing file is valid.
///
/// ```toml
/// base_url = "https://intranet.example.org/api"
/// token_cookie = "token"
/// default_page_size = 20
/// timeout_secs = 30
/// log_level = "debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub base_url: String,
    pub token_cookie: String,
    pub default_page_size: usize,
    pub timeout_secs: u64,
    pub log_level: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token_cookie: DEFAULT_TOKEN_COOKIE.to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_level: "info".to_string(),
        }
    }
}

impl PanelConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from the platform config directory.
    pub fn load_default() -> Result<Self, ConfigError> {
        match paths::config_file() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(content)?;
        config.default_page_size = config.default_page_size.max(1);
        Ok(config)
    }

    /// Unknown levels fall back to `Info`.
    pub fn log_level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Initial table state for list pages.
    pub fn table_state(&self) -> TableState {
        TableState::new().with_page_size(self.default_page_size)
    }

    /// Client authenticated with the token in `cookie_header`.
    pub fn client(&self, cookie_header: &str) -> Result<PanelClient, intranet_api::error::Error> {
        PanelClient::builder()
            .url(self.base_url.as_str())
            .token_provider(CookieTokenProvider::with_cookie_name(
                cookie_header,
                self.token_cookie.as_str(),
            ))
            .timeout(self.timeout())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = PanelConfig::parse("").unwrap();
        assert_eq!(config, PanelConfig::default());
        assert_eq!(config.token_cookie, "token");
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_file_overrides() {
        let config = PanelConfig::parse(
            r#"
            base_url = "https://intranet.example.org/api"
            default_page_size = 20
            log_level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url, "https://intranet.example.org/api");
        assert_eq!(config.default_page_size, 20);
        assert_eq!(config.log_level_filter(), LevelFilter::Debug);
        assert_eq!(config.table_state().page_size(), 20);
    }

    #[test]
    fn test_zero_page_size_clamped() {
        let config = PanelConfig::parse("default_page_size = 0").unwrap();
        assert_eq!(config.default_page_size, 1);
    }

    #[test]
    fn test_unknown_log_level_falls_back() {
        let config = PanelConfig {
            log_level: "verbose".to_string(),
            ..PanelConfig::default()
        };
        assert_eq!(config.log_level_filter(), LevelFilter::Info);
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("intranet-admin-missing-config.toml");
        assert_eq!(PanelConfig::load(&path).unwrap(), PanelConfig::default());
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let path = std::env::temp_dir().join(format!(
            "intranet-admin-bad-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "default_page_size = \"many\"").unwrap();
        let err = PanelConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("intranet-admin-bad"));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_client_uses_configured_url() {
        let config = PanelConfig::default();
        let client = config.client("token=abc").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/api");
        assert_eq!(client.timeout(), Some(Duration::from_secs(30)));
    }
}
