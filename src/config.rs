//! Configuration for the gallery client.
//!
//! Settings live in `gallery.toml`:
//!
//! ```toml
//! [server]
//! base_url = "http://127.0.0.1:8000"
//! collection_path = "/api/images/"
//!
//! [ui]
//! locale = "he"
//! notification_secs = 5
//! utc_offset_minutes = 120
//! ```
//!
//! Every key is optional. Command-line flags override file values.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::FixedOffset;
use serde::Deserialize;
use url::Url;

use crate::constants;
use crate::i18n::Locale;
use crate::render::Renderer;

/// Largest UTC offset chrono accepts, in minutes.
const MAX_OFFSET_MINUTES: i32 = 24 * 60 - 1;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Non-fatal warnings that should be logged but don't prevent operation.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if there are any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// gallery.toml configuration structure.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Where the image collection lives.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_collection_path")]
    pub collection_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            collection_path: default_collection_path(),
        }
    }
}

/// Presentation settings.
#[derive(Debug, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub locale: Locale,
    #[serde(default = "default_notification_secs")]
    pub notification_secs: u64,
    /// Offset used for displayed dates; the machine's offset when unset.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            notification_secs: default_notification_secs(),
            utc_offset_minutes: None,
        }
    }
}

fn default_base_url() -> String {
    constants::DEFAULT_BASE_URL.to_string()
}

fn default_collection_path() -> String {
    constants::DEFAULT_COLLECTION_PATH.to_string()
}

fn default_notification_secs() -> u64 {
    constants::DEFAULT_NOTIFICATION_SECS
}

impl Config {
    /// Load configuration from the first location that exists.
    ///
    /// Looks at `explicit` (which must exist when given), then
    /// `./gallery.toml`, then `<config dir>/gallery/gallery.toml`. Falls back
    /// to defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::candidate_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(constants::CONFIG_FILE_NAME)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("gallery").join(constants::CONFIG_FILE_NAME));
        }
        paths
    }

    /// Load configuration from the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (IO error)
    /// - The file contains invalid TOML syntax
    /// - Fields have invalid types
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration.
    ///
    /// Returns a `ValidationResult` containing any non-fatal warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails with one or more errors:
    /// - Base URL that does not parse or is not http(s)
    /// - Collection path that is empty or relative
    /// - Notification duration of zero
    /// - UTC offset outside ±23:59
    pub fn validate(&self) -> Result<ValidationResult> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        // 1. Server location
        match Url::parse(&self.server.base_url) {
            Ok(url) if !matches!(url.scheme(), "http" | "https") => {
                errors.push(format!(
                    "server.base_url must use http or https (got: '{}')",
                    self.server.base_url
                ));
            },
            Ok(url) => {
                let local = matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"));
                if url.scheme() == "http" && !local {
                    warnings.push(format!(
                        "server.base_url {} is plain http on a remote host\n  \
                         Recommendation: use https so uploads are not sent in the clear",
                        self.server.base_url
                    ));
                }
            },
            Err(e) => {
                errors.push(format!(
                    "server.base_url is not a valid URL: '{}' ({e})",
                    self.server.base_url
                ));
            },
        }

        if self.server.collection_path.is_empty() {
            errors.push("server.collection_path cannot be empty".to_string());
        } else if !self.server.collection_path.starts_with('/') {
            errors.push(format!(
                "server.collection_path must start with '/' (got: '{}')",
                self.server.collection_path
            ));
        }

        // 2. Presentation
        if self.ui.notification_secs == 0 {
            errors.push(
                "ui.notification_secs cannot be 0. Set a positive number (default: 5)".to_string(),
            );
        } else if self.ui.notification_secs > 60 {
            warnings.push(format!(
                "ui.notification_secs {} is very high (> 60)\n  \
                 Notifications will pile up during repeated actions",
                self.ui.notification_secs
            ));
        }

        if let Some(minutes) = self.ui.utc_offset_minutes
            && minutes.unsigned_abs() > MAX_OFFSET_MINUTES.unsigned_abs()
        {
            errors.push(format!(
                "ui.utc_offset_minutes {minutes} is out of range (-{MAX_OFFSET_MINUTES}..={MAX_OFFSET_MINUTES})"
            ));
        }

        if !errors.is_empty() {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }

        Ok(ValidationResult { warnings })
    }

    /// How long notifications stay up.
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.ui.notification_secs)
    }

    /// Renderer for the configured locale and offset.
    pub fn renderer(&self) -> Renderer {
        match self
            .ui
            .utc_offset_minutes
            .and_then(|minutes| minutes.checked_mul(60))
            .and_then(FixedOffset::east_opt)
        {
            Some(offset) => Renderer::new(self.ui.locale, offset),
            None => Renderer::local(self.ui.locale),
        }
    }
}
