use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::app_log;
use crate::error::{FeedbackError, FeedbackResult};
use crate::logger::LogLevel;
use crate::models::{User, UserRole};

/// Overrides the session store file path
pub const STORE_PATH_ENV: &str = "FEEDBACK_STORE_PATH";
/// Overrides the configured log level
pub const LOG_LEVEL_ENV: &str = "FEEDBACK_LOG_LEVEL";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Backend for the session key-value store
    pub store: StoreBackend,

    /// Seed the question/response collections with fixture data
    pub seed_fixtures: bool,

    /// Minimum log level ("debug", "info", "warn", "error")
    pub log_level: String,

    /// The single accepted admin login
    pub admin: AdminCredentials,

    /// Appearance of the embedded feedback widget
    pub widget: WidgetConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreBackend::default(),
            seed_fixtures: true,
            log_level: "info".to_string(),
            admin: AdminCredentials::default(),
            widget: WidgetConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file, then apply environment overrides
    ///
    /// A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> FeedbackResult<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// `load` with overrides taken from `lookup` instead of the process environment
    pub fn load_with(
        path: impl AsRef<Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> FeedbackResult<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            serde_json::from_str(&contents).map_err(|e| {
                FeedbackError::ConfigError(format!("{}: {}", path.display(), e))
            })?
        } else {
            app_log!(
                LogLevel::Info,
                "No config at {}, using defaults",
                path.display()
            );
            Self::default()
        };

        config.apply_env_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in `load`)
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(STORE_PATH_ENV) {
            self.store = StoreBackend::File {
                path: PathBuf::from(path),
            };
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            self.log_level = level;
        }
    }

    pub fn validate(&self) -> FeedbackResult<()> {
        if LogLevel::parse(&self.log_level).is_none() {
            return Err(FeedbackError::ConfigError(format!(
                "unknown log level '{}'",
                self.log_level
            )));
        }
        if self.admin.email.trim().is_empty() {
            return Err(FeedbackError::ConfigError(
                "admin email must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn min_log_level(&self) -> LogLevel {
        LogLevel::parse(&self.log_level).unwrap_or(LogLevel::Info)
    }
}

/// Where the session record is kept
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreBackend {
    /// Lost on restart
    Memory,
    /// JSON file on disk
    File { path: PathBuf },
}

impl Default for StoreBackend {
    fn default() -> Self {
        StoreBackend::File {
            path: PathBuf::from("feedback-store.json"),
        }
    }
}

/// Credential pair accepted by the static verifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
    pub user: User,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            email: "admin@example.com".to_string(),
            password: "password".to_string(),
            user: User {
                id: "1".to_string(),
                email: "admin@example.com".to_string(),
                name: Some("Admin User".to_string()),
                role: UserRole::Admin,
            },
        }
    }
}

/// Corner of the page the widget button sits in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetPosition {
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

/// Widget appearance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    pub position: WidgetPosition,
    pub primary_color: String,
    pub text_color: String,
    pub button_text: String,
    pub thank_you_message: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            position: WidgetPosition::BottomRight,
            primary_color: "#0071e3".to_string(),
            text_color: "#ffffff".to_string(),
            button_text: "Feedback".to_string(),
            thank_you_message: "Thank you for your feedback!".to_string(),
        }
    }
}

/// Host-page overrides for the widget; unset fields keep the base value
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WidgetOverrides {
    pub position: Option<WidgetPosition>,
    pub primary_color: Option<String>,
    pub text_color: Option<String>,
    pub button_text: Option<String>,
    pub thank_you_message: Option<String>,
}

impl WidgetConfig {
    pub fn merge(&self, overrides: WidgetOverrides) -> Self {
        Self {
            position: overrides.position.unwrap_or(self.position),
            primary_color: overrides
                .primary_color
                .unwrap_or_else(|| self.primary_color.clone()),
            text_color: overrides
                .text_color
                .unwrap_or_else(|| self.text_color.clone()),
            button_text: overrides
                .button_text
                .unwrap_or_else(|| self.button_text.clone()),
            thank_you_message: overrides
                .thank_you_message
                .unwrap_or_else(|| self.thank_you_message.clone()),
        }
    }
}
