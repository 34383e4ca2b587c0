use serde::{de::Deserializer, Deserialize, Serialize};
use std::{
    env, fmt,
    path::{Path, PathBuf},
};

use crate::ConfigError;

/// Environment variable overriding the application base directory.
pub const HOME_ENV: &str = "TABI_SHIORI_HOME";
const BASE_DIR_NAME: &str = ".tabi_shiori";

/// Keys accepted by [`Config::set`], in display order.
pub const CONFIG_KEYS: [&str; 10] = [
    "locale",
    "currency",
    "output_style",
    "ui_color_enabled",
    "default_theme",
    "default_time_zone",
    "backup_retention",
    "last_opened_book",
    "data_root",
    "backup_root",
];

/// Stores user-configurable CLI preferences and metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default)]
    pub output_style: OutputStyle,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_theme_value")]
    pub default_theme: String,
    #[serde(default = "Config::default_time_zone_value")]
    pub default_time_zone: String,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_opened_book: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for trip books. Defaults to `<base>/books`.
    pub data_root: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for backups. Defaults to `<base>/backups`.
    pub backup_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "ja-JP".into(),
            currency: "JPY".into(),
            output_style: OutputStyle::default(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            default_theme: Self::default_theme_value(),
            default_time_zone: Self::default_time_zone_value(),
            backup_retention: Self::default_backup_retention(),
            last_opened_book: None,
            data_root: None,
            backup_root: None,
        }
    }
}

impl Config {
    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_theme_value() -> String {
        "Default".into()
    }

    pub fn default_time_zone_value() -> String {
        "Asia/Tokyo".into()
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    /// `$TABI_SHIORI_HOME`, or `~/.tabi_shiori`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
            return PathBuf::from(custom);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(BASE_DIR_NAME)
    }

    pub fn resolve_data_root(&self, base: &Path) -> PathBuf {
        self.data_root
            .clone()
            .unwrap_or_else(|| base.join("books"))
    }

    pub fn resolve_backup_root(&self, base: &Path) -> PathBuf {
        self.backup_root
            .clone()
            .unwrap_or_else(|| base.join("backups"))
    }

    /// Current value of `key` rendered for display.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let display_path = |path: &Option<PathBuf>| {
            path.as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "(default)".into())
        };
        let value = match key {
            "locale" => self.locale.clone(),
            "currency" => self.currency.clone(),
            "output_style" => self.output_style.to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "default_theme" => self.default_theme.clone(),
            "default_time_zone" => self.default_time_zone.clone(),
            "backup_retention" => self.backup_retention.to_string(),
            "last_opened_book" => self
                .last_opened_book
                .clone()
                .unwrap_or_else(|| "(none)".into()),
            "data_root" => display_path(&self.data_root),
            "backup_root" => display_path(&self.backup_root),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    /// Updates one key from user input. `none` or an empty value clears optional keys.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };
        let optional = |value: &str| {
            if value.is_empty() || value.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(value.to_string())
            }
        };
        match key {
            "locale" => {
                if value.is_empty() {
                    return Err(invalid("must not be empty"));
                }
                self.locale = value.to_string();
            }
            "currency" => {
                if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(invalid("expected a three-letter currency code"));
                }
                self.currency = value.to_ascii_uppercase();
            }
            "output_style" => {
                self.output_style =
                    OutputStyle::parse(value).ok_or_else(|| invalid("expected plain or iconic"))?;
            }
            "ui_color_enabled" => {
                self.ui_color_enabled =
                    parse_bool(value).ok_or_else(|| invalid("expected on or off"))?;
            }
            "default_theme" => {
                if value.is_empty() {
                    return Err(invalid("must not be empty"));
                }
                self.default_theme = value.to_string();
            }
            "default_time_zone" => {
                if value.is_empty() || value.contains(char::is_whitespace) {
                    return Err(invalid("expected an IANA zone name such as Asia/Tokyo"));
                }
                self.default_time_zone = value.to_string();
            }
            "backup_retention" => {
                let retention: usize = value
                    .parse()
                    .map_err(|_| invalid("expected a whole number"))?;
                if retention == 0 {
                    return Err(invalid("must keep at least one backup"));
                }
                self.backup_retention = retention;
            }
            "last_opened_book" => self.last_opened_book = optional(value),
            "data_root" => self.data_root = optional(value).map(PathBuf::from),
            "backup_root" => self.backup_root = optional(value).map(PathBuf::from),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// How the CLI decorates its messages.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    Plain,
    #[default]
    Iconic,
}

impl OutputStyle {
    fn from_value(value: Option<String>) -> Self {
        value
            .and_then(|v| OutputStyle::parse(&v))
            .unwrap_or_default()
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "plain" => Some(OutputStyle::Plain),
            "iconic" => Some(OutputStyle::Iconic),
            _ => None,
        }
    }
}

impl fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OutputStyle::Plain => "plain",
            OutputStyle::Iconic => "iconic",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for OutputStyle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(OutputStyle::from_value(value))
    }
}
