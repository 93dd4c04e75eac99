use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::SettingsError;

/// Directory name used under the platform config and data dirs
pub const APP_DIR: &str = "custom-rpc";
const SETTINGS_FILE: &str = "settings.json";

/// Discord rejects activity updates more often than this.
pub const MIN_UPDATE_INTERVAL_SECS: u64 = 15;

/// Discord shows at most two buttons on an activity.
pub const MAX_BUTTONS: usize = 2;

const MAX_BUTTON_LABEL_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    pub enabled: bool,
    pub key: String,
    pub text: String,
}

impl ImageSettings {
    fn new(key: &str, text: &str) -> Self {
        Self {
            enabled: true,
            key: key.to_string(),
            text: text.to_string(),
        }
    }
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            key: String::new(),
            text: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonSettings {
    pub label: String,
    pub url: String,
}

impl ButtonSettings {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// Everything the presence session needs to know. Loaded once at startup and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Application id from the Discord developer portal.
    pub client_id: i64,
    pub state: String,
    pub details: String,
    pub large_image: ImageSettings,
    pub small_image: ImageSettings,
    pub buttons: Vec<ButtonSettings>,
    pub show_elapsed_time: bool,
    pub retry_count: u32,
    pub retry_delay_secs: u64,
    pub update_interval_secs: u64,
    pub handshake_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            client_id: 0,
            state: "Currently Active".to_string(),
            details: "Custom Status".to_string(),
            large_image: ImageSettings::new("default", "Custom RPC"),
            small_image: ImageSettings::new("status", "Online"),
            buttons: vec![
                ButtonSettings::new("GitHub", "https://github.com/yourusername"),
                ButtonSettings::new("Website", "https://yourwebsite.com"),
            ],
            show_elapsed_time: true,
            retry_count: 3,
            retry_delay_secs: 5,
            update_interval_secs: MIN_UPDATE_INTERVAL_SECS,
            handshake_timeout_secs: 10,
        }
    }
}

impl Settings {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    /// Interval between presence pushes, never shorter than the rate limit allows.
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs.max(MIN_UPDATE_INTERVAL_SECS))
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.handshake_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.client_id <= 0 {
            return Err(SettingsError::Invalid(
                "client_id must be set to your Discord application id".to_string(),
            ));
        }

        if self.retry_count == 0 {
            return Err(SettingsError::Invalid(
                "retry_count must be at least 1".to_string(),
            ));
        }

        if self.handshake_timeout_secs == 0 {
            return Err(SettingsError::Invalid(
                "handshake_timeout_secs must be at least 1".to_string(),
            ));
        }

        for (name, image) in [("large_image", &self.large_image), ("small_image", &self.small_image)] {
            if image.enabled && image.key.is_empty() {
                return Err(SettingsError::Invalid(format!(
                    "{} is enabled but has no key",
                    name
                )));
            }
        }

        if self.buttons.len() > MAX_BUTTONS {
            return Err(SettingsError::Invalid(format!(
                "at most {} buttons are supported, got {}",
                MAX_BUTTONS,
                self.buttons.len()
            )));
        }

        for button in &self.buttons {
            validate_button(button)?;
        }

        Ok(())
    }
}

fn validate_button(button: &ButtonSettings) -> Result<(), SettingsError> {
    if button.label.is_empty() || button.label.chars().count() > MAX_BUTTON_LABEL_LEN {
        return Err(SettingsError::Invalid(format!(
            "button label {:?} must be 1-{} characters",
            button.label, MAX_BUTTON_LABEL_LEN
        )));
    }

    let url = url::Url::parse(&button.url).map_err(|e| {
        SettingsError::Invalid(format!("button {:?} has invalid url: {}", button.label, e))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(SettingsError::Invalid(format!(
            "button {:?} url must be http(s), got {}",
            button.label, other
        ))),
    }
}

pub fn get_settings_path() -> Result<PathBuf, SettingsError> {
    let config_dir = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
    Ok(config_dir.join(APP_DIR).join(SETTINGS_FILE))
}

/// Load settings from `path`, writing the defaults there first if the file is missing.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    tracing::debug!("Loading settings from {}", path.display());

    if !path.exists() {
        tracing::info!("No settings found, writing defaults to {}", path.display());
        let settings = Settings::default();
        save_settings(path, &settings)?;
        return Ok(settings);
    }

    let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(serde_json::from_str(&contents)?)
}

pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    tracing::debug!("Saving settings");

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let contents = serde_json::to_string_pretty(settings)?;

    fs::write(path, contents).map_err(|source| SettingsError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Settings {
        Settings {
            client_id: 1383904378154651768,
            ..Settings::default()
        }
    }

    #[test]
    fn defaults_need_a_client_id() {
        let err = Settings::default().validate().unwrap_err();
        assert!(err.to_string().contains("client_id"));
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn update_interval_is_clamped_to_rate_limit() {
        let settings = Settings {
            update_interval_secs: 1,
            ..valid()
        };
        assert_eq!(settings.update_interval(), Duration::from_secs(15));

        let settings = Settings {
            update_interval_secs: 60,
            ..valid()
        };
        assert_eq!(settings.update_interval(), Duration::from_secs(60));
    }

    #[test]
    fn rejects_zero_handshake_timeout() {
        let settings = Settings {
            handshake_timeout_secs: 0,
            ..valid()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("handshake_timeout_secs"));
    }

    #[test]
    fn rejects_third_button() {
        let mut settings = valid();
        settings
            .buttons
            .push(ButtonSettings::new("Extra", "https://example.com"));
        assert!(matches!(settings.validate(), Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn rejects_non_http_button_url() {
        let mut settings = valid();
        settings.buttons = vec![ButtonSettings::new("Play", "steam://run/4242")];
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("http"));

        settings.buttons = vec![ButtonSettings::new("Play", "not a url")];
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_enabled_image_without_key() {
        let mut settings = valid();
        settings.small_image.key.clear();
        assert!(settings.validate().is_err());

        settings.small_image.enabled = false;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(path.exists());
        assert_eq!(load_settings(&path).unwrap(), Settings::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(
            &path,
            r#"{ "client_id": 42, "state": "Coding", "small_image": { "enabled": false } }"#,
        )
        .unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.client_id, 42);
        assert_eq!(settings.state, "Coding");
        assert_eq!(settings.details, "Custom Status");
        assert!(!settings.small_image.enabled);
        assert!(settings.small_image.key.is_empty());
        assert!(settings.large_image.enabled);
        assert_eq!(settings.retry_count, 3);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_settings(&path), Err(SettingsError::Parse(_))));
    }
}
