//! Feature-gated activity payload built from settings plus per-call overrides

use serde::Serialize;

use crate::settings::{ButtonSettings, Settings, MAX_BUTTONS};

/// Per-call values that replace the configured defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub state: Option<String>,
    pub details: Option<String>,
    pub large_image: Option<String>,
    pub large_text: Option<String>,
    pub small_image: Option<String>,
    pub small_text: Option<String>,
    pub buttons: Option<Vec<ButtonSettings>>,
    /// Unix timestamp (seconds) shown as the elapsed-time origin
    pub start: Option<i64>,
}

impl Overrides {
    pub fn with_start(start: i64) -> Self {
        Self {
            start: Some(start),
            ..Self::default()
        }
    }
}

/// What actually gets sent to Discord. `None` fields are left out entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Payload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<ButtonSettings>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// A key is only considered when its section is switched on in the settings;
/// the override then replaces the configured value.
fn gated(enabled: bool, configured: &str, override_value: Option<&String>) -> Option<String> {
    if !enabled {
        return None;
    }
    non_empty(override_value.cloned().unwrap_or_else(|| configured.to_string()))
}

pub fn build_payload(settings: &Settings, overrides: &Overrides) -> Payload {
    let large = &settings.large_image;
    let small = &settings.small_image;

    let buttons = if settings.buttons.is_empty() {
        None
    } else {
        let mut buttons = overrides
            .buttons
            .clone()
            .unwrap_or_else(|| settings.buttons.clone());
        buttons.truncate(MAX_BUTTONS);
        (!buttons.is_empty()).then_some(buttons)
    };

    Payload {
        state: gated(
            !settings.state.is_empty(),
            &settings.state,
            overrides.state.as_ref(),
        ),
        details: gated(
            !settings.details.is_empty(),
            &settings.details,
            overrides.details.as_ref(),
        ),
        large_image: gated(large.enabled, &large.key, overrides.large_image.as_ref()),
        large_text: gated(large.enabled, &large.text, overrides.large_text.as_ref()),
        small_image: gated(small.enabled, &small.key, overrides.small_image.as_ref()),
        small_text: gated(small.enabled, &small.text, overrides.small_text.as_ref()),
        buttons,
        start: overrides.start.filter(|_| settings.show_elapsed_time),
    }
}
