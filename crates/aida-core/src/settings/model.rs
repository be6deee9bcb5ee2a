//! Assistant settings as stored by the host framework.

use serde::{Deserialize, Deserializer, Serialize};

/// Default agent server used when the host has no settings record.
pub const DEFAULT_API_SERVER_URL: &str = "http://localhost:5000";

/// Screen corner the widget is anchored to.
///
/// Unknown values coming from the host fall back to the default corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WidgetPosition {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl WidgetPosition {
    /// CSS class applied to the widget container.
    pub fn as_class(&self) -> &'static str {
        match self {
            WidgetPosition::BottomRight => "bottom-right",
            WidgetPosition::BottomLeft => "bottom-left",
            WidgetPosition::TopRight => "top-right",
            WidgetPosition::TopLeft => "top-left",
        }
    }
}

impl From<String> for WidgetPosition {
    fn from(value: String) -> Self {
        match value.trim() {
            "bottom-left" => WidgetPosition::BottomLeft,
            "top-right" => WidgetPosition::TopRight,
            "top-left" => WidgetPosition::TopLeft,
            _ => WidgetPosition::BottomRight,
        }
    }
}

impl From<WidgetPosition> for String {
    fn from(position: WidgetPosition) -> Self {
        position.as_class().to_string()
    }
}

/// Color theme of the widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WidgetTheme {
    #[default]
    Light,
    Dark,
}

impl WidgetTheme {
    pub fn as_class(&self) -> &'static str {
        match self {
            WidgetTheme::Light => "light",
            WidgetTheme::Dark => "dark",
        }
    }
}

impl From<String> for WidgetTheme {
    fn from(value: String) -> Self {
        match value.trim() {
            "dark" => WidgetTheme::Dark,
            _ => WidgetTheme::Light,
        }
    }
}

impl From<WidgetTheme> for String {
    fn from(theme: WidgetTheme) -> Self {
        theme.as_class().to_string()
    }
}

/// Settings record shared by the widget and the settings form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, deserialize_with = "or_default")]
    pub api_server_url: String,
    #[serde(default, deserialize_with = "or_default")]
    pub erpnext_url: String,
    #[serde(default, deserialize_with = "or_default")]
    pub google_api_key: String,
    #[serde(default, deserialize_with = "or_default")]
    pub mongo_uri: String,
    #[serde(default = "enabled", deserialize_with = "flag")]
    pub enable_onboarding: bool,
    #[serde(default = "enabled", deserialize_with = "flag")]
    pub enable_lead_creation: bool,
    #[serde(default, deserialize_with = "or_default")]
    pub widget_position: WidgetPosition,
    #[serde(default, deserialize_with = "or_default")]
    pub widget_theme: WidgetTheme,
}

impl Settings {
    /// The hardcoded set used when settings cannot be fetched.
    ///
    /// `origin` is the host page origin and becomes the ERP URL.
    pub fn fallback(origin: impl Into<String>) -> Self {
        Self {
            api_server_url: DEFAULT_API_SERVER_URL.to_string(),
            erpnext_url: origin.into(),
            google_api_key: String::new(),
            mongo_uri: String::new(),
            enable_onboarding: true,
            enable_lead_creation: true,
            widget_position: WidgetPosition::default(),
            widget_theme: WidgetTheme::default(),
        }
    }

    pub fn has_google_api_key(&self) -> bool {
        !self.google_api_key.trim().is_empty()
    }
}

fn enabled() -> bool {
    true
}

/// Unset fields arrive as `null`; they take the field default.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts check-field values encoded as booleans, `0`/`1` or their strings.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        None => enabled(),
        Some(Flag::Bool(value)) => value,
        Some(Flag::Int(value)) => value != 0,
        Some(Flag::Text(value)) => matches!(value.trim(), "1" | "true" | "True" | "yes"),
    })
}
