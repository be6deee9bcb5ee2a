//! Settings validation.
//!
//! Two levels exist: the soft URL check the form runs on every change, and
//! the hard validation applied before a record is saved.

use once_cell::sync::Lazy;
use regex::Regex;

use super::model::Settings;
use crate::error::{AidaError, Result};

static HTTP_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://").expect("URL prefix pattern is valid"));

/// Shortest accepted Google API key.
pub const MIN_GOOGLE_API_KEY_LEN: usize = 20;

/// Largest accepted serialized settings payload, in bytes.
pub const MAX_SETTINGS_PAYLOAD_BYTES: usize = 10_000;

/// Whether the value starts with `http://` or `https://`.
pub fn is_http_url(value: &str) -> bool {
    HTTP_URL.is_match(value)
}

/// Soft check: an empty value is fine, anything else must look like a URL.
pub fn is_acceptable_url_field(value: &str) -> bool {
    value.is_empty() || is_http_url(value)
}

/// Validates a settings record before it is saved.
pub fn validate_for_save(settings: &Settings) -> Result<()> {
    if !is_acceptable_url_field(&settings.api_server_url) {
        return Err(AidaError::validation(
            "API Server URL must start with http:// or https://",
        ));
    }

    if !is_acceptable_url_field(&settings.erpnext_url) {
        return Err(AidaError::validation(
            "ERPNext URL must start with http:// or https://",
        ));
    }

    if !settings.google_api_key.is_empty()
        && settings.google_api_key.len() < MIN_GOOGLE_API_KEY_LEN
    {
        return Err(AidaError::validation("Invalid Google API key format"));
    }

    if !settings.mongo_uri.is_empty()
        && !(settings.mongo_uri.starts_with("mongodb://")
            || settings.mongo_uri.starts_with("mongodb+srv://"))
    {
        return Err(AidaError::validation("Invalid MongoDB URI format"));
    }

    let payload = serde_json::to_string(settings)?;
    if payload.len() > MAX_SETTINGS_PAYLOAD_BYTES {
        return Err(AidaError::validation("Request payload too large"));
    }

    Ok(())
}
