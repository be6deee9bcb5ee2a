//! Settings domain module.
//!
//! - `model`: the settings record and its widget appearance options
//! - `validation`: soft URL checks and save-time validation

mod model;
mod validation;

pub use model::{DEFAULT_API_SERVER_URL, Settings, WidgetPosition, WidgetTheme};
pub use validation::{
    MAX_SETTINGS_PAYLOAD_BYTES, MIN_GOOGLE_API_KEY_LEN, is_acceptable_url_field, is_http_url,
    validate_for_save,
};
