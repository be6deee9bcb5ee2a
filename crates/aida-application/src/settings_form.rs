//! Settings form controller.
//!
//! Binds soft validation, advisory notices and the connection test to the
//! host's record-edit form through the [`FormHost`] seam.

use std::sync::Arc;

use aida_core::error::{AidaError, Result};
use aida_core::gateway::AgentGateway;
use aida_core::settings::{Settings, is_acceptable_url_field, validate_for_save};
use serde::{Deserialize, Serialize};

pub const TEST_CONNECTION_LABEL: &str = "Test Connection";
pub const ACTIONS_GROUP: &str = "Actions";

/// Color of a prompt or alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Blue,
    Green,
    Orange,
    Red,
}

/// A titled message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub title: String,
    pub message: String,
    pub indicator: Indicator,
}

impl Prompt {
    pub fn new(title: &str, message: impl Into<String>, indicator: Indicator) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
            indicator,
        }
    }
}

/// The host form engine.
pub trait FormHost: Send + Sync {
    /// Adds an informational action button to a button group.
    fn add_custom_button(&self, label: &str, group: &str);

    /// Shows a modal message.
    fn msgprint(&self, prompt: Prompt);

    /// Shows a transient, non-blocking alert.
    fn show_alert(&self, message: &str, indicator: Indicator);
}

/// Form fields with change handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    ApiServerUrl,
    ErpnextUrl,
    EnableOnboarding,
    EnableLeadCreation,
}

/// Result of the "Test Connection" action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTest {
    /// No API server URL; nothing was sent.
    MissingConfiguration,
    Succeeded,
    Failed(String),
}

pub struct SettingsFormController {
    gateway: Arc<dyn AgentGateway>,
    host: Arc<dyn FormHost>,
}

impl SettingsFormController {
    pub fn new(gateway: Arc<dyn AgentGateway>, host: Arc<dyn FormHost>) -> Self {
        Self { gateway, host }
    }

    /// Form refresh: registers the connection-test action.
    pub fn on_refresh(&self) {
        self.host
            .add_custom_button(TEST_CONNECTION_LABEL, ACTIONS_GROUP);
    }

    /// Field change handler. Values are never reverted; problems are only
    /// reported.
    pub fn on_field_change(&self, doc: &Settings, field: SettingsField) {
        match field {
            SettingsField::ApiServerUrl => {
                self.warn_if_not_url(&doc.api_server_url, "API Server URL")
            }
            SettingsField::ErpnextUrl => self.warn_if_not_url(&doc.erpnext_url, "ERPNext URL"),
            SettingsField::EnableOnboarding => {
                if doc.enable_onboarding {
                    self.host.msgprint(Prompt::new(
                        "Onboarding Enabled",
                        "Users will now see helpful guidance for ERPNext operations",
                        Indicator::Green,
                    ));
                }
            }
            SettingsField::EnableLeadCreation => {
                if !doc.enable_lead_creation {
                    return;
                }
                if doc.has_google_api_key() {
                    self.host.msgprint(Prompt::new(
                        "Lead Creation Enabled",
                        "Users can now generate leads from the chat widget",
                        Indicator::Green,
                    ));
                } else {
                    self.host.msgprint(Prompt::new(
                        "Google API Key Required",
                        "Lead creation requires a Google API key for business search",
                        Indicator::Orange,
                    ));
                }
            }
        }
    }

    fn warn_if_not_url(&self, value: &str, label: &str) {
        if !is_acceptable_url_field(value) {
            self.host.msgprint(Prompt::new(
                "Invalid URL",
                format!("{label} must start with http:// or https://"),
                Indicator::Orange,
            ));
        }
    }

    /// Runs the "Test Connection" action. One call, no retry.
    pub async fn test_connection(&self, doc: &Settings) -> ConnectionTest {
        if doc.api_server_url.is_empty() {
            self.host.msgprint(Prompt::new(
                "Missing Configuration",
                "Please enter the API Server URL before testing connection",
                Indicator::Red,
            ));
            return ConnectionTest::MissingConfiguration;
        }

        self.host
            .show_alert("Testing connection...", Indicator::Blue);

        match self.gateway.test_connection().await {
            Ok(response) if response.success => {
                tracing::info!("[SettingsForm] Connection test succeeded");
                self.host
                    .show_alert("Connection test completed successfully", Indicator::Green);
                ConnectionTest::Succeeded
            }
            Ok(response) => {
                let message = response
                    .message
                    .unwrap_or_else(|| "Unknown error occurred".to_string());
                tracing::warn!("[SettingsForm] Connection test failed: {}", message);
                self.host.msgprint(Prompt::new(
                    "Connection Test Failed",
                    message.clone(),
                    Indicator::Red,
                ));
                ConnectionTest::Failed(message)
            }
            Err(err) => {
                tracing::error!("[SettingsForm] Connection test request failed: {}", err);
                let message = "Failed to communicate with server".to_string();
                self.host.msgprint(Prompt::new(
                    "Connection Test Failed",
                    message.clone(),
                    Indicator::Red,
                ));
                ConnectionTest::Failed(message)
            }
        }
    }

    /// Validates the record and saves it through the gateway.
    pub async fn save(&self, doc: &Settings) -> Result<()> {
        if let Err(err) = validate_for_save(doc) {
            self.host
                .msgprint(Prompt::new("Invalid Settings", err.detail(), Indicator::Red));
            return Err(err);
        }

        let response = match self.gateway.save_settings(doc).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("[SettingsForm] Save request failed: {}", err);
                self.host.msgprint(Prompt::new(
                    "Save Failed",
                    "Failed to communicate with server",
                    Indicator::Red,
                ));
                return Err(err);
            }
        };

        if response.success {
            tracing::info!("[SettingsForm] Settings saved");
            self.host.show_alert(
                response
                    .message
                    .as_deref()
                    .unwrap_or("Settings saved successfully"),
                Indicator::Green,
            );
            Ok(())
        } else {
            let message = response
                .message
                .unwrap_or_else(|| "Unknown error occurred".to_string());
            self.host
                .msgprint(Prompt::new("Save Failed", message.clone(), Indicator::Red));
            Err(AidaError::server(message))
        }
    }
}
