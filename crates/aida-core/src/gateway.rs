//! Remote call surface consumed by the widget and the settings form.
//!
//! Every procedure answers with an envelope carrying a `success` flag. A
//! transport-level failure is an `Err`; an envelope with `success: false` is
//! an `Ok` that the caller inspects.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lead::{LeadCreationResult, LeadRequest};
use crate::settings::Settings;

/// Procedures exposed by the host add-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Procedure {
    GetSettings,
    SaveSettings,
    TestConnection,
    InitAgentSession,
    ChatWithAgent,
    CreateLeads,
    ClearAgentSession,
}

impl Procedure {
    /// Short procedure name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Procedure::GetSettings => "get_settings",
            Procedure::SaveSettings => "save_settings",
            Procedure::TestConnection => "test_connection",
            Procedure::InitAgentSession => "init_agent_session",
            Procedure::ChatWithAgent => "chat_with_agent",
            Procedure::CreateLeads => "create_leads",
            Procedure::ClearAgentSession => "clear_agent_session",
        }
    }

    /// Dotted method path registered with the host framework.
    pub fn method_path(&self) -> &'static str {
        match self {
            Procedure::TestConnection => {
                "aida_agent_app.doctype.aida_agent_settings.aida_agent_settings.test_connection"
            }
            Procedure::GetSettings => "aida_agent_app.aida_agent_app.api.get_settings",
            Procedure::SaveSettings => "aida_agent_app.aida_agent_app.api.save_settings",
            Procedure::InitAgentSession => "aida_agent_app.aida_agent_app.api.init_agent_session",
            Procedure::ChatWithAgent => "aida_agent_app.aida_agent_app.api.chat_with_agent",
            Procedure::CreateLeads => "aida_agent_app.aida_agent_app.api.create_leads",
            Procedure::ClearAgentSession => {
                "aida_agent_app.aida_agent_app.api.clear_agent_session"
            }
        }
    }
}

/// Arguments of `chat_with_agent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub user_input: String,
}

/// `{success, message?}`: answer of procedures without a payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// `{success, settings}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub settings: Option<Settings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub session_id: String,
}

/// `{success, session_data: {session_id}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub session_data: Option<SessionData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseData {
    pub response: String,
}

/// `{success, response_data: {response}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub response_data: Option<ResponseData>,
}

impl ChatResponse {
    /// The agent's reply, present only on a successful response.
    pub fn reply(&self) -> Option<&str> {
        if !self.success {
            return None;
        }
        self.response_data
            .as_ref()
            .map(|data| data.response.as_str())
    }
}

/// `{success, result: {created_count?}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Option<LeadCreationResult>,
}

/// The host framework's RPC bridge as seen by the client.
///
/// Implementations perform exactly one request per call; retrying is the
/// caller's decision.
#[async_trait]
pub trait AgentGateway: Send + Sync {
    async fn get_settings(&self) -> Result<SettingsResponse>;

    async fn save_settings(&self, settings: &Settings) -> Result<AckResponse>;

    async fn test_connection(&self) -> Result<AckResponse>;

    async fn init_agent_session(&self) -> Result<SessionInitResponse>;

    async fn chat_with_agent(&self, request: &ChatRequest) -> Result<ChatResponse>;

    async fn create_leads(&self, request: &LeadRequest) -> Result<LeadResponse>;

    async fn clear_agent_session(&self, session_id: &str) -> Result<AckResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_reply_requires_success() {
        let ok: ChatResponse = serde_json::from_str(
            r#"{"success": true, "response_data": {"response": "Hi!"}}"#,
        )
        .unwrap();
        assert_eq!(ok.reply(), Some("Hi!"));

        let failed: ChatResponse =
            serde_json::from_str(r#"{"success": false, "message": "Session ID is required"}"#)
                .unwrap();
        assert_eq!(failed.reply(), None);
        assert_eq!(failed.message.as_deref(), Some("Session ID is required"));
    }

    #[test]
    fn settings_response_tolerates_unset_fields() {
        let response: SettingsResponse = serde_json::from_str(
            r#"{"success": true, "settings": {
                "api_server_url": "https://agent.example.com",
                "erpnext_url": "https://erp.example.com",
                "google_api_key": null,
                "mongo_uri": null,
                "enable_onboarding": 1,
                "enable_lead_creation": null,
                "widget_position": "top-left",
                "widget_theme": null
            }}"#,
        )
        .unwrap();
        let settings = response.settings.unwrap();
        assert_eq!(settings.api_server_url, "https://agent.example.com");
        assert_eq!(settings.widget_position.as_class(), "top-left");
        assert!(settings.google_api_key.is_empty());
        assert!(settings.enable_lead_creation);
    }

    #[test]
    fn missing_success_flag_reads_as_failure() {
        let response: AckResponse = serde_json::from_str("{}").unwrap();
        assert!(!response.success);
    }

    #[test]
    fn method_paths_are_namespaced() {
        assert!(Procedure::ChatWithAgent.method_path().ends_with(".chat_with_agent"));
        assert!(
            Procedure::TestConnection
                .method_path()
                .contains("doctype.aida_agent_settings")
        );
        assert_eq!(Procedure::CreateLeads.name(), "create_leads");
    }
}
