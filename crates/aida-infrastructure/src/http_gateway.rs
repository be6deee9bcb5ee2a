//! HttpAgentGateway - RPC over the host framework's HTTP method endpoint.
//!
//! Every procedure is a `POST <base_url>/api/method/<dotted.path>` with the
//! arguments as a JSON body. The host wraps the procedure's return value as
//! `{"message": <value>}`.

use std::time::Duration;

use aida_core::error::{AidaError, Result};
use aida_core::gateway::{
    AckResponse, AgentGateway, ChatRequest, ChatResponse, LeadResponse, Procedure,
    SessionInitResponse, SettingsResponse,
};
use aida_core::lead::LeadRequest;
use aida_core::settings::Settings;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::config::{ChatConfig, ErpConfig};

/// Gateway implementation that talks to the ERP site over HTTP.
#[derive(Clone)]
pub struct HttpAgentGateway {
    client: Client,
    base_url: String,
    authorization: Option<String>,
    request_timeout: Duration,
    chat_timeout: Duration,
}

impl HttpAgentGateway {
    /// Creates a gateway for the given site origin with default timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            authorization: None,
            request_timeout: Duration::from_secs(120),
            chat_timeout: Duration::from_secs(30),
        }
    }

    pub fn from_config(erp: &ErpConfig, chat: &ChatConfig) -> Self {
        let mut gateway = Self::new(erp.base_url.clone())
            .with_request_timeout(Duration::from_secs(erp.request_timeout_secs))
            .with_chat_timeout(chat.timeout());
        if let (Some(key), Some(secret)) = (&erp.api_key, &erp.api_secret) {
            gateway = gateway.with_token(key, secret);
        }
        gateway
    }

    /// Authenticates with an API key pair (`Authorization: token key:secret`).
    pub fn with_token(mut self, api_key: &str, api_secret: &str) -> Self {
        self.authorization = Some(format!("token {api_key}:{api_secret}"));
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_chat_timeout(mut self, timeout: Duration) -> Self {
        self.chat_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint URL of a procedure.
    pub fn method_url(&self, procedure: Procedure) -> String {
        format!("{}/api/method/{}", self.base_url, procedure.method_path())
    }

    async fn call<A, T>(&self, procedure: Procedure, args: &A, timeout: Duration) -> Result<T>
    where
        A: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.method_url(procedure);
        tracing::debug!("[Gateway] -> {}", procedure.name());

        let mut request = self
            .client
            .post(&url)
            .timeout(timeout)
            .header(reqwest::header::ACCEPT, HeaderValue::from_static("application/json"))
            .json(args);
        if let Some(authorization) = &self.authorization {
            request = request.header(reqwest::header::AUTHORIZATION, authorization);
        }

        let response = request
            .send()
            .await
            .map_err(|err| map_transport_error(procedure, err))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            tracing::warn!("[Gateway] {} returned status {}", procedure.name(), status);
            return Err(map_http_error(status, &body_text));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| map_transport_error(procedure, err))?;
        tracing::debug!("[Gateway] <- {} ({})", procedure.name(), status);
        unwrap_envelope(body)
    }
}

#[async_trait]
impl AgentGateway for HttpAgentGateway {
    async fn get_settings(&self) -> Result<SettingsResponse> {
        self.call(Procedure::GetSettings, &json!({}), self.request_timeout)
            .await
    }

    async fn save_settings(&self, settings: &Settings) -> Result<AckResponse> {
        let payload = serde_json::to_string(settings)?;
        self.call(
            Procedure::SaveSettings,
            &json!({ "settings": payload }),
            self.request_timeout,
        )
        .await
    }

    async fn test_connection(&self) -> Result<AckResponse> {
        self.call(Procedure::TestConnection, &json!({}), self.request_timeout)
            .await
    }

    async fn init_agent_session(&self) -> Result<SessionInitResponse> {
        self.call(Procedure::InitAgentSession, &json!({}), self.request_timeout)
            .await
    }

    async fn chat_with_agent(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.call(Procedure::ChatWithAgent, request, self.chat_timeout)
            .await
    }

    async fn create_leads(&self, request: &LeadRequest) -> Result<LeadResponse> {
        self.call(Procedure::CreateLeads, request, self.request_timeout)
            .await
    }

    async fn clear_agent_session(&self, session_id: &str) -> Result<AckResponse> {
        self.call(
            Procedure::ClearAgentSession,
            &json!({ "session_id": session_id }),
            self.request_timeout,
        )
        .await
    }
}

/// Extracts the procedure result from the host's `{"message": ...}` wrapper.
///
/// A missing or null result reads as an empty object, which every response
/// type decodes as an unsuccessful answer.
fn unwrap_envelope<T: DeserializeOwned>(body: Value) -> Result<T> {
    let inner = match body {
        Value::Object(mut map) => map.remove("message").unwrap_or(Value::Null),
        _ => Value::Null,
    };
    let inner = if inner.is_null() { json!({}) } else { inner };
    Ok(serde_json::from_value(inner)?)
}

fn map_transport_error(procedure: Procedure, err: reqwest::Error) -> AidaError {
    let message = format!("{} request failed: {err}", procedure.name());
    if err.is_timeout() {
        AidaError::timeout(message)
    } else if err.is_decode() {
        AidaError::Serialization {
            format: "JSON".to_string(),
            message,
        }
    } else if let Some(status) = err.status() {
        AidaError::http(status.as_u16(), message)
    } else {
        AidaError::network(message)
    }
}

/// Builds an HTTP error, preferring the host's exception text when present.
fn map_http_error(status: StatusCode, body_text: &str) -> AidaError {
    let detail = serde_json::from_str::<Value>(body_text)
        .ok()
        .and_then(|body| {
            body.get("exception")
                .or_else(|| body.get("exc_type"))
                .or_else(|| body.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            let trimmed = body_text.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            } else {
                trimmed.chars().take(200).collect()
            }
        });
    AidaError::http(status.as_u16(), detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_url_joins_base_and_path() {
        let gateway = HttpAgentGateway::new("https://erp.example.com/");
        assert_eq!(
            gateway.method_url(Procedure::GetSettings),
            "https://erp.example.com/api/method/aida_agent_app.aida_agent_app.api.get_settings"
        );
    }

    #[test]
    fn token_header_from_config() {
        let erp = ErpConfig {
            api_key: Some("key".to_string()),
            api_secret: Some("secret".to_string()),
            ..ErpConfig::default()
        };
        let gateway = HttpAgentGateway::from_config(&erp, &ChatConfig::default());
        assert_eq!(gateway.authorization.as_deref(), Some("token key:secret"));
        assert_eq!(gateway.chat_timeout, Duration::from_secs(30));
        assert_eq!(gateway.base_url(), "http://localhost:8000");
    }

    #[test]
    fn envelope_is_unwrapped() {
        let body = json!({
            "message": {"success": true, "session_data": {"session_id": "abc"}}
        });
        let response: SessionInitResponse = unwrap_envelope(body).unwrap();
        assert!(response.success);
        assert_eq!(response.session_data.unwrap().session_id, "abc");
    }

    #[test]
    fn missing_message_reads_as_failure() {
        let response: ChatResponse = unwrap_envelope(json!({})).unwrap();
        assert!(!response.success);

        let response: ChatResponse = unwrap_envelope(json!({"message": null})).unwrap();
        assert_eq!(response.reply(), None);
    }

    #[test]
    fn http_error_prefers_exception_text() {
        let err = map_http_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"exception": "frappe.exceptions.ValidationError: bad"}"#,
        );
        assert_eq!(err.status(), Some(500));
        assert!(err.detail().contains("ValidationError"));
        assert!(err.is_retryable());

        let err = map_http_error(StatusCode::FORBIDDEN, "");
        assert_eq!(err.detail(), "Forbidden");
        assert!(!err.is_retryable());
    }
}
