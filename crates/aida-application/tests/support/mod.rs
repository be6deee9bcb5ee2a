#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aida_application::settings_form::{FormHost, Indicator, Prompt};
use aida_application::widget::{ChatWidget, WidgetEvent, WidgetOptions};
use aida_core::error::{AidaError, Result};
use aida_core::gateway::{
    AckResponse, AgentGateway, ChatRequest, ChatResponse, LeadResponse, Procedure, ResponseData,
    SessionData, SessionInitResponse, SettingsResponse,
};
use aida_core::lead::LeadRequest;
use aida_core::scheduler::ManualScheduler;
use aida_core::settings::Settings;

pub const ORIGIN: &str = "http://localhost:8000";

pub fn chat_ok(text: &str) -> Result<ChatResponse> {
    Ok(ChatResponse {
        success: true,
        message: None,
        response_data: Some(ResponseData {
            response: text.to_string(),
        }),
    })
}

pub fn chat_unsuccessful() -> Result<ChatResponse> {
    Ok(ChatResponse {
        success: false,
        message: Some("Agent error".to_string()),
        response_data: None,
    })
}

pub fn ack(success: bool, message: Option<&str>) -> Result<AckResponse> {
    Ok(AckResponse {
        success,
        message: message.map(str::to_string),
    })
}

/// Scripted gateway that records every call.
pub struct MockGateway {
    pub settings: Mutex<Result<SettingsResponse>>,
    pub session: Mutex<Result<SessionInitResponse>>,
    pub chat_script: Mutex<VecDeque<Result<ChatResponse>>>,
    pub chat_delay: Mutex<Option<Duration>>,
    pub leads: Mutex<Result<LeadResponse>>,
    pub test_connection: Mutex<Result<AckResponse>>,
    pub save: Mutex<Result<AckResponse>>,
    pub clear: Mutex<Result<AckResponse>>,
    calls: Mutex<Vec<Procedure>>,
    chat_requests: Mutex<Vec<ChatRequest>>,
    lead_requests: Mutex<Vec<LeadRequest>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            settings: Mutex::new(Ok(SettingsResponse {
                success: true,
                message: None,
                settings: Some(Settings::fallback(ORIGIN)),
            })),
            session: Mutex::new(Ok(SessionInitResponse {
                success: true,
                message: None,
                session_data: Some(SessionData {
                    session_id: "session-1".to_string(),
                }),
            })),
            chat_script: Mutex::new(VecDeque::new()),
            chat_delay: Mutex::new(None),
            leads: Mutex::new(Ok(LeadResponse {
                success: true,
                message: None,
                result: None,
            })),
            test_connection: Mutex::new(ack(true, Some("Connection successful"))),
            save: Mutex::new(ack(true, Some("Settings saved successfully"))),
            clear: Mutex::new(ack(true, Some("Session cleared"))),
            calls: Mutex::new(Vec::new()),
            chat_requests: Mutex::new(Vec::new()),
            lead_requests: Mutex::new(Vec::new()),
        }
    }

    /// Queues chat answers; once drained, chat echoes the input.
    pub fn script_chat(&self, responses: Vec<Result<ChatResponse>>) {
        self.chat_script.lock().unwrap().extend(responses);
    }

    pub fn calls(&self) -> Vec<Procedure> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, procedure: Procedure) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| **call == procedure)
            .count()
    }

    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_requests.lock().unwrap().clone()
    }

    pub fn lead_requests(&self) -> Vec<LeadRequest> {
        self.lead_requests.lock().unwrap().clone()
    }

    fn record(&self, procedure: Procedure) {
        self.calls.lock().unwrap().push(procedure);
    }
}

#[async_trait::async_trait]
impl AgentGateway for MockGateway {
    async fn get_settings(&self) -> Result<SettingsResponse> {
        self.record(Procedure::GetSettings);
        self.settings.lock().unwrap().clone()
    }

    async fn save_settings(&self, _settings: &Settings) -> Result<AckResponse> {
        self.record(Procedure::SaveSettings);
        self.save.lock().unwrap().clone()
    }

    async fn test_connection(&self) -> Result<AckResponse> {
        self.record(Procedure::TestConnection);
        self.test_connection.lock().unwrap().clone()
    }

    async fn init_agent_session(&self) -> Result<SessionInitResponse> {
        self.record(Procedure::InitAgentSession);
        self.session.lock().unwrap().clone()
    }

    async fn chat_with_agent(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.record(Procedure::ChatWithAgent);
        self.chat_requests.lock().unwrap().push(request.clone());
        let delay = *self.chat_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.chat_script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| chat_ok(&format!("echo: {}", request.user_input)))
    }

    async fn create_leads(&self, request: &LeadRequest) -> Result<LeadResponse> {
        self.record(Procedure::CreateLeads);
        self.lead_requests.lock().unwrap().push(request.clone());
        self.leads.lock().unwrap().clone()
    }

    async fn clear_agent_session(&self, _session_id: &str) -> Result<AckResponse> {
        self.record(Procedure::ClearAgentSession);
        self.clear.lock().unwrap().clone()
    }
}

pub fn network_error() -> AidaError {
    AidaError::network("connection refused")
}

/// Initializes a widget against the mock gateway and a manual clock.
pub async fn ready_widget(
    gateway: &Arc<MockGateway>,
) -> (ChatWidget, Arc<ManualScheduler<WidgetEvent>>) {
    let scheduler = Arc::new(ManualScheduler::new());
    let widget = ChatWidget::initialize(
        gateway.clone(),
        scheduler.clone(),
        WidgetOptions::new(ORIGIN),
    )
    .await;
    (widget, scheduler)
}

/// A host call observed by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Button { label: String, group: String },
    Prompt(Prompt),
    Alert { message: String, indicator: Indicator },
}

#[derive(Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
}

impl RecordingHost {
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::Prompt(prompt) => Some(prompt),
                _ => None,
            })
            .collect()
    }
}

impl FormHost for RecordingHost {
    fn add_custom_button(&self, label: &str, group: &str) {
        self.calls.lock().unwrap().push(HostCall::Button {
            label: label.to_string(),
            group: group.to_string(),
        });
    }

    fn msgprint(&self, prompt: Prompt) {
        self.calls.lock().unwrap().push(HostCall::Prompt(prompt));
    }

    fn show_alert(&self, message: &str, indicator: Indicator) {
        self.calls.lock().unwrap().push(HostCall::Alert {
            message: message.to_string(),
            indicator,
        });
    }
}
