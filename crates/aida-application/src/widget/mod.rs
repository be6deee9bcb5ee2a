//! Chat widget controller.
//!
//! [`ChatWidget`] owns the widget state and mediates every interaction with
//! the agent: settings load, session init, message send with cache and retry,
//! lead creation and the delayed panel/alert actions.
//!
//! Each user action exists as a single `async` operation (`send_message`,
//! `create_leads`) and as a split form (`begin_*` / [`Dispatcher`] /
//! `finish_*`) for hosts that must keep handling events during a call.

mod dispatch;
mod state;

pub use dispatch::{Dispatcher, send_message_with_retry};
pub use state::{
    AlertKind, CREATE_LEADS_LABEL, CREATING_LEADS_LABEL, InputState, LeadAlert, LeadPanelState,
    WidgetPhase, WidgetState,
};

use std::sync::Arc;
use std::time::Duration;

use aida_core::error::Result;
use aida_core::gateway::{AgentGateway, ChatRequest, ChatResponse, LeadResponse};
use aida_core::intent::is_lead_generation_query;
use aida_core::lead::{LeadCount, LeadRequest};
use aida_core::retry::RetryPolicy;
use aida_core::scheduler::{Debouncer, Scheduler, TimerId};
use aida_core::session::{AgentSession, MessageRole};
use aida_core::settings::Settings;

use crate::render;

pub const CONNECT_FAILED_MESSAGE: &str =
    "Failed to connect to AIDA AI. Please check your settings.";
pub const NOT_CONNECTED_MESSAGE: &str = "AIDA is not connected. Please refresh the page.";
pub const LEAD_INTENT_REPLY: &str =
    "I can help you create leads! Let me open the lead generation panel for you.";
pub const GENERIC_ERROR_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";
pub const CONNECTION_ERROR_MESSAGE: &str =
    "Sorry, I'm having trouble connecting. Please try again later.";
pub const PERSISTENT_FAILURE_MESSAGE: &str =
    "I'm experiencing persistent issues. Please refresh the page and try again.";
pub const LEADS_FAILED_MESSAGE: &str = "Failed to create leads";

pub const INPUT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const LEAD_PANEL_OPEN_DELAY: Duration = Duration::from_millis(1000);
pub const LEAD_PANEL_CLOSE_DELAY: Duration = Duration::from_millis(2000);
pub const LEAD_ALERT_TTL: Duration = Duration::from_millis(5000);
pub const QUICK_MESSAGE_DELAY: Duration = Duration::from_millis(500);

/// Delayed actions delivered back to the widget by its scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    ValidateInput,
    OpenLeadPanel,
    CloseLeadPanel,
    DismissLeadAlert(u64),
    SendQuickMessage(String),
}

/// Tunables of a widget instance.
#[derive(Debug, Clone)]
pub struct WidgetOptions {
    /// Origin of the host site, used by the fallback settings.
    pub origin: String,
    pub retry_policy: RetryPolicy,
    pub chat_timeout: Duration,
}

impl WidgetOptions {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            retry_policy: RetryPolicy::default(),
            chat_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn with_chat_timeout(mut self, timeout: Duration) -> Self {
        self.chat_timeout = timeout;
        self
    }
}

/// How a send request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Empty input or a call already in flight; nothing happened.
    Ignored,
    /// No agent session; an error was shown.
    NotConnected,
    /// Answered from the response cache.
    Cached,
    /// Lead intent detected; the lead panel opens shortly.
    LeadIntent,
    Answered,
    Failed,
}

/// A chat turn that passed every local check and awaits the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChat {
    pub request: ChatRequest,
}

/// First half of a send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendStart {
    /// Handled locally.
    Done(SendOutcome),
    /// Run the call with [`Dispatcher::chat`], then pass the result to
    /// [`ChatWidget::finish_send`].
    Dispatch(PendingChat),
}

/// How a lead submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadOutcome {
    /// A submission is already running.
    Ignored,
    Invalid,
    Created(u32),
    Failed,
}

/// The chat widget controller.
pub struct ChatWidget {
    state: WidgetState,
    gateway: Arc<dyn AgentGateway>,
    scheduler: Arc<dyn Scheduler<WidgetEvent>>,
    options: WidgetOptions,
    input_debounce: Debouncer,
    next_alert_id: u64,
}

impl ChatWidget {
    /// Creates an uninitialized widget with fallback settings.
    pub fn new(
        gateway: Arc<dyn AgentGateway>,
        scheduler: Arc<dyn Scheduler<WidgetEvent>>,
        options: WidgetOptions,
    ) -> Self {
        let settings = Settings::fallback(options.origin.clone());
        Self {
            state: WidgetState::new(settings),
            gateway,
            scheduler,
            options,
            input_debounce: Debouncer::new(INPUT_DEBOUNCE),
            next_alert_id: 1,
        }
    }

    /// Creates a widget and runs the full startup sequence: settings load,
    /// mount, then session init. Never fails; problems surface in the
    /// transcript.
    ///
    /// # Arguments
    ///
    /// * `gateway` - Remote call surface of the host
    /// * `scheduler` - Delivers [`WidgetEvent`]s back to the host loop
    /// * `options` - Origin, retry policy and chat timeout
    pub async fn initialize(
        gateway: Arc<dyn AgentGateway>,
        scheduler: Arc<dyn Scheduler<WidgetEvent>>,
        options: WidgetOptions,
    ) -> Self {
        let mut widget = Self::new(gateway, scheduler, options);
        widget.load_settings().await;
        widget.mount();
        widget.init_session().await;
        widget
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    pub fn phase(&self) -> WidgetPhase {
        self.state.phase
    }

    pub fn options(&self) -> &WidgetOptions {
        &self.options
    }

    /// Handle for running this widget's remote calls outside `&mut self`.
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(
            Arc::clone(&self.gateway),
            self.options.retry_policy,
            self.options.chat_timeout,
        )
    }

    /// Current markup of the widget.
    pub fn render_html(&self) -> String {
        render::render_widget(&self.state)
    }

    /// Fetches settings, keeping the fallback set on any failure.
    pub async fn load_settings(&mut self) {
        match self.gateway.get_settings().await {
            Ok(response) if response.success => match response.settings {
                Some(settings) => {
                    tracing::info!("[ChatWidget] Settings loaded");
                    self.state.settings = settings;
                }
                None => tracing::warn!("[ChatWidget] Settings response without settings, using defaults"),
            },
            Ok(response) => tracing::warn!(
                "[ChatWidget] Failed to load settings ({}), using defaults",
                response.message.as_deref().unwrap_or("no message")
            ),
            Err(err) => tracing::warn!("[ChatWidget] Failed to load settings: {}, using defaults", err),
        }
        self.state.phase = WidgetPhase::SettingsLoaded;
    }

    /// Puts the widget on the page in its initial visual state.
    pub fn mount(&mut self) {
        self.state.chat_open = false;
        self.state.input.focused = false;
        self.state.lead_panel.open = false;
        self.state.phase = WidgetPhase::WidgetRendered;
        tracing::debug!(
            "[ChatWidget] Mounted at {} ({})",
            self.state.settings.widget_position.as_class(),
            self.state.settings.widget_theme.as_class()
        );
    }

    /// Opens the agent session. On failure the widget stays usable but
    /// rejects sends locally.
    pub async fn init_session(&mut self) {
        self.state.phase = WidgetPhase::SessionPending;
        let session_id = match self.gateway.init_agent_session().await {
            Ok(response) if response.success => response.session_data.map(|data| data.session_id),
            Ok(response) => {
                tracing::error!(
                    "[ChatWidget] Session init rejected: {}",
                    response.message.as_deref().unwrap_or("no message")
                );
                None
            }
            Err(err) => {
                tracing::error!("[ChatWidget] Session init failed: {}", err);
                None
            }
        };

        match session_id {
            Some(id) => {
                tracing::info!("[ChatWidget] Session ready: {}", id);
                self.state.session = AgentSession::ready(id);
                self.state.phase = WidgetPhase::SessionReady;
            }
            None => {
                self.state.session = AgentSession::pending();
                self.state.phase = WidgetPhase::SessionFailed;
                self.show_error(CONNECT_FAILED_MESSAGE);
            }
        }
    }

    /// Releases the agent session. The widget then rejects sends until a new
    /// session is initialized.
    pub async fn clear_session(&mut self) -> Result<()> {
        let Some(session_id) = self.state.session.active_id().map(str::to_string) else {
            return Ok(());
        };
        self.state.session = AgentSession::pending();
        self.state.phase = WidgetPhase::SessionPending;

        let response = self.gateway.clear_agent_session(&session_id).await?;
        if response.success {
            tracing::info!("[ChatWidget] Session {} cleared", session_id);
        } else {
            tracing::warn!(
                "[ChatWidget] Server did not clear session {}: {}",
                session_id,
                response.message.as_deref().unwrap_or("no message")
            );
        }
        Ok(())
    }

    pub fn toggle_chat(&mut self) {
        if self.state.chat_open {
            self.close_chat();
        } else {
            self.open_chat();
        }
    }

    pub fn open_chat(&mut self) {
        if !self.state.chat_open {
            self.state.chat_open = true;
            self.state.input.focused = true;
        }
    }

    pub fn close_chat(&mut self) {
        self.state.chat_open = false;
        self.state.input.focused = false;
    }

    pub fn focus_input(&mut self) {
        self.state.input.focused = true;
    }

    pub fn blur_input(&mut self) {
        self.state.input.focused = false;
    }

    pub fn open_lead_panel(&mut self) {
        self.state.lead_panel.open = true;
    }

    pub fn close_lead_panel(&mut self) {
        self.state.lead_panel.open = false;
    }

    /// Replaces the input value and restarts the validation debounce.
    pub fn on_input(&mut self, value: impl Into<String>) {
        self.state.input.value = value.into();
        self.input_debounce
            .trigger(self.scheduler.as_ref(), WidgetEvent::ValidateInput);
    }

    /// Validates the current input immediately.
    pub fn validate_input(&mut self) {
        self.state.input.revalidate();
    }

    /// Appends a message to the transcript.
    pub fn add_message(&mut self, content: impl Into<String>, role: MessageRole) {
        self.state.history.push(content, role);
    }

    /// Shows an `Error: ...` bot message.
    pub fn show_error(&mut self, message: &str) {
        self.add_message(format!("Error: {message}"), MessageRole::Bot);
    }

    /// Sends the current input and waits for the answer.
    pub async fn send_message(&mut self) -> SendOutcome {
        match self.begin_send() {
            SendStart::Done(outcome) => outcome,
            SendStart::Dispatch(pending) => {
                let result = self.dispatcher().chat(pending.request.clone()).await;
                self.finish_send(pending, result)
            }
        }
    }

    /// Places `text` in the input and sends it.
    pub async fn send_quick_message(&mut self, text: &str) -> SendOutcome {
        self.state.input.value = text.to_string();
        self.send_message().await
    }

    /// Runs every local step of a send: guards, cache lookup, intent
    /// routing and the loading flag.
    pub fn begin_send(&mut self) -> SendStart {
        let message = self.state.input.value.trim().to_string();
        if message.is_empty() || self.state.is_loading {
            return SendStart::Done(SendOutcome::Ignored);
        }

        let Some(session_id) = self.state.session.active_id().map(str::to_string) else {
            self.show_error(NOT_CONNECTED_MESSAGE);
            return SendStart::Done(SendOutcome::NotConnected);
        };

        if let Some(cached) = self.state.cache.get(&message).map(str::to_string) {
            tracing::debug!("[ChatWidget] Cache hit");
            self.state.input.value.clear();
            self.add_message(message, MessageRole::User);
            self.add_message(cached, MessageRole::Bot);
            return SendStart::Done(SendOutcome::Cached);
        }

        self.state.input.value.clear();
        self.add_message(message.clone(), MessageRole::User);

        if is_lead_generation_query(&message) {
            tracing::info!("[ChatWidget] Lead intent detected, opening lead panel");
            self.add_message(LEAD_INTENT_REPLY, MessageRole::Bot);
            self.scheduler
                .schedule(LEAD_PANEL_OPEN_DELAY, WidgetEvent::OpenLeadPanel);
            return SendStart::Done(SendOutcome::LeadIntent);
        }

        self.state.is_loading = true;
        SendStart::Dispatch(PendingChat {
            request: ChatRequest {
                session_id,
                user_input: message,
            },
        })
    }

    /// Applies the result of a dispatched chat call.
    pub fn finish_send(
        &mut self,
        pending: PendingChat,
        result: Result<ChatResponse>,
    ) -> SendOutcome {
        self.state.is_loading = false;
        match result {
            Ok(response) => match response.reply() {
                Some(reply) => {
                    let reply = reply.to_string();
                    self.add_message(reply.clone(), MessageRole::Bot);
                    if let Some(evicted) =
                        self.state.cache.insert(&pending.request.user_input, reply)
                    {
                        tracing::debug!("[ChatWidget] Evicted cached response for '{}'", evicted);
                    }
                    self.state.failures.record_success();
                    SendOutcome::Answered
                }
                None => {
                    tracing::warn!(
                        "[ChatWidget] Agent reported failure: {}",
                        response.message.as_deref().unwrap_or("no message")
                    );
                    self.handle_error(GENERIC_ERROR_MESSAGE);
                    SendOutcome::Failed
                }
            },
            Err(err) => {
                tracing::error!("[ChatWidget] Chat call failed: {}", err);
                self.handle_error(CONNECTION_ERROR_MESSAGE);
                SendOutcome::Failed
            }
        }
    }

    /// Shows a failure message and counts it towards the persistent notice.
    pub fn handle_error(&mut self, message: &str) {
        self.add_message(message, MessageRole::Bot);
        if self.state.failures.record_failure() {
            self.add_message(PERSISTENT_FAILURE_MESSAGE, MessageRole::Bot);
        }
    }

    pub fn set_business_type(&mut self, value: impl Into<String>) {
        self.state.lead_panel.business_type = value.into();
    }

    pub fn set_location(&mut self, value: impl Into<String>) {
        self.state.lead_panel.location = value.into();
    }

    pub fn set_lead_count(&mut self, count: LeadCount) {
        self.state.lead_panel.count = count;
    }

    /// Submits the lead form and waits for the result.
    pub async fn create_leads(&mut self) -> LeadOutcome {
        match self.begin_create_leads() {
            Ok(request) => {
                let result = self.dispatcher().create_leads(request.clone()).await;
                self.finish_create_leads(&request, result)
            }
            Err(outcome) => outcome,
        }
    }

    /// Validates the form and marks the submission as running.
    pub fn begin_create_leads(&mut self) -> std::result::Result<LeadRequest, LeadOutcome> {
        if self.state.lead_panel.submitting {
            return Err(LeadOutcome::Ignored);
        }
        let panel = &self.state.lead_panel;
        match LeadRequest::new(&panel.business_type, &panel.location, panel.count) {
            Ok(request) => {
                self.state.lead_panel.submitting = true;
                Ok(request)
            }
            Err(err) => {
                self.show_lead_alert(AlertKind::Error, err.detail());
                Err(LeadOutcome::Invalid)
            }
        }
    }

    /// Applies the result of a `create_leads` call.
    pub fn finish_create_leads(
        &mut self,
        request: &LeadRequest,
        result: Result<LeadResponse>,
    ) -> LeadOutcome {
        self.state.lead_panel.submitting = false;
        match result {
            Ok(response) if response.success => {
                let created = response
                    .result
                    .unwrap_or_default()
                    .created_or(request.count);
                tracing::info!(
                    "[ChatWidget] Created {} leads for '{}' in '{}'",
                    created,
                    request.business_type,
                    request.location
                );
                self.show_lead_alert(
                    AlertKind::Success,
                    format!("Successfully created {created} leads!"),
                );
                self.state.lead_panel.business_type.clear();
                self.state.lead_panel.location.clear();
                self.scheduler
                    .schedule(LEAD_PANEL_CLOSE_DELAY, WidgetEvent::CloseLeadPanel);
                LeadOutcome::Created(created)
            }
            Ok(response) => {
                let detail = response
                    .message
                    .unwrap_or_else(|| LEADS_FAILED_MESSAGE.to_string());
                tracing::warn!("[ChatWidget] Lead creation rejected: {}", detail);
                self.show_lead_alert(AlertKind::Error, format!("{LEADS_FAILED_MESSAGE}: {detail}"));
                LeadOutcome::Failed
            }
            Err(err) => {
                tracing::error!("[ChatWidget] Lead creation failed: {}", err);
                self.show_lead_alert(
                    AlertKind::Error,
                    format!("{LEADS_FAILED_MESSAGE}: {}", err.detail()),
                );
                LeadOutcome::Failed
            }
        }
    }

    /// Replaces the lead alert and schedules its dismissal.
    pub fn show_lead_alert(&mut self, kind: AlertKind, text: impl Into<String>) -> u64 {
        let id = self.next_alert_id;
        self.next_alert_id += 1;
        self.state.lead_panel.alert = Some(LeadAlert {
            id,
            kind,
            text: text.into(),
        });
        self.scheduler
            .schedule(LEAD_ALERT_TTL, WidgetEvent::DismissLeadAlert(id));
        id
    }

    /// Schedules a delayed quick message.
    pub fn schedule_quick_message(&self, text: impl Into<String>) -> TimerId {
        self.scheduler
            .schedule(QUICK_MESSAGE_DELAY, WidgetEvent::SendQuickMessage(text.into()))
    }

    /// Applies a fired timer event.
    ///
    /// A quick message that passes the local checks is returned for the
    /// caller to dispatch; use [`ChatWidget::process_event`] to run it inline.
    pub fn handle_event(&mut self, event: WidgetEvent) -> Option<PendingChat> {
        match event {
            WidgetEvent::ValidateInput => {
                self.input_debounce.clear();
                self.validate_input();
            }
            WidgetEvent::OpenLeadPanel => self.open_lead_panel(),
            WidgetEvent::CloseLeadPanel => self.close_lead_panel(),
            WidgetEvent::DismissLeadAlert(id) => {
                if self
                    .state
                    .lead_panel
                    .alert
                    .as_ref()
                    .is_some_and(|alert| alert.id == id)
                {
                    self.state.lead_panel.alert = None;
                }
            }
            WidgetEvent::SendQuickMessage(text) => {
                self.state.input.value = text;
                if let SendStart::Dispatch(pending) = self.begin_send() {
                    return Some(pending);
                }
            }
        }
        None
    }

    /// Applies a fired timer event, completing any resulting chat call.
    pub async fn process_event(&mut self, event: WidgetEvent) {
        if let Some(pending) = self.handle_event(event) {
            let result = self.dispatcher().chat(pending.request.clone()).await;
            self.finish_send(pending, result);
        }
    }
}
