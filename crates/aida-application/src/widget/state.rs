//! Observable widget state.
//!
//! Everything the page shows is derived from [`WidgetState`]; the renderer
//! never keeps state of its own.

use aida_core::cache::ResponseCache;
use aida_core::input::{InputValidation, validate_input};
use aida_core::lead::LeadCount;
use aida_core::retry::FailureTracker;
use aida_core::session::{AgentSession, MessageHistory};
use aida_core::settings::Settings;
use serde::{Deserialize, Serialize};

pub const CREATE_LEADS_LABEL: &str = "Create Leads";
pub const CREATING_LEADS_LABEL: &str = "Creating Leads...";

/// Initialization progress of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetPhase {
    Uninitialized,
    SettingsLoaded,
    WidgetRendered,
    SessionPending,
    SessionReady,
    SessionFailed,
}

/// The chat input box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    pub value: String,
    /// Result of the last (debounced) validation run.
    pub validation: Option<InputValidation>,
    pub focused: bool,
}

impl InputState {
    fn new() -> Self {
        Self {
            value: String::new(),
            validation: None,
            focused: false,
        }
    }

    /// The send control starts enabled and follows validation afterwards.
    pub fn send_enabled(&self) -> bool {
        self.validation
            .map(|validation| validation.send_enabled())
            .unwrap_or(true)
    }

    pub fn validity_message(&self) -> Option<&'static str> {
        self.validation
            .and_then(|validation| validation.validity_message())
    }

    pub(crate) fn revalidate(&mut self) {
        self.validation = Some(validate_input(&self.value));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Success,
    Error,
}

impl AlertKind {
    pub fn as_class(&self) -> &'static str {
        match self {
            AlertKind::Success => "success",
            AlertKind::Error => "error",
        }
    }
}

/// Alert shown at the top of the lead panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadAlert {
    pub id: u64,
    pub kind: AlertKind,
    pub text: String,
}

/// The lead-generation side panel and its form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadPanelState {
    pub open: bool,
    pub business_type: String,
    pub location: String,
    pub count: LeadCount,
    /// A `create_leads` call is in flight; the submit control is disabled.
    pub submitting: bool,
    pub alert: Option<LeadAlert>,
}

impl LeadPanelState {
    fn new() -> Self {
        Self {
            open: false,
            business_type: String::new(),
            location: String::new(),
            count: LeadCount::default(),
            submitting: false,
            alert: None,
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            CREATING_LEADS_LABEL
        } else {
            CREATE_LEADS_LABEL
        }
    }
}

/// Complete state of one widget instance.
#[derive(Debug, Clone)]
pub struct WidgetState {
    pub phase: WidgetPhase,
    pub settings: Settings,
    pub session: AgentSession,
    pub history: MessageHistory,
    pub cache: ResponseCache,
    pub failures: FailureTracker,
    /// A chat call is in flight.
    pub is_loading: bool,
    pub chat_open: bool,
    pub input: InputState,
    pub lead_panel: LeadPanelState,
}

impl WidgetState {
    pub fn new(settings: Settings) -> Self {
        Self {
            phase: WidgetPhase::Uninitialized,
            settings,
            session: AgentSession::pending(),
            history: MessageHistory::new(),
            cache: ResponseCache::new(),
            failures: FailureTracker::new(),
            is_loading: false,
            chat_open: false,
            input: InputState::new(),
            lead_panel: LeadPanelState::new(),
        }
    }

    /// Whether the send control is enabled.
    pub fn can_send(&self) -> bool {
        !self.is_loading && self.input.send_enabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_control_tracks_validation_and_loading() {
        let mut state = WidgetState::new(Settings::fallback("http://localhost:8000"));
        assert!(state.can_send());

        state.input.value = "   ".to_string();
        state.input.revalidate();
        assert!(!state.can_send());

        state.input.value = "hello".to_string();
        state.input.revalidate();
        assert!(state.can_send());

        state.is_loading = true;
        assert!(!state.can_send());
    }

    #[test]
    fn submit_label_follows_submitting_flag() {
        let mut panel = LeadPanelState::new();
        assert_eq!(panel.submit_label(), "Create Leads");
        panel.submitting = true;
        assert_eq!(panel.submit_label(), "Creating Leads...");
    }
}
