//! Application layer for the AIDA assistant.
//!
//! Provides the chat widget controller, the settings form controller and the
//! HTML projection of the widget. Remote calls go through
//! [`aida_core::gateway::AgentGateway`]; delayed actions through
//! [`aida_core::scheduler::Scheduler`].

pub mod render;
pub mod settings_form;
pub mod triggers;
pub mod widget;

pub use render::render_widget;
pub use settings_form::{FormHost, Indicator, Prompt, SettingsField, SettingsFormController};
pub use widget::{ChatWidget, WidgetEvent, WidgetOptions, WidgetState};
