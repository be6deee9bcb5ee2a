//! Entry points for other page components.

use aida_core::scheduler::TimerId;

use crate::widget::{ChatWidget, SendOutcome};

/// Opens the chat window.
pub fn open_chat(widget: &mut ChatWidget) {
    widget.open_chat();
}

/// Opens the chat window and sends `text` shortly afterwards.
///
/// The message is delivered as a [`crate::widget::WidgetEvent::SendQuickMessage`]
/// event.
pub fn send_chat_message(widget: &mut ChatWidget, text: &str) -> TimerId {
    widget.open_chat();
    widget.schedule_quick_message(text)
}

/// Opens the lead-generation panel.
pub fn open_leads(widget: &mut ChatWidget) {
    widget.open_lead_panel();
}

/// Places `text` in the input and sends it right away.
pub async fn send_quick_message(widget: &mut ChatWidget, text: &str) -> SendOutcome {
    widget.send_quick_message(text).await
}
