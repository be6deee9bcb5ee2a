//! HTML projection of the widget state.
//!
//! Markup is built with `maud`, which escapes every interpolated text node
//! and attribute value.

use aida_core::input::MAX_MESSAGE_CHARS;
use aida_core::lead::LeadCount;
use aida_core::session::{MessageRecord, MessageRole, Segment};
use maud::{Markup, html};

use crate::widget::{LeadPanelState, WidgetState};

const WELCOME_LINES: [&str; 3] = [
    "Creating and managing ERPNext records",
    "Step-by-step guidance for any task",
    "Lead generation and outreach",
];

fn classes(base: &str, extra: &[(bool, &str)]) -> String {
    let mut class = base.to_string();
    for (enabled, name) in extra {
        if *enabled {
            class.push(' ');
            class.push_str(name);
        }
    }
    class
}

fn flag(enabled: bool, value: &'static str) -> Option<&'static str> {
    enabled.then_some(value)
}

fn icon(name: &str) -> Markup {
    html! {
        i class={ "fa " (name) } {}
    }
}

fn close_button(id: &str) -> Markup {
    html! {
        button class="close-btn" id=(id) { (icon("fa-times")) }
    }
}

fn welcome_message() -> Markup {
    html! {
        div class="aida-message bot" {
            div class="aida-message-content" {
                "Hello! I'm AIDA, your AI assistant. I can help you with:"
                @for line in WELCOME_LINES {
                    br;
                    "• " (line)
                }
                br;
                br;
                "How can I assist you today?"
            }
        }
    }
}

fn message_body(record: &MessageRecord) -> Markup {
    if record.role == MessageRole::User {
        return html! { (record.content) };
    }
    html! {
        @for segment in record.rich_content().segments {
            @match segment {
                Segment::Text(text) => { (text) }
                Segment::Link(url) => {
                    a href=(url) target="_blank" rel="noopener noreferrer" { (url) }
                }
            }
        }
    }
}

fn message(record: &MessageRecord) -> Markup {
    html! {
        div class={ "aida-message " (record.role.as_class()) } {
            div class="aida-message-content" { (message_body(record)) }
        }
    }
}

fn loading_message() -> Markup {
    html! {
        div class="aida-message bot" id="aida-loading-message" {
            div class="aida-message-content" {
                div class="aida-loading" {
                    @for _ in 0..3 {
                        div class="aida-loading-dot" {}
                    }
                }
            }
        }
    }
}

fn chat_window(state: &WidgetState) -> Markup {
    html! {
        div class=(classes("aida-chat-window", &[(state.chat_open, "show")])) id="aida-chat-window" {
            div class="aida-chat-header" {
                h3 { "AIDA AI Assistant" }
                (close_button("aida-chat-close"))
            }
            div class="aida-chat-messages" id="aida-chat-messages" {
                (welcome_message())
                @for record in state.history.iter() {
                    (message(record))
                }
                @if state.is_loading {
                    (loading_message())
                }
            }
            div class="aida-chat-input" {
                input
                    type="text"
                    id="aida-message-input"
                    placeholder="Type your message..."
                    maxlength=(MAX_MESSAGE_CHARS)
                    value=(state.input.value)
                    data-validity=[state.input.validity_message()];
                button id="aida-send-button" disabled=[flag(!state.can_send(), "disabled")] {
                    (icon("fa-paper-plane"))
                }
            }
        }
    }
}

fn form_group(label_for: &str, label: &str, control: Markup) -> Markup {
    html! {
        div class="aida-form-group" {
            label for=(label_for) { (label) }
            (control)
        }
    }
}

fn text_input(id: &str, placeholder: &str, value: &str) -> Markup {
    html! {
        input type="text" id=(id) placeholder=(placeholder) value=(value);
    }
}

fn count_select(selected: LeadCount) -> Markup {
    html! {
        select id="lead-count" {
            @for count in LeadCount::ALL {
                option value=(count.value()) selected=[flag(count == selected, "selected")] {
                    (count.value()) " leads"
                }
            }
        }
    }
}

fn lead_panel(panel: &LeadPanelState) -> Markup {
    let submit_icon = if panel.submitting {
        "fa-spinner fa-spin"
    } else {
        "fa-users"
    };

    html! {
        div class=(classes("aida-lead-panel", &[(panel.open, "show")])) id="aida-lead-panel" {
            div class="aida-lead-panel-header" {
                h3 { "Lead Generation" }
                (close_button("aida-lead-close"))
            }
            div class="aida-lead-panel-content" {
                div id="aida-lead-alerts" {
                    @if let Some(alert) = &panel.alert {
                        div class={ "aida-alert " (alert.kind.as_class()) } { (alert.text) }
                    }
                }
                (form_group(
                    "business-type",
                    "Business Type",
                    text_input(
                        "business-type",
                        "e.g., restaurants, law firms, dentists",
                        &panel.business_type
                    )
                ))
                (form_group(
                    "location",
                    "Location",
                    text_input("location", "e.g., New York, NY", &panel.location)
                ))
                (form_group("lead-count", "Number of Leads", count_select(panel.count)))
                button class="aida-btn" id="create-leads-btn" disabled=[flag(panel.submitting, "disabled")] {
                    (icon(submit_icon))
                    " " (panel.submit_label())
                }
            }
        }
    }
}

/// Renders the complete widget for mounting into the host page.
pub fn render_widget(state: &WidgetState) -> String {
    let settings = &state.settings;
    let container_class = classes(
        &format!(
            "aida-chat-widget {} {}",
            settings.widget_position.as_class(),
            settings.widget_theme.as_class()
        ),
        &[(state.input.focused, "aida-focused")],
    );

    let markup = html! {
        div id="aida-chat-widget" class=(container_class) {
            button class=(classes("aida-chat-button", &[(state.chat_open, "active")])) id="aida-chat-toggle" {
                (icon("fa-comments"))
            }
            (chat_window(state))
            (lead_panel(&state.lead_panel))
        }
    };
    markup.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aida_core::settings::{Settings, WidgetPosition, WidgetTheme};

    fn state() -> WidgetState {
        WidgetState::new(Settings::fallback("http://localhost:8000"))
    }

    #[test]
    fn alert_text_and_input_value_are_escaped() {
        let mut state = state();
        state.input.value = r#"<b onclick="x">&</b>"#.to_string();
        state.lead_panel.alert = Some(crate::widget::LeadAlert {
            id: 1,
            kind: crate::widget::AlertKind::Error,
            text: "Error: <img src=x>".to_string(),
        });
        let html = render_widget(&state);
        assert!(html.contains(r#"value="&lt;b onclick=&quot;x&quot;&gt;&amp;&lt;/b&gt;""#));
        assert!(html.contains(r#"<div class="aida-alert error">Error: &lt;img src=x&gt;</div>"#));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let html = render_widget(&state());
        assert!(html.contains("<br>"));
        assert!(!html.contains("</br>"));
        assert!(!html.contains("</input>"));
    }

    #[test]
    fn container_carries_position_and_theme() {
        let mut state = state();
        state.settings.widget_position = WidgetPosition::TopLeft;
        state.settings.widget_theme = WidgetTheme::Dark;
        let html = render_widget(&state);
        assert!(html.starts_with(
            r#"<div id="aida-chat-widget" class="aida-chat-widget top-left dark">"#
        ));
        assert!(html.contains("How can I assist you today?"));
        assert!(html.contains(r#"maxlength="2000""#));
        assert!(!html.contains("aida-loading-message"));
    }

    #[test]
    fn open_states_add_classes() {
        let mut state = state();
        state.chat_open = true;
        state.input.focused = true;
        state.lead_panel.open = true;
        let html = render_widget(&state);
        assert!(html.contains(r#"class="aida-chat-button active""#));
        assert!(html.contains(r#"class="aida-chat-window show""#));
        assert!(html.contains(r#"class="aida-lead-panel show""#));
        assert!(html.contains("aida-focused"));
    }

    #[test]
    fn user_text_is_escaped_and_bot_links_are_anchored() {
        let mut state = state();
        state
            .history
            .push("<script>alert(1)</script> https://x.test", MessageRole::User);
        state
            .history
            .push("See https://docs.example.com/a?b=1&c=2 now", MessageRole::Bot);
        let html = render_widget(&state);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt; https://x.test"));
        assert!(!html.contains(r#"<a href="https://x.test""#));
        assert!(html.contains(
            r#"<a href="https://docs.example.com/a?b=1&amp;c=2" target="_blank" rel="noopener noreferrer">https://docs.example.com/a?b=1&amp;c=2</a>"#
        ));
    }

    #[test]
    fn loading_disables_send_and_shows_indicator() {
        let mut state = state();
        state.is_loading = true;
        let html = render_widget(&state);
        assert!(html.contains(r#"id="aida-loading-message""#));
        assert!(html.contains(r#"<button id="aida-send-button" disabled="disabled">"#));
    }

    #[test]
    fn lead_panel_reflects_form_state() {
        let mut state = state();
        state.lead_panel.count = LeadCount::Twenty;
        state.lead_panel.submitting = true;
        state.lead_panel.business_type = "law \"firms\"".to_string();
        let html = render_widget(&state);
        assert!(html.contains(r#"<option value="20" selected="selected">20 leads</option>"#));
        assert!(html.contains(r#"<option value="10">10 leads</option>"#));
        assert!(html.contains("Creating Leads..."));
        assert!(html.contains(r#"value="law &quot;firms&quot;""#));
    }
}
