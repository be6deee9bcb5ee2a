//! Interactive chat session.
//!
//! rustyline runs on a blocking thread and forwards lines over a channel.
//! The main loop owns the widget and multiplexes typed lines, fired timers
//! and finished remote calls.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use aida_application::widget::{
    AlertKind, ChatWidget, PendingChat, SendStart, WidgetEvent, WidgetState,
};
use aida_core::error::Result as AidaResult;
use aida_core::gateway::{ChatResponse, LeadResponse};
use aida_core::lead::{LeadCount, LeadRequest};
use aida_core::session::MessageRole;
use aida_infrastructure::TokioScheduler;
use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::sync::mpsc;

use super::AppContext;

const COMMANDS: [&str; 5] = ["/leads", "/panel", "/html", "/clear", "/help"];

/// Completion and hints for slash commands.
#[derive(Clone)]
struct ChatHelper;

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }
        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.starts_with('/') && !line.contains(' ') {
            COMMANDS
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for ChatHelper {}

/// A finished remote call.
enum Completion {
    Chat(PendingChat, AidaResult<ChatResponse>),
    Leads(LeadRequest, AidaResult<LeadResponse>),
}

/// Reads lines until `quit`, `exit` or end of input.
fn read_lines(lines: mpsc::UnboundedSender<String>) -> Result<()> {
    let mut rl = Editor::new()?;
    rl.set_helper(Some(ChatHelper));

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);
                if lines.send(line).is_err() {
                    break;
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }
    Ok(())
}

/// Prints what changed in the widget since the last flush.
#[derive(Default)]
struct TranscriptView {
    printed: usize,
    loading: bool,
    panel_open: bool,
    alert: Option<u64>,
}

impl TranscriptView {
    fn flush(&mut self, state: &WidgetState) {
        for record in state.history.since(self.printed) {
            match record.role {
                MessageRole::User => println!("{}", format!("> {}", record.content).green()),
                MessageRole::Bot if record.content.starts_with("Error:") => {
                    println!("{}", record.content.red())
                }
                MessageRole::Bot => {
                    for line in record.content.lines() {
                        println!("{}", line.bright_blue());
                    }
                }
            }
        }
        self.printed = state.history.len();

        if state.is_loading && !self.loading {
            println!("{}", "AIDA is thinking...".bright_black());
        }
        self.loading = state.is_loading;

        let panel = &state.lead_panel;
        if panel.open != self.panel_open {
            if panel.open {
                println!(
                    "{}",
                    "Lead panel open: /leads <business type>; <location>; [count]".bright_magenta()
                );
            } else {
                println!("{}", "Lead panel closed".bright_black());
            }
            self.panel_open = panel.open;
        }

        let alert_id = panel.alert.as_ref().map(|alert| alert.id);
        if alert_id != self.alert {
            if let Some(alert) = &panel.alert {
                match alert.kind {
                    AlertKind::Success => println!("{}", alert.text.green()),
                    AlertKind::Error => println!("{}", alert.text.red()),
                }
            }
            self.alert = alert_id;
        }
    }
}

fn print_help() {
    println!("{}", "Type a message to chat with AIDA.".bright_black());
    println!(
        "{}",
        "/leads <business type>; <location>; [5|10|20|50]  create leads".bright_black()
    );
    println!("{}", "/panel  open the lead panel".bright_black());
    println!("{}", "/html   print the widget markup".bright_black());
    println!("{}", "/clear  end the agent session".bright_black());
    println!("{}", "quit    leave".bright_black());
}

fn spawn_chat(
    widget: &ChatWidget,
    pending: PendingChat,
    completions: &mpsc::UnboundedSender<Completion>,
) {
    let dispatcher = widget.dispatcher();
    let tx = completions.clone();
    tokio::spawn(async move {
        let result = dispatcher.chat(pending.request.clone()).await;
        let _ = tx.send(Completion::Chat(pending, result));
    });
}

fn submit_leads(
    widget: &mut ChatWidget,
    args: &str,
    completions: &mpsc::UnboundedSender<Completion>,
) {
    let mut parts = args.split(';').map(str::trim);
    let business_type = parts.next().unwrap_or_default().to_string();
    let location = parts.next().unwrap_or_default().to_string();
    let count = match parts.next().filter(|value| !value.is_empty()) {
        Some(value) => match value.parse::<u32>().map(LeadCount::try_from) {
            Ok(Ok(count)) => count,
            _ => {
                println!("{}", "Lead count must be 5, 10, 20 or 50".red());
                return;
            }
        },
        None => LeadCount::default(),
    };

    widget.open_lead_panel();
    widget.set_business_type(business_type);
    widget.set_location(location);
    widget.set_lead_count(count);

    let Ok(request) = widget.begin_create_leads() else {
        return;
    };
    println!("{}", "Creating Leads...".bright_black());
    let dispatcher = widget.dispatcher();
    let tx = completions.clone();
    tokio::spawn(async move {
        let result = dispatcher.create_leads(request.clone()).await;
        let _ = tx.send(Completion::Leads(request, result));
    });
}

pub async fn run(ctx: &AppContext) -> Result<()> {
    let (scheduler, mut events) = TokioScheduler::<WidgetEvent>::new();
    let mut widget =
        ChatWidget::initialize(ctx.gateway(), Arc::new(scheduler), ctx.widget_options()).await;
    widget.open_chat();

    println!("{}", "=== AIDA AI Assistant ===".bright_magenta().bold());
    println!(
        "{}",
        "Hello! I'm AIDA, your AI assistant. How can I assist you today?".bright_blue()
    );
    println!("{}", "Type '/help' for commands, or 'quit' to exit.".bright_black());
    println!();

    let mut view = TranscriptView::default();
    view.flush(widget.state());

    let (line_tx, mut lines) = mpsc::unbounded_channel::<String>();
    let (completion_tx, mut completions) = mpsc::unbounded_channel::<Completion>();
    let reader = tokio::task::spawn_blocking(move || read_lines(line_tx));

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else { break };
                let trimmed = line.trim();
                match trimmed.split_once(' ').unwrap_or((trimmed, "")) {
                    ("/help", _) => print_help(),
                    ("/panel", _) => widget.open_lead_panel(),
                    ("/html", _) => println!("{}", widget.render_html()),
                    ("/clear", _) => {
                        if let Err(err) = widget.clear_session().await {
                            println!("{}", format!("Failed to clear session: {}", err.detail()).red());
                        } else {
                            println!("{}", "Session cleared".bright_black());
                        }
                    }
                    ("/leads", args) => submit_leads(&mut widget, args, &completion_tx),
                    _ => {
                        widget.on_input(line.as_str());
                        if let SendStart::Dispatch(pending) = widget.begin_send() {
                            spawn_chat(&widget, pending, &completion_tx);
                        } else if widget.state().is_loading {
                            println!("{}", "Still waiting for the previous answer".yellow());
                        }
                    }
                }
            }
            Some(event) = events.recv() => {
                if let Some(pending) = widget.handle_event(event) {
                    spawn_chat(&widget, pending, &completion_tx);
                }
            }
            Some(completion) = completions.recv() => match completion {
                Completion::Chat(pending, result) => {
                    widget.finish_send(pending, result);
                }
                Completion::Leads(request, result) => {
                    widget.finish_create_leads(&request, result);
                }
            },
        }
        view.flush(widget.state());
    }

    reader.await??;
    if let Err(err) = widget.clear_session().await {
        tracing::debug!("[CLI] Session release failed: {}", err);
    }
    Ok(())
}
