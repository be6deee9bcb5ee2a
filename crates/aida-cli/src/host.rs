//! Terminal rendition of the host form engine.

use aida_application::settings_form::{FormHost, Indicator, Prompt};
use colored::{ColoredString, Colorize};

pub struct TerminalHost;

fn paint(text: &str, indicator: Indicator) -> ColoredString {
    match indicator {
        Indicator::Blue => text.bright_blue(),
        Indicator::Green => text.green(),
        Indicator::Orange => text.yellow(),
        Indicator::Red => text.red(),
    }
}

impl FormHost for TerminalHost {
    fn add_custom_button(&self, label: &str, group: &str) {
        println!("{} {}", format!("[{group}]").bright_black(), label.cyan());
    }

    fn msgprint(&self, prompt: Prompt) {
        println!("{}", paint(&prompt.title, prompt.indicator).bold());
        println!("  {}", prompt.message);
    }

    fn show_alert(&self, message: &str, indicator: Indicator) {
        println!("{}", paint(message, indicator));
    }
}
