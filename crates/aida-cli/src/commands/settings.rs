use std::path::Path;
use std::sync::Arc;

use aida_application::settings_form::{SettingsField, SettingsFormController};
use aida_core::settings::{Settings, validate_for_save};
use anyhow::{Context, Result};
use colored::Colorize;

use super::AppContext;
use crate::host::TerminalHost;

const CHECKED_FIELDS: [SettingsField; 4] = [
    SettingsField::ApiServerUrl,
    SettingsField::ErpnextUrl,
    SettingsField::EnableOnboarding,
    SettingsField::EnableLeadCreation,
];

/// Prints the site's settings and runs the form checks on them, or saves
/// settings read from `save`.
pub async fn run(ctx: &AppContext, save: Option<&Path>) -> Result<()> {
    let controller = SettingsFormController::new(ctx.gateway(), Arc::new(TerminalHost));

    if let Some(path) = save {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let doc: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {} as settings", path.display()))?;
        controller.save(&doc).await?;
        return Ok(());
    }

    let response = ctx.gateway().get_settings().await?;
    let Some(doc) = response.settings.filter(|_| response.success) else {
        anyhow::bail!(
            "Site returned no settings: {}",
            response.message.as_deref().unwrap_or("no message")
        );
    };

    println!("{}", serde_json::to_string_pretty(&doc)?);
    println!();

    controller.on_refresh();
    for field in CHECKED_FIELDS {
        controller.on_field_change(&doc, field);
    }
    match validate_for_save(&doc) {
        Ok(()) => println!("{}", "Settings pass validation".green()),
        Err(err) => println!("{}", format!("Invalid settings: {}", err.detail()).red()),
    }
    Ok(())
}
