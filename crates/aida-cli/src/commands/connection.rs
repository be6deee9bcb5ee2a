use std::sync::Arc;

use aida_application::settings_form::{ConnectionTest, SettingsFormController};
use aida_core::settings::Settings;
use anyhow::{Result, bail};

use super::AppContext;
use crate::host::TerminalHost;

/// Runs the connection test against the site's stored settings.
pub async fn run(ctx: &AppContext) -> Result<()> {
    let gateway = ctx.gateway();
    let doc = match gateway.get_settings().await {
        Ok(response) if response.success => response
            .settings
            .unwrap_or_else(|| Settings::fallback(ctx.config.erp.base_url.clone())),
        Ok(_) | Err(_) => {
            tracing::warn!("[CLI] Could not read site settings, testing with defaults");
            Settings::fallback(ctx.config.erp.base_url.clone())
        }
    };

    let controller = SettingsFormController::new(gateway, Arc::new(TerminalHost));
    match controller.test_connection(&doc).await {
        ConnectionTest::Succeeded => Ok(()),
        ConnectionTest::MissingConfiguration => bail!("API Server URL is not configured"),
        ConnectionTest::Failed(message) => bail!("Connection test failed: {message}"),
    }
}
