use std::sync::Arc;

use aida_application::widget::{ChatWidget, LeadOutcome, WidgetEvent};
use aida_core::lead::LeadCount;
use aida_infrastructure::TokioScheduler;
use anyhow::{Result, bail};
use colored::Colorize;

use super::AppContext;

/// Submits the lead form once, as the lead panel would.
pub async fn run(ctx: &AppContext, business_type: &str, location: &str, count: u32) -> Result<()> {
    let count = LeadCount::try_from(count)?;
    let (scheduler, _events) = TokioScheduler::<WidgetEvent>::new();
    let mut widget = ChatWidget::new(ctx.gateway(), Arc::new(scheduler), ctx.widget_options());

    widget.open_lead_panel();
    widget.set_business_type(business_type);
    widget.set_location(location);
    widget.set_lead_count(count);

    let outcome = widget.create_leads().await;
    let alert = widget
        .state()
        .lead_panel
        .alert
        .as_ref()
        .map(|alert| alert.text.clone())
        .unwrap_or_default();

    match outcome {
        LeadOutcome::Created(_) => {
            println!("{}", alert.green());
            Ok(())
        }
        LeadOutcome::Invalid | LeadOutcome::Failed | LeadOutcome::Ignored => bail!("{alert}"),
    }
}
