use std::sync::Arc;

use aida_application::widget::{ChatWidget, WidgetEvent};
use aida_infrastructure::TokioScheduler;
use anyhow::Result;

use super::AppContext;

pub async fn run(ctx: &AppContext, open: bool) -> Result<()> {
    let (scheduler, _events) = TokioScheduler::<WidgetEvent>::new();
    let mut widget =
        ChatWidget::initialize(ctx.gateway(), Arc::new(scheduler), ctx.widget_options()).await;
    if open {
        widget.open_chat();
    }
    println!("{}", widget.render_html());
    Ok(())
}
