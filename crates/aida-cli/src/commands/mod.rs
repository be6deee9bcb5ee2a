use std::sync::Arc;

use aida_application::widget::WidgetOptions;
use aida_core::gateway::AgentGateway;
use aida_infrastructure::{ClientConfig, HttpAgentGateway};

pub mod chat;
pub mod connection;
pub mod leads;
pub mod render;
pub mod settings;

/// Configuration and gateway shared by all commands.
pub struct AppContext {
    pub config: ClientConfig,
    gateway: Arc<HttpAgentGateway>,
}

impl AppContext {
    pub fn new(config: ClientConfig) -> Self {
        let gateway = Arc::new(HttpAgentGateway::from_config(&config.erp, &config.chat));
        Self { config, gateway }
    }

    pub fn gateway(&self) -> Arc<dyn AgentGateway> {
        self.gateway.clone()
    }

    pub fn widget_options(&self) -> WidgetOptions {
        WidgetOptions::new(self.config.erp.base_url.clone())
            .with_retry_policy(self.config.chat.retry_policy())
            .with_chat_timeout(self.config.chat.timeout())
    }
}
