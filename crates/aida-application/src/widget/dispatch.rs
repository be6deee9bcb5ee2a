//! Remote calls issued by the widget, detached from widget state.
//!
//! A [`Dispatcher`] owns clones of everything a call needs, so a host loop
//! can spawn it while the widget keeps handling events.

use std::sync::Arc;
use std::time::Duration;

use aida_core::error::{AidaError, Result};
use aida_core::gateway::{AgentGateway, ChatRequest, ChatResponse, LeadResponse};
use aida_core::lead::LeadRequest;
use aida_core::retry::{RetryPolicy, with_retry};

/// Sends a chat turn, retrying retryable failures.
///
/// Each attempt is bounded by `timeout`; an expired attempt counts as a
/// retryable timeout error. The same request is sent on every attempt and the
/// final error is returned unchanged.
pub async fn send_message_with_retry(
    gateway: &dyn AgentGateway,
    request: &ChatRequest,
    policy: &RetryPolicy,
    timeout: Duration,
) -> Result<ChatResponse> {
    with_retry(policy, |attempt| async move {
        tracing::debug!("[ChatWidget] chat_with_agent attempt {}", attempt);
        match tokio::time::timeout(timeout, gateway.chat_with_agent(request)).await {
            Ok(result) => result,
            Err(_) => Err(AidaError::timeout(format!(
                "chat_with_agent timeout after {}s",
                timeout.as_secs()
            ))),
        }
    })
    .await
}

/// Cloneable handle for the widget's chat and lead calls.
#[derive(Clone)]
pub struct Dispatcher {
    gateway: Arc<dyn AgentGateway>,
    policy: RetryPolicy,
    chat_timeout: Duration,
}

impl Dispatcher {
    pub fn new(gateway: Arc<dyn AgentGateway>, policy: RetryPolicy, chat_timeout: Duration) -> Self {
        Self {
            gateway,
            policy,
            chat_timeout,
        }
    }

    pub async fn chat(self, request: ChatRequest) -> Result<ChatResponse> {
        send_message_with_retry(
            self.gateway.as_ref(),
            &request,
            &self.policy,
            self.chat_timeout,
        )
        .await
    }

    /// Lead creation is never retried.
    pub async fn create_leads(self, request: LeadRequest) -> Result<LeadResponse> {
        self.gateway.create_leads(&request).await
    }
}
