//! Infrastructure layer for the AIDA client.
//!
//! Concrete implementations of the core traits: the HTTP gateway speaking
//! the host framework's method endpoint, tokio-backed timers, and the
//! client configuration file.

pub mod config;
pub mod http_gateway;
pub mod paths;
pub mod scheduler;

pub use crate::config::{ClientConfig, ConfigService};
pub use crate::http_gateway::HttpAgentGateway;
pub use crate::scheduler::TokioScheduler;
