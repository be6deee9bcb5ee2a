//! Domain layer for the AIDA assistant client.
//!
//! Pure types and rules shared by the widget and settings controllers:
//! settings, session and transcript models, the bounded response cache,
//! retry policy, lead intent detection, input validation, and the traits
//! behind which the remote gateway and timers live.

pub mod cache;
pub mod error;
pub mod gateway;
pub mod input;
pub mod intent;
pub mod lead;
pub mod retry;
pub mod scheduler;
pub mod session;
pub mod settings;

// Re-export common error type
pub use error::AidaError;
