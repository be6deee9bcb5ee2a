//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: agent session handle (`AgentSession`)
//! - `message`: transcript records (`MessageRole`, `MessageRecord`, `MessageHistory`)
//! - `content`: rich bot content (`RichContent`, `Segment`)

mod content;
mod message;
mod model;

pub use content::{RichContent, Segment};
pub use message::{MessageHistory, MessageRecord, MessageRole};
pub use model::AgentSession;
