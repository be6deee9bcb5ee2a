//! Agent session handle.

use serde::{Deserialize, Serialize};

/// The server-assigned session correlating a sequence of chat turns.
///
/// Created once during widget initialization. A failed initialization leaves
/// the session uninitialized, and every later send is rejected locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSession {
    /// Opaque identifier issued by the agent server.
    pub session_id: Option<String>,
    /// Whether `init_agent_session` succeeded.
    pub is_initialized: bool,
}

impl AgentSession {
    /// A session that has not (yet) been established.
    pub fn pending() -> Self {
        Self::default()
    }

    /// A session established with the given server id.
    pub fn ready(session_id: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id.into()),
            is_initialized: true,
        }
    }

    /// The session id, only when the session is usable.
    pub fn active_id(&self) -> Option<&str> {
        if self.is_initialized {
            self.session_id.as_deref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_session_has_no_active_id() {
        let session = AgentSession::pending();
        assert!(!session.is_initialized);
        assert_eq!(session.active_id(), None);
    }

    #[test]
    fn ready_session_exposes_id() {
        let session = AgentSession::ready("sess-42");
        assert!(session.is_initialized);
        assert_eq!(session.active_id(), Some("sess-42"));
    }
}
