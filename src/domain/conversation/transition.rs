//! Result type shared by the pure flow functions.

use crate::domain::request::RequestDetails;

use super::events::UserEvent;
use super::keyboard::Keyboard;
use super::session::ConversationSession;

/// One outgoing bot message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Reply {
    pub fn new(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }
}

/// Why a registration ended without access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Underage,
    ConsentDeclined,
}

/// Where a flow goes after one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Stay in a flow with this session.
    Continue(ConversationSession),
    /// The user confirmed; persist these details.
    Submit(RequestDetails),
    /// The user shared their own phone; complete registration.
    Activate { phone: String },
    /// The user cancelled; nothing is persisted.
    Cancelled,
    /// Registration ended without access.
    Rejected(Rejection),
}

impl Outcome {
    /// True when the session must be cleared.
    pub fn ends_flow(&self) -> bool {
        matches!(self, Outcome::Cancelled | Outcome::Rejected(_))
    }
}

/// Output of one step: next position, messages to send, events to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub outcome: Outcome,
    pub replies: Vec<Reply>,
    pub events: Vec<UserEvent>,
}

impl Transition {
    pub fn stay(session: ConversationSession, reply: Reply) -> Self {
        Self {
            outcome: Outcome::Continue(session),
            replies: vec![reply],
            events: vec![],
        }
    }

    pub fn new(outcome: Outcome, replies: Vec<Reply>) -> Self {
        Self {
            outcome,
            replies,
            events: vec![],
        }
    }

    pub fn with_event(mut self, event: UserEvent) -> Self {
        self.events.push(event);
        self
    }
}
