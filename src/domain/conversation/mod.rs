//! Conversation domain module.
//!
//! The request-intake and registration state machines. Each flow is a pure
//! function from `(step, draft, action)` to a [`Transition`]: the next
//! session (or a terminal outcome), the replies to send and the events to
//! log. Persistence and delivery are left to the application layer.

mod action;
mod events;
mod keyboard;
mod labels;
mod session;
mod transition;

pub mod manager;
pub mod registration;
pub mod texts;
pub mod transfer;
pub mod validators;

pub use action::{Action, ContactShare};
pub use events::UserEvent;
pub use keyboard::Keyboard;
pub use labels::QuickReply;
pub use session::{
    ConversationSession, ManagerDraft, ManagerStep, RegistrationStep, TransferDraft,
    TransferField, TransferStep,
};
pub use transition::{Outcome, Rejection, Reply, Transition};
pub use validators::{validate_date, validate_guest_count, validate_time};
