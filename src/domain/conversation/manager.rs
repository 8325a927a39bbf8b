//! Contact-a-manager flow: `MESSAGE → CONFIRM`, where "edit" re-enters
//! `MESSAGE` directly.

use crate::domain::request::{RequestDetails, RequestKind};

use super::action::Action;
use super::events::UserEvent;
use super::keyboard::Keyboard;
use super::labels::QuickReply;
use super::session::{ConversationSession, ManagerDraft, ManagerStep};
use super::texts;
use super::transition::{Outcome, Reply, Transition};
use super::validators::{validate_min_length, MIN_FREE_TEXT_LEN};

pub fn start() -> Transition {
    Transition::stay(
        session(ManagerStep::Message, ManagerDraft::default()),
        Reply::new(texts::MANAGER_INTRO, Keyboard::Cancel),
    )
    .with_event(UserEvent::ManagerContactClicked)
}

pub fn advance(step: ManagerStep, draft: ManagerDraft, action: &Action) -> Transition {
    if action.is_cancel() {
        return Transition::new(
            Outcome::Cancelled,
            vec![Reply::new(texts::CANCELLED, Keyboard::MainMenu)],
        )
        .with_event(UserEvent::RequestCancelled {
            kind: RequestKind::Manager,
        });
    }

    match step {
        ManagerStep::Message => enter_message(draft, action),
        ManagerStep::Confirm => confirm(draft, action),
    }
}

fn enter_message(mut draft: ManagerDraft, action: &Action) -> Transition {
    let accepted = match action {
        Action::Text(text) if action.quick_reply().is_none() => {
            validate_min_length("message", text, MIN_FREE_TEXT_LEN).ok()
        }
        _ => None,
    };

    match accepted {
        Some(message) => {
            draft.message = Some(message);
            show_summary(draft)
        }
        None => Transition::stay(
            session(ManagerStep::Message, draft),
            Reply::new(texts::MESSAGE_TOO_SHORT, Keyboard::Cancel),
        ),
    }
}

fn confirm(draft: ManagerDraft, action: &Action) -> Transition {
    match action.quick_reply() {
        Some(QuickReply::ConfirmSend) => match draft.finalize() {
            Some(details) => {
                Transition::new(Outcome::Submit(RequestDetails::Manager(details)), vec![])
            }
            None => Transition::stay(
                session(ManagerStep::Message, draft),
                Reply::new(texts::MANAGER_INTRO, Keyboard::Cancel),
            ),
        },
        Some(QuickReply::Edit) => Transition::stay(
            session(ManagerStep::Message, draft),
            Reply::new(texts::MANAGER_EDIT, Keyboard::Cancel),
        ),
        _ => show_summary(draft),
    }
}

fn show_summary(draft: ManagerDraft) -> Transition {
    let summary = texts::manager_summary(&draft);
    Transition::stay(
        session(ManagerStep::Confirm, draft),
        Reply::new(summary, Keyboard::Confirm),
    )
}

fn session(step: ManagerStep, draft: ManagerDraft) -> ConversationSession {
    ConversationSession::Manager { step, draft }
}
