//! Transfer booking flow.
//!
//! `ADDRESS → DATE → TIME → GUESTS → COMMENT → CONFIRM ⇄ EDIT`, ending in a
//! submit or a cancel. Editing one field from `EDIT` goes back to `CONFIRM`
//! as soon as the new value is valid.

use crate::domain::foundation::ValidationError;
use crate::domain::request::{RequestDetails, RequestKind};

use super::action::Action;
use super::events::UserEvent;
use super::keyboard::Keyboard;
use super::labels::QuickReply;
use super::session::{ConversationSession, TransferDraft, TransferField, TransferStep};
use super::texts;
use super::transition::{Outcome, Reply, Transition};
use super::validators::{
    validate_date, validate_guest_count, validate_min_length, validate_time, MIN_FREE_TEXT_LEN,
};

/// Opens the flow at the address step.
pub fn start() -> Transition {
    let session = session(TransferStep::Entering(TransferField::Address), TransferDraft::default());
    Transition::stay(session, Reply::new(texts::TRANSFER_INTRO, Keyboard::Cancel))
        .with_event(UserEvent::TransferRequested)
}

/// Advances the flow by one action.
pub fn advance(step: TransferStep, draft: TransferDraft, action: &Action) -> Transition {
    if action.is_cancel() {
        return cancelled();
    }

    match step {
        TransferStep::Entering(field) | TransferStep::Revising(field) => {
            enter_field(step, field, draft, action)
        }
        TransferStep::Confirm => confirm(draft, action),
        TransferStep::Edit => edit(draft, action),
    }
}

fn enter_field(
    step: TransferStep,
    field: TransferField,
    mut draft: TransferDraft,
    action: &Action,
) -> Transition {
    let text = match action {
        Action::Text(text) => text,
        _ => return reprompt(step, field, draft),
    };

    if apply_field(&mut draft, field, text, action.quick_reply()).is_err() {
        let error = texts::field_error(field);
        return Transition::stay(session(step, draft), Reply::new(error, keyboard_for(field)));
    }

    match step {
        TransferStep::Entering(_) => match field.next() {
            Some(next) => Transition::stay(
                session(TransferStep::Entering(next), draft),
                Reply::new(texts::field_prompt(next), keyboard_for(next)),
            ),
            None => show_summary(draft),
        },
        _ => show_summary(draft),
    }
}

/// Validates `text` for `field` and stores it. The draft is untouched on error.
fn apply_field(
    draft: &mut TransferDraft,
    field: TransferField,
    text: &str,
    quick_reply: Option<QuickReply>,
) -> Result<(), ValidationError> {
    match field {
        TransferField::Address => {
            if quick_reply.is_some() {
                return Err(ValidationError::invalid_format("address", "button label"));
            }
            draft.address = Some(validate_min_length("address", text, MIN_FREE_TEXT_LEN)?);
        }
        TransferField::Date => {
            if !validate_date(text) {
                return Err(ValidationError::invalid_format("date", "expected today, tomorrow or DD.MM"));
            }
            draft.date = Some(text.trim().to_lowercase());
        }
        TransferField::Time => {
            if !validate_time(text) {
                return Err(ValidationError::invalid_format("time", "expected HH:MM"));
            }
            draft.time = Some(text.trim().to_string());
        }
        TransferField::Guests => {
            draft.guests = Some(validate_guest_count(text)?);
        }
        TransferField::Comment => {
            let comment = match quick_reply {
                Some(QuickReply::SkipComment) => String::new(),
                Some(_) => {
                    return Err(ValidationError::invalid_format("comment", "button label"));
                }
                None => text.trim().to_string(),
            };
            draft.comment = Some(comment);
        }
    }
    Ok(())
}

fn confirm(draft: TransferDraft, action: &Action) -> Transition {
    match action.quick_reply() {
        Some(QuickReply::ConfirmSend) => match draft.finalize() {
            Some(details) => Transition::new(Outcome::Submit(RequestDetails::Transfer(details)), vec![]),
            None => resume_missing(draft),
        },
        Some(QuickReply::Edit) => Transition::stay(
            session(TransferStep::Edit, draft),
            Reply::new(texts::EDIT_MENU, Keyboard::EditFields),
        ),
        _ => show_summary(draft),
    }
}

fn edit(draft: TransferDraft, action: &Action) -> Transition {
    match action.quick_reply() {
        Some(QuickReply::EditField(field)) => Transition::stay(
            session(TransferStep::Revising(field), draft),
            Reply::new(texts::revise_prompt(field), keyboard_for(field)),
        ),
        Some(QuickReply::AllCorrect) => show_summary(draft),
        _ => Transition::stay(
            session(TransferStep::Edit, draft),
            Reply::new(texts::EDIT_MENU, Keyboard::EditFields),
        ),
    }
}

fn show_summary(draft: TransferDraft) -> Transition {
    if draft.first_missing().is_some() {
        return resume_missing(draft);
    }
    let summary = texts::transfer_summary(&draft);
    Transition::stay(
        session(TransferStep::Confirm, draft),
        Reply::new(summary, Keyboard::Confirm),
    )
}

/// Sends the user back to the first required field that is still empty.
fn resume_missing(draft: TransferDraft) -> Transition {
    let field = draft.first_missing().unwrap_or(TransferField::Address);
    Transition::stay(
        session(TransferStep::Entering(field), draft),
        Reply::new(texts::field_prompt(field), keyboard_for(field)),
    )
}

fn reprompt(step: TransferStep, field: TransferField, draft: TransferDraft) -> Transition {
    let prompt = match step {
        TransferStep::Revising(_) => texts::revise_prompt(field),
        _ => texts::field_prompt(field),
    };
    Transition::stay(session(step, draft), Reply::new(prompt, keyboard_for(field)))
}

fn cancelled() -> Transition {
    Transition::new(
        Outcome::Cancelled,
        vec![Reply::new(texts::CANCELLED, Keyboard::MainMenu)],
    )
    .with_event(UserEvent::RequestCancelled {
        kind: RequestKind::Transfer,
    })
}

fn keyboard_for(field: TransferField) -> Keyboard {
    match field {
        TransferField::Comment => Keyboard::Comment,
        _ => Keyboard::Cancel,
    }
}

fn session(step: TransferStep, draft: TransferDraft) -> ConversationSession {
    ConversationSession::Transfer { step, draft }
}
