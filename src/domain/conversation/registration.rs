//! Registration flow: `AGE_CONFIRM → CONSENT → PHONE`.
//!
//! Identity lookup and the final write happen in the application layer;
//! this module only decides the next step.

use crate::domain::foundation::TelegramId;
use crate::domain::user::CONSENT_VERSION;

use super::action::Action;
use super::events::UserEvent;
use super::keyboard::Keyboard;
use super::labels::QuickReply;
use super::session::{ConversationSession, RegistrationStep};
use super::texts;
use super::transition::{Outcome, Rejection, Reply, Transition};

pub fn begin() -> Transition {
    prompt(RegistrationStep::AgeConfirm)
}

/// Advances registration. `sender` is used to check contact ownership.
pub fn advance(step: RegistrationStep, action: &Action, sender: TelegramId) -> Transition {
    match (step, action) {
        (RegistrationStep::AgeConfirm, _) => match action.quick_reply() {
            Some(QuickReply::AgeConfirm) => {
                prompt(RegistrationStep::Consent).with_event(UserEvent::AgeConfirmed)
            }
            Some(QuickReply::AgeDeny) => Transition::new(
                Outcome::Rejected(Rejection::Underage),
                vec![Reply::new(texts::AGE_REJECTED, Keyboard::Remove)],
            )
            .with_event(UserEvent::AgeFailed),
            _ => prompt(step),
        },
        (RegistrationStep::Consent, _) => match action.quick_reply() {
            Some(QuickReply::ConsentAccept) => {
                prompt(RegistrationStep::Phone).with_event(UserEvent::ConsentAccepted {
                    version: CONSENT_VERSION.to_string(),
                })
            }
            Some(QuickReply::ConsentDecline) => Transition::new(
                Outcome::Rejected(Rejection::ConsentDeclined),
                vec![Reply::new(texts::CONSENT_REJECTED, Keyboard::Remove)],
            )
            .with_event(UserEvent::ConsentDeclined),
            _ => prompt(step),
        },
        (RegistrationStep::Phone, Action::Contact(contact)) => {
            if contact.belongs_to(sender) && !contact.phone_number.trim().is_empty() {
                Transition::new(
                    Outcome::Activate {
                        phone: contact.phone_number.trim().to_string(),
                    },
                    vec![],
                )
                .with_event(UserEvent::PhoneCaptured)
            } else {
                Transition::stay(
                    session(RegistrationStep::Phone),
                    Reply::new(texts::PHONE_NOT_OWN, Keyboard::Phone),
                )
            }
        }
        (RegistrationStep::Phone, _) => prompt(step),
    }
}

fn prompt(step: RegistrationStep) -> Transition {
    let reply = match step {
        RegistrationStep::AgeConfirm => Reply::new(texts::AGE_PROMPT, Keyboard::Age),
        RegistrationStep::Consent => Reply::new(texts::CONSENT_PROMPT, Keyboard::Consent),
        RegistrationStep::Phone => Reply::new(texts::PHONE_PROMPT, Keyboard::Phone),
    };
    Transition::stay(session(step), reply)
}

fn session(step: RegistrationStep) -> ConversationSession {
    ConversationSession::Registration { step }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::action::ContactShare;

    const SENDER: TelegramId = TelegramId::new(1001);

    fn label(reply: QuickReply) -> Action {
        Action::Text(reply.label().to_string())
    }

    fn step_of(t: &Transition) -> RegistrationStep {
        match &t.outcome {
            Outcome::Continue(ConversationSession::Registration { step }) => *step,
            other => panic!("expected registration continue, got {:?}", other),
        }
    }

    fn contact(owner: Option<TelegramId>) -> Action {
        Action::Contact(ContactShare {
            phone_number: " +79001234567 ".to_string(),
            owner,
        })
    }

    #[test]
    fn begins_with_age_question() {
        let t = begin();
        assert_eq!(step_of(&t), RegistrationStep::AgeConfirm);
        assert_eq!(t.replies[0].keyboard, Keyboard::Age);
    }

    #[test]
    fn age_confirm_moves_to_consent() {
        let t = advance(RegistrationStep::AgeConfirm, &label(QuickReply::AgeConfirm), SENDER);
        assert_eq!(step_of(&t), RegistrationStep::Consent);
        assert_eq!(t.events, vec![UserEvent::AgeConfirmed]);
    }

    #[test]
    fn age_deny_rejects() {
        let t = advance(RegistrationStep::AgeConfirm, &label(QuickReply::AgeDeny), SENDER);
        assert_eq!(t.outcome, Outcome::Rejected(Rejection::Underage));
        assert_eq!(t.events, vec![UserEvent::AgeFailed]);
        assert!(t.outcome.ends_flow());
    }

    #[test]
    fn consent_accept_moves_to_phone_and_records_version() {
        let t = advance(RegistrationStep::Consent, &label(QuickReply::ConsentAccept), SENDER);
        assert_eq!(step_of(&t), RegistrationStep::Phone);
        assert_eq!(t.replies[0].keyboard, Keyboard::Phone);
        assert_eq!(
            t.events,
            vec![UserEvent::ConsentAccepted {
                version: "1.0".to_string()
            }]
        );
    }

    #[test]
    fn consent_decline_rejects() {
        let t = advance(RegistrationStep::Consent, &label(QuickReply::ConsentDecline), SENDER);
        assert_eq!(t.outcome, Outcome::Rejected(Rejection::ConsentDeclined));
    }

    #[test]
    fn own_contact_activates() {
        let t = advance(RegistrationStep::Phone, &contact(Some(SENDER)), SENDER);
        assert_eq!(
            t.outcome,
            Outcome::Activate {
                phone: "+79001234567".to_string()
            }
        );
        assert_eq!(t.events, vec![UserEvent::PhoneCaptured]);
    }

    #[test]
    fn foreign_contact_is_refused() {
        let t = advance(
            RegistrationStep::Phone,
            &contact(Some(TelegramId::new(42))),
            SENDER,
        );
        assert_eq!(step_of(&t), RegistrationStep::Phone);
        assert_eq!(t.replies[0].text, texts::PHONE_NOT_OWN);
    }

    #[test]
    fn typed_phone_number_is_not_accepted() {
        let t = advance(
            RegistrationStep::Phone,
            &Action::Text("+79001234567".to_string()),
            SENDER,
        );
        assert_eq!(step_of(&t), RegistrationStep::Phone);
        assert_eq!(t.replies[0].text, texts::PHONE_PROMPT);
    }

    #[test]
    fn unrecognized_input_redisplays_options() {
        for step in [RegistrationStep::AgeConfirm, RegistrationStep::Consent] {
            let t = advance(step, &Action::Text("what?".to_string()), SENDER);
            assert_eq!(step_of(&t), step);
            assert!(t.events.is_empty());
        }
    }
}
