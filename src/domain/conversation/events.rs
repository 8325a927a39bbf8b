//! User activity events written to the event log.

use serde_json::{json, Value};

use crate::domain::foundation::RequestId;
use crate::domain::request::RequestKind;

/// A notable user action. Persisted as `(event_type, event_data)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {
    BotStart,
    AgeConfirmed,
    AgeFailed,
    ConsentAccepted { version: String },
    ConsentDeclined,
    PhoneCaptured,
    TransferRequested,
    ManagerContactClicked,
    TransferRequestSubmitted {
        request_id: RequestId,
        address: String,
        guests: u8,
    },
    ManagerRequestSubmitted {
        request_id: RequestId,
        message_length: usize,
    },
    RequestCancelled { kind: RequestKind },
    MenuOpened,
    RulesOpened,
}

impl UserEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            UserEvent::BotStart => "bot_start",
            UserEvent::AgeConfirmed => "age_confirmed",
            UserEvent::AgeFailed => "age_failed",
            UserEvent::ConsentAccepted { .. } => "consent_accepted",
            UserEvent::ConsentDeclined => "consent_declined",
            UserEvent::PhoneCaptured => "phone_captured",
            UserEvent::TransferRequested => "transfer_requested",
            UserEvent::ManagerContactClicked => "manager_contact_clicked",
            UserEvent::TransferRequestSubmitted { .. } => "transfer_request_submitted",
            UserEvent::ManagerRequestSubmitted { .. } => "manager_request_submitted",
            UserEvent::RequestCancelled { .. } => "request_cancelled",
            UserEvent::MenuOpened => "menu_opened",
            UserEvent::RulesOpened => "rules_opened",
        }
    }

    /// JSON payload stored in `event_data`.
    pub fn data(&self) -> Value {
        match self {
            UserEvent::ConsentAccepted { version } => json!({ "version": version }),
            UserEvent::TransferRequestSubmitted {
                request_id,
                address,
                guests,
            } => json!({
                "request_id": request_id.value(),
                "address": address,
                "guests": guests,
            }),
            UserEvent::ManagerRequestSubmitted {
                request_id,
                message_length,
            } => json!({
                "request_id": request_id.value(),
                "message_length": message_length,
            }),
            UserEvent::RequestCancelled { kind } => json!({ "kind": kind.as_str() }),
            _ => json!({}),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submitted_event_carries_request_id() {
        let event = UserEvent::TransferRequestSubmitted {
            request_id: RequestId::new(9),
            address: "Lenina 10".to_string(),
            guests: 3,
        };
        assert_eq!(event.event_type(), "transfer_request_submitted");
        assert_eq!(
            event.data(),
            json!({"request_id": 9, "address": "Lenina 10", "guests": 3})
        );
    }

    #[test]
    fn plain_events_have_empty_data() {
        assert_eq!(UserEvent::MenuOpened.data(), json!({}));
        assert_eq!(UserEvent::BotStart.event_type(), "bot_start");
    }

    #[test]
    fn cancellation_records_kind() {
        let event = UserEvent::RequestCancelled {
            kind: RequestKind::Manager,
        };
        assert_eq!(event.data(), json!({"kind": "manager"}));
    }
}
