//! User identity domain module.
//!
//! The durable user record keyed by Telegram id, its access status
//! lifecycle, and the contact snapshot copied into submitted requests.

mod identity;
mod status;

pub use identity::{
    ConsentRecord, RegistrationGate, SenderProfile, UserIdentity, UserSnapshot, CONSENT_VERSION,
};
pub use status::UserStatus;
