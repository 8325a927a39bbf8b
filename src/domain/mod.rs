//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine trait)
//! - `user` - User identity and access status lifecycle
//! - `request` - Submitted service requests and their status lifecycle
//! - `content` - Menu categories and items shown to users
//! - `conversation` - Registration and request-intake flows

pub mod content;
pub mod conversation;
pub mod foundation;
pub mod request;
pub mod user;
