//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - repositories over the tables shared with the staff console
//! - `memory` - in-memory repositories for tests and local runs
//! - `session` - conversation session stores (in-memory, Redis)
//! - `telegram` - Bot API client and webhook
//! - `notify` - staff notification fan-out
//! - `http` - staff console API

pub mod http;
pub mod memory;
pub mod notify;
pub mod postgres;
pub mod session;
pub mod telegram;
