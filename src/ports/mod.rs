//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `UserRepository` - User identities keyed by Telegram id
//! - `RequestRepository` - Submitted requests (bot writes, console updates)
//! - `EventLog` - Append-only user activity log
//! - `ContentReader` - Menu categories and items
//!
//! ## Conversation Ports
//!
//! - `SessionStore` - Ephemeral per-chat flow state
//!
//! ## Delivery Ports
//!
//! - `Messenger` - Send a message to a chat
//! - `RequestNotifier` - Announce new requests to staff

mod content_reader;
mod event_log;
mod messenger;
mod request_notifier;
mod request_repository;
mod session_store;
mod user_repository;

pub use content_reader::ContentReader;
pub use event_log::EventLog;
pub use messenger::{DeliveryError, Messenger};
pub use request_notifier::{NotificationReport, RequestNotifier};
pub use request_repository::{RequestFilter, RequestRepository};
pub use session_store::{SessionStore, SessionStoreError};
pub use user_repository::UserRepository;
