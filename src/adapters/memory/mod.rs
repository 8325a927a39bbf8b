//! In-memory adapters.
//!
//! Used by tests and by local development runs without Postgres.

mod content;
mod events;
mod messenger;
mod requests;
mod users;

pub use content::StaticContentReader;
pub use events::InMemoryEventLog;
pub use messenger::RecordingMessenger;
pub use requests::InMemoryRequestRepository;
pub use users::InMemoryUserRepository;
