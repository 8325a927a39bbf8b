//! PostgreSQL adapters - repository ports over the tables shared with the
//! staff console.
//!
//! - `PostgresUserRepository` - user identities (`barsuk_app_telegramuser`)
//! - `PostgresRequestRepository` - submitted requests (`barsuk_app_request`)
//! - `PostgresEventLog` - user events (`barsuk_app_event`)
//! - `PostgresContentReader` - menu content (`barsuk_app_content*`)

mod content;
mod events;
mod requests;
mod users;

pub use content::PostgresContentReader;
pub use events::PostgresEventLog;
pub use requests::PostgresRequestRepository;
pub use users::PostgresUserRepository;
