//! Staff console JSON API.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, ListRequestsQuery, ReplyRequest, RequestResponse, UpdateStatusRequest};
pub use handlers::{health, ConsoleHandlers};
pub use routes::console_routes;
