//! Application layer - handlers that orchestrate domain operations over ports.
//!
//! Flow logic stays in the domain as pure functions; handlers here perform
//! the effects around them (persistence, notification, delivery).

pub mod handlers;

pub use handlers::{
    DispatchError, Dispatcher, GetRequestHandler, InboundUpdate, ListRequestsHandler,
    ReplyToRequestHandler, UpdateRequestStatusHandler,
};
