//! Staff console handlers: queries, status changes, and reply relay.

mod reply_to_request;
mod request_queries;
mod update_request_status;

pub use reply_to_request::{ReplyError, ReplyOutcome, ReplyToRequestCommand, ReplyToRequestHandler};
pub use request_queries::{GetRequestHandler, ListRequestsHandler, MAX_LIST_LIMIT};
pub use update_request_status::{
    StatusUpdateError, UpdateRequestStatusCommand, UpdateRequestStatusHandler,
};
