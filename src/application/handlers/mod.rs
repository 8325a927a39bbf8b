//! Application handlers.
//!
//! - `chat` - inbound chat actions: dispatch, registration, request commits
//! - `console` - staff console commands and queries

pub mod chat;
pub mod console;

pub use chat::{
    ChatLocks, CompleteRegistrationHandler, DispatchError, Dispatcher, InboundUpdate,
    RegistrationError, StartOutcome, StartRegistrationHandler, SubmitError, SubmitRequestCommand,
    SubmitRequestHandler,
};
pub use console::{
    GetRequestHandler, ListRequestsHandler, ReplyError, ReplyOutcome, ReplyToRequestCommand,
    ReplyToRequestHandler, StatusUpdateError, UpdateRequestStatusCommand,
    UpdateRequestStatusHandler, MAX_LIST_LIMIT,
};
