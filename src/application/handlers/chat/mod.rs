//! Chat-side handlers: dispatch, registration, and request commits.

mod chat_locks;
mod dispatcher;
mod registration;
mod submit_request;

pub use chat_locks::ChatLocks;
pub use dispatcher::{DispatchError, Dispatcher, InboundUpdate};
pub use registration::{
    CompleteRegistrationHandler, RegistrationError, StartOutcome, StartRegistrationHandler,
};
pub use submit_request::{SubmitError, SubmitRequestCommand, SubmitRequestHandler};
