//! Service request domain module.
//!
//! A request is created once, at commit time, with status `new`. From then
//! on only staff change its status and notes.

mod aggregate;
mod payload;
mod status;

pub use aggregate::{NewRequest, SubmittedRequest};
pub use payload::{
    ManagerDetails, RequestDetails, RequestKind, RequestPayload, TransferDetails,
};
pub use status::RequestStatus;
