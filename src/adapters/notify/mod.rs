//! Staff notification adapters.

mod staff;

pub use staff::StaffNotifier;
