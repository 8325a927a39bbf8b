//! Barsuk Bot - concierge chat bot for a venue
//!
//! Guides Telegram users through age-gated registration, collects transfer
//! and manager requests, and exposes a console API staff use to process them.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
