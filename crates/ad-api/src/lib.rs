//! ad-api: HTTP surface of the ad publishing gateway
//!
//! One operation — submit ad — plus a health probe and static serving of
//! the captured completion screenshots.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

pub use error::{ApiError, Result};
pub use server::{start_server, AppState};
