//! ad-wizard: the ad-posting workflow
//!
//! Drives one browser session through the classifieds site's posting
//! wizard in a fixed forward order: login, start listing, select plan,
//! vehicle details, description and images, contact info, publish. Steps
//! never retry and never move backward; the first failure aborts the run
//! and the session's browser is closed on every exit path.

pub mod error;
pub mod steps;
pub mod workflow;

pub use error::{Result, WizardError};
pub use workflow::publish_ad;
