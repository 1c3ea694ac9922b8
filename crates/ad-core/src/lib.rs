//! ad-core: Vehicle Ad Gateway Core Library
//!
//! Shared types for the ad publishing gateway: configuration, the
//! label/value field table driving the posting wizard, the inbound ad
//! request, and the core error type.

pub mod config;
pub mod error;
pub mod fields;
pub mod request;

pub use config::{
    ApiConfig, ArtifactConfig, BrowserSettings, Config, Credentials, ImageConfig, RetrySettings,
    SiteConfig,
};
pub use error::{Error, Result};
pub use fields::{normalize, DropdownField, FieldTable, InputField, MatchMode};
pub use request::AdRequest;
