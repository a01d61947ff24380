//! Uber Ads domain layer.
//!
//! - [`types`] — entities returned by the API and listing options
//! - [`args`] — validated tool-argument records
//! - [`client`] — the HTTP client performing the actual API calls
//! - [`error`] — error types for API and validation failures

pub mod args;
pub mod client;
pub mod error;
pub mod types;

pub use client::UberAdsClient;
pub use error::{AdsError, AdsResult, ValidationError};
