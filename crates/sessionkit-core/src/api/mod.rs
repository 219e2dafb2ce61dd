//! Authenticated HTTP client.
//!
//! This module provides the `ApiClient`, which attaches the session's bearer
//! token to every outbound request and redirects to the login route when the
//! server answers 401. Requests are sent at most once; there is no retry.

pub mod client;
pub mod error;

pub use client::{ApiClient, RequestOptions};
pub use error::ApiError;
