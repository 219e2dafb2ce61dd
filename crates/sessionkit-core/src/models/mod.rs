//! Data models for the session API.
//!
//! - `User`, `UserId`: the profile returned by the auth endpoints
//! - `Credentials`, `LoginResponse`, `ProfileResponse`: request/response bodies

pub mod auth;
pub mod user;

pub use auth::{Credentials, LoginResponse, ProfileResponse};
pub use user::{User, UserId};
