//! Utility functions for form validation and string formatting.

pub mod format;
pub mod validators;

// Re-export commonly used functions at module level
pub use format::{format_date, truncate};
pub use validators::{is_strong_password, is_valid_email, is_valid_phone};
