//! Core error types shared by the library and the CLI.

pub mod error;

pub use error::{ErrorContext, GraftError, user_friendly_error};
