//! Error types for the CDEK API SDK.
//!
//! This module contains error types used throughout the SDK for configuration
//! and validation errors.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use cdek_api::{Account, ConfigError};
//!
//! let result = Account::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyAccount)));
//! ```

use thiserror::Error;

/// Errors that can occur during SDK configuration.
///
/// This enum represents all possible errors that can occur when creating
/// or validating configuration types. Each variant provides a clear,
/// actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Account cannot be empty.
    #[error("Account cannot be empty. Please provide a valid CDEK integration account.")]
    EmptyAccount,

    /// Secure password cannot be empty.
    #[error("Secure password cannot be empty. Please provide a valid CDEK integration password.")]
    EmptySecurePassword,

    /// API URL is invalid.
    #[error("Invalid API URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://integration.cdek.ru').")]
    InvalidApiUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
