//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// A validated CDEK integration account.
///
/// This newtype ensures the account is non-empty and provides type safety
/// to prevent accidental misuse of raw strings.
///
/// # Example
///
/// ```rust
/// use cdek_api::Account;
///
/// let account = Account::new("my-account").unwrap();
/// assert_eq!(account.as_ref(), "my-account");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account(String);

impl Account {
    /// Creates a new validated account.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAccount`] if the account is empty.
    pub fn new(account: impl Into<String>) -> Result<Self, ConfigError> {
        let account = account.into();
        if account.is_empty() {
            return Err(ConfigError::EmptyAccount);
        }
        Ok(Self(account))
    }
}

impl AsRef<str> for Account {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated CDEK integration password.
///
/// This newtype ensures the password is non-empty and masks its value
/// in debug output to prevent accidental exposure in logs.
///
/// # Security
///
/// The `Debug` implementation masks the secret value, displaying only
/// `SecurePassword(*****)` instead of the actual password.
///
/// # Example
///
/// ```rust
/// use cdek_api::SecurePassword;
///
/// let password = SecurePassword::new("my-password").unwrap();
/// assert_eq!(format!("{:?}", password), "SecurePassword(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SecurePassword(String);

impl SecurePassword {
    /// Creates a new validated password.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptySecurePassword`] if the password is empty.
    pub fn new(password: impl Into<String>) -> Result<Self, ConfigError> {
        let password = password.into();
        if password.is_empty() {
            return Err(ConfigError::EmptySecurePassword);
        }
        Ok(Self(password))
    }
}

impl AsRef<str> for SecurePassword {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecurePassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecurePassword(*****)")
    }
}

/// A validated API base URL.
///
/// The URL must carry an `http://` or `https://` scheme. Trailing slashes
/// are stripped so paths can be appended with a single `/` separator.
///
/// # Example
///
/// ```rust
/// use cdek_api::ApiUrl;
///
/// let url = ApiUrl::new("https://integration.cdek.ru/").unwrap();
/// assert_eq!(url.as_ref(), "https://integration.cdek.ru");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiUrl(String);

impl ApiUrl {
    /// Creates a new validated API URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiUrl`] if the URL does not start
    /// with an `http://` or `https://` scheme or has an empty host part.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"));

        match rest {
            Some(host) if !host.is_empty() => Ok(Self(url)),
            _ => Err(ConfigError::InvalidApiUrl { url }),
        }
    }
}

impl AsRef<str> for ApiUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_accepts_non_empty() {
        let account = Account::new("integration-login").unwrap();
        assert_eq!(account.as_ref(), "integration-login");
    }

    #[test]
    fn test_account_rejects_empty() {
        assert!(matches!(Account::new(""), Err(ConfigError::EmptyAccount)));
    }

    #[test]
    fn test_secure_password_rejects_empty() {
        assert!(matches!(
            SecurePassword::new(""),
            Err(ConfigError::EmptySecurePassword)
        ));
    }

    #[test]
    fn test_secure_password_debug_is_masked() {
        let password = SecurePassword::new("super-secret").unwrap();
        let debug = format!("{password:?}");
        assert_eq!(debug, "SecurePassword(*****)");
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_api_url_strips_trailing_slashes() {
        let url = ApiUrl::new("http://integration.cdek.ru//").unwrap();
        assert_eq!(url.as_ref(), "http://integration.cdek.ru");
    }

    #[test]
    fn test_api_url_accepts_https() {
        let url = ApiUrl::new("https://integration.cdek.ru").unwrap();
        assert_eq!(url.as_ref(), "https://integration.cdek.ru");
    }

    #[test]
    fn test_api_url_rejects_missing_scheme() {
        assert!(matches!(
            ApiUrl::new("integration.cdek.ru"),
            Err(ConfigError::InvalidApiUrl { .. })
        ));
    }

    #[test]
    fn test_api_url_rejects_scheme_only() {
        assert!(matches!(
            ApiUrl::new("https://"),
            Err(ConfigError::InvalidApiUrl { .. })
        ));
    }
}
