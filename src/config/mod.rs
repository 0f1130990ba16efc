//! Configuration types for the CDEK API SDK.
//!
//! This module provides the core configuration types used to initialize
//! the SDK for API communication with CDEK.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`CdekConfig`]: The main configuration struct holding all SDK settings
//! - [`CdekConfigBuilder`]: A builder for constructing [`CdekConfig`] instances
//! - [`Account`]: A validated integration account newtype
//! - [`SecurePassword`]: A validated integration password with masked debug output
//! - [`ApiUrl`]: A validated API base URL
//!
//! # Example
//!
//! ```rust
//! use cdek_api::{CdekConfig, Account, SecurePassword};
//!
//! let config = CdekConfig::builder()
//!     .account(Account::new("my-account").unwrap())
//!     .secure_password(SecurePassword::new("my-password").unwrap())
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::{Account, ApiUrl, SecurePassword};

use crate::error::ConfigError;

/// Default base URL for the CDEK integration API.
pub const DEFAULT_API_URL: &str = "http://integration.cdek.ru";

/// Default URL for the CDEK shipping cost calculator.
pub const DEFAULT_CALCULATOR_URL: &str =
    "http://api.cdek.ru/calculator/calculate_price_by_json.php";

/// Configuration for the CDEK API SDK.
///
/// This struct holds all configuration needed for SDK operations, including
/// the integration credential pair, endpoint URLs and test-mode flag.
///
/// # Thread Safety
///
/// `CdekConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Example
///
/// ```rust
/// use cdek_api::{CdekConfig, Account, SecurePassword};
///
/// let config = CdekConfig::builder()
///     .account(Account::new("my-account").unwrap())
///     .secure_password(SecurePassword::new("my-password").unwrap())
///     .test_mode(true)
///     .build()
///     .unwrap();
///
/// assert!(config.test_mode());
/// ```
#[derive(Clone, Debug)]
pub struct CdekConfig {
    account: Account,
    secure_password: SecurePassword,
    api_url: ApiUrl,
    calculator_url: ApiUrl,
    test_mode: bool,
    user_agent_prefix: Option<String>,
}

impl CdekConfig {
    /// Creates a new builder for constructing a `CdekConfig`.
    #[must_use]
    pub fn builder() -> CdekConfigBuilder {
        CdekConfigBuilder::new()
    }

    /// Returns the integration account.
    #[must_use]
    pub const fn account(&self) -> &Account {
        &self.account
    }

    /// Returns the integration password.
    #[must_use]
    pub const fn secure_password(&self) -> &SecurePassword {
        &self.secure_password
    }

    /// Returns the integration API base URL.
    #[must_use]
    pub const fn api_url(&self) -> &ApiUrl {
        &self.api_url
    }

    /// Returns the shipping cost calculator URL.
    #[must_use]
    pub const fn calculator_url(&self) -> &ApiUrl {
        &self.calculator_url
    }

    /// Returns whether test mode is enabled.
    ///
    /// In test mode the calculator request is sent without the
    /// account/signature pair, matching the carrier's sandbox behavior.
    #[must_use]
    pub const fn test_mode(&self) -> bool {
        self.test_mode
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify CdekConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CdekConfig>();
};

/// Builder for constructing [`CdekConfig`] instances.
///
/// Required fields are `account` and `secure_password`. All other fields
/// have sensible defaults.
///
/// # Defaults
///
/// - `api_url`: [`DEFAULT_API_URL`]
/// - `calculator_url`: [`DEFAULT_CALCULATOR_URL`]
/// - `test_mode`: `false`
/// - `user_agent_prefix`: `None`
///
/// # Example
///
/// ```rust
/// use cdek_api::{CdekConfig, Account, SecurePassword, ApiUrl};
///
/// let config = CdekConfig::builder()
///     .account(Account::new("my-account").unwrap())
///     .secure_password(SecurePassword::new("my-password").unwrap())
///     .api_url(ApiUrl::new("https://integration.cdek.ru").unwrap())
///     .user_agent_prefix("MyShop/2.0")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct CdekConfigBuilder {
    account: Option<Account>,
    secure_password: Option<SecurePassword>,
    api_url: Option<ApiUrl>,
    calculator_url: Option<ApiUrl>,
    test_mode: Option<bool>,
    user_agent_prefix: Option<String>,
}

impl CdekConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the integration account (required).
    #[must_use]
    pub fn account(mut self, account: Account) -> Self {
        self.account = Some(account);
        self
    }

    /// Sets the integration password (required).
    #[must_use]
    pub fn secure_password(mut self, password: SecurePassword) -> Self {
        self.secure_password = Some(password);
        self
    }

    /// Sets the integration API base URL.
    #[must_use]
    pub fn api_url(mut self, url: ApiUrl) -> Self {
        self.api_url = Some(url);
        self
    }

    /// Sets the shipping cost calculator URL.
    #[must_use]
    pub fn calculator_url(mut self, url: ApiUrl) -> Self {
        self.calculator_url = Some(url);
        self
    }

    /// Sets whether test mode is enabled.
    #[must_use]
    pub const fn test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = Some(test_mode);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`CdekConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `account` or
    /// `secure_password` are not set.
    pub fn build(self) -> Result<CdekConfig, ConfigError> {
        let account = self
            .account
            .ok_or(ConfigError::MissingRequiredField { field: "account" })?;
        let secure_password = self
            .secure_password
            .ok_or(ConfigError::MissingRequiredField {
                field: "secure_password",
            })?;

        let api_url = match self.api_url {
            Some(url) => url,
            None => ApiUrl::new(DEFAULT_API_URL)?,
        };
        let calculator_url = match self.calculator_url {
            Some(url) => url,
            None => ApiUrl::new(DEFAULT_CALCULATOR_URL)?,
        };

        Ok(CdekConfig {
            account,
            secure_password,
            api_url,
            calculator_url,
            test_mode: self.test_mode.unwrap_or(false),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_account() {
        let result = CdekConfigBuilder::new()
            .secure_password(SecurePassword::new("password").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "account" })
        ));
    }

    #[test]
    fn test_builder_requires_secure_password() {
        let result = CdekConfigBuilder::new()
            .account(Account::new("account").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField {
                field: "secure_password"
            })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = CdekConfig::builder()
            .account(Account::new("account").unwrap())
            .secure_password(SecurePassword::new("password").unwrap())
            .build()
            .unwrap();

        assert_eq!(config.api_url().as_ref(), DEFAULT_API_URL);
        assert_eq!(config.calculator_url().as_ref(), DEFAULT_CALCULATOR_URL);
        assert!(!config.test_mode());
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let api_url = ApiUrl::new("https://integration.example.com").unwrap();
        let calculator_url = ApiUrl::new("https://calc.example.com/price").unwrap();

        let config = CdekConfig::builder()
            .account(Account::new("account").unwrap())
            .secure_password(SecurePassword::new("password").unwrap())
            .api_url(api_url.clone())
            .calculator_url(calculator_url.clone())
            .test_mode(true)
            .user_agent_prefix("MyShop/2.0")
            .build()
            .unwrap();

        assert_eq!(config.api_url(), &api_url);
        assert_eq!(config.calculator_url(), &calculator_url);
        assert!(config.test_mode());
        assert_eq!(config.user_agent_prefix(), Some("MyShop/2.0"));
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CdekConfig>();
    }

    #[test]
    fn test_config_debug_masks_password() {
        let config = CdekConfig::builder()
            .account(Account::new("account").unwrap())
            .secure_password(SecurePassword::new("password").unwrap())
            .build()
            .unwrap();

        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("CdekConfig"));
        assert!(debug_str.contains("SecurePassword(*****)"));
    }
}
