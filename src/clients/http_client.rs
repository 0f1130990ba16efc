//! HTTP transport for CDEK API communication.
//!
//! This module provides the [`HttpClient`] type, a narrow wrapper over
//! `reqwest` exposing exactly the request shapes the carrier endpoints
//! need: GET with query parameters, form-encoded POST returning raw bytes,
//! and JSON POST to an absolute URL. Higher layers own serialization and
//! reply interpretation; this layer owns headers, timeouts and status
//! checking. It performs no retries.

use std::collections::HashMap;
use std::time::Duration;

use crate::clients::errors::HttpError;
use crate::config::CdekConfig;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the CDEK API.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Base URL of the integration API (e.g., `http://integration.cdek.ru`).
    base_url: String,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client for the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS initialization failure).
    #[must_use]
    pub fn new(config: &CdekConfig) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}CDEK API Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.api_url().as_ref().to_string(),
            default_headers,
        }
    }

    /// Returns the base URL for this client.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends a GET request to a path of the integration API and parses the
    /// JSON reply.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] on transport failure and
    /// [`HttpError::Status`] for non-success status codes.
    pub async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
        timeout: Option<Duration>,
    ) -> Result<serde_json::Value, HttpError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(url = %url, "Sending GET request to CDEK API");

        let mut builder = self.client.get(&url).query(query);
        for (name, value) in &self.default_headers {
            builder = builder.header(name, value);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Sends a form-encoded POST to a path of the integration API and
    /// returns the raw reply bytes.
    ///
    /// The reply may be an XML document or a binary document (printed
    /// forms); interpretation is left to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] on transport failure and
    /// [`HttpError::Status`] for non-success status codes.
    pub async fn post_form(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<Vec<u8>, HttpError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(url = %url, "Sending POST request to CDEK API");

        let mut builder = self.client.post(&url).form(form);
        for (name, value) in &self.default_headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Sends a JSON POST to an absolute URL and parses the JSON reply.
    ///
    /// Used for the shipping cost calculator, which lives on a different
    /// host than the integration API.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] on transport failure and
    /// [`HttpError::Status`] for non-success status codes.
    pub async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        timeout: Option<Duration>,
    ) -> Result<serde_json::Value, HttpError> {
        tracing::debug!(url = %url, "Sending JSON POST request");

        let mut builder = self.client.post(url).json(body);
        for (name, value) in &self.default_headers {
            builder = builder.header(name, value);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Maps non-success status codes to [`HttpError::Status`].
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, HttpError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(HttpError::Status { code, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Account, SecurePassword};

    fn create_test_config() -> CdekConfig {
        CdekConfig::builder()
            .account(Account::new("test-account").unwrap())
            .secure_password(SecurePassword::new("test-password").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_client_construction_uses_config_url() {
        let client = HttpClient::new(&create_test_config());
        assert_eq!(client.base_url(), "http://integration.cdek.ru");
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(&create_test_config());

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.contains("CDEK API Library v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = CdekConfig::builder()
            .account(Account::new("test-account").unwrap())
            .secure_password(SecurePassword::new("test-password").unwrap())
            .user_agent_prefix("MyShop/2.0")
            .build()
            .unwrap();
        let client = HttpClient::new(&config);

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyShop/2.0 | "));
        assert!(user_agent.contains("CDEK API Library"));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
