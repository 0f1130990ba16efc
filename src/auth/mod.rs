//! Request signing for the CDEK integration API.
//!
//! CDEK authenticates XML requests with a date-keyed digest: every document
//! carries the account, the document date and `Secure`, the lowercase hex
//! MD5 of `{date}&{password}`. The calculator endpoint uses the same digest
//! under the `secure` key.
//!
//! # Example
//!
//! ```rust
//! use cdek_api::auth::date_signature;
//! use cdek_api::SecurePassword;
//!
//! let password = SecurePassword::new("secure-password").unwrap();
//! let signature = date_signature(&password, "2021-03-15");
//! assert_eq!(signature, "6ca5085ff2e286fd2b6327ae014bb86c");
//! ```

use crate::config::SecurePassword;

/// Computes the `Secure` signature for a document date.
///
/// The signature is the lowercase hex MD5 digest of `{date}&{password}`,
/// where `date` is the ISO-8601 date stamped on the request document.
///
/// # Example
///
/// ```rust
/// use cdek_api::auth::date_signature;
/// use cdek_api::SecurePassword;
///
/// let password = SecurePassword::new("secret").unwrap();
/// let signature = date_signature(&password, "2024-01-01");
/// assert_eq!(signature.len(), 32); // MD5 produces 16 bytes = 32 hex chars
/// assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn date_signature(password: &SecurePassword, date: &str) -> String {
    let code = format!("{date}&{}", password.as_ref());
    format!("{:x}", md5::compute(code.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_known_value() {
        let password = SecurePassword::new("secure-password").unwrap();
        assert_eq!(
            date_signature(&password, "2021-03-15"),
            "6ca5085ff2e286fd2b6327ae014bb86c"
        );
    }

    #[test]
    fn test_signature_is_lowercase_hex() {
        let password = SecurePassword::new("test-password").unwrap();
        let signature = date_signature(&password, "2024-06-01");
        assert_eq!(signature.len(), 32);
        assert!(signature
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(signature, "bed79b4b5d3cec19ffc04ec4aede571a");
    }

    #[test]
    fn test_signature_changes_with_date() {
        let password = SecurePassword::new("pass").unwrap();
        let first = date_signature(&password, "2021-01-01");
        let second = date_signature(&password, "2021-01-02");
        assert_eq!(first, "d9912caed846c657f2afdd6264bf28fd");
        assert_ne!(first, second);
    }
}
