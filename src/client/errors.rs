//! Error types for the carrier client.

use thiserror::Error;

use crate::calculator::CalculatorError;
use crate::clients::HttpError;
use crate::xml::XmlError;

/// A business error reported by the carrier instead of a document.
///
/// Raised when an endpoint that should return a binary document (printed
/// forms) answers with an XML error body, or when a whole-request reply
/// carries nothing but an error code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Carrier error {code}: {message}")]
pub struct CarrierError {
    /// Carrier error code.
    pub code: String,
    /// Human-readable message, possibly empty.
    pub message: String,
}

/// Unified error type for carrier client operations.
///
/// Transport failures are propagated unchanged from the HTTP collaborator;
/// the client performs no retries and no wrapping beyond this enum.
#[derive(Debug, Error)]
pub enum CdekError {
    /// Transport-level failure.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The request tree or reply document could not be (de)serialized.
    #[error(transparent)]
    Xml(#[from] XmlError),

    /// The carrier reported a business error instead of a document.
    #[error(transparent)]
    Carrier(#[from] CarrierError),

    /// A shipping cost request failed or returned an unexpected shape.
    #[error(transparent)]
    Calculator(#[from] CalculatorError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carrier_error_message() {
        let error = CarrierError {
            code: "ERR_ORDER_RELEASED".to_string(),
            message: "Order has left the warehouse".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("ERR_ORDER_RELEASED"));
        assert!(message.contains("left the warehouse"));
    }

    #[test]
    fn test_cdek_error_wraps_carrier_error_transparently() {
        let error: CdekError = CarrierError {
            code: "ERR".to_string(),
            message: "boom".to_string(),
        }
        .into();
        assert_eq!(error.to_string(), "Carrier error ERR: boom");
    }
}
