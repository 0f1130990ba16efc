//! Parsed reply records for the XML endpoints.
//!
//! Reply documents are attribute bags whose exact field set varies by
//! endpoint and carrier version. The records here lift out the attributes
//! every caller needs (dispatch number, error code) and keep the complete
//! parsed element in `raw` for everything else.

use serde_json::Value;

use crate::xml::XmlNode;

/// Per-order result from order registration, deletion or pre-alert calls.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderResult {
    /// Carrier-assigned dispatch number, when the operation succeeded.
    pub dispatch_number: Option<String>,
    /// Client-side order number echoed back by the carrier.
    pub number: Option<String>,
    /// Carrier error code, when the operation failed for this order.
    pub error_code: Option<String>,
    /// Human-readable message accompanying the error code.
    pub message: Option<String>,
    /// The complete parsed reply element.
    pub raw: Value,
}

impl OrderResult {
    pub(crate) fn from_node(node: &XmlNode) -> Self {
        Self {
            dispatch_number: node.attribute("DispatchNumber").map(str::to_string),
            number: node.attribute("Number").map(str::to_string),
            error_code: node.attribute("ErrorCode").map(str::to_string),
            message: node.attribute("Msg").map(str::to_string),
            raw: node.to_value(),
        }
    }

    /// Returns whether the carrier reported an error for this order.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error_code.is_some()
    }
}

/// Per-call result from courier dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct CallResult {
    /// Carrier-assigned call number, when the call was accepted.
    pub number: Option<String>,
    /// Carrier error code, when the call was rejected.
    pub error_code: Option<String>,
    /// Human-readable message accompanying the error code.
    pub message: Option<String>,
    /// The complete parsed reply element.
    pub raw: Value,
}

impl CallResult {
    pub(crate) fn from_node(node: &XmlNode) -> Self {
        Self {
            number: node.attribute("Number").map(str::to_string),
            error_code: node.attribute("ErrorCode").map(str::to_string),
            message: node.attribute("Msg").map(str::to_string),
            raw: node.to_value(),
        }
    }

    /// Returns whether the carrier rejected this call.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error_code.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml;

    #[test]
    fn test_order_result_from_successful_reply() {
        let node = xml::parse(r#"<Order DispatchNumber="1105384383" Number="100"/>"#).unwrap();
        let result = OrderResult::from_node(&node);

        assert_eq!(result.dispatch_number.as_deref(), Some("1105384383"));
        assert_eq!(result.number.as_deref(), Some("100"));
        assert!(!result.is_error());
        assert_eq!(result.raw["DispatchNumber"], "1105384383");
    }

    #[test]
    fn test_order_result_from_error_reply() {
        let node = xml::parse(
            r#"<Order DispatchNumber="1105" ErrorCode="ERR_ORDER_RELEASED" Msg="Released"/>"#,
        )
        .unwrap();
        let result = OrderResult::from_node(&node);

        assert!(result.is_error());
        assert_eq!(result.error_code.as_deref(), Some("ERR_ORDER_RELEASED"));
        assert_eq!(result.message.as_deref(), Some("Released"));
    }

    #[test]
    fn test_call_result_keeps_nested_data_in_raw() {
        let node = xml::parse(r#"<Call Number="CALL-1"><Address Street="Pushkina"/></Call>"#)
            .unwrap();
        let result = CallResult::from_node(&node);

        assert_eq!(result.number.as_deref(), Some("CALL-1"));
        assert_eq!(result.raw["Address"]["Street"], "Pushkina");
    }
}
