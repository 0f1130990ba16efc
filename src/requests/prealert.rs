//! Pre-alert builder.
//!
//! A pre-alert is the advance register a client sends to a delivery point:
//! the planned hand-over date, the receiving point code and the dispatch
//! numbers of the orders being handed over. Unlike the delivery and
//! courier builders it is single-level, so no handles are involved.
//!
//! # Example
//!
//! ```rust
//! use cdek_api::requests::PreAlert;
//! use chrono::NaiveDate;
//!
//! let mut pre_alert = PreAlert::new(
//!     NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
//!     "XAB1",
//! );
//! pre_alert.add_order("1105384383", None);
//! ```

use chrono::NaiveDate;

use crate::xml::Element;

#[derive(Debug, Clone)]
struct PreAlertOrder {
    dispatch_number: String,
    number: Option<String>,
}

/// Builder for the carrier's `PreAlert` document.
#[derive(Debug, Clone)]
pub struct PreAlert {
    planned_meeting_date: NaiveDate,
    pvz_code: String,
    orders: Vec<PreAlertOrder>,
}

impl PreAlert {
    /// Creates an empty pre-alert for the given hand-over date and
    /// receiving delivery point.
    #[must_use]
    pub fn new(planned_meeting_date: NaiveDate, pvz_code: impl Into<String>) -> Self {
        Self {
            planned_meeting_date,
            pvz_code: pvz_code.into(),
            orders: Vec::new(),
        }
    }

    /// Returns the number of orders added so far.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Appends an order reference by its carrier dispatch number, with an
    /// optional client-side order number.
    pub fn add_order(&mut self, dispatch_number: impl Into<String>, number: Option<String>) {
        self.orders.push(PreAlertOrder {
            dispatch_number: dispatch_number.into(),
            number,
        });
    }

    /// Serializes the register into the carrier's `PreAlert` document.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut root = Element::new("PreAlert");
        root.attr(
            "PlannedMeetingDate",
            self.planned_meeting_date.format("%Y-%m-%d"),
        );
        root.attr("PvzCode", &self.pvz_code);

        for order in &self.orders {
            let mut child = Element::new("Order");
            child.attr("DispatchNumber", &order.dispatch_number);
            child.opt_attr("Number", order.number.as_ref());
            root.child(child);
        }
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pre_alert_serializes_header() {
        let pre_alert = PreAlert::new(NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(), "XAB1");

        let element = pre_alert.to_element();
        assert_eq!(element.attribute("PlannedMeetingDate"), Some("2024-06-02"));
        assert_eq!(element.attribute("PvzCode"), Some("XAB1"));
        assert!(element.children().is_empty());
    }

    #[test]
    fn test_orders_preserve_insertion_order() {
        let mut pre_alert = PreAlert::new(NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(), "XAB1");
        pre_alert.add_order("111", None);
        pre_alert.add_order("222", Some("ORD-2".to_string()));

        let element = pre_alert.to_element();
        assert_eq!(pre_alert.order_count(), 2);
        assert_eq!(element.children()[0].attribute("DispatchNumber"), Some("111"));
        assert_eq!(element.children()[0].attribute("Number"), None);
        assert_eq!(element.children()[1].attribute("DispatchNumber"), Some("222"));
        assert_eq!(element.children()[1].attribute("Number"), Some("ORD-2"));
    }
}
