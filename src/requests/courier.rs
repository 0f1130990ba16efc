//! Courier call request builder.
//!
//! [`CourierCallRequest`] assembles the carrier's pickup dispatch tree:
//! call-request → calls → pickup address. It mirrors the delivery builder
//! at a shallower depth and uses the same index-handle pattern.
//!
//! # Example
//!
//! ```rust
//! use cdek_api::requests::{CallParams, CourierCallRequest, PickupAddress};
//! use chrono::{NaiveDate, NaiveTime};
//!
//! let mut request = CourierCallRequest::new();
//! let mut params = CallParams::new(
//!     NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
//!     NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
//!     NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
//! );
//! params.sender_phone = Some("+79999999999".to_string());
//!
//! let call = request.add_call(params);
//! request.add_address(call, PickupAddress::new("Pushkina", "50", "1"));
//! ```

use chrono::{NaiveDate, NaiveTime};

use crate::xml::Element;

/// Handle to a call inside a [`CourierCallRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallHandle(usize);

/// Fields of a courier call.
///
/// Required fields are set through [`CallParams::new`]; optional fields
/// are public and default to absent.
#[derive(Debug, Clone)]
pub struct CallParams {
    /// Date the courier is expected.
    pub date: NaiveDate,
    /// Start of the waiting window.
    pub time_begin: NaiveTime,
    /// End of the waiting window.
    pub time_end: NaiveTime,
    /// Dispatch number of an already-registered order to pick up.
    pub dispatch_number: Option<String>,
    /// Sender city code in the carrier's database.
    pub sender_city_id: Option<u32>,
    /// Sender phone.
    pub sender_phone: Option<String>,
    /// Sender full name.
    pub sender_name: Option<String>,
    /// Total weight in grams.
    pub weight: Option<u32>,
    /// Free-text remarks for the call.
    pub comment: Option<String>,
    /// Start of the lunch window.
    pub lunch_begin: Option<NaiveTime>,
    /// End of the lunch window.
    pub lunch_end: Option<NaiveTime>,
    /// Skip the carrier's arrival time checks.
    pub ignore_time: bool,
}

impl CallParams {
    /// Creates call parameters with the required fields set.
    #[must_use]
    pub const fn new(date: NaiveDate, time_begin: NaiveTime, time_end: NaiveTime) -> Self {
        Self {
            date,
            time_begin,
            time_end,
            dispatch_number: None,
            sender_city_id: None,
            sender_phone: None,
            sender_name: None,
            weight: None,
            comment: None,
            lunch_begin: None,
            lunch_end: None,
            ignore_time: false,
        }
    }
}

/// Pickup address of a courier call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickupAddress {
    /// Street name.
    pub street: String,
    /// House, building, block.
    pub house: String,
    /// Flat or office.
    pub flat: String,
}

impl PickupAddress {
    /// Creates a pickup address.
    #[must_use]
    pub fn new(
        street: impl Into<String>,
        house: impl Into<String>,
        flat: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            house: house.into(),
            flat: flat.into(),
        }
    }

    fn to_element(&self) -> Element {
        let mut element = Element::new("Address");
        element.attr("Street", &self.street);
        element.attr("House", &self.house);
        element.attr("Flat", &self.flat);
        element
    }
}

#[derive(Debug, Clone)]
struct Call {
    params: CallParams,
    address: Option<PickupAddress>,
}

/// Builder for the carrier's `CallCourier` document.
#[derive(Debug, Clone, Default)]
pub struct CourierCallRequest {
    calls: Vec<Call>,
}

impl CourierCallRequest {
    /// Creates an empty courier call request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of calls added so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    /// Appends a call and returns a handle to it.
    pub fn add_call(&mut self, params: CallParams) -> CallHandle {
        self.calls.push(Call {
            params,
            address: None,
        });
        CallHandle(self.calls.len() - 1)
    }

    /// Attaches the pickup address to a call.
    ///
    /// A call carries exactly one address: calling this twice on the same
    /// handle replaces the previous address without an error.
    ///
    /// # Panics
    ///
    /// Panics if `call` was produced by a different request.
    pub fn add_address(&mut self, call: CallHandle, address: PickupAddress) {
        self.calls[call.0].address = Some(address);
    }

    /// Serializes the tree into the carrier's `CallCourier` document.
    ///
    /// `CallCount` is computed from the call sequence.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut root = Element::new("CallCourier");
        root.attr("CallCount", self.calls.len());

        for call in &self.calls {
            root.child(call.to_element());
        }
        root
    }
}

impl Call {
    fn to_element(&self) -> Element {
        let mut element = Element::new("Call");
        let params = &self.params;

        element.attr("Date", params.date.format("%Y-%m-%d"));
        element.attr("TimeBeg", params.time_begin.format("%H:%M:%S"));
        element.attr("TimeEnd", params.time_end.format("%H:%M:%S"));
        element.opt_attr("DispatchNumber", params.dispatch_number.as_ref());
        element.opt_attr("SendCityCode", params.sender_city_id);
        element.opt_attr("SendPhone", params.sender_phone.as_ref());
        element.opt_attr("SenderName", params.sender_name.as_ref());
        element.opt_attr("Weight", params.weight);
        element.opt_attr("Comment", params.comment.as_ref());
        element.flag_attr("IgnoreTime", params.ignore_time);
        element.opt_attr(
            "LunchBeg",
            params.lunch_begin.map(|t| t.format("%H:%M:%S").to_string()),
        );
        element.opt_attr(
            "LunchEnd",
            params.lunch_end.map(|t| t.format("%H:%M:%S").to_string()),
        );

        if let Some(address) = &self.address {
            element.child(address.to_element());
        }
        element
    }
}
