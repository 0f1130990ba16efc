//! Request builders for the CDEK integration API.
//!
//! Three independent builder hierarchies assemble the carrier's XML
//! documents before a single serialization pass:
//!
//! - [`DeliveryRequest`]: request → orders → (address, packages → items)
//! - [`CourierCallRequest`]: call-request → calls → pickup address
//! - [`PreAlert`]: a flat register of dispatch-number references
//!
//! Builders perform pure in-memory mutation and are consumed by one
//! [`CdekClient`](crate::CdekClient) call; they are not meant to be shared
//! across concurrent callers.

mod courier;
mod delivery;
mod prealert;

pub use courier::{CallHandle, CallParams, CourierCallRequest, PickupAddress};
pub use delivery::{
    AddService, Address, DeliveryRequest, ItemParams, OrderHandle, OrderParams, PackageHandle,
    PackageParams,
};
pub use prealert::PreAlert;
