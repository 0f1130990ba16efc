//! HTTP transport for the CDEK API.
//!
//! The carrier client depends on this layer only through a narrow
//! send-payload, get-raw-reply contract; see [`HttpClient`].

mod errors;
mod http_client;

pub use errors::HttpError;
pub use http_client::{HttpClient, SDK_VERSION};
