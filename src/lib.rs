//! # CDEK API Rust SDK
//!
//! A Rust SDK for the CDEK carrier API, providing typed request builders,
//! signed XML transport, and lookup and shipping-cost calls for delivery
//! integrations.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`CdekConfig`] and [`CdekConfigBuilder`]
//! - Validated newtypes for the integration credential pair
//! - Typed request builders for order registration ([`requests::DeliveryRequest`]),
//!   courier dispatch ([`requests::CourierCallRequest`]) and delivery-point
//!   pre-alerts ([`requests::PreAlert`])
//! - A carrier client ([`CdekClient`]) covering order registration, deletion,
//!   status and information reports, printed forms, courier calls,
//!   region/city/delivery-point lookups and shipping cost estimation
//! - Date-keyed request signing per the carrier's integration protocol
//!
//! ## Quick Start
//!
//! ```rust
//! use cdek_api::{CdekConfig, Account, SecurePassword};
//!
//! // Create configuration using the builder pattern
//! let config = CdekConfig::builder()
//!     .account(Account::new("your-account").unwrap())
//!     .secure_password(SecurePassword::new("your-password").unwrap())
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Registering Orders
//!
//! Orders are assembled locally into a [`requests::DeliveryRequest`] and sent
//! in one call. Handles returned by `add_order` and `add_package` address the
//! entries being built:
//!
//! ```rust,ignore
//! use cdek_api::CdekClient;
//! use cdek_api::requests::{Address, DeliveryRequest, ItemParams, OrderParams, PackageParams};
//!
//! let client = CdekClient::new(config);
//!
//! let mut request = DeliveryRequest::new("12345");
//!
//! let mut params = OrderParams::new("ORDER-1", 1, "Ivanov Ivan", "+79999999999");
//! params.rec_city_post_code = Some("680000".to_string());
//! let order = request.add_order(params);
//!
//! request.add_address(order, Address::delivery_point("XAB1"));
//! let package = request.add_package(order, PackageParams::default());
//! request.add_item(package, ItemParams::new(300, "SKU-1", 500.0));
//!
//! for result in client.create_orders(&request).await? {
//!     match result.dispatch_number {
//!         Some(number) => println!("registered as {number}"),
//!         None => eprintln!("rejected: {:?}", result.message),
//!     }
//! }
//! ```
//!
//! ## Calling a Courier
//!
//! ```rust,ignore
//! use chrono::{NaiveDate, NaiveTime};
//! use cdek_api::requests::{CallParams, CourierCallRequest, PickupAddress};
//!
//! let mut request = CourierCallRequest::new();
//! let call = request.add_call(CallParams::new(
//!     NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
//!     NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
//!     NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
//! ));
//! request.add_address(call, PickupAddress::new("Pushkina", "1", "2"));
//!
//! let results = client.call_courier(&request).await?;
//! ```
//!
//! ## Estimating Shipping Cost
//!
//! ```rust,ignore
//! use cdek_api::calculator::{Good, ShippingCostQuery, TariffQuery};
//!
//! let mut query = ShippingCostQuery::between_cities(270, 44, TariffQuery::Single(136));
//! query.goods.push(Good::boxed(0.3, 10, 7, 5));
//!
//! let cost = client.get_shipping_cost(&query).await?;
//! println!("{} RUB, {}..{}", cost.price, cost.delivery_date_min, cost.delivery_date_max);
//! ```
//!
//! ## Lookups
//!
//! ```rust,ignore
//! use cdek_api::client::{DeliveryPointsQuery, LocationQuery};
//!
//! let regions = client.get_regions(&LocationQuery::for_region_code_ext(27)).await?;
//! let points = client
//!     .get_delivery_points(&DeliveryPointsQuery::for_city_post_code("680000"))
//!     .await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime
//! - **Local assembly, single send**: Request builders never touch the network;
//!   the client sends one assembled document per call and performs no retries

pub mod auth;
pub mod calculator;
pub mod client;
pub mod clients;
pub mod config;
pub mod error;
pub mod requests;
pub mod xml;

// Re-export public types at crate root for convenience
pub use client::{
    CallResult, CarrierError, CdekClient, CdekError, DeliveryPointsQuery, LocationQuery,
    OrderResult, PointType,
};
pub use config::{Account, ApiUrl, CdekConfig, CdekConfigBuilder, SecurePassword};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{HttpClient, HttpError};

// Re-export calculator types for convenience
pub use calculator::{
    CalculatorError, CalculatorService, CostError, Good, ShippingCost, ShippingCostQuery,
    TariffQuery,
};
