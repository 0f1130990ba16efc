//! The carrier client.
//!
//! [`CdekClient`] turns one assembled builder tree into a wire call and
//! turns the reply into plain data. It is stateless beyond the credential
//! pair: every method call is independent and may be invoked repeatedly
//! without ordering constraints relative to other independent calls.
//!
//! XML endpoints receive a form-encoded `xml_request` field containing the
//! serialized tree, stamped with the document date, the account and the
//! date-keyed signature. Lookup endpoints are plain GET + query; the
//! shipping cost calculator is a JSON POST on its own host.
//!
//! # Example
//!
//! ```rust,ignore
//! use cdek_api::{Account, CdekClient, CdekConfig, SecurePassword};
//! use cdek_api::requests::{Address, DeliveryRequest, OrderParams};
//!
//! let config = CdekConfig::builder()
//!     .account(Account::new("account")?)
//!     .secure_password(SecurePassword::new("password")?)
//!     .build()?;
//! let client = CdekClient::new(config);
//!
//! let mut request = DeliveryRequest::new("12345");
//! let order = request.add_order(OrderParams::new("100", 1, "Ivanov Ivan", "+79999999999"));
//! request.add_address(order, Address::delivery_point("XAB1"));
//!
//! let results = client.create_orders(&request).await?;
//! for result in results {
//!     println!("dispatch number: {:?}", result.dispatch_number);
//! }
//! ```

mod errors;
mod responses;

pub use errors::{CarrierError, CdekError};
pub use responses::{CallResult, OrderResult};

use std::time::Duration;

use chrono::Utc;
use serde_json::Value;

use crate::auth::date_signature;
use crate::calculator::{ShippingCost, ShippingCostQuery};
use crate::clients::HttpClient;
use crate::config::CdekConfig;
use crate::requests::{CourierCallRequest, DeliveryRequest, PreAlert};
use crate::xml::{self, Element, XmlError, XmlNode};

/// Order registration endpoint.
const CREATE_ORDER_PATH: &str = "/new_orders.php";
/// Order deletion endpoint.
const DELETE_ORDER_PATH: &str = "/delete_orders.php";
/// Courier dispatch endpoint.
const CALL_COURIER_PATH: &str = "/call_courier.php";
/// Pre-alert registration endpoint.
const PREALERT_PATH: &str = "/addPreAlert";
/// Order status endpoint.
const ORDER_STATUS_PATH: &str = "/status_report_h.php";
/// Order information endpoint.
const ORDER_INFO_PATH: &str = "/info_report.php";
/// Order receipt printing endpoint.
const ORDER_PRINT_PATH: &str = "/orders_print.php";
/// Package barcode printing endpoint.
const BARCODE_PRINT_PATH: &str = "/ordersPackagesPrint";
/// Region lookup endpoint.
const REGIONS_PATH: &str = "/v1/location/regions/json";
/// City lookup endpoint.
const CITIES_PATH: &str = "/v1/location/cities/json";
/// Delivery point lookup endpoint.
const DELIVERY_POINTS_PATH: &str = "/pvzlist/v1/json";

/// Timeout for lookup endpoints.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(60);
/// Timeout for the shipping cost calculator.
const SHIPPING_COST_TIMEOUT: Duration = Duration::from_secs(3);

/// Filter for region and city lookups.
#[derive(Debug, Clone)]
pub struct LocationQuery {
    /// External region code filter.
    pub region_code_ext: Option<u32>,
    /// Carrier region code filter.
    pub region_code: Option<u32>,
    /// ISO country code.
    pub country_code: String,
    /// Result page number.
    pub page: u32,
    /// Result page size.
    pub size: u32,
}

impl Default for LocationQuery {
    fn default() -> Self {
        Self {
            region_code_ext: None,
            region_code: None,
            country_code: "RU".to_string(),
            page: 0,
            size: 1000,
        }
    }
}

impl LocationQuery {
    /// Creates a filter for an external region code, the common case.
    #[must_use]
    pub fn for_region_code_ext(region_code_ext: u32) -> Self {
        Self {
            region_code_ext: Some(region_code_ext),
            ..Self::default()
        }
    }
}

/// Kind of delivery point to look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointType {
    /// Staffed pickup points.
    #[default]
    Pvz,
    /// Parcel lockers.
    Postomat,
    /// Both kinds.
    All,
}

impl PointType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Pvz => "PVZ",
            Self::Postomat => "POSTOMAT",
            Self::All => "ALL",
        }
    }
}

/// Filter for delivery point lookups.
///
/// With neither a postal code nor a city id set, the carrier returns the
/// points of every city.
#[derive(Debug, Clone, Default)]
pub struct DeliveryPointsQuery {
    /// City postal code filter.
    pub city_post_code: Option<String>,
    /// Carrier city code filter.
    pub city_id: Option<u32>,
    /// Kind of points to return.
    pub point_type: PointType,
    /// Only points with a card terminal.
    pub have_cash_less: Option<bool>,
    /// Only points accepting cash on delivery.
    pub allowed_cod: Option<bool>,
}

impl DeliveryPointsQuery {
    /// Creates a filter for a city postal code, the common case.
    #[must_use]
    pub fn for_city_post_code(city_post_code: impl Into<String>) -> Self {
        Self {
            city_post_code: Some(city_post_code.into()),
            ..Self::default()
        }
    }
}

/// Client for the CDEK remote API.
///
/// # Thread Safety
///
/// `CdekClient` is `Send + Sync`; it holds no mutable state beyond the
/// internal connection pool.
#[derive(Debug)]
pub struct CdekClient {
    http_client: HttpClient,
    config: CdekConfig,
}

// Verify CdekClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CdekClient>();
};

impl CdekClient {
    /// Creates a new client for the given configuration.
    #[must_use]
    pub fn new(config: CdekConfig) -> Self {
        let http_client = HttpClient::new(&config);
        Self {
            http_client,
            config,
        }
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &CdekConfig {
        &self.config
    }

    /// Registers the orders of an assembled delivery request.
    ///
    /// Returns one result per order in the reply. Orders the carrier
    /// rejected carry an error code on their result rather than failing
    /// the whole call.
    ///
    /// # Errors
    ///
    /// Returns [`CdekError::Http`] on transport failure and
    /// [`CdekError::Xml`] when the reply cannot be parsed.
    pub async fn create_orders(
        &self,
        request: &DeliveryRequest,
    ) -> Result<Vec<OrderResult>, CdekError> {
        let reply = self
            .exec_xml_request(CREATE_ORDER_PATH, request.to_element())
            .await?;
        Ok(Self::order_results(&reply))
    }

    /// Deletes registered orders under the given act number.
    ///
    /// An order that cannot be deleted (for example, one that already left
    /// the warehouse) is reported through the `error_code` of its result,
    /// not as an `Err`.
    ///
    /// # Errors
    ///
    /// Returns [`CdekError::Http`] on transport failure and
    /// [`CdekError::Xml`] when the reply cannot be parsed.
    pub async fn delete_orders(
        &self,
        act_number: &str,
        dispatch_numbers: &[&str],
    ) -> Result<Vec<OrderResult>, CdekError> {
        let mut root = Element::new("DeleteRequest");
        root.attr("Number", act_number);
        root.attr("OrderCount", dispatch_numbers.len());
        for dispatch_number in dispatch_numbers {
            let mut order = Element::new("Order");
            order.attr("DispatchNumber", dispatch_number);
            root.child(order);
        }

        let reply = self.exec_xml_request(DELETE_ORDER_PATH, root).await?;
        Ok(Self::order_results(&reply))
    }

    /// Dispatches couriers for an assembled call request.
    ///
    /// # Errors
    ///
    /// Returns [`CdekError::Http`] on transport failure and
    /// [`CdekError::Xml`] when the reply cannot be parsed.
    pub async fn call_courier(
        &self,
        request: &CourierCallRequest,
    ) -> Result<Vec<CallResult>, CdekError> {
        let reply = self
            .exec_xml_request(CALL_COURIER_PATH, request.to_element())
            .await?;
        Ok(reply
            .children_named("Call")
            .map(CallResult::from_node)
            .collect())
    }

    /// Registers a pre-alert register with a delivery point.
    ///
    /// # Errors
    ///
    /// Returns [`CdekError::Http`] on transport failure and
    /// [`CdekError::Xml`] when the reply cannot be parsed.
    pub async fn create_prealerts(
        &self,
        pre_alert: &PreAlert,
    ) -> Result<Vec<OrderResult>, CdekError> {
        let reply = self
            .exec_xml_request(PREALERT_PATH, pre_alert.to_element())
            .await?;
        Ok(reply
            .children_named("Order")
            .map(OrderResult::from_node)
            .collect())
    }

    /// Fetches detailed information for registered orders.
    ///
    /// # Errors
    ///
    /// Returns [`CdekError::Http`] on transport failure and
    /// [`CdekError::Xml`] when the reply cannot be parsed.
    pub async fn get_orders_info(
        &self,
        dispatch_numbers: &[&str],
    ) -> Result<Vec<Value>, CdekError> {
        let mut root = Element::new("InfoRequest");
        for dispatch_number in dispatch_numbers {
            let mut order = Element::new("Order");
            order.attr("DispatchNumber", dispatch_number);
            root.child(order);
        }

        let reply = self.exec_xml_request(ORDER_INFO_PATH, root).await?;
        Ok(reply.children_named("Order").map(XmlNode::to_value).collect())
    }

    /// Fetches statuses for registered orders, optionally with the status
    /// history of each.
    ///
    /// # Errors
    ///
    /// Returns [`CdekError::Http`] on transport failure and
    /// [`CdekError::Xml`] when the reply cannot be parsed.
    pub async fn get_orders_statuses(
        &self,
        dispatch_numbers: &[&str],
        show_history: bool,
    ) -> Result<Vec<Value>, CdekError> {
        let mut root = Element::new("StatusReport");
        root.flag_attr("ShowHistory", show_history);
        for dispatch_number in dispatch_numbers {
            let mut order = Element::new("Order");
            order.attr("DispatchNumber", dispatch_number);
            root.child(order);
        }

        let reply = self.exec_xml_request(ORDER_STATUS_PATH, root).await?;
        Ok(reply.children_named("Order").map(XmlNode::to_value).collect())
    }

    /// Fetches the printed receipt form for registered orders.
    ///
    /// Returns the raw document bytes (PDF).
    ///
    /// # Errors
    ///
    /// Returns [`CdekError::Carrier`] when the endpoint answers with an
    /// XML error body instead of a document, [`CdekError::Http`] on
    /// transport failure.
    pub async fn get_orders_print(
        &self,
        dispatch_numbers: &[&str],
        copy_count: u32,
    ) -> Result<Vec<u8>, CdekError> {
        self.exec_print_request(ORDER_PRINT_PATH, "OrdersPrint", dispatch_numbers, copy_count)
            .await
    }

    /// Fetches the printed package barcode form for registered orders.
    ///
    /// Returns the raw document bytes (PDF).
    ///
    /// # Errors
    ///
    /// Returns [`CdekError::Carrier`] when the endpoint answers with an
    /// XML error body instead of a document, [`CdekError::Http`] on
    /// transport failure.
    pub async fn get_barcode_print(
        &self,
        dispatch_numbers: &[&str],
        copy_count: u32,
    ) -> Result<Vec<u8>, CdekError> {
        self.exec_print_request(
            BARCODE_PRINT_PATH,
            "OrdersPackagesPrint",
            dispatch_numbers,
            copy_count,
        )
        .await
    }

    /// Looks up regions matching the filter.
    ///
    /// # Errors
    ///
    /// Returns [`CdekError::Http`] on transport failure.
    pub async fn get_regions(&self, query: &LocationQuery) -> Result<Value, CdekError> {
        let params = Self::location_params(query);
        Ok(self
            .http_client
            .get_json(REGIONS_PATH, &params, Some(LOOKUP_TIMEOUT))
            .await?)
    }

    /// Looks up cities matching the filter.
    ///
    /// # Errors
    ///
    /// Returns [`CdekError::Http`] on transport failure.
    pub async fn get_cities(&self, query: &LocationQuery) -> Result<Value, CdekError> {
        let params = Self::location_params(query);
        Ok(self
            .http_client
            .get_json(CITIES_PATH, &params, Some(LOOKUP_TIMEOUT))
            .await?)
    }

    /// Looks up delivery points matching the filter.
    ///
    /// # Errors
    ///
    /// Returns [`CdekError::Http`] on transport failure.
    pub async fn get_delivery_points(
        &self,
        query: &DeliveryPointsQuery,
    ) -> Result<Value, CdekError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(code) = &query.city_post_code {
            params.push(("citypostcode", code.clone()));
        }
        if let Some(id) = query.city_id {
            params.push(("cityid", id.to_string()));
        }
        params.push(("type", query.point_type.as_str().to_string()));
        if let Some(flag) = query.have_cash_less {
            params.push(("havecashless", flag_param(flag)));
        }
        if let Some(flag) = query.allowed_cod {
            params.push(("allowedcode", flag_param(flag)));
        }

        Ok(self
            .http_client
            .get_json(DELIVERY_POINTS_PATH, &params, Some(LOOKUP_TIMEOUT))
            .await?)
    }

    /// Estimates the shipping cost and delivery window for a query.
    ///
    /// Unless the configuration enables test mode, the request carries the
    /// account and a signature keyed by the execution date.
    ///
    /// # Errors
    ///
    /// Returns [`CdekError::Calculator`] when the carrier reports an error
    /// list or the reply does not match the documented shape, and
    /// [`CdekError::Http`] on transport failure.
    pub async fn get_shipping_cost(
        &self,
        query: &ShippingCostQuery,
    ) -> Result<ShippingCost, CdekError> {
        let date = query.date_execute.unwrap_or_else(|| Utc::now().date_naive());

        let auth = if self.config.test_mode() {
            None
        } else {
            let signature = date_signature(
                self.config.secure_password(),
                &date.format("%Y-%m-%d").to_string(),
            );
            Some((self.config.account().as_ref(), signature))
        };

        let payload = query.to_payload(date, auth);
        let response = self
            .http_client
            .post_json(
                self.config.calculator_url().as_ref(),
                &payload,
                Some(SHIPPING_COST_TIMEOUT),
            )
            .await?;

        Ok(ShippingCost::from_response(&response)?)
    }

    /// Stamps the document date, account and signature onto the root,
    /// posts the document and returns the raw reply bytes.
    async fn post_signed_xml(
        &self,
        path: &str,
        mut element: Element,
    ) -> Result<Vec<u8>, CdekError> {
        let date = Utc::now().format("%Y-%m-%d").to_string();
        element.attr("Date", &date);
        element.attr("Account", self.config.account().as_ref());
        element.attr(
            "Secure",
            date_signature(self.config.secure_password(), &date),
        );

        let document = element.to_xml_string()?;
        let form = [("xml_request", document)];
        Ok(self.http_client.post_form(path, &form).await?)
    }

    async fn exec_xml_request(
        &self,
        path: &str,
        element: Element,
    ) -> Result<XmlNode, CdekError> {
        let bytes = self.post_signed_xml(path, element).await?;
        let text = std::str::from_utf8(&bytes).map_err(|_| XmlError::InvalidUtf8)?;
        Ok(xml::parse(text)?)
    }

    async fn exec_print_request(
        &self,
        path: &str,
        root_tag: &str,
        dispatch_numbers: &[&str],
        copy_count: u32,
    ) -> Result<Vec<u8>, CdekError> {
        let mut root = Element::new(root_tag);
        root.attr("OrderCount", dispatch_numbers.len());
        root.attr("CopyCount", copy_count);
        for dispatch_number in dispatch_numbers {
            let mut order = Element::new("Order");
            order.attr("DispatchNumber", dispatch_number);
            root.child(order);
        }

        let bytes = self.post_signed_xml(path, root).await?;

        // An XML body here means the carrier refused to produce the document.
        if bytes.starts_with(b"<?xml") {
            let text = std::str::from_utf8(&bytes).map_err(|_| XmlError::InvalidUtf8)?;
            let reply = xml::parse(text)?;
            return Err(Self::carrier_error(&reply).into());
        }
        Ok(bytes)
    }

    fn order_results(reply: &XmlNode) -> Vec<OrderResult> {
        let results: Vec<OrderResult> = reply
            .children
            .iter()
            .filter(|child| {
                child.has_attribute("DispatchNumber") || child.has_attribute("ErrorCode")
            })
            .map(OrderResult::from_node)
            .collect();

        for result in results.iter().filter(|result| result.is_error()) {
            tracing::warn!(
                error_code = result.error_code.as_deref(),
                number = result.number.as_deref(),
                "Carrier reported an order error"
            );
        }
        results
    }

    fn carrier_error(reply: &XmlNode) -> CarrierError {
        fn find_error(node: &XmlNode) -> Option<&XmlNode> {
            if node.has_attribute("ErrorCode") {
                return Some(node);
            }
            node.children.iter().find_map(find_error)
        }

        find_error(reply).map_or_else(
            || CarrierError {
                code: "UNKNOWN".to_string(),
                message: String::new(),
            },
            |node| CarrierError {
                code: node.attribute("ErrorCode").unwrap_or_default().to_string(),
                message: node.attribute("Msg").unwrap_or_default().to_string(),
            },
        )
    }

    fn location_params(query: &LocationQuery) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(code) = query.region_code_ext {
            params.push(("regionCodeExt", code.to_string()));
        }
        if let Some(code) = query.region_code {
            params.push(("regionCode", code.to_string()));
        }
        params.push(("countryCode", query.country_code.clone()));
        params.push(("page", query.page.to_string()));
        params.push(("size", query.size.to_string()));
        params
    }
}

fn flag_param(flag: bool) -> String {
    u8::from(flag).to_string()
}
