//! Shipping cost calculator types.
//!
//! The calculator is a JSON endpoint on a separate host from the
//! integration API. [`ShippingCostQuery`] describes one estimation request:
//! the city pair, the goods being shipped and a required tariff selection.
//! Replies parse into [`ShippingCost`] or, when the carrier reports an
//! error list, [`CostError`].

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Added-service id the carrier uses for heavy shipments.
const HEAVY_ID: i64 = 5;
/// Added-service id the carrier uses for over-sized shipments.
const OVER_SIZED_ID: i64 = 6;

/// Carrier error code for "delivery unavailable on this route".
const DELIVERY_UNAVAILABLE_CODE: i64 = 3;

/// Physical descriptor of one shipped good.
///
/// Either all three side lengths or a volume must be given; the two
/// constructors make the valid shapes explicit.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Good {
    /// Weight in kilograms.
    pub weight: f64,
    /// Length in centimeters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    /// Width in centimeters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Height in centimeters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Volume in cubic meters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Good {
    /// Creates a good described by its three side lengths.
    #[must_use]
    pub const fn boxed(weight: f64, length: u32, width: u32, height: u32) -> Self {
        Self {
            weight,
            length: Some(length),
            width: Some(width),
            height: Some(height),
            volume: None,
        }
    }

    /// Creates a good described by its volume.
    #[must_use]
    pub const fn volumetric(weight: f64, volume: f64) -> Self {
        Self {
            weight,
            length: None,
            width: None,
            height: None,
            volume: Some(volume),
        }
    }
}

/// An added service requested from the calculator.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CalculatorService {
    /// Service id.
    pub id: u32,
    /// Service parameter (e.g., insured value), where the service takes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<u64>,
}

/// Tariff selection for a calculator request.
///
/// A tariff is always required; requests without one cannot be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TariffQuery {
    /// A single tariff id.
    Single(u32),
    /// An ordered list of tariff ids; the carrier picks the first
    /// applicable one, priority following list position.
    Priority(Vec<u32>),
}

/// One shipping cost estimation request.
///
/// For each of sender and receiver, either the city id or the city postal
/// code must be set; the carrier rejects requests with neither.
#[derive(Debug, Clone)]
pub struct ShippingCostQuery {
    /// Sender city id in the carrier's database.
    pub sender_city_id: Option<u32>,
    /// Receiver city id in the carrier's database.
    pub receiver_city_id: Option<u32>,
    /// Sender city postal code.
    pub sender_city_post_code: Option<String>,
    /// Receiver city postal code.
    pub receiver_city_post_code: Option<String>,
    /// Tariff selection.
    pub tariff: TariffQuery,
    /// Goods being shipped.
    pub goods: Vec<Good>,
    /// Added services.
    pub services: Vec<CalculatorService>,
    /// Planned shipping date; defaults to today when unset.
    pub date_execute: Option<NaiveDate>,
}

impl ShippingCostQuery {
    /// Creates a query with the given tariff selection; all other fields
    /// default to absent.
    #[must_use]
    pub const fn new(tariff: TariffQuery) -> Self {
        Self {
            sender_city_id: None,
            receiver_city_id: None,
            sender_city_post_code: None,
            receiver_city_post_code: None,
            tariff,
            goods: Vec::new(),
            services: Vec::new(),
            date_execute: None,
        }
    }

    /// Creates a query for a city-id pair, the common case.
    #[must_use]
    pub fn between_cities(sender_city_id: u32, receiver_city_id: u32, tariff: TariffQuery) -> Self {
        let mut query = Self::new(tariff);
        query.sender_city_id = Some(sender_city_id);
        query.receiver_city_id = Some(receiver_city_id);
        query
    }

    /// Builds the calculator JSON payload.
    ///
    /// `date` is the execution date stamped into the request; `auth` is the
    /// account/signature pair, omitted in test mode.
    pub(crate) fn to_payload(&self, date: NaiveDate, auth: Option<(&str, String)>) -> Value {
        let mut payload = serde_json::Map::new();
        payload.insert("version".to_string(), Value::from("1.0"));
        payload.insert(
            "dateExecute".to_string(),
            Value::from(date.format("%Y-%m-%d").to_string()),
        );

        if let Some(id) = self.sender_city_id {
            payload.insert("senderCityId".to_string(), Value::from(id));
        }
        if let Some(id) = self.receiver_city_id {
            payload.insert("receiverCityId".to_string(), Value::from(id));
        }
        if let Some(code) = &self.sender_city_post_code {
            payload.insert("senderCityPostCode".to_string(), Value::from(code.clone()));
        }
        if let Some(code) = &self.receiver_city_post_code {
            payload.insert(
                "receiverCityPostCode".to_string(),
                Value::from(code.clone()),
            );
        }

        payload.insert(
            "goods".to_string(),
            serde_json::to_value(&self.goods).unwrap_or_default(),
        );
        if !self.services.is_empty() {
            payload.insert(
                "services".to_string(),
                serde_json::to_value(&self.services).unwrap_or_default(),
            );
        }

        match &self.tariff {
            TariffQuery::Single(id) => {
                payload.insert("tariffId".to_string(), Value::from(*id));
            }
            TariffQuery::Priority(ids) => {
                let list: Vec<Value> = ids
                    .iter()
                    .enumerate()
                    .map(|(position, id)| {
                        serde_json::json!({ "priority": position + 1, "id": id })
                    })
                    .collect();
                payload.insert("tariffList".to_string(), Value::from(list));
            }
        }

        if let Some((account, signature)) = auth {
            payload.insert("authLogin".to_string(), Value::from(account));
            payload.insert("secure".to_string(), Value::from(signature));
        }

        Value::Object(payload)
    }
}

/// One error entry from a calculator error reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostErrorEntry {
    /// Carrier error code.
    pub code: i64,
    /// Human-readable error text.
    pub text: String,
}

fn describe(errors: &[CostErrorEntry]) -> String {
    errors
        .iter()
        .map(|entry| format!("[{}] {}", entry.code, entry.text))
        .collect::<Vec<_>>()
        .join("; ")
}

/// The carrier rejected a shipping cost request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Shipping cost request failed: {}", describe(.errors))]
pub struct CostError {
    /// The carrier's error list.
    pub errors: Vec<CostErrorEntry>,
}

impl CostError {
    /// Returns whether the carrier reported delivery as unavailable for
    /// the requested route.
    #[must_use]
    pub fn is_delivery_unavailable(&self) -> bool {
        self.errors
            .iter()
            .any(|entry| entry.code == DELIVERY_UNAVAILABLE_CODE)
    }
}

/// Errors that can occur while interpreting a calculator reply.
#[derive(Debug, Error)]
pub enum CalculatorError {
    /// The carrier reported an error list.
    #[error(transparent)]
    Cost(#[from] CostError),

    /// The reply is missing an expected field.
    #[error("Unexpected calculator response: missing '{field}'")]
    MissingField {
        /// The missing field.
        field: &'static str,
    },

    /// The reply carries an unparseable date.
    #[error("Unexpected calculator response: invalid date '{value}'")]
    InvalidDate {
        /// The value that failed to parse.
        value: String,
    },
}

/// An added service line in a cost breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct ShippingService {
    /// Service id.
    pub id: i64,
    /// Service title.
    pub title: String,
    /// Absolute price of the service, if priced absolutely.
    pub price: Option<f64>,
    /// Rate of the service, if priced relatively.
    pub rate: Option<f64>,
}

impl ShippingService {
    /// Returns whether this is the heavy-shipment surcharge.
    #[must_use]
    pub const fn is_heavy(&self) -> bool {
        self.id == HEAVY_ID
    }

    /// Returns whether this is the over-sized-shipment surcharge.
    #[must_use]
    pub const fn is_over_sized(&self) -> bool {
        self.id == OVER_SIZED_ID
    }
}

/// A parsed shipping cost breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct ShippingCost {
    /// Total delivery price.
    pub price: f64,
    /// The tariff the carrier applied.
    pub tariff_id: i64,
    /// Earliest delivery date.
    pub delivery_date_min: NaiveDate,
    /// Latest delivery date.
    pub delivery_date_max: NaiveDate,
    /// Added services included in the price.
    pub services: Vec<ShippingService>,
}

impl ShippingCost {
    /// Parses a calculator reply.
    ///
    /// # Errors
    ///
    /// Returns [`CalculatorError::Cost`] when the reply carries the
    /// carrier's error list, and the other variants when the reply does
    /// not match the documented shape.
    pub fn from_response(response: &Value) -> Result<Self, CalculatorError> {
        if let Some(errors) = response.get("error") {
            return Err(parse_error_list(errors).into());
        }

        let result = response
            .get("result")
            .ok_or(CalculatorError::MissingField { field: "result" })?;

        let price = result
            .get("price")
            .and_then(value_to_f64)
            .ok_or(CalculatorError::MissingField { field: "price" })?;
        let tariff_id = result
            .get("tariffId")
            .and_then(value_to_i64)
            .ok_or(CalculatorError::MissingField { field: "tariffId" })?;
        let delivery_date_min = parse_date(result, "deliveryDateMin")?;
        let delivery_date_max = parse_date(result, "deliveryDateMax")?;

        let services = result
            .get("services")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().map(parse_service).collect())
            .unwrap_or_default();

        Ok(Self {
            price,
            tariff_id,
            delivery_date_min,
            delivery_date_max,
            services,
        })
    }

    /// Returns whether the price includes the heavy-shipment surcharge.
    #[must_use]
    pub fn is_heavy(&self) -> bool {
        self.services.iter().any(ShippingService::is_heavy)
    }

    /// Returns whether the price includes the over-sized surcharge.
    #[must_use]
    pub fn is_over_sized(&self) -> bool {
        self.services.iter().any(ShippingService::is_over_sized)
    }
}

fn parse_error_list(errors: &Value) -> CostError {
    let entries = errors
        .as_array()
        .map(|list| {
            list.iter()
                .map(|entry| CostErrorEntry {
                    code: entry.get("code").and_then(value_to_i64).unwrap_or_default(),
                    text: entry
                        .get("text")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    CostError { errors: entries }
}

fn parse_service(entry: &Value) -> ShippingService {
    ShippingService {
        id: entry.get("id").and_then(value_to_i64).unwrap_or_default(),
        title: entry
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        price: entry.get("price").and_then(value_to_f64),
        rate: entry.get("rate").and_then(value_to_f64),
    }
}

fn parse_date(result: &Value, field: &'static str) -> Result<NaiveDate, CalculatorError> {
    let text = result
        .get(field)
        .and_then(Value::as_str)
        .ok_or(CalculatorError::MissingField { field })?;

    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| CalculatorError::InvalidDate {
        value: text.to_string(),
    })
}

// The calculator returns numeric fields either as JSON numbers or as
// strings depending on the endpoint version.
fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}

fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_with_single_tariff() {
        let mut query =
            ShippingCostQuery::between_cities(270, 44, TariffQuery::Single(136));
        query.goods.push(Good::boxed(0.3, 10, 7, 5));
        query.goods.push(Good::volumetric(0.1, 0.1));

        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let payload = query.to_payload(date, None);

        assert_eq!(payload["version"], "1.0");
        assert_eq!(payload["dateExecute"], "2024-06-01");
        assert_eq!(payload["senderCityId"], 270);
        assert_eq!(payload["receiverCityId"], 44);
        assert_eq!(payload["tariffId"], 136);
        assert_eq!(payload["goods"][0]["length"], 10);
        assert_eq!(payload["goods"][1]["volume"], 0.1);
        assert!(payload["goods"][1].get("length").is_none());
        assert!(payload.get("services").is_none());
        assert!(payload.get("authLogin").is_none());
    }

    #[test]
    fn test_payload_with_tariff_priority_list() {
        let query = ShippingCostQuery::between_cities(
            270,
            44,
            TariffQuery::Priority(vec![3, 1]),
        );

        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let payload = query.to_payload(date, None);

        assert!(payload.get("tariffId").is_none());
        let list = payload["tariffList"].as_array().unwrap();
        assert_eq!(list[0]["priority"], 1);
        assert_eq!(list[0]["id"], 3);
        assert_eq!(list[1]["priority"], 2);
        assert_eq!(list[1]["id"], 1);
    }

    #[test]
    fn test_payload_with_auth_pair() {
        let query = ShippingCostQuery::new(TariffQuery::Single(1));
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let payload = query.to_payload(date, Some(("login", "signature".to_string())));

        assert_eq!(payload["authLogin"], "login");
        assert_eq!(payload["secure"], "signature");
    }

    #[test]
    fn test_payload_includes_services() {
        let mut query = ShippingCostQuery::new(TariffQuery::Single(1));
        query.services.push(CalculatorService {
            id: 2,
            param: Some(1000),
        });

        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let payload = query.to_payload(date, None);

        assert_eq!(payload["services"][0]["id"], 2);
        assert_eq!(payload["services"][0]["param"], 1000);
    }

    #[test]
    fn test_from_response_parses_result() {
        let response = serde_json::json!({
            "result": {
                "price": "1250.50",
                "tariffId": 3,
                "deliveryDateMin": "2024-06-03",
                "deliveryDateMax": "2024-06-05",
                "services": [
                    { "id": 5, "title": "Heavy", "price": 300 },
                    { "id": 2, "title": "Insurance", "rate": 0.75 },
                ],
            },
        });

        let cost = ShippingCost::from_response(&response).unwrap();
        assert!((cost.price - 1250.50).abs() < f64::EPSILON);
        assert_eq!(cost.tariff_id, 3);
        assert_eq!(
            cost.delivery_date_min,
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
        );
        assert!(cost.is_heavy());
        assert!(!cost.is_over_sized());
        assert_eq!(cost.services[1].rate, Some(0.75));
    }

    #[test]
    fn test_from_response_maps_error_list() {
        let response = serde_json::json!({
            "error": [{ "code": 3, "text": "No delivery on this route" }],
        });

        let error = ShippingCost::from_response(&response).unwrap_err();
        match error {
            CalculatorError::Cost(cost_error) => {
                assert!(cost_error.is_delivery_unavailable());
                assert!(cost_error.to_string().contains("No delivery"));
            }
            other => panic!("expected cost error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_response_rejects_missing_result() {
        let response = serde_json::json!({});
        assert!(matches!(
            ShippingCost::from_response(&response),
            Err(CalculatorError::MissingField { field: "result" })
        ));
    }
}
