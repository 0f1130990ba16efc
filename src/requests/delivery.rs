//! Delivery request builder.
//!
//! [`DeliveryRequest`] assembles the carrier's order registration tree:
//! request → orders → (address, packages → items, added services). Entities
//! are appended through `add_*` calls that return copyable index handles
//! into the request's backing store, so a caller can keep extending an
//! order or package after adding it.
//!
//! Insertion order is preserved at every level; the carrier treats array
//! position in the serialized document as significant.
//!
//! # Example
//!
//! ```rust
//! use cdek_api::requests::{Address, DeliveryRequest, ItemParams, OrderParams, PackageParams};
//!
//! let mut request = DeliveryRequest::new("12345");
//! let order = request.add_order(OrderParams::new("100", 1, "Ivanov Ivan", "+79999999999"));
//! request.add_address(order, Address::street("Pushkina", "50", "1"));
//!
//! let package = request.add_package(order, PackageParams::default());
//! request.add_item(package, ItemParams::new(500, "SKU-1", 1200.0));
//! ```

use crate::xml::Element;

/// Handle to an order inside a [`DeliveryRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderHandle(usize);

/// Handle to a package inside a [`DeliveryRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageHandle {
    order: usize,
    package: usize,
}

/// Fields of an order, enumerated explicitly.
///
/// Required fields are set through [`OrderParams::new`]; optional fields
/// are public and default to absent. Values are passed through to the wire
/// format unchanged, without range validation.
#[derive(Debug, Clone)]
pub struct OrderParams {
    /// Client-side order number, unique within the client's orders.
    pub number: String,
    /// Tariff type code.
    pub tariff_type_code: u32,
    /// Recipient full name.
    pub recipient_name: String,
    /// Recipient phone.
    pub phone: String,
    /// Sender city code in the carrier's database.
    pub send_city_code: Option<u32>,
    /// Sender city postal code.
    pub send_city_post_code: Option<String>,
    /// Receiver city code in the carrier's database.
    pub rec_city_code: Option<u32>,
    /// Receiver city postal code.
    pub rec_city_post_code: Option<String>,
    /// Extra delivery charge collected from the recipient.
    pub shipping_price: Option<f64>,
    /// Free-text remarks for the order.
    pub comment: Option<String>,
    /// True seller name shown on printed forms.
    pub seller_name: Option<String>,
}

impl OrderParams {
    /// Creates order parameters with the required fields set.
    #[must_use]
    pub fn new(
        number: impl Into<String>,
        tariff_type_code: u32,
        recipient_name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            tariff_type_code,
            recipient_name: recipient_name.into(),
            phone: phone.into(),
            send_city_code: None,
            send_city_post_code: None,
            rec_city_code: None,
            rec_city_post_code: None,
            shipping_price: None,
            comment: None,
            seller_name: None,
        }
    }
}

/// Delivery address of an order.
///
/// Either a delivery-point (PVZ) code for warehouse-mode orders, or a
/// street/house/flat tuple for door delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    /// Delivery to a pickup point identified by its code.
    DeliveryPoint {
        /// Carrier code of the pickup point.
        pvz_code: String,
    },
    /// Delivery to a street address.
    Street {
        /// Street name.
        street: String,
        /// House, building, block.
        house: String,
        /// Flat or office.
        flat: String,
    },
}

impl Address {
    /// Creates a delivery-point address.
    #[must_use]
    pub fn delivery_point(pvz_code: impl Into<String>) -> Self {
        Self::DeliveryPoint {
            pvz_code: pvz_code.into(),
        }
    }

    /// Creates a street address.
    #[must_use]
    pub fn street(
        street: impl Into<String>,
        house: impl Into<String>,
        flat: impl Into<String>,
    ) -> Self {
        Self::Street {
            street: street.into(),
            house: house.into(),
            flat: flat.into(),
        }
    }

    fn to_element(&self) -> Element {
        let mut element = Element::new("Address");
        match self {
            Self::DeliveryPoint { pvz_code } => element.attr("PvzCode", pvz_code),
            Self::Street {
                street,
                house,
                flat,
            } => {
                element.attr("Street", street);
                element.attr("House", house);
                element.attr("Flat", flat);
            }
        }
        element
    }
}

/// Fields of a package.
///
/// All fields are optional: the package number and barcode default to the
/// owning order's number, and dimensions are emitted only when all three
/// sides are present.
#[derive(Debug, Clone, Default)]
pub struct PackageParams {
    /// Package length in centimeters.
    pub size_a: Option<u32>,
    /// Package width in centimeters.
    pub size_b: Option<u32>,
    /// Package height in centimeters.
    pub size_c: Option<u32>,
    /// Package number, unique within the order.
    pub number: Option<String>,
    /// Package barcode used for warehouse handling.
    pub barcode: Option<String>,
    /// Total weight in grams.
    pub weight: Option<u32>,
}

/// Fields of an item inside a package.
#[derive(Debug, Clone)]
pub struct ItemParams {
    /// Weight per unit in grams.
    pub weight: u32,
    /// Seller-assigned item identifier (SKU).
    pub ware_key: String,
    /// Declared cost per unit.
    pub cost: f64,
    /// Payment collected on delivery per unit.
    pub payment: f64,
    /// Number of units.
    pub amount: u32,
    /// Item name, optionally with a description.
    pub comment: Option<String>,
}

impl ItemParams {
    /// Creates item parameters with the required fields set.
    ///
    /// `payment` defaults to `0` and `amount` to `1`.
    #[must_use]
    pub fn new(weight: u32, ware_key: impl Into<String>, cost: f64) -> Self {
        Self {
            weight,
            ware_key: ware_key.into(),
            cost,
            payment: 0.0,
            amount: 1,
            comment: None,
        }
    }
}

/// An added service attached to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddService {
    /// Service type code.
    pub code: u32,
    /// Number of packages the service applies to.
    pub count: Option<u32>,
}

impl AddService {
    /// Creates an added service with the given code.
    #[must_use]
    pub const fn new(code: u32) -> Self {
        Self { code, count: None }
    }
}

#[derive(Debug, Clone)]
struct Package {
    number: String,
    barcode: String,
    size: Option<(u32, u32, u32)>,
    weight: Option<u32>,
    items: Vec<ItemParams>,
}

#[derive(Debug, Clone)]
struct Order {
    params: OrderParams,
    address: Option<Address>,
    packages: Vec<Package>,
    services: Vec<AddService>,
}

/// Builder for the carrier's order registration document.
///
/// Owns a backing store of orders and packages; the handles returned by
/// [`add_order`](Self::add_order) and [`add_package`](Self::add_package)
/// are indices into it and stay valid for the lifetime of the request.
///
/// The builder performs pure in-memory mutation and no I/O; one
/// serialization pass in [`to_element`](Self::to_element) produces the
/// wire document.
#[derive(Debug, Clone)]
pub struct DeliveryRequest {
    number: String,
    orders: Vec<Order>,
}

impl DeliveryRequest {
    /// Creates an empty delivery request with the given document number.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            orders: Vec::new(),
        }
    }

    /// Returns the document number.
    #[must_use]
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Returns the number of orders added so far.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Appends an order and returns a handle to it.
    ///
    /// Field values are not validated; malformed values pass through to
    /// the wire format unchanged.
    pub fn add_order(&mut self, params: OrderParams) -> OrderHandle {
        self.orders.push(Order {
            params,
            address: None,
            packages: Vec::new(),
            services: Vec::new(),
        });
        OrderHandle(self.orders.len() - 1)
    }

    /// Attaches the delivery address to an order.
    ///
    /// An order carries exactly one address: calling this twice on the same
    /// handle replaces the previous address without an error.
    ///
    /// # Panics
    ///
    /// Panics if `order` was produced by a different request.
    pub fn add_address(&mut self, order: OrderHandle, address: Address) {
        self.orders[order.0].address = Some(address);
    }

    /// Appends a package to an order and returns a handle to it.
    ///
    /// The package number and barcode default to the owning order's number
    /// when unset. Dimensions are kept only if all three sides are present.
    ///
    /// # Panics
    ///
    /// Panics if `order` was produced by a different request.
    pub fn add_package(&mut self, order: OrderHandle, params: PackageParams) -> PackageHandle {
        let entry = &mut self.orders[order.0];
        let order_number = entry.params.number.clone();

        let size = match (params.size_a, params.size_b, params.size_c) {
            (Some(a), Some(b), Some(c)) => Some((a, b, c)),
            _ => None,
        };

        entry.packages.push(Package {
            number: params.number.unwrap_or_else(|| order_number.clone()),
            barcode: params.barcode.unwrap_or(order_number),
            size,
            weight: params.weight,
            items: Vec::new(),
        });

        PackageHandle {
            order: order.0,
            package: entry.packages.len() - 1,
        }
    }

    /// Appends an item to a package.
    ///
    /// # Panics
    ///
    /// Panics if `package` was produced by a different request.
    pub fn add_item(&mut self, package: PackageHandle, params: ItemParams) {
        self.orders[package.order].packages[package.package]
            .items
            .push(params);
    }

    /// Appends an added service to an order.
    ///
    /// # Panics
    ///
    /// Panics if `order` was produced by a different request.
    pub fn add_service(&mut self, order: OrderHandle, service: AddService) {
        self.orders[order.0].services.push(service);
    }

    /// Serializes the tree into the carrier's `DeliveryRequest` document.
    ///
    /// `OrderCount` is computed from the order sequence.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut root = Element::new("DeliveryRequest");
        root.attr("Number", &self.number);
        root.attr("OrderCount", self.orders.len());

        for order in &self.orders {
            root.child(order.to_element());
        }
        root
    }
}

impl Order {
    fn to_element(&self) -> Element {
        let mut element = Element::new("Order");
        let params = &self.params;

        element.attr("Number", &params.number);
        element.opt_attr("SendCityCode", params.send_city_code);
        element.opt_attr("SendCityPostCode", params.send_city_post_code.as_ref());
        element.opt_attr("RecCityCode", params.rec_city_code);
        element.opt_attr("RecCityPostCode", params.rec_city_post_code.as_ref());
        element.attr("RecipientName", &params.recipient_name);
        element.attr("TariffTypeCode", params.tariff_type_code);
        element.opt_attr("DeliveryRecipientCost", params.shipping_price);
        element.attr("Phone", &params.phone);
        element.opt_attr("Comment", params.comment.as_ref());
        element.opt_attr("SellerName", params.seller_name.as_ref());

        if let Some(address) = &self.address {
            element.child(address.to_element());
        }
        for package in &self.packages {
            element.child(package.to_element());
        }
        for service in &self.services {
            let mut child = Element::new("AddService");
            child.attr("ServiceCode", service.code);
            child.opt_attr("Count", service.count);
            element.child(child);
        }
        element
    }
}

impl Package {
    fn to_element(&self) -> Element {
        let mut element = Element::new("Package");
        element.attr("Number", &self.number);
        element.attr("BarCode", &self.barcode);
        if let Some((a, b, c)) = self.size {
            element.attr("SizeA", a);
            element.attr("SizeB", b);
            element.attr("SizeC", c);
        }
        element.opt_attr("Weight", self.weight);

        for item in &self.items {
            let mut child = Element::new("Item");
            child.attr("Amount", item.amount);
            child.attr("Weight", item.weight);
            child.attr("WareKey", &item.ware_key);
            child.attr("Cost", item.cost);
            child.attr("Payment", item.payment);
            child.opt_attr("Comment", item.comment.as_ref());
            element.child(child);
        }
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order(number: &str) -> OrderParams {
        OrderParams::new(number, 1, "Ivanov Ivan", "+79999999999")
    }

    #[test]
    fn test_add_order_preserves_insertion_order() {
        let mut request = DeliveryRequest::new("12345");
        request.add_order(sample_order("first"));
        request.add_order(sample_order("second"));
        request.add_order(sample_order("third"));

        let element = request.to_element();
        let numbers: Vec<_> = element
            .children()
            .iter()
            .map(|order| order.attribute("Number").unwrap().to_string())
            .collect();
        assert_eq!(numbers, ["first", "second", "third"]);
        assert_eq!(element.attribute("OrderCount"), Some("3"));
    }

    #[test]
    fn test_add_address_overwrites_previous() {
        let mut request = DeliveryRequest::new("12345");
        let order = request.add_order(sample_order("100"));
        request.add_address(order, Address::street("Lenina", "1", "2"));
        request.add_address(order, Address::delivery_point("XAB1"));

        let element = request.to_element();
        let order = &element.children()[0];
        let addresses: Vec<_> = order
            .children()
            .iter()
            .filter(|child| child.tag() == "Address")
            .collect();
        assert_eq!(addresses.len(), 1);
        assert_eq!(addresses[0].attribute("PvzCode"), Some("XAB1"));
        assert_eq!(addresses[0].attribute("Street"), None);
    }

    #[test]
    fn test_order_without_packages_serializes() {
        let mut request = DeliveryRequest::new("12345");
        request.add_order(sample_order("100"));

        let element = request.to_element();
        let order = &element.children()[0];
        assert!(order.children().is_empty());
    }

    #[test]
    fn test_package_number_and_barcode_default_to_order_number() {
        let mut request = DeliveryRequest::new("12345");
        let order = request.add_order(sample_order("ORD-7"));
        request.add_package(order, PackageParams::default());

        let element = request.to_element();
        let package = &element.children()[0].children()[0];
        assert_eq!(package.attribute("Number"), Some("ORD-7"));
        assert_eq!(package.attribute("BarCode"), Some("ORD-7"));
    }

    #[test]
    fn test_partial_dimensions_are_dropped() {
        let mut request = DeliveryRequest::new("12345");
        let order = request.add_order(sample_order("100"));
        let params = PackageParams {
            size_a: Some(10),
            size_b: Some(7),
            weight: Some(300),
            ..PackageParams::default()
        };
        request.add_package(order, params);

        let element = request.to_element();
        let package = &element.children()[0].children()[0];
        assert_eq!(package.attribute("SizeA"), None);
        assert_eq!(package.attribute("SizeB"), None);
        assert_eq!(package.attribute("Weight"), Some("300"));
    }

    #[test]
    fn test_complete_dimensions_are_kept() {
        let mut request = DeliveryRequest::new("12345");
        let order = request.add_order(sample_order("100"));
        let params = PackageParams {
            size_a: Some(10),
            size_b: Some(7),
            size_c: Some(5),
            ..PackageParams::default()
        };
        request.add_package(order, params);

        let element = request.to_element();
        let package = &element.children()[0].children()[0];
        assert_eq!(package.attribute("SizeA"), Some("10"));
        assert_eq!(package.attribute("SizeB"), Some("7"));
        assert_eq!(package.attribute("SizeC"), Some("5"));
    }

    #[test]
    fn test_item_defaults() {
        let mut request = DeliveryRequest::new("12345");
        let order = request.add_order(sample_order("100"));
        let package = request.add_package(order, PackageParams::default());
        request.add_item(package, ItemParams::new(500, "SKU-1", 1200.0));

        let element = request.to_element();
        let item = &element.children()[0].children()[0].children()[0];
        assert_eq!(item.attribute("Amount"), Some("1"));
        assert_eq!(item.attribute("Payment"), Some("0"));
        assert_eq!(item.attribute("WareKey"), Some("SKU-1"));
        assert_eq!(item.attribute("Comment"), None);
    }

    #[test]
    fn test_add_service_appends_child() {
        let mut request = DeliveryRequest::new("12345");
        let order = request.add_order(sample_order("100"));
        request.add_service(order, AddService::new(30));

        let element = request.to_element();
        let service = &element.children()[0].children()[0];
        assert_eq!(service.tag(), "AddService");
        assert_eq!(service.attribute("ServiceCode"), Some("30"));
        assert_eq!(service.attribute("Count"), None);
    }

    #[test]
    fn test_handles_address_packages_for_separate_orders() {
        let mut request = DeliveryRequest::new("12345");
        let first = request.add_order(sample_order("1"));
        let second = request.add_order(sample_order("2"));

        request.add_package(second, PackageParams::default());
        let package = request.add_package(first, PackageParams::default());
        request.add_item(package, ItemParams::new(100, "A", 10.0));

        let element = request.to_element();
        let first_order = &element.children()[0];
        let second_order = &element.children()[1];
        assert_eq!(first_order.children()[0].children().len(), 1);
        assert!(second_order.children()[0].children().is_empty());
    }
}
