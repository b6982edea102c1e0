//! Order Model
//!
//! Orders embed the customer contact snapshot inline and own an ordered
//! collection of records. Records snapshot product name and unit price at
//! commit time and are never updated afterwards.

use serde::{Deserialize, Serialize};

use crate::util::millis_to_rfc3339;

/// Order entity
///
/// Customer contact columns are embedded on the orders row. `order_date`
/// is unix millis; views render it RFC 3339.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub city: String,
    pub delivery_address: String,
    pub order_date: i64,
    pub status: String,
    pub payment_received: bool,
    pub notes: Option<String>,
}

/// Order line item with name/price snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderRecord {
    pub id: i64,
    pub order_id: i64,
    pub product_instance_id: i64,
    pub product_name: String,
    /// Unit price in cents, snapshotted at commit
    pub price: i64,
    pub quantity: i64,
}

/// Buyer contact block, denormalised onto each order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub city: String,
    pub delivery_address: String,
}

/// One requested line of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    pub product_instance_id: i64,
    pub quantity: i64,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateRequest {
    pub customer: CustomerInfo,
    pub order_records: Vec<OrderLineRequest>,
}

/// Update order payload — status and notes only
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdateRequest {
    pub status: String,
    pub notes: Option<String>,
}

/// Per-line fulfilment outcome of order creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fulfillment {
    /// Accepted at the requested quantity
    #[serde(rename = "full")]
    Full,
    /// Accepted with quantity reduced to the available stock
    #[serde(rename = "clamped")]
    Clamped,
    /// Dropped: the variant had zero stock
    #[serde(rename = "skipped:out_of_stock")]
    SkippedOutOfStock,
    /// Dropped: no such variant
    #[serde(rename = "skipped:missing")]
    SkippedMissing,
}

/// Persisted record as returned to clients
///
/// `fulfillment` is only present on the response of the creating call;
/// later reads return the records without it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecordView {
    pub product_instance_id: i64,
    pub product_name: String,
    pub price: i64,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfillment: Option<Fulfillment>,
}

/// A requested line that produced no record, reported on creation only
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedLineView {
    pub product_instance_id: i64,
    pub requested: i64,
    pub fulfillment: Fulfillment,
}

/// Full order view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: i64,
    pub user_id: String,
    pub customer: CustomerInfo,
    /// RFC 3339 UTC
    pub order_date: String,
    pub status: String,
    pub payment_received: bool,
    pub notes: Option<String>,
    pub order_records: Vec<OrderRecordView>,
    /// Lines dropped by the reservation policy (creation response only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_lines: Vec<SkippedLineView>,
}

impl Order {
    /// Assemble a view from the entity and its records
    pub fn into_view(self, records: Vec<OrderRecordView>) -> OrderView {
        OrderView {
            id: self.id,
            user_id: self.user_id,
            customer: CustomerInfo {
                first_name: self.first_name,
                last_name: self.last_name,
                email: self.email,
                phone_number: self.phone_number,
                city: self.city,
                delivery_address: self.delivery_address,
            },
            order_date: millis_to_rfc3339(self.order_date),
            status: self.status,
            payment_received: self.payment_received,
            notes: self.notes,
            order_records: records,
            skipped_lines: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fulfillment_wire_names() {
        assert_eq!(
            serde_json::to_string(&Fulfillment::SkippedOutOfStock).unwrap(),
            "\"skipped:out_of_stock\""
        );
        assert_eq!(serde_json::to_string(&Fulfillment::Clamped).unwrap(), "\"clamped\"");
    }

    #[test]
    fn test_order_create_request_wire_shape() {
        let json = r#"{
            "customer": { "firstName": "Ada", "lastName": "Lovelace",
                          "email": "ada@example.com", "phoneNumber": "+44 1",
                          "city": "London", "deliveryAddress": "12 Byron St" },
            "orderRecords": [ { "productInstanceId": 7, "quantity": 2 } ]
        }"#;
        let req: OrderCreateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.customer.first_name, "Ada");
        assert_eq!(req.order_records[0].product_instance_id, 7);
        assert_eq!(req.order_records[0].quantity, 2);
    }

    #[test]
    fn test_order_view_hides_empty_skipped_lines() {
        let order = Order {
            id: 1,
            user_id: "u1".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone_number: "+44 1".into(),
            city: "London".into(),
            delivery_address: "12 Byron St".into(),
            order_date: 1_704_067_200_000,
            status: "Created".into(),
            payment_received: false,
            notes: None,
        };
        let view = order.into_view(Vec::new());
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"orderDate\":\"2024-01-01T00:00:00.000Z\""));
        assert!(!json.contains("skippedLines"));
        assert!(json.contains("\"paymentReceived\":false"));
    }
}
