//! Customer orders and the fulfillment status workflow.

use std::collections::BTreeMap;

use orderdesk_firestore::{Document, Value};

use crate::record::{optional_str, put_opt_str, require_str, DecodeError, Record};

/// Fulfillment state of an order.
///
/// The workflow moves strictly forward — `Pending` → `Confirmed` →
/// `Delivering` → `Completed` — and any active order can be cancelled.
/// `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Delivering,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in workflow order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Delivering,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Stored key, as written into order documents.
    pub fn as_key(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Delivering => "delivering",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_key(key: &str) -> Option<OrderStatus> {
        Self::ALL.into_iter().find(|status| status.as_key() == key)
    }

    /// Display label shown in the admin screens.
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Chờ xác nhận",
            OrderStatus::Confirmed => "Đã xác nhận",
            OrderStatus::Delivering => "Đang giao",
            OrderStatus::Completed => "Hoàn thành",
            OrderStatus::Cancelled => "Đã hủy",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Statuses this one may move to.
    pub fn next_statuses(self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Confirmed, OrderStatus::Cancelled],
            OrderStatus::Confirmed => &[OrderStatus::Delivering, OrderStatus::Cancelled],
            OrderStatus::Delivering => &[OrderStatus::Completed, OrderStatus::Cancelled],
            OrderStatus::Completed | OrderStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self.next_statuses().contains(&next)
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
    /// Unit price in đồng at order time.
    pub price: i64,
}

impl OrderItem {
    pub fn subtotal(&self) -> i64 {
        self.quantity * self.price
    }

    fn from_value(
        value: &Value,
        order_id: &str,
    ) -> Result<OrderItem, DecodeError> {
        let item = value.as_map().ok_or(DecodeError::WrongType {
            collection: Order::COLLECTION,
            id: order_id.to_owned(),
            field: "items",
        })?;
        let wrong_type = || DecodeError::WrongType {
            collection: Order::COLLECTION,
            id: order_id.to_owned(),
            field: "items",
        };

        Ok(OrderItem {
            product_id: item
                .get("productId")
                .and_then(Value::as_str)
                .ok_or_else(wrong_type)?
                .to_owned(),
            name: item
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(wrong_type)?
                .to_owned(),
            quantity: item
                .get("quantity")
                .and_then(Value::as_i64)
                .ok_or_else(wrong_type)?,
            price: item
                .get("price")
                .and_then(Value::as_i64)
                .ok_or_else(wrong_type)?,
        })
    }

    fn to_value(&self) -> Value {
        let mut item = BTreeMap::new();
        item.insert("productId".to_string(), Value::from(self.product_id.clone()));
        item.insert("name".to_string(), Value::from(self.name.clone()));
        item.insert("quantity".to_string(), Value::Integer(self.quantity));
        item.insert("price".to_string(), Value::Integer(self.price));
        Value::Map(item)
    }
}

/// How the customer pays.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaymentMethod {
    /// Saved card reference; `None` means cash on delivery.
    pub card_id: Option<String>,
}

/// A customer order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub full_name: String,
    pub address: String,
    pub phone_number: String,
    pub payment_method: PaymentMethod,
    /// Delivery note from the customer.
    pub notify: String,
    pub items: Vec<OrderItem>,
    pub user_id: String,
    pub created_at: Option<String>,
    pub status: OrderStatus,
}

impl Order {
    /// Order total in đồng.
    pub fn total(&self) -> i64 {
        self.items.iter().map(OrderItem::subtotal).sum()
    }
}

impl Record for Order {
    const COLLECTION: &'static str = "orders";

    fn from_document(doc: &Document) -> Result<Self, DecodeError> {
        let status_key = require_str(doc, Self::COLLECTION, "status")?;
        let status = OrderStatus::from_key(&status_key).ok_or(DecodeError::WrongType {
            collection: Self::COLLECTION,
            id: doc.id.clone(),
            field: "status",
        })?;

        let items = match doc.get("items") {
            Some(Value::Array(values)) => values
                .iter()
                .map(|value| OrderItem::from_value(value, &doc.id))
                .collect::<Result<Vec<_>, _>>()?,
            _ => Vec::new(),
        };

        let payment_method = PaymentMethod {
            card_id: doc
                .get("paymentMethod")
                .and_then(Value::as_map)
                .and_then(|pm| pm.get("cardId"))
                .and_then(Value::as_str)
                .map(str::to_owned),
        };

        Ok(Order {
            id: doc.id.clone(),
            full_name: require_str(doc, Self::COLLECTION, "fullName")?,
            address: require_str(doc, Self::COLLECTION, "address")?,
            phone_number: require_str(doc, Self::COLLECTION, "phoneNumber")?,
            payment_method,
            notify: optional_str(doc, "notify").unwrap_or_default(),
            items,
            user_id: require_str(doc, Self::COLLECTION, "userId")?,
            created_at: optional_str(doc, "createdAt"),
            status,
        })
    }

    fn to_fields(&self) -> BTreeMap<String, Value> {
        let mut payment = BTreeMap::new();
        if let Some(card_id) = &self.payment_method.card_id {
            payment.insert("cardId".to_string(), Value::from(card_id.clone()));
        }

        let mut fields = BTreeMap::new();
        fields.insert("fullName".to_string(), Value::from(self.full_name.clone()));
        fields.insert("address".to_string(), Value::from(self.address.clone()));
        fields.insert(
            "phoneNumber".to_string(),
            Value::from(self.phone_number.clone()),
        );
        fields.insert("paymentMethod".to_string(), Value::Map(payment));
        fields.insert("notify".to_string(), Value::from(self.notify.clone()));
        fields.insert(
            "items".to_string(),
            Value::Array(self.items.iter().map(OrderItem::to_value).collect()),
        );
        fields.insert("userId".to_string(), Value::from(self.user_id.clone()));
        fields.insert("status".to_string(), Value::from(self.status.as_key()));
        put_opt_str(&mut fields, "createdAt", self.created_at.as_ref());
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_moves_forward_with_cancel_exits() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Delivering));
        assert!(OrderStatus::Delivering.can_transition_to(OrderStatus::Completed));

        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivering));
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Delivering.can_transition_to(OrderStatus::Confirmed));
    }

    #[test]
    fn terminal_statuses_go_nowhere() {
        for status in [OrderStatus::Completed, OrderStatus::Cancelled] {
            assert!(status.is_terminal());
            assert!(status.next_statuses().is_empty());
        }
    }

    #[test]
    fn status_keys_round_trip() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::from_key(status.as_key()), Some(status));
        }
        assert_eq!(OrderStatus::from_key("refunded"), None);
    }

    fn sample_order() -> Order {
        Order {
            id: "ord1".to_string(),
            full_name: "Nguyễn Văn An".to_string(),
            address: "12 Tràng Thi, Hà Nội".to_string(),
            phone_number: "0901234567".to_string(),
            payment_method: PaymentMethod { card_id: None },
            notify: "Gọi trước khi giao".to_string(),
            items: vec![
                OrderItem {
                    product_id: "tea1".to_string(),
                    name: "Trà đá".to_string(),
                    quantity: 3,
                    price: 10000,
                },
                OrderItem {
                    product_id: "bm2".to_string(),
                    name: "Bánh mì".to_string(),
                    quantity: 1,
                    price: 25000,
                },
            ],
            user_id: "u1".to_string(),
            created_at: Some("2025-04-01T08:30:00Z".to_string()),
            status: OrderStatus::Pending,
        }
    }

    #[test]
    fn total_sums_line_subtotals() {
        assert_eq!(sample_order().total(), 55000);
    }

    #[test]
    fn document_round_trip() {
        let order = sample_order();
        let doc = Document {
            id: order.id.clone(),
            fields: order.to_fields(),
        };
        assert_eq!(Order::from_document(&doc).unwrap(), order);
    }

    #[test]
    fn unknown_status_key_is_a_typed_error() {
        let mut doc = Document {
            id: "ord1".to_string(),
            fields: sample_order().to_fields(),
        };
        doc.fields
            .insert("status".to_string(), Value::from("refunded"));
        assert!(matches!(
            Order::from_document(&doc),
            Err(DecodeError::WrongType { field: "status", .. })
        ));
    }
}
