// storefront/src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Completed,
  Cancelled,
  /// A status this client does not know yet, kept verbatim.
  #[serde(untagged)]
  Other(String),
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OrderStatus::Pending => f.write_str("pending"),
      OrderStatus::Completed => f.write_str("completed"),
      OrderStatus::Cancelled => f.write_str("cancelled"),
      OrderStatus::Other(s) => f.write_str(s),
    }
  }
}

/// Line of an order, shaped like a cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
  pub product_slug: String,
  pub product_name_snapshot: String,
  pub price_at_time: Decimal,
  pub quantity: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub order_id: Option<i64>,
}

/// An order as returned by checkout and the orders endpoints. Read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
  pub id: i64,
  pub status: OrderStatus,
  pub total_price: Decimal,
  /// The short listing schema omits the lines.
  #[serde(default)]
  pub order_items: Vec<OrderItem>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub user_id: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderItem {
  pub product_slug: String,
  pub quantity: u32,
}

/// Body of `POST /orders/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
  pub order_items: Vec<NewOrderItem>,
}

impl NewOrder {
  pub fn with_item(mut self, slug: impl Into<String>, quantity: u32) -> Self {
    self.order_items.push(NewOrderItem {
      product_slug: slug.into(),
      quantity,
    });
    self
  }
}
