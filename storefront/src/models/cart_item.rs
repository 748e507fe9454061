// storefront/src/models/cart_item.rs

use crate::errors::{ClientError, Result};
use crate::render::money::cart_total;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of the server-held cart.
///
/// `product_name_snapshot` and `price_at_time` are fixed when the product was
/// added; only `quantity` changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
  pub product_slug: String,
  pub product_name_snapshot: String,
  pub price_at_time: Decimal,
  pub quantity: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cart_id: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<DateTime<Utc>>,
}

impl CartItem {
  pub fn new(slug: impl Into<String>, name: impl Into<String>, price: Decimal, quantity: u32) -> Self {
    Self {
      product_slug: slug.into(),
      product_name_snapshot: name.into(),
      price_at_time: price,
      quantity,
      id: None,
      cart_id: None,
      created_at: None,
      updated_at: None,
    }
  }

  /// `None` when the product does not fit a `Decimal`.
  pub fn line_total(&self) -> Option<Decimal> {
    self.price_at_time.checked_mul(Decimal::from(self.quantity))
  }
}

/// Body of `GET /v1/cart`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
  #[serde(default)]
  pub cart_items: Vec<CartItem>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub user_id: Option<i64>,
}

/// What the client shows after a fetch: the items plus a total recomputed from
/// them. Never updated in place; every fetch builds a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartView {
  pub items: Vec<CartItem>,
  pub total: Decimal,
}

impl CartView {
  /// Fails with `ClientError::Decode` when a line or the total overflows.
  pub fn from_items(items: Vec<CartItem>) -> Result<Self> {
    let total = cart_total(&items)
      .ok_or_else(|| ClientError::Decode("cart total does not fit a decimal".to_string()))?;
    Ok(Self { items, total })
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn item(&self, slug: &str) -> Option<&CartItem> {
    self.items.iter().find(|i| i.product_slug == slug)
  }
}

impl TryFrom<CartSnapshot> for CartView {
  type Error = ClientError;

  fn try_from(snapshot: CartSnapshot) -> Result<Self> {
    CartView::from_items(snapshot.cart_items)
  }
}

/// Body of the add (`POST`) and change-quantity (`PATCH`) cart requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartPayload {
  pub product_slug: String,
  pub quantity: u32,
}
