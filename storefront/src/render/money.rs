// storefront/src/render/money.rs

use crate::models::CartItem;
use rust_decimal::{Decimal, RoundingStrategy};

/// Σ price_at_time × quantity, computed from scratch every time. `None` on
/// overflow.
pub fn cart_total(items: &[CartItem]) -> Option<Decimal> {
  items
    .iter()
    .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.line_total()?))
}

/// Two decimals (half away from zero), a space, then the currency suffix.
pub fn format_money(value: Decimal, suffix: &str) -> String {
  let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
  if suffix.is_empty() {
    format!("{:.2}", rounded)
  } else {
    format!("{:.2} {}", rounded, suffix)
  }
}
