// storefront/src/render/templates.rs

//! Model → node templates for the cart, checkout confirmation and order views.
//!
//! Interactive elements carry `data-action` and `data-slug`/`data-order-id`
//! attributes; a front-end dispatches them to the bound component handlers
//! instead of inline script.

use crate::models::{CartItem, CartView, Order};
use crate::render::money::format_money;
use crate::render::node::Node;

pub const ACTION_CHANGE_QUANTITY: &str = "change-quantity";
pub const ACTION_REMOVE: &str = "remove";
pub const ACTION_CANCEL_ORDER: &str = "cancel-order";

pub fn cart_row(index: usize, item: &CartItem, currency: &str) -> Node {
  Node::el("tr").attr("data-slug", item.product_slug.clone()).children([
    Node::el("th").attr("scope", "row").child(Node::text((index + 1).to_string())),
    Node::with_text("td", item.product_name_snapshot.clone()),
    Node::with_text("td", format_money(item.price_at_time, currency)),
    Node::el("td").child(
      Node::el("input")
        .attr("type", "number")
        .attr("min", "1")
        .attr("value", item.quantity.to_string())
        .attr("class", "form-control")
        .attr("data-action", ACTION_CHANGE_QUANTITY)
        .attr("data-slug", item.product_slug.clone()),
    ),
    Node::with_text(
      "td",
      item
        .line_total()
        .map(|sum| format_money(sum, currency))
        .unwrap_or_else(|| "-".to_string()),
    ),
    Node::el("td").child(
      Node::el("button")
        .attr("class", "btn btn-danger btn-sm")
        .attr("data-action", ACTION_REMOVE)
        .attr("data-slug", item.product_slug.clone())
        .child(Node::text("Remove")),
    ),
  ])
}

/// One row per item, numbered from 1. An empty cart renders no rows.
pub fn cart_rows(view: &CartView, currency: &str) -> Vec<Node> {
  view
    .items
    .iter()
    .enumerate()
    .map(|(idx, item)| cart_row(idx, item, currency))
    .collect()
}

pub fn cart_total(view: &CartView, currency: &str) -> Vec<Node> {
  vec![Node::text(format_money(view.total, currency))]
}

fn order_lines(order: &Order, currency: &str) -> Node {
  Node::el("ul").children(order.order_items.iter().map(|item| {
    Node::with_text(
      "li",
      format!(
        "{} (x{}) - {}",
        item.product_name_snapshot,
        item.quantity,
        format_money(item.price_at_time, currency)
      ),
    )
  }))
}

/// Shown after a successful checkout.
pub fn order_confirmation(order: &Order, currency: &str) -> Node {
  Node::el("div").attr("class", "order-details").children([
    Node::with_text("h2", format!("Order #{}", order.id)),
    Node::with_text("p", format!("Status: {}", order.status)),
    Node::with_text("p", format!("Total: {}", format_money(order.total_price, currency))),
    Node::with_text("h3", "Items in this order:"),
    order_lines(order, currency),
  ])
}

fn order_date(order: &Order) -> String {
  order
    .created_at
    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
    .unwrap_or_else(|| "-".to_string())
}

fn cancel_button(order: &Order, label: &str) -> Node {
  Node::el("button")
    .attr("data-action", ACTION_CANCEL_ORDER)
    .attr("data-order-id", order.id.to_string())
    .child(Node::text(label))
}

pub fn order_summary(order: &Order, currency: &str) -> Node {
  Node::el("div")
    .attr("class", "order")
    .attr("data-order-id", order.id.to_string())
    .children([
      Node::with_text("p", format!("Order #{}", order.id)),
      Node::with_text("p", format!("Date: {}", order_date(order))),
      Node::with_text("p", format!("Status: {}", order.status)),
      Node::with_text("p", format!("Total: {}", format_money(order.total_price, currency))),
      cancel_button(order, "Cancel"),
    ])
}

pub fn order_list(orders: &[Order], currency: &str) -> Vec<Node> {
  orders.iter().map(|o| order_summary(o, currency)).collect()
}

pub fn order_detail(order: &Order, currency: &str) -> Vec<Node> {
  let mut nodes = vec![
    Node::with_text("p", format!("Order #{}", order.id)),
    Node::with_text("p", format!("Date: {}", order_date(order))),
    Node::with_text("p", format!("Status: {}", order.status)),
    Node::with_text("p", format!("Total: {}", format_money(order.total_price, currency))),
  ];
  if !order.order_items.is_empty() {
    nodes.push(order_lines(order, currency));
  }
  nodes.push(cancel_button(order, "Cancel order"));
  nodes
}
