// storefront/src/flows/checkout_flow.rs

use crate::api::order_page_path;
use crate::errors::{ClientError, Result};
use crate::flows::contexts::CheckoutData;
use crate::models::Order;
use crate::render::{money::format_money, templates};
use storefront_flow::{ContextData, Flow, FlowControl, FlowRegistry};
use tracing::{info, instrument};

fn placed_order(ctx_data: &ContextData<CheckoutData>) -> Result<Order> {
  ctx_data
    .read()
    .order
    .clone()
    .ok_or_else(|| ClientError::Internal("checkout produced no order".to_string()))
}

pub fn register_checkout_flow(registry: &FlowRegistry<ClientError>) {
  let mut flow = Flow::<CheckoutData, ClientError>::new(&[
    ("submit_checkout", false, None),
    ("present_confirmation", false, None),
    ("navigate_to_order", false, None),
  ]);

  flow.on("submit_checkout", submit_checkout);

  flow.on("present_confirmation", |ctx_data: ContextData<CheckoutData>| {
    Box::pin(async move {
      let order = placed_order(&ctx_data)?;
      let guard = ctx_data.read();
      let currency = guard.state.currency();
      guard.state.surface.alert(&format!(
        "Order #{} placed, total {}",
        order.id,
        format_money(order.total_price, currency)
      ));
      guard
        .state
        .surface
        .append(&guard.bindings.confirmation, templates::order_confirmation(&order, currency));
      Ok::<_, ClientError>(FlowControl::Continue)
    })
  });

  flow.on("navigate_to_order", |ctx_data: ContextData<CheckoutData>| {
    Box::pin(async move {
      let order = placed_order(&ctx_data)?;
      let location = order_page_path(order.id);
      info!("Checkout Flow: Navigating to {}.", location);
      ctx_data.read().state.surface.navigate(&location);
      Ok::<_, ClientError>(FlowControl::Continue)
    })
  });

  registry.register(flow);
  info!("Checkout flow registered.");
}

#[instrument(name = "checkout_flow::submit_checkout", skip(ctx_data), err)]
async fn submit_checkout(ctx_data: ContextData<CheckoutData>) -> Result<FlowControl> {
  let api = ctx_data.read().state.api.clone();
  let order = api.checkout().await?;
  info!(
    "Checkout Flow: Order {} created with {} line(s), status {}.",
    order.id,
    order.order_items.len(),
    order.status
  );
  ctx_data.write().order = Some(order);
  Ok(FlowControl::Continue)
}
