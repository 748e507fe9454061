// storefront/src/flows/cart_flow.rs

use crate::errors::{ClientError, Result};
use crate::flows::contexts::{CartActionData, CartIntent};
use crate::models::{CartPayload, CartView};
use crate::render::templates;
use std::sync::Arc;
use storefront_flow::{ContextData, Flow, FlowControl, FlowRegistry, SkipCondition};
use tracing::{info, instrument, warn};

/// Parses a quantity typed by the user. Only whole numbers of at least 1 pass.
pub fn parse_quantity(input: &str) -> Result<u32> {
  let trimmed = input.trim();
  let quantity = trimmed
    .parse::<u32>()
    .map_err(|_| ClientError::Validation(format!("'{}' is not a valid quantity", trimmed)))?;
  if quantity == 0 {
    return Err(ClientError::Validation("Quantity must be at least 1".to_string()));
  }
  Ok(quantity)
}

fn require_slug(slug: &str) -> Result<()> {
  if slug.trim().is_empty() {
    return Err(ClientError::Validation("A product slug is required".to_string()));
  }
  Ok(())
}

pub fn register_cart_flow(registry: &FlowRegistry<ClientError>) {
  let refresh_only: SkipCondition<CartActionData> =
    Arc::new(|ctx_data: ContextData<CartActionData>| ctx_data.read().intent.is_refresh());

  let mut flow = Flow::<CartActionData, ClientError>::new(&[
    ("validate_intent", false, None),
    ("send_intent", false, Some(refresh_only)),
    ("fetch_cart", false, None),
    ("render_cart", false, None),
  ]);

  flow.on("validate_intent", |ctx_data: ContextData<CartActionData>| {
    Box::pin(async move {
      let intent = ctx_data.read().intent.clone();
      let payload = match intent {
        CartIntent::Refresh | CartIntent::Clear => None,
        CartIntent::Remove { slug } => {
          require_slug(&slug)?;
          None
        }
        CartIntent::Add { slug, quantity } => {
          require_slug(&slug)?;
          if quantity == 0 {
            warn!("Cart Flow: Rejected add of '{}' with quantity 0.", slug);
            return Err(ClientError::Validation("Quantity must be at least 1".to_string()));
          }
          Some(CartPayload { product_slug: slug, quantity })
        }
        CartIntent::ChangeQuantity { slug, input } => {
          require_slug(&slug)?;
          let quantity = parse_quantity(&input).map_err(|e| {
            warn!("Cart Flow: Rejected quantity input {:?} for '{}'.", input, slug);
            e
          })?;
          Some(CartPayload { product_slug: slug, quantity })
        }
      };
      ctx_data.write().payload = payload;
      Ok::<_, ClientError>(FlowControl::Continue)
    })
  });

  flow.on("send_intent", send_intent);
  flow.on("fetch_cart", fetch_cart);

  flow.on("render_cart", |ctx_data: ContextData<CartActionData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      let view = guard
        .view
        .as_ref()
        .ok_or_else(|| ClientError::Internal("render_cart ran without a fetched cart".to_string()))?;
      let currency = guard.state.currency();
      let surface = &guard.state.surface;
      surface.mount(&guard.bindings.items, templates::cart_rows(view, currency));
      surface.mount(&guard.bindings.total, templates::cart_total(view, currency));
      info!("Cart Flow: Rendered {} item(s), total {}.", view.items.len(), view.total);
      Ok::<_, ClientError>(FlowControl::Continue)
    })
  });

  registry.register(flow);
  info!("Cart flow registered.");
}

#[instrument(name = "cart_flow::send_intent", skip(ctx_data), err)]
async fn send_intent(ctx_data: ContextData<CartActionData>) -> Result<FlowControl> {
  let (api, intent, payload) = {
    let guard = ctx_data.read();
    (guard.state.api.clone(), guard.intent.clone(), guard.payload.clone())
  }; // guard dropped

  let request_body = || {
    payload
      .clone()
      .ok_or_else(|| ClientError::Internal("validate_intent did not produce a request body".to_string()))
  };

  match &intent {
    CartIntent::Refresh => {}
    CartIntent::Add { .. } => api.add_item(&request_body()?).await?,
    CartIntent::ChangeQuantity { .. } => api.change_quantity(&request_body()?).await?,
    CartIntent::Remove { slug } => api.remove_item(slug).await?,
    CartIntent::Clear => api.clear_cart().await?,
  }

  info!("Cart Flow: Server accepted {:?}.", intent);
  ctx_data.write().intent_sent = true;
  Ok(FlowControl::Continue)
}

#[instrument(name = "cart_flow::fetch_cart", skip(ctx_data), err)]
async fn fetch_cart(ctx_data: ContextData<CartActionData>) -> Result<FlowControl> {
  let api = ctx_data.read().state.api.clone();
  let snapshot = api.get_cart().await?;
  let view = CartView::try_from(snapshot)?;
  info!("Cart Flow: Fetched {} item(s).", view.items.len());
  ctx_data.write().view = Some(view);
  Ok(FlowControl::Continue)
}
