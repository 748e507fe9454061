// storefront/src/components/cart.rs

use crate::components::report_failure;
use crate::errors::{ClientError, Result};
use crate::flows::{CartActionData, CartIntent, CheckoutData};
use crate::models::{CartView, Order};
use crate::state::ClientState;
use crate::surface::ElementHandle;
use storefront_flow::{ContextData, FlowOutcome};
use tracing::{info, instrument};

pub const DEFAULT_ITEMS_HANDLE: &str = "cart-items-container";
pub const DEFAULT_TOTAL_HANDLE: &str = "total-price";
pub const DEFAULT_CONFIRMATION_HANDLE: &str = "body";

/// Where the cart renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartBindings {
  /// Receives one row per cart item.
  pub items: ElementHandle,
  pub total: ElementHandle,
  /// Checkout confirmations are appended here.
  pub confirmation: ElementHandle,
}

impl Default for CartBindings {
  fn default() -> Self {
    Self {
      items: ElementHandle::new(DEFAULT_ITEMS_HANDLE),
      total: ElementHandle::new(DEFAULT_TOTAL_HANDLE),
      confirmation: ElementHandle::new(DEFAULT_CONFIRMATION_HANDLE),
    }
  }
}

/// The cart page. Every mutation is followed by a full refetch and re-render;
/// a mutation the server refuses leaves the current rendering alone.
#[derive(Clone)]
pub struct CartClient {
  state: ClientState,
  bindings: CartBindings,
}

impl CartClient {
  pub fn new(state: ClientState, bindings: CartBindings) -> Self {
    Self { state, bindings }
  }

  pub fn bindings(&self) -> &CartBindings {
    &self.bindings
  }

  #[instrument(name = "CartClient::fetch_cart", skip(self))]
  pub async fn fetch_cart(&self) -> Result<CartView> {
    self.run_intent(CartIntent::Refresh).await
  }

  #[instrument(name = "CartClient::add_item", skip(self))]
  pub async fn add_item(&self, slug: &str, quantity: u32) -> Result<CartView> {
    self
      .run_intent(CartIntent::Add {
        slug: slug.to_string(),
        quantity,
      })
      .await
  }

  /// `input` is what the user typed; anything but a whole number of at least 1
  /// is rejected before a request is made.
  #[instrument(name = "CartClient::change_quantity", skip(self))]
  pub async fn change_quantity(&self, slug: &str, input: &str) -> Result<CartView> {
    self
      .run_intent(CartIntent::ChangeQuantity {
        slug: slug.to_string(),
        input: input.to_string(),
      })
      .await
  }

  #[instrument(name = "CartClient::remove_item", skip(self))]
  pub async fn remove_item(&self, slug: &str) -> Result<CartView> {
    self.run_intent(CartIntent::Remove { slug: slug.to_string() }).await
  }

  #[instrument(name = "CartClient::clear_cart", skip(self))]
  pub async fn clear_cart(&self) -> Result<CartView> {
    self.run_intent(CartIntent::Clear).await
  }

  /// Turns the cart into an order, confirms it and navigates to the order page.
  #[instrument(name = "CartClient::checkout", skip(self))]
  pub async fn checkout(&self) -> Result<Order> {
    let ctx_data = ContextData::new(CheckoutData {
      state: self.state.clone(),
      bindings: self.bindings.clone(),
      order: None,
    });

    let result = match self.state.flows.run(ctx_data.clone()).await {
      Ok(FlowOutcome::Completed) => ctx_data.read().order.clone().ok_or(ClientError::Halted),
      Ok(FlowOutcome::Stopped) => Err(ClientError::Halted),
      Err(e) => Err(e),
    };

    match result {
      Ok(order) => {
        info!(order_id = order.id, "Checkout completed.");
        Ok(order)
      }
      Err(e) => {
        report_failure(self.state.surface.as_ref(), "Checkout failed", &e);
        Err(e)
      }
    }
  }

  async fn run_intent(&self, intent: CartIntent) -> Result<CartView> {
    let ctx_data = ContextData::new(CartActionData::new(self.state.clone(), self.bindings.clone(), intent));

    let result = match self.state.flows.run(ctx_data.clone()).await {
      Ok(FlowOutcome::Completed) => ctx_data.read().view.clone().ok_or(ClientError::Halted),
      Ok(FlowOutcome::Stopped) => Err(ClientError::Halted),
      Err(e) => Err(e),
    };

    result.map_err(|e| {
      let prefix = {
        let guard = ctx_data.read();
        if guard.intent_sent {
          CartIntent::Refresh.failure_message()
        } else {
          guard.intent.failure_message()
        }
      };
      report_failure(self.state.surface.as_ref(), prefix, &e);
      e
    })
  }
}
