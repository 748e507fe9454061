// storefront/src/components/orders.rs

use crate::components::report_failure;
use crate::errors::{ClientError, Result};
use crate::flows::{OrderAction, OrdersActionData};
use crate::models::{NewOrder, Order};
use crate::state::ClientState;
use crate::surface::ElementHandle;
use storefront_flow::{ContextData, FlowOutcome};
use tracing::instrument;

pub const DEFAULT_LIST_HANDLE: &str = "orders-container";
pub const DEFAULT_DETAIL_HANDLE: &str = "order-details";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBindings {
  pub list: ElementHandle,
  pub detail: ElementHandle,
}

impl Default for OrderBindings {
  fn default() -> Self {
    Self {
      list: ElementHandle::new(DEFAULT_LIST_HANDLE),
      detail: ElementHandle::new(DEFAULT_DETAIL_HANDLE),
    }
  }
}

/// Order history and detail pages. Changes resync the list the same way cart
/// mutations resync the cart.
#[derive(Clone)]
pub struct OrdersClient {
  state: ClientState,
  bindings: OrderBindings,
}

impl OrdersClient {
  pub fn new(state: ClientState, bindings: OrderBindings) -> Self {
    Self { state, bindings }
  }

  #[instrument(name = "OrdersClient::list_orders", skip(self))]
  pub async fn list_orders(&self) -> Result<Vec<Order>> {
    Ok(self.run_action(OrderAction::List).await?.orders)
  }

  #[instrument(name = "OrdersClient::get_order", skip(self))]
  pub async fn get_order(&self, order_id: i64) -> Result<Order> {
    self.run_action(OrderAction::Show(order_id)).await?.detail.ok_or(ClientError::Halted)
  }

  #[instrument(name = "OrdersClient::create_order", skip_all, fields(lines = new_order.order_items.len()))]
  pub async fn create_order(&self, new_order: NewOrder) -> Result<Order> {
    self.run_action(OrderAction::Create(new_order)).await?.affected.ok_or(ClientError::Halted)
  }

  /// Returns the resynced order list.
  #[instrument(name = "OrdersClient::cancel_order", skip(self))]
  pub async fn cancel_order(&self, order_id: i64) -> Result<Vec<Order>> {
    Ok(self.run_action(OrderAction::Cancel(order_id)).await?.orders)
  }

  /// Returns the resynced order list.
  #[instrument(name = "OrdersClient::delete_order", skip(self))]
  pub async fn delete_order(&self, order_id: i64) -> Result<Vec<Order>> {
    Ok(self.run_action(OrderAction::Delete(order_id)).await?.orders)
  }

  async fn run_action(&self, action: OrderAction) -> Result<OrdersActionData> {
    let ctx_data = ContextData::new(OrdersActionData::new(self.state.clone(), self.bindings.clone(), action));

    let result = match self.state.flows.run(ctx_data.clone()).await {
      Ok(FlowOutcome::Completed) => Ok(ctx_data.read().clone()),
      Ok(FlowOutcome::Stopped) => Err(ClientError::Halted),
      Err(e) => Err(e),
    };

    result.map_err(|e| {
      let prefix = {
        let guard = ctx_data.read();
        if guard.action_done {
          OrderAction::List.failure_message()
        } else {
          guard.action.failure_message()
        }
      };
      report_failure(self.state.surface.as_ref(), prefix, &e);
      e
    })
  }
}
