// storefront/src/flows/order_flow.rs

use crate::errors::{ClientError, Result};
use crate::flows::contexts::{OrderAction, OrdersActionData};
use crate::render::templates;
use std::sync::Arc;
use storefront_flow::{ContextData, Flow, FlowControl, FlowRegistry, SkipCondition};
use tracing::{info, instrument};

pub fn register_order_flow(registry: &FlowRegistry<ClientError>) {
  let read_only: SkipCondition<OrdersActionData> =
    Arc::new(|ctx_data: ContextData<OrdersActionData>| ctx_data.read().action.is_read_only());

  let mut flow = Flow::<OrdersActionData, ClientError>::new(&[
    ("send_order_action", false, Some(read_only)),
    ("fetch_orders", false, None),
    ("render_orders", false, None),
  ]);

  flow.on("send_order_action", send_order_action);

  // The confirmation is shown before the resync so that a failed refetch
  // does not hide a change the server already applied.
  flow.after("send_order_action", |ctx_data: ContextData<OrdersActionData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      if let Some(message) = guard.action.success_message() {
        guard.state.surface.alert(message);
      }
      Ok::<_, ClientError>(FlowControl::Continue)
    })
  });

  flow.on("fetch_orders", fetch_orders);

  flow.on("render_orders", |ctx_data: ContextData<OrdersActionData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      let currency = guard.state.currency();
      match (&guard.action, &guard.detail) {
        (OrderAction::Show(_), Some(order)) => {
          guard
            .state
            .surface
            .mount(&guard.bindings.detail, templates::order_detail(order, currency));
        }
        (OrderAction::Show(id), None) => {
          return Err(ClientError::Internal(format!("order {} was not fetched", id)));
        }
        _ => {
          guard
            .state
            .surface
            .mount(&guard.bindings.list, templates::order_list(&guard.orders, currency));
          info!("Orders Flow: Rendered {} order(s).", guard.orders.len());
        }
      }
      Ok::<_, ClientError>(FlowControl::Continue)
    })
  });

  registry.register(flow);
  info!("Orders flow registered.");
}

#[instrument(name = "order_flow::send_order_action", skip(ctx_data), err)]
async fn send_order_action(ctx_data: ContextData<OrdersActionData>) -> Result<FlowControl> {
  let (api, action) = {
    let guard = ctx_data.read();
    (guard.state.api.clone(), guard.action.clone())
  };

  let affected = match &action {
    OrderAction::Create(new_order) => Some(api.create_order(new_order).await?),
    OrderAction::Cancel(id) => api.cancel_order(*id).await?,
    OrderAction::Delete(id) => {
      api.delete_order(*id).await?;
      None
    }
    OrderAction::List | OrderAction::Show(_) => None,
  };

  info!("Orders Flow: Server accepted {:?}.", action);
  let mut guard = ctx_data.write();
  guard.affected = affected;
  guard.action_done = true;
  Ok(FlowControl::Continue)
}

#[instrument(name = "order_flow::fetch_orders", skip(ctx_data), err)]
async fn fetch_orders(ctx_data: ContextData<OrdersActionData>) -> Result<FlowControl> {
  let (api, action) = {
    let guard = ctx_data.read();
    (guard.state.api.clone(), guard.action.clone())
  };

  if let OrderAction::Show(id) = action {
    let order = api.get_order(id).await?;
    ctx_data.write().detail = Some(order);
  } else {
    let orders = api.list_orders().await?;
    info!("Orders Flow: Fetched {} order(s).", orders.len());
    ctx_data.write().orders = orders;
  }
  Ok(FlowControl::Continue)
}
