// storefront/src/flows/contexts.rs

//! Data structs the flows run on. Components wrap them in `ContextData` and
//! read the results back once the run returns.

use crate::components::{CartBindings, OrderBindings};
use crate::models::{AccessToken, CartPayload, CartView, LoginForm, NewOrder, Order, Registration, RegistrationReply};
use crate::state::ClientState;

/// What the user asked the cart to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartIntent {
  Refresh,
  Add { slug: String, quantity: u32 },
  /// `input` is raw user text; it is parsed by the `validate_intent` step.
  ChangeQuantity { slug: String, input: String },
  Remove { slug: String },
  Clear,
}

impl CartIntent {
  pub fn is_refresh(&self) -> bool {
    matches!(self, CartIntent::Refresh)
  }

  /// Alert prefix used when the intent itself fails.
  pub fn failure_message(&self) -> &'static str {
    match self {
      CartIntent::Refresh => "Failed to load the cart",
      CartIntent::Add { .. } => "Failed to add the item",
      CartIntent::ChangeQuantity { .. } => "Failed to update the quantity",
      CartIntent::Remove { .. } => "Failed to remove the item",
      CartIntent::Clear => "Failed to clear the cart",
    }
  }
}

#[derive(Clone)]
pub struct CartActionData {
  pub state: ClientState,
  pub bindings: CartBindings,
  pub intent: CartIntent,
  /// Body for add/change requests, filled by `validate_intent`.
  pub payload: Option<CartPayload>,
  /// Set once the server accepted the intent.
  pub intent_sent: bool,
  pub view: Option<CartView>,
}

impl CartActionData {
  pub fn new(state: ClientState, bindings: CartBindings, intent: CartIntent) -> Self {
    Self {
      state,
      bindings,
      intent,
      payload: None,
      intent_sent: false,
      view: None,
    }
  }
}

#[derive(Clone)]
pub struct CheckoutData {
  pub state: ClientState,
  pub bindings: CartBindings,
  pub order: Option<Order>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderAction {
  List,
  Show(i64),
  Create(NewOrder),
  Cancel(i64),
  Delete(i64),
}

impl OrderAction {
  /// Listing and detail views only read.
  pub fn is_read_only(&self) -> bool {
    matches!(self, OrderAction::List | OrderAction::Show(_))
  }

  pub fn success_message(&self) -> Option<&'static str> {
    match self {
      OrderAction::Create(_) => Some("Order created"),
      OrderAction::Cancel(_) => Some("Order cancelled"),
      OrderAction::Delete(_) => Some("Order deleted"),
      OrderAction::List | OrderAction::Show(_) => None,
    }
  }

  pub fn failure_message(&self) -> &'static str {
    match self {
      OrderAction::List => "Failed to load orders",
      OrderAction::Show(_) => "Failed to load the order",
      OrderAction::Create(_) => "Failed to create the order",
      OrderAction::Cancel(_) => "Failed to cancel the order",
      OrderAction::Delete(_) => "Failed to delete the order",
    }
  }
}

#[derive(Clone)]
pub struct OrdersActionData {
  pub state: ClientState,
  pub bindings: OrderBindings,
  pub action: OrderAction,
  pub action_done: bool,
  /// Order returned by create/cancel, when the server sent one back.
  pub affected: Option<Order>,
  pub orders: Vec<Order>,
  pub detail: Option<Order>,
}

impl OrdersActionData {
  pub fn new(state: ClientState, bindings: OrderBindings, action: OrderAction) -> Self {
    Self {
      state,
      bindings,
      action,
      action_done: false,
      affected: None,
      orders: Vec::new(),
      detail: None,
    }
  }
}

#[derive(Clone)]
pub struct LoginData {
  pub state: ClientState,
  pub form: LoginForm,
  pub token: Option<AccessToken>,
}

#[derive(Clone)]
pub struct RegistrationData {
  pub state: ClientState,
  pub registration: Registration,
  pub reply: Option<RegistrationReply>,
}
