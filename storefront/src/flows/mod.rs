// storefront/src/flows/mod.rs

pub mod auth_flow;
pub mod cart_flow;
pub mod checkout_flow;
pub mod contexts;
pub mod order_flow;

pub use cart_flow::parse_quantity;
pub use contexts::{
  CartActionData, CartIntent, CheckoutData, LoginData, OrderAction, OrdersActionData, RegistrationData,
};

use crate::errors::ClientError;
use storefront_flow::FlowRegistry;
use tracing::info;

/// Registers one flow per context type.
pub fn register_all_flows(registry: &FlowRegistry<ClientError>) {
  cart_flow::register_cart_flow(registry);
  checkout_flow::register_checkout_flow(registry);
  order_flow::register_order_flow(registry);
  auth_flow::register_login_flow(registry);
  auth_flow::register_registration_flow(registry);
  info!("All client flows registered.");
}
