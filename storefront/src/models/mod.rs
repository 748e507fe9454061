// storefront/src/models/mod.rs

//! Wire shapes exchanged with the storefront REST API.

pub mod cart_item;
pub mod order;
pub mod user;

pub use cart_item::{CartItem, CartPayload, CartSnapshot, CartView};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};
pub use user::{AccessToken, LoginForm, Registration, RegistrationReply};
