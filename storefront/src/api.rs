// storefront/src/api.rs

//! Typed bindings for the storefront REST endpoints.

use crate::credentials::CredentialProvider;
use crate::errors::{ClientError, Result};
use crate::models::{
  AccessToken, CartPayload, CartSnapshot, LoginForm, NewOrder, Order, Registration, RegistrationReply,
};
use crate::transport::{ApiRequest, ApiResponse, Transport};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, instrument};

pub const CART_PATH: &str = "/v1/cart";
/// Mutations go to the collection with a trailing slash.
pub const CART_COLLECTION_PATH: &str = "/v1/cart/";
pub const CHECKOUT_PATH: &str = "/v1/orders/from-cart";
pub const ORDERS_PATH: &str = "/orders/";
pub const LOGIN_PATH: &str = "/v1/auth/login";
pub const REGISTER_PATH: &str = "/v1/auth/register";

pub fn order_page_path(order_id: i64) -> String {
  format!("/pages/orders/{}", order_id)
}

/// Appends `segments` to `base`, percent-encoding each one.
fn path_with_segments(base: &str, segments: &[&str]) -> Result<String> {
  let mut url = Url::parse("http://storefront.invalid")
    .and_then(|u| u.join(base.trim_end_matches('/')))
    .map_err(|e| ClientError::Internal(format!("bad base path '{}': {}", base, e)))?;
  url
    .path_segments_mut()
    .map_err(|_| ClientError::Internal(format!("'{}' cannot take path segments", base)))?
    .extend(segments);
  Ok(url.path().to_string())
}

pub fn cart_item_path(slug: &str) -> Result<String> {
  path_with_segments(CART_PATH, &[slug])
}

pub fn order_path(order_id: i64) -> Result<String> {
  path_with_segments(ORDERS_PATH, &[&order_id.to_string()])
}

pub fn cancel_order_path(order_id: i64) -> Result<String> {
  path_with_segments(ORDERS_PATH, &[&order_id.to_string(), "cancel"])
}

fn decode<T: DeserializeOwned>(response: &ApiResponse) -> Result<T> {
  serde_json::from_str(&response.body).map_err(|e| {
    debug!(status = response.status, "Failed to decode response body.");
    ClientError::Decode(e.to_string())
  })
}

/// One authoritative binding for every endpoint the storefront pages use.
///
/// Cart and checkout requests carry the bearer token from `credentials`;
/// order and auth requests are sent without one.
#[derive(Clone)]
pub struct StorefrontApi {
  transport: Arc<dyn Transport>,
  credentials: Arc<dyn CredentialProvider>,
}

impl StorefrontApi {
  pub fn new(transport: Arc<dyn Transport>, credentials: Arc<dyn CredentialProvider>) -> Self {
    Self { transport, credentials }
  }

  async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
    self.transport.send(request).await?.error_for_status()
  }

  fn authed(&self, method: Method, path: impl Into<String>) -> ApiRequest {
    ApiRequest::new(method, path).bearer(self.credentials.get_token())
  }

  #[instrument(name = "api::get_cart", skip_all)]
  pub async fn get_cart(&self) -> Result<CartSnapshot> {
    let response = self.send(self.authed(Method::GET, CART_PATH)).await?;
    decode(&response)
  }

  #[instrument(name = "api::add_item", skip_all, fields(slug = %payload.product_slug, quantity = payload.quantity))]
  pub async fn add_item(&self, payload: &CartPayload) -> Result<()> {
    let request = self.authed(Method::POST, CART_COLLECTION_PATH).json(serde_json::to_value(payload)?);
    self.send(request).await.map(|_| ())
  }

  #[instrument(name = "api::change_quantity", skip_all, fields(slug = %payload.product_slug, quantity = payload.quantity))]
  pub async fn change_quantity(&self, payload: &CartPayload) -> Result<()> {
    let request = self.authed(Method::PATCH, CART_COLLECTION_PATH).json(serde_json::to_value(payload)?);
    self.send(request).await.map(|_| ())
  }

  #[instrument(name = "api::remove_item", skip(self))]
  pub async fn remove_item(&self, slug: &str) -> Result<()> {
    let request = self.authed(Method::DELETE, cart_item_path(slug)?);
    self.send(request).await.map(|_| ())
  }

  #[instrument(name = "api::clear_cart", skip_all)]
  pub async fn clear_cart(&self) -> Result<()> {
    self.send(self.authed(Method::DELETE, CART_COLLECTION_PATH)).await.map(|_| ())
  }

  #[instrument(name = "api::checkout", skip_all)]
  pub async fn checkout(&self) -> Result<Order> {
    let response = self.send(self.authed(Method::POST, CHECKOUT_PATH)).await?;
    decode(&response)
  }

  #[instrument(name = "api::list_orders", skip_all)]
  pub async fn list_orders(&self) -> Result<Vec<Order>> {
    let response = self.send(ApiRequest::new(Method::GET, ORDERS_PATH)).await?;
    decode(&response)
  }

  #[instrument(name = "api::get_order", skip(self))]
  pub async fn get_order(&self, order_id: i64) -> Result<Order> {
    let response = self.send(ApiRequest::new(Method::GET, order_path(order_id)?)).await?;
    decode(&response)
  }

  #[instrument(name = "api::create_order", skip_all, fields(lines = new_order.order_items.len()))]
  pub async fn create_order(&self, new_order: &NewOrder) -> Result<Order> {
    let request = ApiRequest::new(Method::POST, ORDERS_PATH).json(serde_json::to_value(new_order)?);
    let response = self.send(request).await?;
    decode(&response)
  }

  /// Some servers answer with the updated order, others with an empty body.
  #[instrument(name = "api::cancel_order", skip(self))]
  pub async fn cancel_order(&self, order_id: i64) -> Result<Option<Order>> {
    let response = self.send(ApiRequest::new(Method::POST, cancel_order_path(order_id)?)).await?;
    if response.body.trim().is_empty() {
      return Ok(None);
    }
    decode(&response).map(Some)
  }

  #[instrument(name = "api::delete_order", skip(self))]
  pub async fn delete_order(&self, order_id: i64) -> Result<()> {
    self.send(ApiRequest::new(Method::DELETE, order_path(order_id)?)).await.map(|_| ())
  }

  /// Returns the raw response so the caller can tell "no token in a 2xx body"
  /// apart from an HTTP failure.
  #[instrument(name = "api::login", skip_all, fields(email = %form.email))]
  pub async fn login(&self, form: &LoginForm) -> Result<Option<AccessToken>> {
    let request = ApiRequest::new(Method::POST, LOGIN_PATH).form(vec![
      ("email".to_string(), form.email.clone()),
      ("password".to_string(), form.password.clone()),
    ]);
    let response = self.send(request).await?;
    Ok(serde_json::from_str::<AccessToken>(&response.body).ok())
  }

  #[instrument(name = "api::register", skip_all, fields(email = %registration.email))]
  pub async fn register(&self, registration: &Registration) -> Result<RegistrationReply> {
    let request = ApiRequest::new(Method::POST, REGISTER_PATH).json(serde_json::to_value(registration)?);
    let response = self.send(request).await?;
    if response.body.trim().is_empty() {
      return Ok(RegistrationReply::default());
    }
    decode(&response)
  }
}
