// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use reqwest::Method;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::Arc;
use storefront::credentials::{MemoryTokenStore, StoredToken, TokenStore};
use storefront::models::{CartItem, Order, OrderItem, OrderStatus};
use storefront::{
  ApiRequest, ApiResponse, AuthClient, CartBindings, CartClient, ClientConfig, ClientError, ClientState, MemorySurface,
  OrderBindings, OrdersClient, RequestBody, Transport,
};
use tracing::Level;

pub const VALID_TOKEN: &str = "cart-token-123";

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub fn dec(s: &str) -> Decimal {
  Decimal::from_str(s).unwrap()
}

#[derive(Default)]
struct ServerState {
  catalog: BTreeMap<String, (String, Decimal)>,
  cart: Vec<CartItem>,
  orders: Vec<Order>,
  next_order_id: i64,
  accounts: HashMap<String, String>,
  requests: Vec<ApiRequest>,
  network_down: bool,
  /// One-shot canned responses keyed by (method, path).
  forced: HashMap<(String, String), ApiResponse>,
}

/// In-memory stand-in for the storefront REST API.
pub struct FakeStorefront {
  inner: Mutex<ServerState>,
  required_token: Option<String>,
}

fn respond(status: u16, body: Value) -> ApiResponse {
  ApiResponse::new(status, body.to_string())
}

fn detail(status: u16, message: &str) -> ApiResponse {
  respond(status, json!({ "detail": message }))
}

impl FakeStorefront {
  pub fn new() -> Self {
    Self {
      inner: Mutex::new(ServerState {
        next_order_id: 1,
        ..Default::default()
      }),
      required_token: Some(VALID_TOKEN.to_string()),
    }
  }

  pub fn with_product(self, slug: &str, name: &str, price: &str) -> Self {
    self
      .inner
      .lock()
      .catalog
      .insert(slug.to_string(), (name.to_string(), dec(price)));
    self
  }

  pub fn with_cart_item(self, slug: &str, quantity: u32) -> Self {
    {
      let mut inner = self.inner.lock();
      let (name, price) = inner.catalog.get(slug).cloned().expect("product must be in the catalog");
      inner.cart.push(CartItem::new(slug, name, price, quantity));
    }
    self
  }

  pub fn with_account(self, email: &str, password: &str) -> Self {
    self.inner.lock().accounts.insert(email.to_string(), password.to_string());
    self
  }

  /// Replaces the whole server-side cart, bypassing the catalog.
  pub fn set_cart(&self, items: Vec<CartItem>) {
    self.inner.lock().cart = items;
  }

  pub fn set_network_down(&self, down: bool) {
    self.inner.lock().network_down = down;
  }

  /// The next request matching `method` and `path` gets this response instead.
  pub fn fail_next(&self, method: Method, path: &str, status: u16, body: &str) {
    self
      .inner
      .lock()
      .forced
      .insert((method.to_string(), path.to_string()), ApiResponse::new(status, body));
  }

  pub fn requests(&self) -> Vec<ApiRequest> {
    self.inner.lock().requests.clone()
  }

  pub fn request_count(&self) -> usize {
    self.inner.lock().requests.len()
  }

  pub fn cart_quantities(&self) -> Vec<(String, u32)> {
    self
      .inner
      .lock()
      .cart
      .iter()
      .map(|i| (i.product_slug.clone(), i.quantity))
      .collect()
  }

  pub fn orders(&self) -> Vec<Order> {
    self.inner.lock().orders.clone()
  }

  fn route(&self, state: &mut ServerState, request: &ApiRequest) -> ApiResponse {
    let body = match &request.body {
      RequestBody::Json(value) => value.clone(),
      _ => Value::Null,
    };
    let path = request.path.as_str();

    if path.starts_with("/v1/cart") || path == "/v1/orders/from-cart" {
      if let Some(required) = &self.required_token {
        if request.bearer.as_deref() != Some(required.as_str()) {
          return detail(401, "Not authenticated");
        }
      }
    }

    match (request.method.as_str(), path) {
      ("GET", "/v1/cart") => respond(200, json!({ "id": 1, "user_id": 1, "cart_items": state.cart })),
      ("POST", "/v1/cart/") => {
        let slug = body["product_slug"].as_str().unwrap_or_default().to_string();
        let quantity = body["quantity"].as_u64().unwrap_or(0) as u32;
        if quantity == 0 {
          return respond(422, json!({ "detail": [{ "loc": ["body", "quantity"], "msg": "quantity must be >= 1" }] }));
        }
        let Some((name, price)) = state.catalog.get(&slug).cloned() else {
          return detail(404, "Product not found");
        };
        match state.cart.iter_mut().find(|i| i.product_slug == slug) {
          Some(item) => item.quantity += quantity,
          None => state.cart.push(CartItem::new(slug, name, price, quantity)),
        }
        respond(201, json!({ "ok": true }))
      }
      ("PATCH", "/v1/cart/") => {
        let slug = body["product_slug"].as_str().unwrap_or_default();
        let quantity = body["quantity"].as_u64().unwrap_or(0) as u32;
        match state.cart.iter_mut().find(|i| i.product_slug == slug) {
          Some(item) => {
            item.quantity = quantity;
            respond(200, json!({ "ok": true }))
          }
          None => detail(404, "Item not in cart"),
        }
      }
      ("DELETE", "/v1/cart/") => {
        state.cart.clear();
        respond(200, json!({ "ok": true }))
      }
      ("DELETE", p) if p.starts_with("/v1/cart/") => {
        let slug = &p["/v1/cart/".len()..];
        let before = state.cart.len();
        state.cart.retain(|i| i.product_slug != slug);
        if state.cart.len() == before {
          detail(404, "Item not in cart")
        } else {
          respond(200, json!({ "ok": true }))
        }
      }
      ("POST", "/v1/orders/from-cart") => {
        if state.cart.is_empty() {
          return detail(400, "Cart is empty");
        }
        let lines: Vec<(String, String, Decimal, u32)> = state
          .cart
          .drain(..)
          .map(|i| (i.product_slug, i.product_name_snapshot, i.price_at_time, i.quantity))
          .collect();
        let order = Self::place_order(state, lines);
        respond(201, json!(order))
      }
      ("POST", "/v1/auth/login") => {
        let field = |name: &str| match &request.body {
          RequestBody::Form(fields) => fields.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone()),
          _ => None,
        };
        let (Some(email), Some(password)) = (field("email"), field("password")) else {
          return detail(422, "email and password are required");
        };
        match state.accounts.get(&email) {
          Some(stored) if *stored == password => {
            respond(200, json!({ "access_token": format!("token-for-{}", email), "token_type": "bearer" }))
          }
          _ => detail(401, "Incorrect email or password"),
        }
      }
      ("POST", "/v1/auth/register") => {
        let email = body["email"].as_str().unwrap_or_default().to_string();
        let password = body["password"].as_str().unwrap_or_default().to_string();
        if state.accounts.contains_key(&email) {
          return detail(400, "Email already registered");
        }
        state.accounts.insert(email.clone(), password);
        respond(201, json!({ "email": email }))
      }
      (method, p) if p.starts_with("/orders/") => self.route_orders(state, method, &p["/orders/".len()..], body),
      _ => detail(404, "Not Found"),
    }
  }

  fn route_orders(&self, state: &mut ServerState, method: &str, rest: &str, body: Value) -> ApiResponse {
    let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
    match (method, segments.as_slice()) {
      ("GET", []) => respond(200, json!(state.orders)),
      ("POST", []) => {
        let mut lines = Vec::new();
        for line in body["order_items"].as_array().cloned().unwrap_or_default() {
          let slug = line["product_slug"].as_str().unwrap_or_default().to_string();
          let quantity = line["quantity"].as_u64().unwrap_or(0) as u32;
          let Some((name, price)) = state.catalog.get(&slug).cloned() else {
            return detail(404, "Product not found");
          };
          lines.push((slug, name, price, quantity));
        }
        if lines.is_empty() {
          return detail(400, "An order needs at least one item");
        }
        let order = Self::place_order(state, lines);
        respond(201, json!(order))
      }
      (method, [id]) => {
        let Ok(id) = id.parse::<i64>() else {
          return detail(422, "Invalid order id");
        };
        let Some(idx) = state.orders.iter().position(|o| o.id == id) else {
          return detail(404, "Order not found");
        };
        match method {
          "GET" => respond(200, json!(state.orders[idx])),
          "DELETE" => {
            state.orders.remove(idx);
            ApiResponse::new(204, "")
          }
          _ => detail(405, "Method Not Allowed"),
        }
      }
      ("POST", [id, "cancel"]) => {
        let Some(order) = id.parse::<i64>().ok().and_then(|id| state.orders.iter_mut().find(|o| o.id == id)) else {
          return detail(404, "Order not found");
        };
        if order.status == OrderStatus::Cancelled {
          return detail(400, "Order is already cancelled");
        }
        order.status = OrderStatus::Cancelled;
        respond(200, json!(order))
      }
      _ => detail(404, "Not Found"),
    }
  }

  fn place_order(state: &mut ServerState, lines: Vec<(String, String, Decimal, u32)>) -> Order {
    let id = state.next_order_id;
    state.next_order_id += 1;
    let order_items: Vec<OrderItem> = lines
      .into_iter()
      .map(|(slug, name, price, quantity)| OrderItem {
        product_slug: slug,
        product_name_snapshot: name,
        price_at_time: price,
        quantity,
        id: None,
        order_id: Some(id),
      })
      .collect();
    let total_price = order_items
      .iter()
      .map(|i| i.price_at_time * Decimal::from(i.quantity))
      .sum();
    let order = Order {
      id,
      status: OrderStatus::Pending,
      total_price,
      order_items,
      user_id: Some(1),
      created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single(),
      updated_at: None,
    };
    state.orders.push(order.clone());
    order
  }
}

#[async_trait]
impl Transport for FakeStorefront {
  async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
    let mut state = self.inner.lock();
    state.requests.push(request.clone());
    if state.network_down {
      return Err(ClientError::Network("connection refused".to_string()));
    }
    let key = (request.method.to_string(), request.path.clone());
    if let Some(forced) = state.forced.remove(&key) {
      return Ok(forced);
    }
    Ok(self.route(&mut state, &request))
  }
}

/// A client state wired to a `FakeStorefront`, a `MemorySurface` and an
/// in-memory token store that already holds a valid cart token.
pub struct Harness {
  pub server: Arc<FakeStorefront>,
  pub surface: Arc<MemorySurface>,
  pub tokens: Arc<MemoryTokenStore>,
  pub state: ClientState,
}

impl Harness {
  pub fn new(server: FakeStorefront) -> Self {
    Self::with_tokens(server, MemoryTokenStore::with_entry("token", VALID_TOKEN))
  }

  pub fn with_tokens(server: FakeStorefront, tokens: MemoryTokenStore) -> Self {
    setup_tracing();
    let server = Arc::new(server);
    let surface = Arc::new(MemorySurface::new());
    let tokens = Arc::new(tokens);
    let config = ClientConfig::default();
    let store: Arc<dyn TokenStore> = tokens.clone();
    let credentials = Arc::new(StoredToken::new(store.clone(), config.cart_token_key.clone()));
    let state = ClientState::new(config, server.clone(), credentials, store, surface.clone());
    Self {
      server,
      surface,
      tokens,
      state,
    }
  }

  pub fn cart(&self) -> CartClient {
    CartClient::new(self.state.clone(), CartBindings::default())
  }

  pub fn orders(&self) -> OrdersClient {
    OrdersClient::new(self.state.clone(), OrderBindings::default())
  }

  pub fn auth(&self) -> AuthClient {
    AuthClient::new(self.state.clone())
  }

  pub fn cart_text(&self) -> String {
    self.surface.text(&CartBindings::default().items)
  }

  pub fn total_text(&self) -> String {
    self.surface.text(&CartBindings::default().total)
  }
}

/// The catalog most tests start from.
pub fn grocery_store() -> FakeStorefront {
  FakeStorefront::new()
    .with_product("a", "Apple", "10.00")
    .with_product("b", "Bread", "5.50")
    .with_product("c", "<script>alert(1)</script>", "1.25")
}
