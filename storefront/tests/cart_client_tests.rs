// tests/cart_client_tests.rs
mod common;

use common::*;
use reqwest::Method;
use storefront::credentials::MemoryTokenStore;
use storefront::flows::{CartActionData, CheckoutData, LoginData, OrdersActionData, RegistrationData};
use storefront::{CartBindings, ClientError, RequestBody};

#[tokio::test]
async fn test_fetch_renders_items_and_recomputed_total() {
  let h = Harness::new(grocery_store().with_cart_item("a", 2).with_cart_item("b", 1));

  let view = h.cart().fetch_cart().await.unwrap();

  assert_eq!(view.total, dec("25.50"));
  assert_eq!(h.total_text(), "25.50 ₽");
  let rows = h.cart_text();
  assert_eq!(
    rows,
    "1 | Apple | 10.00 ₽ | [2] | 20.00 ₽ | Remove\n2 | Bread | 5.50 ₽ | [1] | 5.50 ₽ | Remove"
  );
  let requests = h.server.requests();
  assert_eq!(requests.len(), 1);
  assert_eq!(requests[0].bearer.as_deref(), Some(VALID_TOKEN));
  assert!(h.surface.alerts().is_empty());
}

#[tokio::test]
async fn test_add_item_then_refetch_reflects_quantity() {
  let h = Harness::new(grocery_store());
  let cart = h.cart();

  let view = cart.add_item("a", 1).await.unwrap();
  assert_eq!(view.item("a").map(|i| i.quantity), Some(1));
  assert_eq!(h.total_text(), "10.00 ₽");

  let view = cart.add_item("a", 1).await.unwrap();
  assert_eq!(view.item("a").map(|i| i.quantity), Some(2));
  assert_eq!(view.total, dec("20.00"));
  assert_eq!(h.total_text(), "20.00 ₽");

  let methods: Vec<String> = h.server.requests().iter().map(|r| r.method.to_string()).collect();
  assert_eq!(methods, vec!["POST", "GET", "POST", "GET"]);
  assert_eq!(
    h.server.requests()[0].body,
    RequestBody::Json(serde_json::json!({ "product_slug": "a", "quantity": 1 }))
  );
}

#[tokio::test]
async fn test_remove_last_item_renders_empty_cart() {
  let h = Harness::new(grocery_store().with_cart_item("b", 3));
  let cart = h.cart();
  cart.fetch_cart().await.unwrap();

  let view = cart.remove_item("b").await.unwrap();

  assert!(view.is_empty());
  assert!(h.surface.nodes(&CartBindings::default().items).is_empty());
  assert_eq!(h.total_text(), "0.00 ₽");
  assert_eq!(h.server.requests()[1].path, "/v1/cart/b");
}

#[tokio::test]
async fn test_clear_cart_resyncs_to_empty() {
  let h = Harness::new(grocery_store().with_cart_item("a", 1).with_cart_item("b", 1));

  let view = h.cart().clear_cart().await.unwrap();

  assert!(view.is_empty());
  assert_eq!(h.total_text(), "0.00 ₽");
  assert!(h.server.cart_quantities().is_empty());
}

#[tokio::test]
async fn test_change_quantity_sends_full_replacement() {
  let h = Harness::new(grocery_store().with_cart_item("a", 1));

  let view = h.cart().change_quantity("a", "3").await.unwrap();

  assert_eq!(view.total, dec("30.00"));
  let patch = &h.server.requests()[0];
  assert_eq!(patch.method, Method::PATCH);
  assert_eq!(patch.path, "/v1/cart/");
  assert_eq!(
    patch.body,
    RequestBody::Json(serde_json::json!({ "product_slug": "a", "quantity": 3 }))
  );
}

#[tokio::test]
async fn test_change_quantity_rejects_bad_input_without_request() {
  let h = Harness::new(grocery_store().with_cart_item("a", 2));
  let cart = h.cart();
  cart.fetch_cart().await.unwrap();
  let rendered = h.cart_text();

  for input in ["0", "-2", "two", ""] {
    let err = cart.change_quantity("a", input).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)), "{:?} gave {:?}", input, err);
  }

  assert_eq!(h.server.request_count(), 1);
  assert_eq!(h.server.cart_quantities(), vec![("a".to_string(), 2)]);
  assert_eq!(h.cart_text(), rendered);
  assert_eq!(
    h.surface.alerts()[0],
    "Failed to update the quantity: Quantity must be at least 1"
  );
}

#[tokio::test]
async fn test_add_item_with_zero_quantity_is_rejected() {
  let h = Harness::new(grocery_store());

  let err = h.cart().add_item("a", 0).await.unwrap_err();

  assert!(matches!(err, ClientError::Validation(_)));
  assert_eq!(h.server.request_count(), 0);
}

#[tokio::test]
async fn test_failed_mutation_skips_refetch_and_render() {
  let h = Harness::new(grocery_store().with_cart_item("a", 2));
  let cart = h.cart();
  cart.fetch_cart().await.unwrap();
  let rendered = h.cart_text();

  let err = cart.remove_item("missing").await.unwrap_err();

  assert_eq!(err.status(), Some(404));
  assert_eq!(h.server.request_count(), 2, "no GET after the failed DELETE");
  assert_eq!(h.cart_text(), rendered);
  assert_eq!(h.surface.last_alert().unwrap(), "Failed to remove the item: Item not in cart");
}

#[tokio::test]
async fn test_refetch_failure_after_accepted_mutation_reports_load_failure() {
  let h = Harness::new(grocery_store());
  h.server.fail_next(Method::GET, "/v1/cart", 503, "");

  let err = h.cart().add_item("b", 2).await.unwrap_err();

  assert_eq!(err.status(), Some(503));
  assert_eq!(h.server.cart_quantities(), vec![("b".to_string(), 2)]);
  assert_eq!(
    h.surface.last_alert().unwrap(),
    "Failed to load the cart: request failed with status 503"
  );
}

#[tokio::test]
async fn test_network_failure_alerts_and_keeps_stale_render() {
  let h = Harness::new(grocery_store().with_cart_item("a", 1));
  let cart = h.cart();
  cart.fetch_cart().await.unwrap();
  h.server.set_network_down(true);

  let err = cart.fetch_cart().await.unwrap_err();

  assert!(matches!(err, ClientError::Network(_)));
  assert_eq!(h.total_text(), "10.00 ₽");
  assert_eq!(
    h.surface.last_alert().unwrap(),
    "Failed to load the cart: network failure (connection refused)"
  );
}

#[tokio::test]
async fn test_cart_total_beyond_decimal_range_alerts_and_keeps_stale_render() {
  let h = Harness::new(grocery_store().with_cart_item("a", 1));
  let cart = h.cart();
  cart.fetch_cart().await.unwrap();
  let rows_before = h.cart_text();
  h.server.fail_next(
    Method::GET,
    "/v1/cart",
    200,
    r#"{"id":1,"user_id":1,"cart_items":[{"product_slug":"gold","product_name_snapshot":"Gold","price_at_time":"79228162514264337593543950335","quantity":2}]}"#,
  );

  let err = cart.fetch_cart().await.unwrap_err();

  assert!(matches!(err, ClientError::Decode(_)), "{:?}", err);
  assert_eq!(
    h.surface.last_alert().unwrap(),
    "Failed to load the cart: Unexpected Response Body: cart total does not fit a decimal"
  );
  assert_eq!(h.total_text(), "10.00 ₽");
  assert_eq!(h.cart_text(), rows_before);

  cart.fetch_cart().await.unwrap();
  assert_eq!(h.total_text(), "10.00 ₽");
}

#[tokio::test]
async fn test_missing_token_surfaces_server_rejection() {
  let h = Harness::with_tokens(grocery_store(), MemoryTokenStore::new());

  let err = h.cart().fetch_cart().await.unwrap_err();

  assert_eq!(err.status(), Some(401));
  assert_eq!(h.server.requests()[0].bearer, None);
  assert_eq!(h.surface.last_alert().unwrap(), "Failed to load the cart: Not authenticated");
}

#[tokio::test]
async fn test_product_names_are_escaped_in_markup() {
  let h = Harness::new(grocery_store().with_cart_item("c", 1));

  h.cart().fetch_cart().await.unwrap();

  let html: String = h
    .surface
    .nodes(&CartBindings::default().items)
    .iter()
    .map(|n| n.to_html())
    .collect();
  assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
  assert!(!html.contains("<script>"));
}

#[tokio::test]
async fn test_checkout_places_order_confirms_and_navigates() {
  let h = Harness::new(grocery_store().with_cart_item("a", 2).with_cart_item("b", 1));

  let order = h.cart().checkout().await.unwrap();

  assert_eq!(order.id, 1);
  assert_eq!(order.total_price, dec("25.50"));
  assert_eq!(h.surface.alerts(), vec!["Order #1 placed, total 25.50 ₽".to_string()]);
  assert_eq!(h.surface.navigations(), vec!["/pages/orders/1".to_string()]);
  let confirmation = h.surface.text(&CartBindings::default().confirmation);
  assert!(confirmation.contains("Order #1"));
  assert!(confirmation.contains("Apple (x2) - 10.00 ₽"));
  assert!(h.server.cart_quantities().is_empty());
  assert_eq!(h.server.requests()[0].path, "/v1/orders/from-cart");
}

#[tokio::test]
async fn test_checkout_failure_does_not_navigate_or_touch_cart() {
  let h = Harness::new(grocery_store().with_cart_item("a", 2).with_cart_item("b", 1));
  let cart = h.cart();
  cart.fetch_cart().await.unwrap();
  let rendered = (h.cart_text(), h.total_text());
  h.server
    .fail_next(Method::POST, "/v1/orders/from-cart", 500, r#"{"detail":"Payment service down"}"#);

  let err = cart.checkout().await.unwrap_err();

  assert_eq!(err.status(), Some(500));
  assert!(h.surface.navigations().is_empty());
  assert_eq!((h.cart_text(), h.total_text()), rendered);
  assert!(h.surface.nodes(&CartBindings::default().confirmation).is_empty());
  assert_eq!(h.surface.last_alert().unwrap(), "Checkout failed: Payment service down");
}

#[tokio::test]
async fn test_checkout_of_empty_cart_reports_server_message() {
  let h = Harness::new(grocery_store());

  let err = h.cart().checkout().await.unwrap_err();

  assert_eq!(err.status(), Some(400));
  assert_eq!(h.surface.last_alert().unwrap(), "Checkout failed: Cart is empty");
}

#[tokio::test]
async fn test_every_client_flow_is_registered() {
  let h = Harness::new(grocery_store());
  let flows = &h.state.flows;
  assert!(flows.is_registered::<CartActionData>());
  assert!(flows.is_registered::<CheckoutData>());
  assert!(flows.is_registered::<OrdersActionData>());
  assert!(flows.is_registered::<LoginData>());
  assert!(flows.is_registered::<RegistrationData>());
}
