// storefront/src/config.rs

use crate::errors::{ClientError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_CURRENCY: &str = "₽";
/// Key the cart and checkout requests read their bearer token from.
pub const DEFAULT_CART_TOKEN_KEY: &str = "token";
/// Key the login flow writes the issued token to.
pub const DEFAULT_LOGIN_TOKEN_KEY: &str = "access_token";
pub const DEFAULT_TOKEN_FILE: &str = ".storefront/tokens.json";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
  pub base_url: String,
  pub currency_suffix: String,
  pub cart_token_key: String,
  pub login_token_key: String,
  pub token_file: PathBuf,
  /// `None` leaves requests unbounded.
  pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      currency_suffix: DEFAULT_CURRENCY.to_string(),
      cart_token_key: DEFAULT_CART_TOKEN_KEY.to_string(),
      login_token_key: DEFAULT_LOGIN_TOKEN_KEY.to_string(),
      token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
      request_timeout: None,
    }
  }
}

impl ClientConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let get_env = |var_name: &str| env::var(var_name).ok().filter(|v| !v.trim().is_empty());
    let defaults = Self::default();

    let base_url = get_env("STOREFRONT_BASE_URL").unwrap_or(defaults.base_url);
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
      return Err(ClientError::Config(format!(
        "Invalid STOREFRONT_BASE_URL '{}': expected an http(s) URL",
        base_url
      )));
    }

    let request_timeout = match get_env("STOREFRONT_TIMEOUT_SECS") {
      Some(raw) => {
        let secs = raw
          .parse::<u64>()
          .map_err(|e| ClientError::Config(format!("Invalid STOREFRONT_TIMEOUT_SECS: {}", e)))?;
        Some(Duration::from_secs(secs))
      }
      None => None,
    };

    let config = Self {
      base_url: base_url.trim_end_matches('/').to_string(),
      currency_suffix: get_env("STOREFRONT_CURRENCY").unwrap_or(defaults.currency_suffix),
      cart_token_key: get_env("STOREFRONT_CART_TOKEN_KEY").unwrap_or(defaults.cart_token_key),
      login_token_key: get_env("STOREFRONT_LOGIN_TOKEN_KEY").unwrap_or(defaults.login_token_key),
      token_file: get_env("STOREFRONT_TOKEN_FILE")
        .map(PathBuf::from)
        .unwrap_or(defaults.token_file),
      request_timeout,
    };

    tracing::info!(base_url = %config.base_url, "Storefront client configuration loaded.");
    if config.cart_token_key != config.login_token_key {
      tracing::debug!(
        cart_key = %config.cart_token_key,
        login_key = %config.login_token_key,
        "Cart and login token keys differ; a fresh login will not authorize cart requests."
      );
    }
    Ok(config)
  }

  /// Joins an API path onto the base URL.
  pub fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url.trim_end_matches('/'), path)
  }
}
