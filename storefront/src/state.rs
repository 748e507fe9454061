// storefront/src/state.rs

use crate::api::StorefrontApi;
use crate::config::ClientConfig;
use crate::credentials::{CredentialProvider, StoredToken, TokenStore};
use crate::errors::{ClientError, Result};
use crate::flows;
use crate::surface::Surface;
use crate::transport::{HttpTransport, Transport};
use std::sync::Arc;
use storefront_flow::FlowRegistry;

/// Everything a flow step needs, shared by cloning. Flow contexts carry a copy.
#[derive(Clone)]
pub struct ClientState {
  pub api: StorefrontApi,
  pub surface: Arc<dyn Surface>,
  pub token_store: Arc<dyn TokenStore>,
  pub config: Arc<ClientConfig>,
  pub flows: Arc<FlowRegistry<ClientError>>,
}

impl ClientState {
  /// Wires the given collaborators together and registers every flow.
  pub fn new(
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialProvider>,
    token_store: Arc<dyn TokenStore>,
    surface: Arc<dyn Surface>,
  ) -> Self {
    let flows = Arc::new(FlowRegistry::<ClientError>::new());
    flows::register_all_flows(&flows);
    tracing::debug!(base_url = %config.base_url, "Client state assembled; flows registered.");
    Self {
      api: StorefrontApi::new(transport, credentials),
      surface,
      token_store,
      config: Arc::new(config),
      flows,
    }
  }

  /// HTTP transport plus a credential provider reading the cart token key from
  /// `token_store`.
  pub fn connect(config: ClientConfig, token_store: Arc<dyn TokenStore>, surface: Arc<dyn Surface>) -> Result<Self> {
    let transport = Arc::new(HttpTransport::new(&config)?);
    let credentials = Arc::new(StoredToken::new(token_store.clone(), config.cart_token_key.clone()));
    Ok(Self::new(config, transport, credentials, token_store, surface))
  }

  pub fn currency(&self) -> &str {
    &self.config.currency_suffix
  }
}
