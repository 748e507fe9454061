// storefront/src/components/auth.rs

use crate::components::report_failure;
use crate::errors::{ClientError, Result};
use crate::flows::{LoginData, RegistrationData};
use crate::models::{AccessToken, LoginForm, Registration, RegistrationReply};
use crate::state::ClientState;
use storefront_flow::{ContextData, FlowOutcome};
use tracing::{info, instrument, warn};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Login, registration and logout.
#[derive(Clone)]
pub struct AuthClient {
  state: ClientState,
}

impl AuthClient {
  pub fn new(state: ClientState) -> Self {
    Self { state }
  }

  /// On success the token is stored under the configured login key.
  #[instrument(name = "AuthClient::login", skip_all, fields(email = %form.email))]
  pub async fn login(&self, form: LoginForm) -> Result<AccessToken> {
    let ctx_data = ContextData::new(LoginData {
      state: self.state.clone(),
      form,
      token: None,
    });

    let result = match self.state.flows.run(ctx_data.clone()).await {
      Ok(FlowOutcome::Completed) => ctx_data.read().token.clone().ok_or(ClientError::Halted),
      Ok(FlowOutcome::Stopped) => Err(ClientError::Halted),
      Err(e) => Err(e),
    };

    result.map_err(|e| {
      let message = match &e {
        ClientError::Http {
          message,
          explained: true,
          ..
        } => message.clone(),
        ClientError::Http { .. } | ClientError::Decode(_) | ClientError::Halted => INVALID_CREDENTIALS.to_string(),
        other => other.user_message(),
      };
      warn!(error = %e, "Login failed.");
      self.state.surface.alert(&message);
      e
    })
  }

  #[instrument(name = "AuthClient::register", skip_all, fields(email = %registration.email))]
  pub async fn register(&self, registration: Registration) -> Result<RegistrationReply> {
    let ctx_data = ContextData::new(RegistrationData {
      state: self.state.clone(),
      registration,
      reply: None,
    });

    let result = match self.state.flows.run(ctx_data.clone()).await {
      Ok(FlowOutcome::Completed) => ctx_data.read().reply.clone().ok_or(ClientError::Halted),
      Ok(FlowOutcome::Stopped) => Err(ClientError::Halted),
      Err(e) => Err(e),
    };

    result.map_err(|e| {
      report_failure(self.state.surface.as_ref(), "Registration failed", &e);
      e
    })
  }

  /// Forgets the stored tokens, under both the login and the cart key.
  #[instrument(name = "AuthClient::logout", skip(self))]
  pub fn logout(&self) -> Result<()> {
    let config = &self.state.config;
    self.state.token_store.remove(&config.login_token_key)?;
    if config.cart_token_key != config.login_token_key {
      self.state.token_store.remove(&config.cart_token_key)?;
    }
    info!("Stored tokens removed.");
    Ok(())
  }
}
