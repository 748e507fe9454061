// storefront/src/flows/auth_flow.rs

use crate::errors::{ClientError, Result};
use crate::flows::contexts::{LoginData, RegistrationData};
use storefront_flow::{ContextData, Flow, FlowControl, FlowRegistry};
use tracing::{info, instrument, warn};

/// Where a successful login lands.
pub const HOME_PAGE: &str = "/pages";
/// Where a successful registration lands.
pub const LANDING_PAGE: &str = "/";

pub fn register_login_flow(registry: &FlowRegistry<ClientError>) {
  let mut flow = Flow::<LoginData, ClientError>::new(&[
    ("submit_login", false, None),
    ("store_token", false, None),
    ("navigate_home", false, None),
  ]);

  flow.on("submit_login", submit_login);

  flow.on("store_token", |ctx_data: ContextData<LoginData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      let token = guard
        .token
        .as_ref()
        .ok_or_else(|| ClientError::Internal("store_token ran without a token".to_string()))?;
      let key = &guard.state.config.login_token_key;
      guard.state.token_store.set(key, &token.access_token)?;
      info!("Login Flow: Token stored under key '{}'.", key);
      Ok::<_, ClientError>(FlowControl::Continue)
    })
  });

  flow.on("navigate_home", |ctx_data: ContextData<LoginData>| {
    Box::pin(async move {
      ctx_data.read().state.surface.navigate(HOME_PAGE);
      Ok::<_, ClientError>(FlowControl::Continue)
    })
  });

  registry.register(flow);
  info!("Login flow registered.");
}

#[instrument(name = "auth_flow::submit_login", skip(ctx_data), err)]
async fn submit_login(ctx_data: ContextData<LoginData>) -> Result<FlowControl> {
  let (api, form) = {
    let guard = ctx_data.read();
    (guard.state.api.clone(), guard.form.clone())
  };

  match api.login(&form).await? {
    Some(token) => {
      ctx_data.write().token = Some(token);
      Ok(FlowControl::Continue)
    }
    None => {
      warn!("Login Flow: Response for {} carried no access token.", form.email);
      Err(ClientError::Decode("login response carried no access token".to_string()))
    }
  }
}

pub fn register_registration_flow(registry: &FlowRegistry<ClientError>) {
  let mut flow = Flow::<RegistrationData, ClientError>::new(&[
    ("validate_registration", false, None),
    ("submit_registration", false, None),
    ("confirm_registration", false, None),
  ]);

  flow.on("validate_registration", |ctx_data: ContextData<RegistrationData>| {
    Box::pin(async move {
      ctx_data.read().registration.validate()?;
      Ok::<_, ClientError>(FlowControl::Continue)
    })
  });

  flow.on("submit_registration", |ctx_data: ContextData<RegistrationData>| {
    Box::pin(async move {
      let (api, registration) = {
        let guard = ctx_data.read();
        (guard.state.api.clone(), guard.registration.clone())
      };
      let reply = api.register(&registration).await?;
      if reply.ok == Some(false) {
        let message = reply
          .message
          .clone()
          .unwrap_or_else(|| "the server rejected the registration".to_string());
        warn!("Registration Flow: Server rejected {}: {}", registration.email, message);
        return Err(ClientError::Validation(message));
      }
      info!("Registration Flow: Account created for {}.", registration.email);
      ctx_data.write().reply = Some(reply);
      Ok::<_, ClientError>(FlowControl::Continue)
    })
  });

  flow.on("confirm_registration", |ctx_data: ContextData<RegistrationData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      guard.state.surface.alert("Registration succeeded");
      guard.state.surface.navigate(LANDING_PAGE);
      Ok::<_, ClientError>(FlowControl::Continue)
    })
  });

  registry.register(flow);
  info!("Registration flow registered.");
}
