// storefront/src/components/mod.rs

//! User-facing clients. Each operation runs a flow, and failures are reported
//! here, at the component boundary: logged, alerted, then returned.

pub mod auth;
pub mod cart;
pub mod orders;

pub use auth::AuthClient;
pub use cart::{CartBindings, CartClient};
pub use orders::{OrderBindings, OrdersClient};

use crate::errors::ClientError;
use crate::surface::Surface;
use tracing::warn;

pub(crate) fn report_failure(surface: &dyn Surface, prefix: &str, err: &ClientError) {
  warn!(error = %err, "{}", prefix);
  surface.alert(&format!("{}: {}", prefix, err.user_message()));
}
