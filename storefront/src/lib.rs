// storefront/src/lib.rs

//! Client for a storefront REST API: cart, checkout, orders and auth.
//!
//! Every user action runs as a `storefront_flow` flow over a context built
//! from a shared [`ClientState`]. The network sits behind [`Transport`] and the
//! display behind [`Surface`], so both can be swapped (a terminal, an embedding
//! UI, or in-memory fakes for tests).

pub mod api;
pub mod components;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod flows;
pub mod models;
pub mod render;
pub mod state;
pub mod surface;
pub mod transport;

pub use api::StorefrontApi;
pub use components::{AuthClient, CartBindings, CartClient, OrderBindings, OrdersClient};
pub use config::ClientConfig;
pub use credentials::{CredentialProvider, FileTokenStore, MemoryTokenStore, StaticToken, StoredToken, TokenStore};
pub use errors::{ClientError, Result};
pub use state::ClientState;
pub use surface::{ElementHandle, MemorySurface, Surface, TerminalSurface};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, RequestBody, Transport};
