// storefront/src/transport.rs

//! The network boundary. Everything above it speaks `ApiRequest`/`ApiResponse`,
//! so the clients can be driven by a fake server in tests.

use crate::config::ClientConfig;
use crate::errors::{ClientError, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::fmt;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
  Empty,
  Json(Value),
  /// Sent as `application/x-www-form-urlencoded`.
  Form(Vec<(String, String)>),
}

#[derive(Clone, PartialEq)]
pub struct ApiRequest {
  pub method: Method,
  /// Path relative to the API base URL, starting with `/`.
  pub path: String,
  pub bearer: Option<String>,
  pub body: RequestBody,
}

impl ApiRequest {
  pub fn new(method: Method, path: impl Into<String>) -> Self {
    Self {
      method,
      path: path.into(),
      bearer: None,
      body: RequestBody::Empty,
    }
  }

  pub fn bearer(mut self, token: Option<String>) -> Self {
    self.bearer = token;
    self
  }

  pub fn json(mut self, body: Value) -> Self {
    self.body = RequestBody::Json(body);
    self
  }

  pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
    self.body = RequestBody::Form(fields);
    self
  }
}

impl fmt::Debug for ApiRequest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ApiRequest")
      .field("method", &self.method)
      .field("path", &self.path)
      .field("bearer", &self.bearer.as_ref().map(|_| "[REDACTED]"))
      .field("body", &self.body)
      .finish()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
  pub status: u16,
  pub body: String,
}

impl ApiResponse {
  pub fn new(status: u16, body: impl Into<String>) -> Self {
    Self {
      status,
      body: body.into(),
    }
  }

  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }

  /// Turns a non-2xx response into `ClientError::Http`.
  pub fn error_for_status(self) -> Result<Self> {
    if self.is_success() {
      Ok(self)
    } else {
      Err(ClientError::from_status(self.status, &self.body))
    }
  }
}

/// Sends one request. A transport error means no response was received; HTTP
/// error statuses are returned as ordinary responses.
#[async_trait]
pub trait Transport: Send + Sync {
  async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
  client: reqwest::Client,
  config: ClientConfig,
}

impl HttpTransport {
  pub fn new(config: &ClientConfig) -> Result<Self> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.request_timeout {
      builder = builder.timeout(timeout);
    }
    let client = builder
      .build()
      .map_err(|e| ClientError::Config(format!("could not build HTTP client: {}", e)))?;
    Ok(Self {
      client,
      config: config.clone(),
    })
  }
}

#[async_trait]
impl Transport for HttpTransport {
  #[instrument(name = "http::send", skip_all, fields(method = %request.method, path = %request.path))]
  async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
    let url = self.config.url(&request.path);
    let mut builder = self.client.request(request.method, &url);
    if let Some(token) = &request.bearer {
      builder = builder.bearer_auth(token);
    }
    builder = match request.body {
      RequestBody::Empty => builder,
      RequestBody::Json(value) => builder.json(&value),
      RequestBody::Form(fields) => builder.form(&fields),
    };

    let response = builder.send().await?;
    let status = response.status().as_u16();
    let body = response.text().await?;
    debug!(status, bytes = body.len(), "Response received.");
    Ok(ApiResponse { status, body })
  }
}
