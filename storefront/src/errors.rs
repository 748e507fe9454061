// storefront/src/errors.rs

use serde_json::Value;
use storefront_flow::FlowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
  /// The request never produced a response (DNS, connect, reset, timeout).
  #[error("Network Failure: {0}")]
  Network(String),

  /// The server answered with a non-2xx status. `explained` is set when
  /// `message` came from a `detail`/`message`/`error` field of the body.
  #[error("HTTP Error {status}: {message}")]
  Http { status: u16, message: String, explained: bool },

  /// User input was rejected before any request was sent.
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Unexpected Response Body: {0}")]
  Decode(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Token Storage Error: {0}")]
  Storage(String),

  #[error("Flow Error: {source}")]
  Flow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Error: {0}")]
  Internal(String),

  /// A flow stopped before producing the value the caller asked for.
  #[error("The action was halted before completing.")]
  Halted,
}

impl ClientError {
  /// Builds an `Http` error from a status and whatever body came with it.
  ///
  /// JSON bodies are searched for `detail`, `message` or `error` (FastAPI-style
  /// `detail` lists are joined); anything else falls back to the raw text.
  pub fn from_status(status: u16, body: &str) -> Self {
    let detail = serde_json::from_str::<Value>(body).ok().and_then(|v| extract_message(&v));
    let explained = detail.is_some();
    let message = detail.unwrap_or_else(|| {
      let trimmed = body.trim();
      if trimmed.is_empty() {
        format!("request failed with status {}", status)
      } else {
        trimmed.to_string()
      }
    });
    ClientError::Http {
      status,
      message,
      explained,
    }
  }

  pub fn status(&self) -> Option<u16> {
    match self {
      ClientError::Http { status, .. } => Some(*status),
      _ => None,
    }
  }

  /// The part of the error worth showing in an alert.
  pub fn user_message(&self) -> String {
    match self {
      ClientError::Http { message, .. } => message.clone(),
      ClientError::Validation(message) => message.clone(),
      ClientError::Network(reason) => format!("network failure ({})", reason),
      other => other.to_string(),
    }
  }
}

pub(crate) fn extract_message(body: &Value) -> Option<String> {
  for key in ["detail", "message", "error"] {
    match body.get(key) {
      Some(Value::String(s)) => return Some(s.clone()),
      Some(Value::Array(items)) if !items.is_empty() => {
        let parts: Vec<String> = items
          .iter()
          .map(|item| match item.get("msg").and_then(Value::as_str) {
            Some(msg) => msg.to_string(),
            None => item.to_string(),
          })
          .collect();
        return Some(parts.join("; "));
      }
      _ => {}
    }
  }
  None
}

impl From<reqwest::Error> for ClientError {
  fn from(err: reqwest::Error) -> Self {
    ClientError::Network(err.to_string())
  }
}

impl From<serde_json::Error> for ClientError {
  fn from(err: serde_json::Error) -> Self {
    ClientError::Decode(err.to_string())
  }
}

impl From<anyhow::Error> for ClientError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<ClientError>() {
      Ok(client_err) => client_err,
      Err(other) => ClientError::Internal(other.to_string()),
    }
  }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
