// storefront/src/models/user.rs

use crate::errors::{ClientError, Result};
use serde::{Deserialize, Serialize};

/// Sent form-urlencoded to `POST /v1/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
  pub email: String,
  pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
  pub access_token: String,
  #[serde(default = "default_token_type")]
  pub token_type: String,
}

fn default_token_type() -> String {
  "bearer".to_string()
}

/// Sent as JSON to `POST /v1/auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
  pub email: String,
  pub password: String,
  pub phone_number: String,
  pub first_name: String,
  pub last_name: String,
}

impl Registration {
  /// Mirrors the server's field rules so obviously bad input never leaves the client.
  pub fn validate(&self) -> Result<()> {
    if !looks_like_email(&self.email) {
      return Err(ClientError::Validation(format!("'{}' is not a valid email", self.email)));
    }
    let pw_len = self.password.chars().count();
    if !(5..=50).contains(&pw_len) {
      return Err(ClientError::Validation(
        "Password must be between 5 and 50 characters".to_string(),
      ));
    }
    if !valid_phone(&self.phone_number) {
      return Err(ClientError::Validation(
        "Phone number must start with '+' and contain 5 to 15 digits".to_string(),
      ));
    }
    for (label, value) in [("First name", &self.first_name), ("Last name", &self.last_name)] {
      if !valid_name(value) {
        return Err(ClientError::Validation(format!(
          "{} must be 2 to 50 letters or '-'",
          label
        )));
      }
    }
    Ok(())
  }
}

fn looks_like_email(email: &str) -> bool {
  match email.split_once('@') {
    Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
    None => false,
  }
}

fn valid_phone(phone: &str) -> bool {
  match phone.strip_prefix('+') {
    Some(digits) => (5..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()),
    None => false,
  }
}

fn valid_name(name: &str) -> bool {
  let len = name.chars().count();
  (2..=50).contains(&len) && name.chars().all(is_name_char)
}

/// Latin and basic Cyrillic (`А`..`я`) letters, or `-`. Matches the server's
/// `^[А-Яа-яA-Za-z\-]+$`, which leaves out `Ё`/`ё`.
fn is_name_char(c: char) -> bool {
  c.is_ascii_alphabetic() || ('А'..='я').contains(&c) || c == '-'
}

/// Whatever the register endpoint sends back. Older servers send `{ok, message}`,
/// newer ones the created user; both are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegistrationReply {
  #[serde(default)]
  pub ok: Option<bool>,
  #[serde(default)]
  pub message: Option<String>,
  #[serde(default)]
  pub email: Option<String>,
}
