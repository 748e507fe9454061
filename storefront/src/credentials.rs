// storefront/src/credentials.rs

//! Token storage and the credential provider injected into the clients.

use crate::errors::{ClientError, Result};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Supplies the bearer token for authenticated requests.
pub trait CredentialProvider: Send + Sync {
  fn get_token(&self) -> Option<String>;
}

/// Client-side persistent key/value storage for tokens.
pub trait TokenStore: Send + Sync {
  fn get(&self, key: &str) -> Result<Option<String>>;
  fn set(&self, key: &str, value: &str) -> Result<()>;
  fn remove(&self, key: &str) -> Result<()>;
}

/// A fixed token, e.g. one passed on the command line.
#[derive(Clone)]
pub struct StaticToken(Option<String>);

impl StaticToken {
  pub fn new(token: impl Into<String>) -> Self {
    StaticToken(Some(token.into()))
  }

  pub fn none() -> Self {
    StaticToken(None)
  }
}

impl CredentialProvider for StaticToken {
  fn get_token(&self) -> Option<String> {
    self.0.clone()
  }
}

impl std::fmt::Debug for StaticToken {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_tuple("StaticToken").field(&self.0.as_ref().map(|_| "[REDACTED]")).finish()
  }
}

/// Reads the token stored under `key` on every call, so a login that writes the
/// same key is picked up by the next request.
#[derive(Clone)]
pub struct StoredToken {
  store: Arc<dyn TokenStore>,
  key: String,
}

impl StoredToken {
  pub fn new(store: Arc<dyn TokenStore>, key: impl Into<String>) -> Self {
    Self { store, key: key.into() }
  }

  pub fn key(&self) -> &str {
    &self.key
  }
}

impl CredentialProvider for StoredToken {
  fn get_token(&self) -> Option<String> {
    match self.store.get(&self.key) {
      Ok(token) => token.filter(|t| !t.is_empty()),
      Err(e) => {
        tracing::warn!(key = %self.key, error = %e, "Could not read stored token.");
        None
      }
    }
  }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
  entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryTokenStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_entry(key: &str, value: &str) -> Self {
    let store = Self::new();
    store.entries.write().insert(key.to_string(), value.to_string());
    store
  }
}

impl TokenStore for MemoryTokenStore {
  fn get(&self, key: &str) -> Result<Option<String>> {
    Ok(self.entries.read().get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    self.entries.write().insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<()> {
    self.entries.write().remove(key);
    Ok(())
  }
}

/// Tokens kept as a flat JSON object in a file. A missing file is an empty store.
#[derive(Debug)]
pub struct FileTokenStore {
  path: PathBuf,
  lock: RwLock<()>,
}

impl FileTokenStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      lock: RwLock::new(()),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn load(&self) -> Result<BTreeMap<String, String>> {
    match fs::read_to_string(&self.path) {
      Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
      Ok(raw) => serde_json::from_str(&raw)
        .map_err(|e| ClientError::Storage(format!("{} is not a token file: {}", self.path.display(), e))),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
      Err(e) => Err(ClientError::Storage(format!("reading {}: {}", self.path.display(), e))),
    }
  }

  /// Writes a sibling temp file (owner-only on Unix) and renames it over the
  /// token file, so readers see either the old or the new content.
  fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
    let parent = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      Some(parent) => {
        fs::create_dir_all(parent)
          .map_err(|e| ClientError::Storage(format!("creating {}: {}", parent.display(), e)))?;
        parent
      }
      None => Path::new("."),
    };
    let storage_err = |e: std::io::Error| ClientError::Storage(format!("writing {}: {}", self.path.display(), e));

    let raw = serde_json::to_string_pretty(entries)?;
    let mut tmp = NamedTempFile::new_in(parent).map_err(storage_err)?;
    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      tmp
        .as_file()
        .set_permissions(fs::Permissions::from_mode(0o600))
        .map_err(storage_err)?;
    }
    tmp.write_all(raw.as_bytes()).map_err(storage_err)?;
    tmp.as_file().sync_all().map_err(storage_err)?;
    tmp.persist(&self.path).map_err(|e| storage_err(e.error))?;
    Ok(())
  }
}

impl TokenStore for FileTokenStore {
  fn get(&self, key: &str) -> Result<Option<String>> {
    let _guard = self.lock.read();
    Ok(self.load()?.remove(key))
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    let _guard = self.lock.write();
    let mut entries = self.load()?;
    entries.insert(key.to_string(), value.to_string());
    self.save(&entries)
  }

  fn remove(&self, key: &str) -> Result<()> {
    let _guard = self.lock.write();
    let mut entries = self.load()?;
    if entries.remove(key).is_some() {
      self.save(&entries)?;
    }
    Ok(())
  }
}
