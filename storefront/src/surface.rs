// storefront/src/surface.rs

//! The display seam. Components never look elements up themselves; they are
//! handed `ElementHandle`s at construction and render through a `Surface`.

use crate::render::Node;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::io::Write;

/// Names a mount point on the page (an element id, a terminal section, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
  pub fn new(id: impl Into<String>) -> Self {
    ElementHandle(id.into())
  }

  pub fn id(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ElementHandle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

pub trait Surface: Send + Sync {
  /// Replaces everything under `handle` with `nodes`.
  fn mount(&self, handle: &ElementHandle, nodes: Vec<Node>);
  /// Adds `node` after the current content of `handle`.
  fn append(&self, handle: &ElementHandle, node: Node);
  /// Blocking, user-facing message.
  fn alert(&self, message: &str);
  fn navigate(&self, location: &str);
}

/// Keeps everything in memory. Useful for tests and for embedding the client
/// behind another UI layer that polls the current state.
#[derive(Debug, Default)]
pub struct MemorySurface {
  regions: Mutex<HashMap<ElementHandle, Vec<Node>>>,
  alerts: Mutex<Vec<String>>,
  navigations: Mutex<Vec<String>>,
}

impl MemorySurface {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn nodes(&self, handle: &ElementHandle) -> Vec<Node> {
    self.regions.lock().get(handle).cloned().unwrap_or_default()
  }

  /// Text rendering of a region, one line per top-level node.
  pub fn text(&self, handle: &ElementHandle) -> String {
    self
      .nodes(handle)
      .iter()
      .map(Node::to_text)
      .collect::<Vec<_>>()
      .join("\n")
  }

  pub fn alerts(&self) -> Vec<String> {
    self.alerts.lock().clone()
  }

  pub fn last_alert(&self) -> Option<String> {
    self.alerts.lock().last().cloned()
  }

  pub fn navigations(&self) -> Vec<String> {
    self.navigations.lock().clone()
  }
}

impl Surface for MemorySurface {
  fn mount(&self, handle: &ElementHandle, nodes: Vec<Node>) {
    self.regions.lock().insert(handle.clone(), nodes);
  }

  fn append(&self, handle: &ElementHandle, node: Node) {
    self.regions.lock().entry(handle.clone()).or_default().push(node);
  }

  fn alert(&self, message: &str) {
    self.alerts.lock().push(message.to_string());
  }

  fn navigate(&self, location: &str) {
    self.navigations.lock().push(location.to_string());
  }
}

/// Prints text renderings to stdout and alerts to stderr. Used by the CLI.
#[derive(Debug, Default)]
pub struct TerminalSurface {
  out: Mutex<()>,
}

impl TerminalSurface {
  pub fn new() -> Self {
    Self::default()
  }
}

impl Surface for TerminalSurface {
  fn mount(&self, handle: &ElementHandle, nodes: Vec<Node>) {
    let _guard = self.out.lock();
    let mut stdout = std::io::stdout().lock();
    let _ = writeln!(stdout, "== {} ==", handle);
    if nodes.is_empty() {
      let _ = writeln!(stdout, "(empty)");
    }
    for node in nodes {
      let _ = writeln!(stdout, "{}", node.to_text());
    }
  }

  fn append(&self, handle: &ElementHandle, node: Node) {
    let _guard = self.out.lock();
    let _ = writeln!(std::io::stdout().lock(), "-- {} --\n{}", handle, node.to_text());
  }

  fn alert(&self, message: &str) {
    let _guard = self.out.lock();
    let _ = writeln!(std::io::stderr().lock(), "! {}", message);
  }

  fn navigate(&self, location: &str) {
    let _guard = self.out.lock();
    let _ = writeln!(std::io::stdout().lock(), "→ {}", location);
  }
}
