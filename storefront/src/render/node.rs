// storefront/src/render/node.rs

use std::fmt::Write;

/// A minimal document tree. Text is stored raw and escaped on output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
  Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
  },
  Text(String),
}

const VOID_TAGS: [&str; 3] = ["input", "br", "hr"];
const BLOCK_TAGS: [&str; 8] = ["div", "p", "tr", "li", "h2", "h3", "ul", "tbody"];

impl Node {
  pub fn el(tag: &'static str) -> Self {
    Node::Element {
      tag,
      attrs: Vec::new(),
      children: Vec::new(),
    }
  }

  pub fn text(value: impl Into<String>) -> Self {
    Node::Text(value.into())
  }

  pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
    if let Node::Element { attrs, .. } = &mut self {
      attrs.push((name, value.into()));
    }
    self
  }

  pub fn child(mut self, node: Node) -> Self {
    if let Node::Element { children, .. } = &mut self {
      children.push(node);
    }
    self
  }

  pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
    if let Node::Element { children, .. } = &mut self {
      children.extend(nodes);
    }
    self
  }

  /// Shorthand for an element holding a single text child.
  pub fn with_text(tag: &'static str, value: impl Into<String>) -> Self {
    Node::el(tag).child(Node::text(value))
  }

  pub fn get_attr(&self, name: &str) -> Option<&str> {
    match self {
      Node::Element { attrs, .. } => attrs.iter().find(|(k, _)| *k == name).map(|(_, v)| v.as_str()),
      Node::Text(_) => None,
    }
  }

  /// Depth-first search for elements carrying `name="value"`.
  pub fn find_all<'a>(&'a self, name: &str, value: &str, out: &mut Vec<&'a Node>) {
    if self.get_attr(name) == Some(value) {
      out.push(self);
    }
    if let Node::Element { children, .. } = self {
      for c in children {
        c.find_all(name, value, out);
      }
    }
  }

  pub fn to_html(&self) -> String {
    let mut out = String::new();
    self.write_html(&mut out);
    out
  }

  fn write_html(&self, out: &mut String) {
    match self {
      Node::Text(t) => out.push_str(&escape(t)),
      Node::Element { tag, attrs, children } => {
        out.push('<');
        out.push_str(tag);
        for (k, v) in attrs {
          let _ = write!(out, " {}=\"{}\"", k, escape(v));
        }
        out.push('>');
        if VOID_TAGS.contains(tag) {
          return;
        }
        for c in children {
          c.write_html(out);
        }
        let _ = write!(out, "</{}>", tag);
      }
    }
  }

  /// Plain-text rendering: block elements end a line, table cells are
  /// separated by " | ", inputs show their value in brackets.
  pub fn to_text(&self) -> String {
    let mut out = String::new();
    self.write_text(&mut out);
    out.trim_end().to_string()
  }

  fn write_text(&self, out: &mut String) {
    match self {
      Node::Text(t) => out.push_str(t),
      Node::Element { tag, children, .. } => {
        if *tag == "input" {
          let _ = write!(out, "[{}]", self.get_attr("value").unwrap_or(""));
          return;
        }
        for (idx, c) in children.iter().enumerate() {
          if idx > 0 && matches!(c, Node::Element { tag: "td" | "th", .. }) {
            out.push_str(" | ");
          }
          c.write_text(out);
        }
        if BLOCK_TAGS.contains(tag) && !out.ends_with('\n') {
          out.push('\n');
        }
      }
    }
  }
}

fn escape(raw: &str) -> String {
  let mut escaped = String::with_capacity(raw.len());
  for ch in raw.chars() {
    match ch {
      '&' => escaped.push_str("&amp;"),
      '<' => escaped.push_str("&lt;"),
      '>' => escaped.push_str("&gt;"),
      '"' => escaped.push_str("&quot;"),
      '\'' => escaped.push_str("&#39;"),
      c => escaped.push(c),
    }
  }
  escaped
}
