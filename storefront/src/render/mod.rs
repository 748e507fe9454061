// storefront/src/render/mod.rs

//! Structured rendering: templates turn models into `Node` trees, which a
//! `Surface` mounts. Nothing here concatenates markup from raw strings.

pub mod money;
pub mod node;
pub mod templates;

pub use money::{cart_total, format_money};
pub use node::Node;
