// core/src/core/context.rs

//! The `Handler<TData, Err>` type run by flow steps.

use crate::core::context_data::ContextData;
use crate::core::control::FlowControl;
use std::future::Future;
use std::pin::Pin;

/// A step handler.
///
/// Receives a clone of the run's `ContextData<TData>` and resolves to a
/// `FlowControl` or the flow's error type. Handlers read what they need under a
/// short lock, drop the guard, do their I/O, then lock again to write results
/// back. A guard must never be alive at an `.await`.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<FlowControl, Err>> + Send>> + Send + Sync,
>;
