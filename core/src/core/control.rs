// core/src/core/control.rs

//! Signals for controlling a flow and the outcome of a run.

/// Returned by a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
  /// Keep going with the remaining handlers and steps.
  Continue,
  /// Halt the flow now. Nothing after this handler runs.
  Stop,
}

/// Outcome of a full run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
  /// Every step that was not skipped ran to completion.
  Completed,
  /// A handler returned `FlowControl::Stop`.
  Stopped,
}
