// core/src/flow/execution.rs

//! `Flow::run`.

use crate::core::context::Handler;
use crate::core::context_data::ContextData;
use crate::core::control::{FlowControl, FlowOutcome};
use crate::error::FlowError;
use crate::flow::definition::Flow;
use tracing::{event, instrument, Instrument, Level};

enum PhaseResult {
  Continue,
  Stopped,
}

async fn run_phase<TData, Err>(
  phase: &'static str,
  handlers: Option<&Vec<Handler<TData, Err>>>,
  ctx_data: &ContextData<TData>,
) -> Result<PhaseResult, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error,
{
  let Some(handlers) = handlers else {
    return Ok(PhaseResult::Continue);
  };
  for (handler_idx, handler_fn) in handlers.iter().enumerate() {
    let handler_span = tracing::span!(Level::DEBUG, "flow_handler", phase, handler_index = handler_idx);
    match handler_fn(ctx_data.clone()).instrument(handler_span).await {
      Ok(FlowControl::Continue) => {}
      Ok(FlowControl::Stop) => {
        event!(Level::INFO, phase, "Flow stopped by a handler.");
        return Ok(PhaseResult::Stopped);
      }
      Err(e) => {
        event!(Level::WARN, phase, error = %e, "Handler failed.");
        return Err(e);
      }
    }
  }
  Ok(PhaseResult::Continue)
}

impl<TData, Err> Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every step against `ctx_data`.
  ///
  /// Per step: a true `skip_if` skips it; a step without any handler is skipped
  /// when optional and fails with `FlowError::HandlerMissing` otherwise; then the
  /// `before`, `on` and `after` handlers run in registration order. The first
  /// `Stop` ends the run with `FlowOutcome::Stopped`, the first error ends it
  /// with that error.
  #[instrument(
    name = "Flow::run",
    skip_all,
    fields(
      flow_data_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<FlowOutcome, Err> {
    event!(Level::DEBUG, "Flow execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();
      let step_span = tracing::span!(
        Level::INFO,
        "flow_step",
        step_name = step_name,
        step_index = step_idx,
        optional = step_def.optional
      );

      if let Some(skip_cond) = &step_def.skip_if {
        if skip_cond(ctx_data.clone()) {
          event!(parent: &step_span, Level::DEBUG, "Step skipped by its condition.");
          continue;
        }
      }

      let has_handlers = [&self.before, &self.on, &self.after]
        .iter()
        .any(|table| table.get(step_name).is_some_and(|v| !v.is_empty()));

      if !has_handlers {
        if step_def.optional {
          event!(parent: &step_span, Level::DEBUG, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(parent: &step_span, Level::ERROR, "Non-optional step has no handlers.");
        return Err(Err::from(FlowError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      let phases = [
        ("before", self.before.get(step_name)),
        ("on", self.on.get(step_name)),
        ("after", self.after.get(step_name)),
      ];
      for (phase, handlers) in phases {
        let result = run_phase(phase, handlers, &ctx_data).instrument(step_span.clone()).await?;
        if let PhaseResult::Stopped = result {
          return Ok(FlowOutcome::Stopped);
        }
      }
      event!(parent: &step_span, Level::DEBUG, "Step finished.");
    }

    event!(Level::DEBUG, "Flow execution completed.");
    Ok(FlowOutcome::Completed)
  }
}
