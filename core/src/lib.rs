// src/lib.rs

//! storefront-flow: a small async step-flow engine.
//!
//! A flow is an ordered list of named steps run against one shared context:
//!  - Each step carries `before`, `on` and `after` handler lists.
//!  - Handlers are async and may stop the flow early or fail it.
//!  - Steps can be optional or skipped by a condition evaluated at run time.
//!  - Steps can be inserted or removed after construction.
//!  - A registry keyed by context type dispatches a context to its flow.
//!
//! The storefront client runs every user action (load the cart, add an item,
//! check out, log in, ...) as one flow, so "mutate, then re-fetch, then render"
//! is a sequence of steps where a failure in an early step skips the rest.

pub mod core;
pub mod error;
pub mod flow;
pub mod registry;

pub use crate::core::context::Handler;
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{FlowControl, FlowOutcome};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::flow::definition::Flow;

pub use crate::error::{FlowError, FlowResult};

pub use crate::registry::FlowRegistry;

/*
    Usage:
    1. Define the data struct `MyData` an action works on.
    2. Create a `Flow<MyData, MyError>` naming its steps in order.
    3. Attach async handlers with `.on()`, `.before()`, `.after()`.
    4. Register the flow in a `FlowRegistry<MyError>` (or keep it and call `run` directly).
    5. Wrap an instance in `ContextData::new(..)` and run it; read results back from the
       same `ContextData` once the run returns.
*/
