pub mod apply_ctx;
pub mod session;
pub mod step_driver;

pub use apply_ctx::ApplyCtx;
pub use session::SessionControl;
pub use step_driver::{AbandonReason, StepDriver, StepOutcome, StepState, MAX_STEP_ITERATIONS};
