//! Workflow engine relay
//!
//! Forwards start/resume calls to the automation engine's webhooks and shapes
//! the replies for the frontend.

mod forward;
pub mod normalize;

pub use forward::{resume_workflow, start_workflow, ForwardOptions, ForwardedBody};
