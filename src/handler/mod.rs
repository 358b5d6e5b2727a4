//! Request handler module
//!
//! Routes requests to the workflow relay API, the health endpoint and static
//! file serving.

pub mod health;
pub mod router;
pub mod static_files;
pub mod workflow;

// Re-export main entry point
pub use router::handle_request;
