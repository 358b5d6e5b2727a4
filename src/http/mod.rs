//! HTTP protocol layer module
//!
//! Response builders, MIME detection and `ETag` handling shared by the API
//! and static file handlers.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_404_response, build_405_response, build_file_response,
    build_options_response, json_response,
};
