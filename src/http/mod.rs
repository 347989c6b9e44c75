//! HTTP protocol layer
//!
//! Response builders and request decoding shared by both services,
//! decoupled from any specific business logic.

pub mod mime;
pub mod query;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_400_response, build_403_response, build_404_response, build_405_response,
    build_413_response, build_file_response, build_html_response, build_json_response,
    build_options_response, build_redirect_response,
};
