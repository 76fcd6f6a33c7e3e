//! Utility functions for code generation, validation, and request metadata.
//!
//! - [`code_generator`] - Short code generation and slug/short-code validation
//! - [`client_info`] - Client IP and country extraction from HTTP headers
//! - [`device`] - Device type classification from the user-agent

pub mod client_info;
pub mod code_generator;
pub mod device;
