//! Utility functions used across the application.
//!
//! - [`code_generator`] - Short code generation and alias validation
//! - [`url_validator`] - Destination URL validation
//! - [`client_ip`] - Client address extraction from requests
//! - [`db_error`] - Database error classification

pub mod client_ip;
pub mod code_generator;
pub mod db_error;
pub mod url_validator;
