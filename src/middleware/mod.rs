//! HTTP middleware shared across route groups.

pub mod logging;

pub use logging::request_logging;
