//! Warden DNS Application Layer
//!
//! Ports (async traits over the outside world), the analysis services,
//! and the use cases that the API and background jobs drive.
pub mod ports;
pub mod services;
pub mod use_cases;
