//! Common utilities for fake-uvc
//!
//! Shared between the descriptor tooling binaries: the application error type
//! and tracing subscriber setup.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
pub use logging::{LOG_LEVELS, setup_logging};
