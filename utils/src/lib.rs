//! Shared utilities for the Sarmenta consensus workspace.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};
