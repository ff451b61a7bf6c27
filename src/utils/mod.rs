//! Utility modules for common functionality
//!
//! This module provides the logger and progress reporting used throughout the application.

pub mod logger;
pub(crate) mod progress;
