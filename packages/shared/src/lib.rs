//! Shared utilities for Huddle binaries and tests.

pub mod logger;
pub mod time;
