//! Shared utilities for stock-analyst
//!
//! This crate provides common functionality used across the workspace:
//! logging setup and environment-variable configuration helpers.

pub mod env;
pub mod logging;

pub use env::{EnvError, env_parse, env_string};
pub use logging::{LogFormat, init_tracing};
