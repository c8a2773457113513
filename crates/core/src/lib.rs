//! Core utilities for the engine.
//!
//! This crate provides foundational types and utilities used across the engine:
//! - Error types and result aliases
//! - Logging initialization
//! - Frame timer and frame limiter
//! - Configuration management

mod config;
mod error;
mod logging;
mod timer;

pub use config::{CameraConfig, ControllerConfig, EngineConfig};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use timer::{FrameLimiter, Timer};
