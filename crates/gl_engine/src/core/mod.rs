//! # Core Engine Module
//!
//! This module contains the core engine functionality and shared abstractions
//! that are used throughout the engine.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration system for all engine subsystems

pub mod config;

// Re-export commonly used config types
pub use config::{Config, ConfigError, RendererConfig, ShaderConfig, ShaderFailurePolicy, WindowConfig};
