//! # Unified Configuration System
//!
//! This module consolidates the configuration structures for the render core
//! into a single, coherent system: window settings, shader source locations,
//! and renderer behavior.
//!
//! ## Design Goals
//!
//! - **Centralized**: All configuration types in one place for easy discovery
//! - **Serializable**: Support for multiple config file formats (TOML, RON)
//! - **Type Safe**: Strong typing with validation and defaults

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use crate::config::{Config, ConfigError};

/// # Shader Configuration
///
/// Defines shader loading parameters and paths for the rendering system.
/// Supports path resolution and validation for development environments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShaderConfig {
    /// Path to the vertex shader source file
    pub vertex_shader_path: String,
    /// Path to the fragment shader source file
    pub fragment_shader_path: String,
}

impl ShaderConfig {
    /// Create a new shader configuration
    pub fn new(vertex_path: impl Into<String>, fragment_path: impl Into<String>) -> Self {
        Self {
            vertex_shader_path: vertex_path.into(),
            fragment_shader_path: fragment_path.into(),
        }
    }

    /// Create shader config with automatic path resolution
    ///
    /// This tries multiple common locations for shaders, useful for applications
    /// that might be run from different working directories.
    pub fn with_path_resolution(base_vertex: &str, base_fragment: &str) -> Self {
        let shader_dirs = ["shaders/", "resources/shaders/", "../shaders/", "./"];

        let mut vertex_path = None;
        let mut fragment_path = None;

        for dir in &shader_dirs {
            let vertex_test = format!("{}{}", dir, base_vertex);
            let fragment_test = format!("{}{}", dir, base_fragment);

            if Path::new(&vertex_test).exists() && vertex_path.is_none() {
                vertex_path = Some(vertex_test);
            }
            if Path::new(&fragment_test).exists() && fragment_path.is_none() {
                fragment_path = Some(fragment_test);
            }

            if vertex_path.is_some() && fragment_path.is_some() {
                break;
            }
        }

        Self {
            vertex_shader_path: vertex_path.unwrap_or_else(|| format!("shaders/{}", base_vertex)),
            fragment_shader_path: fragment_path
                .unwrap_or_else(|| format!("shaders/{}", base_fragment)),
        }
    }

    /// Validate that shader files exist
    pub fn validate(&self) -> Result<(), String> {
        if !Path::new(&self.vertex_shader_path).exists() {
            return Err(format!("Vertex shader not found: {}", self.vertex_shader_path));
        }
        if !Path::new(&self.fragment_shader_path).exists() {
            return Err(format!("Fragment shader not found: {}", self.fragment_shader_path));
        }
        Ok(())
    }
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self::with_path_resolution("shader.vert", "shader.frag")
    }
}

/// # Shader Failure Policy
///
/// Controls how shader compile and link failures are handled during
/// resource initialization. `Lenient` logs the compiler diagnostics and
/// continues with a program object that may be unusable; `Strict` treats
/// the first failure as fatal and releases everything allocated so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShaderFailurePolicy {
    /// Log diagnostics and continue with a possibly broken program
    #[default]
    Lenient,
    /// Abort initialization on the first compile or link failure
    Strict,
}

/// # Renderer Configuration
///
/// Configuration for the frame renderer: background color and the shader
/// failure policy applied during initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Clear color applied at the start of every frame (RGBA, 0.0..=1.0)
    pub clear_color: [f32; 4],
    /// How shader compile/link failures are handled
    pub shader_policy: ShaderFailurePolicy,
}

impl RendererConfig {
    /// Create a new renderer configuration with the default background
    pub fn new() -> Self {
        Self {
            clear_color: [0.2, 0.3, 0.3, 1.0],
            shader_policy: ShaderFailurePolicy::Lenient,
        }
    }

    /// Set the clear color
    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    /// Set the shader failure policy
    pub fn with_shader_policy(mut self, policy: ShaderFailurePolicy) -> Self {
        self.shader_policy = policy;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        for component in self.clear_color {
            if !(0.0..=1.0).contains(&component) {
                return Err(format!(
                    "Clear color component {} outside 0.0..=1.0",
                    component
                ));
            }
        }
        Ok(())
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Window Configuration
///
/// Window creation parameters passed through to the windowing layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    pub title: String,

    /// Window width in pixels
    pub width: u32,

    /// Window height in pixels
    pub height: u32,

    /// Whether window is resizable
    pub resizable: bool,

    /// VSync setting
    pub vsync: bool,
}

impl WindowConfig {
    /// Create a new window configuration
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            resizable: true,
            vsync: true,
        }
    }

    /// Set whether the window is resizable
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Set the vsync behavior
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.title.is_empty() {
            return Err("Window title cannot be empty".to_string());
        }
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "Window dimensions must be non-zero, got {}x{}",
                self.width, self.height
            ));
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new("GL Engine Application", 800, 600)
    }
}
