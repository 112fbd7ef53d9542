//! Shader source loading
//!
//! Reads the vertex/fragment source pair from disk before any GPU object is
//! created, so a missing file aborts initialization without leaking buffers.
//! Compilation itself happens in the resource layer through the device trait.

use crate::core::config::ShaderConfig;
use crate::render::{RenderError, RenderResult};

/// In-memory source text for a vertex/fragment shader pair
#[derive(Debug, Clone)]
pub struct ShaderStageSources {
    /// Vertex stage source text
    pub vertex: String,
    /// Fragment stage source text
    pub fragment: String,
}

impl ShaderStageSources {
    /// Build a source pair from in-memory text
    ///
    /// Used by tests and embedded-shader callers; file-based callers go
    /// through [`ShaderStageSources::load`].
    pub fn from_strings(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Read both stage sources from the configured file paths
    ///
    /// Fails with a file-access error if either path cannot be read.
    pub fn load(config: &ShaderConfig) -> RenderResult<Self> {
        let vertex = read_source(&config.vertex_shader_path)?;
        let fragment = read_source(&config.fragment_shader_path)?;
        log::debug!(
            "Loaded shader sources: {} ({} bytes), {} ({} bytes)",
            config.vertex_shader_path,
            vertex.len(),
            config.fragment_shader_path,
            fragment.len()
        );
        Ok(Self { vertex, fragment })
    }
}

fn read_source(path: &str) -> RenderResult<String> {
    std::fs::read_to_string(path).map_err(|source| RenderError::ShaderFile {
        path: path.to_string(),
        source,
    })
}
