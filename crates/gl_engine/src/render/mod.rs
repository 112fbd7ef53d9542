//! # Rendering System
//!
//! Core rendering layer: GPU resource lifecycle, per-frame command
//! sequencing, and the device abstraction both are written against.
//!
//! ## Architecture
//!
//! The rendering system is split along ownership lines:
//! - **ResourceManager**: Single owner of every GPU object lifetime
//! - **FrameRenderer**: Stateless issuer of the per-frame command sequence
//! - **RenderDevice**: Trait boundary between lifecycle logic and the GPU
//! - **Backends**: A live OpenGL device and a headless state tracker
//! - **Window**: GLFW window and context management

// Device abstraction
pub mod api;

/// Graphics backend implementations
///
/// Contains the OpenGL device and the headless state tracker used by tests.
pub mod backends;

// Core rendering layers
pub mod frame;
pub mod geometry;
pub mod resources;
pub mod shader;

// Windowing
pub mod window;

#[cfg(test)]
mod lifecycle_tests;

use thiserror::Error;

/// Errors that can occur in the rendering system
#[derive(Error, Debug)]
pub enum RenderError {
    /// Renderer initialization failed during setup
    ///
    /// Occurs when GPU resources cannot be brought up, typically because of
    /// a double initialization or a context that is no longer usable.
    #[error("Renderer initialization failed: {0}")]
    InitializationFailed(String),

    /// A shader source file could not be read
    ///
    /// Raised before any GPU allocation happens, so a missing or unreadable
    /// file never leaks buffers.
    #[error("Failed to read shader file {path}")]
    ShaderFile {
        /// Path as configured
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A shader stage failed to compile under the strict policy
    #[error("{stage} shader compilation failed: {log}")]
    ShaderCompile {
        /// Stage that failed
        stage: ShaderStage,
        /// Compiler diagnostics
        log: String,
    },

    /// The shader program failed to link under the strict policy
    #[error("Shader program link failed: {log}")]
    ProgramLink {
        /// Linker diagnostics
        log: String,
    },

    /// A frame was requested before resources were initialized
    ///
    /// Also raised after teardown; the render loop must not outlive the
    /// resources it draws with.
    #[error("Rendering resources are not initialized")]
    NotInitialized,

    /// Backend-specific error occurred
    ///
    /// Wraps device-level errors (object creation, presentation) in a
    /// generic form for consistent handling across backends.
    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

// High-level types that applications should use
pub use api::{
    BufferHandle, BufferTarget, BufferUsage, ClearFlags, DeviceResult, ProgramHandle,
    RenderDevice, ShaderHandle, ShaderStage, VertexArrayHandle,
};
pub use backends::{GlDevice, HeadlessDevice};
pub use frame::FrameRenderer;
pub use geometry::{Mesh, Vertex};
pub use resources::{LifecycleState, ResourceManager};
pub use shader::ShaderStageSources;
pub use window::{Window, WindowError, WindowResult};
