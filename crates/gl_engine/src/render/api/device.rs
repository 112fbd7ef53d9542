//! Device abstraction trait for the rendering system
//!
//! This module defines the trait that rendering devices must implement to
//! provide a consistent interface for the resource and frame layers. The
//! call surface deliberately mirrors the buffer/layout/shader/program model
//! of the underlying graphics API so the lifecycle logic stays explicit and
//! auditable at the call site.

use crate::render::RenderError;
use bitflags::bitflags;
use std::fmt;

/// Result type for device operations
pub type DeviceResult<T> = Result<T, RenderError>;

/// Handle to a buffer object stored in the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Handle to a vertex array (layout binding) object stored in the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayHandle(pub u64);

/// Handle to a single shader stage object stored in the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u64);

/// Handle to a linked shader program stored in the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u64);

/// Binding targets for buffer objects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    /// Vertex attribute data (array buffer)
    Vertex,
    /// Index data (element array buffer); this binding is captured by the
    /// currently bound vertex array
    Index,
}

/// Upload frequency hint for buffer data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Uploaded once, drawn many times
    Static,
    /// Updated occasionally
    Dynamic,
    /// Updated every frame
    Stream,
}

/// Shader pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Per-vertex stage
    Vertex,
    /// Per-fragment stage
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Fragment => write!(f, "fragment"),
        }
    }
}

bitflags! {
    /// Framebuffer attachments selected by a clear operation
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearFlags: u32 {
        /// Color attachment
        const COLOR = 1;
        /// Depth attachment
        const DEPTH = 1 << 1;
        /// Stencil attachment
        const STENCIL = 1 << 2;
    }
}

/// Main rendering device trait
///
/// This trait abstracts over rendering devices (the real OpenGL device and
/// the headless state tracker used in tests) and carries every GPU call the
/// resource and frame layers make. Creation calls and presentation can fail;
/// state-setting calls are infallible, matching the underlying API, which
/// reports nothing after buffer and array operations.
pub trait RenderDevice {
    // === Buffer objects ===

    /// Create a new buffer object
    fn create_buffer(&mut self) -> DeviceResult<BufferHandle>;

    /// Bind a buffer to a target, or unbind with `None`
    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferHandle>);

    /// Upload data to the buffer currently bound to `target`
    fn buffer_data(&mut self, target: BufferTarget, data: &[u8], usage: BufferUsage);

    /// Delete a buffer object
    fn delete_buffer(&mut self, buffer: BufferHandle);

    /// Whether the handle refers to a live buffer object
    fn is_buffer(&self, buffer: BufferHandle) -> bool;

    // === Vertex array objects ===

    /// Create a new vertex array (layout binding) object
    fn create_vertex_array(&mut self) -> DeviceResult<VertexArrayHandle>;

    /// Bind a vertex array, or unbind with `None`
    fn bind_vertex_array(&mut self, array: Option<VertexArrayHandle>);

    /// Describe a float attribute read from the bound vertex buffer
    ///
    /// `components` is the float count per vertex for this attribute;
    /// `stride` and `offset` are in bytes.
    fn vertex_attrib_pointer(&mut self, location: u32, components: i32, stride: i32, offset: i32);

    /// Enable an attribute slot on the bound vertex array
    fn enable_vertex_attrib(&mut self, location: u32);

    /// Delete a vertex array object
    fn delete_vertex_array(&mut self, array: VertexArrayHandle);

    /// Whether the handle refers to a live vertex array object
    fn is_vertex_array(&self, array: VertexArrayHandle) -> bool;

    // === Shader stage objects ===

    /// Create a new shader object for the given stage
    fn create_shader(&mut self, stage: ShaderStage) -> DeviceResult<ShaderHandle>;

    /// Replace the source text of a shader object
    fn shader_source(&mut self, shader: ShaderHandle, source: &str);

    /// Compile a shader object; result is reported by `shader_compile_status`
    fn compile_shader(&mut self, shader: ShaderHandle);

    /// Whether the last compile of this shader succeeded
    fn shader_compile_status(&self, shader: ShaderHandle) -> bool;

    /// Compiler diagnostics for this shader (empty when nothing was reported)
    fn shader_info_log(&self, shader: ShaderHandle) -> String;

    /// Delete a shader object
    fn delete_shader(&mut self, shader: ShaderHandle);

    /// Whether the handle refers to a live shader object
    fn is_shader(&self, shader: ShaderHandle) -> bool;

    // === Program objects ===

    /// Create a new program object
    fn create_program(&mut self) -> DeviceResult<ProgramHandle>;

    /// Attach a shader stage to a program
    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle);

    /// Link the attached stages; result is reported by `program_link_status`
    fn link_program(&mut self, program: ProgramHandle);

    /// Whether the last link of this program succeeded
    fn program_link_status(&self, program: ProgramHandle) -> bool;

    /// Linker diagnostics for this program (empty when nothing was reported)
    fn program_info_log(&self, program: ProgramHandle) -> String;

    /// Select the active program, or deselect with `None`
    fn use_program(&mut self, program: Option<ProgramHandle>);

    /// Delete a program object
    fn delete_program(&mut self, program: ProgramHandle);

    /// Whether the handle refers to a live program object
    fn is_program(&self, program: ProgramHandle) -> bool;

    // === Frame state ===

    /// Set the color applied by subsequent color clears (RGBA)
    fn set_clear_color(&mut self, color: [f32; 4]);

    /// Clear the selected framebuffer attachments
    fn clear(&mut self, flags: ClearFlags);

    /// Set the viewport transform in pixels
    fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32);

    /// Draw an indexed triangle list from the bound vertex array
    ///
    /// Reads `index_count` unsigned 32-bit indices starting `offset` bytes
    /// into the captured index buffer.
    fn draw_indexed(&mut self, index_count: i32, offset: i32);

    /// Present the completed frame (buffer swap)
    fn present(&mut self) -> DeviceResult<()>;
}
