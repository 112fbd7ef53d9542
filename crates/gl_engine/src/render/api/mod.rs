//! Public rendering API
//!
//! This module contains the device abstraction that the resource and frame
//! layers are written against, including the handle types and state enums
//! shared by every backend.

pub mod device;

// Re-export commonly used types
pub use device::{
    BufferHandle, BufferTarget, BufferUsage, ClearFlags, DeviceResult, ProgramHandle,
    RenderDevice, ShaderHandle, ShaderStage, VertexArrayHandle,
};
