//! Render device backends
//!
//! Two implementations of [`RenderDevice`](crate::render::api::RenderDevice):
//! [`GlDevice`] drives a live OpenGL context, [`HeadlessDevice`] is a pure
//! state tracker that records the same call sequence for inspection without
//! any GPU or window system present.

pub mod gl;
pub mod headless;

pub use gl::GlDevice;
pub use headless::{Frame, FrameOp, HeadlessDevice, ObjectKind, VertexAttribute};
