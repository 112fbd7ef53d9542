//! Geometry data structures for the render core
//!
//! Contains the vertex definition and the mesh container uploaded by the
//! resource layer. The vertex format is deliberately minimal: a tightly
//! packed 3-float position, matching attribute slot 0 of the shader pair.

/// A single vertex: tightly packed position in 3D space
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in 3D space
    pub position: [f32; 3],
}

// Safe to implement Pod and Zeroable for Vertex since it only contains f32 arrays
unsafe impl bytemuck::Pod for Vertex {}
unsafe impl bytemuck::Zeroable for Vertex {}

impl Vertex {
    /// Create a new vertex
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { position: [x, y, z] }
    }
}

/// Geometry container: vertex data plus triangle-list indices
///
/// The mesh owns its CPU-side data; the resource layer uploads it once and
/// the GPU copy is immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex data
    pub vertices: Vec<Vertex>,

    /// Index data for triangles
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Create the unit quad in the XY plane (Z = 0)
    ///
    /// Four corners wound as two triangles covering clip space exactly, so a
    /// pass-through vertex shader renders it fullscreen.
    pub fn quad() -> Self {
        Self {
            vertices: vec![
                Vertex::new(1.0, 1.0, 0.0),
                Vertex::new(1.0, -1.0, 0.0),
                Vertex::new(-1.0, -1.0, 0.0),
                Vertex::new(-1.0, 1.0, 0.0),
            ],
            indices: vec![0, 1, 3, 1, 2, 3],
        }
    }

    /// Vertex data as raw bytes for upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data as raw bytes for upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Number of indices in the triangle list
    pub fn index_count(&self) -> i32 {
        self.indices.len() as i32
    }
}
