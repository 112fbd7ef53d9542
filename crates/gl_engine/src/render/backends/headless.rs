//! In-memory render device for tests and tooling
//!
//! Implements [`RenderDevice`] as a pure state tracker: object creation and
//! deletion, binding points, shader compilation and linkage, and per-frame
//! command capture, with no GPU or window system behind it. Compilation
//! follows a simple rule that real drivers agree with: a source compiles
//! unless it is empty or contains an `#error` directive, and a program links
//! when a compiled vertex and fragment stage are attached.

use std::collections::BTreeMap;

use crate::render::api::{
    BufferHandle, BufferTarget, BufferUsage, ClearFlags, DeviceResult, ProgramHandle,
    RenderDevice, ShaderHandle, ShaderStage, VertexArrayHandle,
};

/// Kind tags for the creation and deletion journals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Vertex or index buffer object
    Buffer,
    /// Vertex array (layout binding) object
    VertexArray,
    /// Shader stage object
    Shader,
    /// Program object
    Program,
}

/// One recorded vertex attribute slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Floats per vertex
    pub components: i32,
    /// Byte distance between consecutive vertices
    pub stride: i32,
    /// Byte offset of the first component
    pub offset: i32,
    /// Vertex buffer captured when the pointer was set
    pub buffer: Option<BufferHandle>,
}

/// One recorded framebuffer-affecting command
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOp {
    /// Clear of the selected attachments with the current clear color
    Clear {
        /// Clear color in effect
        color: [f32; 4],
        /// Attachments cleared
        flags: ClearFlags,
    },
    /// Indexed draw call with the state in effect at issue time
    Draw {
        /// Program selected for the draw
        program: Option<ProgramHandle>,
        /// Vertex array bound for the draw
        vertex_array: Option<VertexArrayHandle>,
        /// Indices consumed
        index_count: i32,
        /// Byte offset into the index buffer
        offset: i32,
    },
}

/// All commands recorded between two presents
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Commands in issue order
    pub ops: Vec<FrameOp>,
    /// Viewport in effect when the frame was presented
    pub viewport: (i32, i32, i32, i32),
}

#[derive(Debug, Clone, Default)]
struct BufferRecord {
    byte_len: usize,
    usage: Option<BufferUsage>,
}

#[derive(Debug, Clone, Default)]
struct VertexArrayRecord {
    attributes: BTreeMap<u32, VertexAttribute>,
    enabled: Vec<u32>,
    element_buffer: Option<BufferHandle>,
}

#[derive(Debug, Clone)]
struct ShaderRecord {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    info_log: String,
}

#[derive(Debug, Clone, Default)]
struct ProgramRecord {
    attached: Vec<ShaderHandle>,
    linked: bool,
    info_log: String,
}

/// State-tracking device with no GPU behind it
///
/// Sequentially numbers every created object and journals creations and
/// deletions so tests can assert ordering, not just final counts. Draw and
/// clear commands accumulate until [`RenderDevice::present`] seals them
/// into a [`Frame`].
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    next_id: u64,
    buffers: BTreeMap<u64, BufferRecord>,
    vertex_arrays: BTreeMap<u64, VertexArrayRecord>,
    shaders: BTreeMap<u64, ShaderRecord>,
    programs: BTreeMap<u64, ProgramRecord>,

    bound_vertex_buffer: Option<BufferHandle>,
    bound_index_buffer: Option<BufferHandle>,
    bound_vertex_array: Option<VertexArrayHandle>,
    active_program: Option<ProgramHandle>,

    clear_color: [f32; 4],
    viewport: (i32, i32, i32, i32),

    pending_ops: Vec<FrameOp>,
    frames: Vec<Frame>,
    creations: Vec<(ObjectKind, u64)>,
    deletions: Vec<(ObjectKind, u64)>,
}

impl HeadlessDevice {
    /// Create an empty device with no live objects
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self, kind: ObjectKind) -> u64 {
        self.next_id += 1;
        self.creations.push((kind, self.next_id));
        self.next_id
    }

    /// Frames sealed by `present`, oldest first
    pub fn presented_frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Commands issued since the last present
    pub fn pending_ops(&self) -> &[FrameOp] {
        &self.pending_ops
    }

    /// Current viewport rectangle
    pub fn viewport(&self) -> (i32, i32, i32, i32) {
        self.viewport
    }

    /// Current clear color
    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    /// Total number of live objects of all kinds
    pub fn live_object_count(&self) -> usize {
        self.buffers.len() + self.vertex_arrays.len() + self.shaders.len() + self.programs.len()
    }

    /// Every creation since construction, in order
    pub fn creation_log(&self) -> &[(ObjectKind, u64)] {
        &self.creations
    }

    /// Every deletion since construction, in order
    pub fn deletion_log(&self) -> &[(ObjectKind, u64)] {
        &self.deletions
    }

    /// Buffer currently bound to `target`
    pub fn bound_buffer(&self, target: BufferTarget) -> Option<BufferHandle> {
        match target {
            BufferTarget::Vertex => self.bound_vertex_buffer,
            BufferTarget::Index => self.bound_index_buffer,
        }
    }

    /// Currently bound vertex array
    pub fn bound_vertex_array(&self) -> Option<VertexArrayHandle> {
        self.bound_vertex_array
    }

    /// Currently selected program
    pub fn active_program(&self) -> Option<ProgramHandle> {
        self.active_program
    }

    /// Uploaded byte length of a buffer
    pub fn buffer_len(&self, buffer: BufferHandle) -> Option<usize> {
        self.buffers.get(&buffer.0).map(|record| record.byte_len)
    }

    /// Index buffer captured by a vertex array
    pub fn captured_index_buffer(&self, array: VertexArrayHandle) -> Option<BufferHandle> {
        self.vertex_arrays
            .get(&array.0)
            .and_then(|record| record.element_buffer)
    }

    /// Recorded attribute slot of a vertex array
    pub fn attribute(&self, array: VertexArrayHandle, location: u32) -> Option<VertexAttribute> {
        self.vertex_arrays
            .get(&array.0)
            .and_then(|record| record.attributes.get(&location))
            .copied()
    }

    /// Whether an attribute slot was enabled on a vertex array
    pub fn attribute_enabled(&self, array: VertexArrayHandle, location: u32) -> bool {
        self.vertex_arrays
            .get(&array.0)
            .map(|record| record.enabled.contains(&location))
            .unwrap_or(false)
    }

    fn compile_result(stage: ShaderStage, source: &str) -> (bool, String) {
        if source.trim().is_empty() {
            (false, format!("ERROR: empty {stage} shader source"))
        } else if source.contains("#error") {
            (
                false,
                format!("ERROR: {stage} shader source contains #error directive"),
            )
        } else {
            (true, String::new())
        }
    }
}

impl RenderDevice for HeadlessDevice {
    fn create_buffer(&mut self) -> DeviceResult<BufferHandle> {
        let id = self.next_id(ObjectKind::Buffer);
        self.buffers.insert(id, BufferRecord::default());
        Ok(BufferHandle(id))
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferHandle>) {
        match target {
            BufferTarget::Vertex => self.bound_vertex_buffer = buffer,
            BufferTarget::Index => {
                self.bound_index_buffer = buffer;
                // The index binding is state of the bound vertex array.
                if let Some(array) = self.bound_vertex_array {
                    if let Some(record) = self.vertex_arrays.get_mut(&array.0) {
                        record.element_buffer = buffer;
                    }
                }
            }
        }
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        if let Some(bound) = self.bound_buffer(target) {
            if let Some(record) = self.buffers.get_mut(&bound.0) {
                record.byte_len = data.len();
                record.usage = Some(usage);
            }
        }
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        if self.buffers.remove(&buffer.0).is_some() {
            self.deletions.push((ObjectKind::Buffer, buffer.0));
        }
        if self.bound_vertex_buffer == Some(buffer) {
            self.bound_vertex_buffer = None;
        }
        if self.bound_index_buffer == Some(buffer) {
            self.bound_index_buffer = None;
        }
    }

    fn is_buffer(&self, buffer: BufferHandle) -> bool {
        self.buffers.contains_key(&buffer.0)
    }

    fn create_vertex_array(&mut self) -> DeviceResult<VertexArrayHandle> {
        let id = self.next_id(ObjectKind::VertexArray);
        self.vertex_arrays.insert(id, VertexArrayRecord::default());
        Ok(VertexArrayHandle(id))
    }

    fn bind_vertex_array(&mut self, array: Option<VertexArrayHandle>) {
        self.bound_vertex_array = array;
    }

    fn vertex_attrib_pointer(&mut self, location: u32, components: i32, stride: i32, offset: i32) {
        let captured = self.bound_vertex_buffer;
        if let Some(array) = self.bound_vertex_array {
            if let Some(record) = self.vertex_arrays.get_mut(&array.0) {
                record.attributes.insert(
                    location,
                    VertexAttribute {
                        components,
                        stride,
                        offset,
                        buffer: captured,
                    },
                );
            }
        }
    }

    fn enable_vertex_attrib(&mut self, location: u32) {
        if let Some(array) = self.bound_vertex_array {
            if let Some(record) = self.vertex_arrays.get_mut(&array.0) {
                if !record.enabled.contains(&location) {
                    record.enabled.push(location);
                }
            }
        }
    }

    fn delete_vertex_array(&mut self, array: VertexArrayHandle) {
        if self.vertex_arrays.remove(&array.0).is_some() {
            self.deletions.push((ObjectKind::VertexArray, array.0));
        }
        if self.bound_vertex_array == Some(array) {
            self.bound_vertex_array = None;
        }
    }

    fn is_vertex_array(&self, array: VertexArrayHandle) -> bool {
        self.vertex_arrays.contains_key(&array.0)
    }

    fn create_shader(&mut self, stage: ShaderStage) -> DeviceResult<ShaderHandle> {
        let id = self.next_id(ObjectKind::Shader);
        self.shaders.insert(
            id,
            ShaderRecord {
                stage,
                source: String::new(),
                compiled: false,
                info_log: String::new(),
            },
        );
        Ok(ShaderHandle(id))
    }

    fn shader_source(&mut self, shader: ShaderHandle, source: &str) {
        if let Some(record) = self.shaders.get_mut(&shader.0) {
            record.source = source.to_string();
        }
    }

    fn compile_shader(&mut self, shader: ShaderHandle) {
        if let Some(record) = self.shaders.get_mut(&shader.0) {
            let (compiled, info_log) = Self::compile_result(record.stage, &record.source);
            record.compiled = compiled;
            record.info_log = info_log;
        }
    }

    fn shader_compile_status(&self, shader: ShaderHandle) -> bool {
        self.shaders
            .get(&shader.0)
            .map(|record| record.compiled)
            .unwrap_or(false)
    }

    fn shader_info_log(&self, shader: ShaderHandle) -> String {
        self.shaders
            .get(&shader.0)
            .map(|record| record.info_log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&mut self, shader: ShaderHandle) {
        if self.shaders.remove(&shader.0).is_some() {
            self.deletions.push((ObjectKind::Shader, shader.0));
        }
    }

    fn is_shader(&self, shader: ShaderHandle) -> bool {
        self.shaders.contains_key(&shader.0)
    }

    fn create_program(&mut self) -> DeviceResult<ProgramHandle> {
        let id = self.next_id(ObjectKind::Program);
        self.programs.insert(id, ProgramRecord::default());
        Ok(ProgramHandle(id))
    }

    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle) {
        if let Some(record) = self.programs.get_mut(&program.0) {
            if !record.attached.contains(&shader) {
                record.attached.push(shader);
            }
        }
    }

    fn link_program(&mut self, program: ProgramHandle) {
        let Some(record) = self.programs.get(&program.0) else {
            return;
        };
        let mut has_vertex = false;
        let mut has_fragment = false;
        for attached in &record.attached {
            if let Some(shader) = self.shaders.get(&attached.0) {
                if shader.compiled {
                    match shader.stage {
                        ShaderStage::Vertex => has_vertex = true,
                        ShaderStage::Fragment => has_fragment = true,
                    }
                }
            }
        }
        let linked = has_vertex && has_fragment;
        let info_log = if linked {
            String::new()
        } else {
            "ERROR: program requires a compiled vertex and fragment shader".to_string()
        };
        if let Some(record) = self.programs.get_mut(&program.0) {
            record.linked = linked;
            record.info_log = info_log;
        }
    }

    fn program_link_status(&self, program: ProgramHandle) -> bool {
        self.programs
            .get(&program.0)
            .map(|record| record.linked)
            .unwrap_or(false)
    }

    fn program_info_log(&self, program: ProgramHandle) -> String {
        self.programs
            .get(&program.0)
            .map(|record| record.info_log.clone())
            .unwrap_or_default()
    }

    fn use_program(&mut self, program: Option<ProgramHandle>) {
        self.active_program = program;
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        if self.programs.remove(&program.0).is_some() {
            self.deletions.push((ObjectKind::Program, program.0));
        }
        if self.active_program == Some(program) {
            self.active_program = None;
        }
    }

    fn is_program(&self, program: ProgramHandle) -> bool {
        self.programs.contains_key(&program.0)
    }

    fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear_color = color;
    }

    fn clear(&mut self, flags: ClearFlags) {
        self.pending_ops.push(FrameOp::Clear {
            color: self.clear_color,
            flags,
        });
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.viewport = (x, y, width, height);
    }

    fn draw_indexed(&mut self, index_count: i32, offset: i32) {
        self.pending_ops.push(FrameOp::Draw {
            program: self.active_program,
            vertex_array: self.bound_vertex_array,
            index_count,
            offset,
        });
    }

    fn present(&mut self) -> DeviceResult<()> {
        self.frames.push(Frame {
            ops: std::mem::take(&mut self.pending_ops),
            viewport: self.viewport,
        });
        Ok(())
    }
}
