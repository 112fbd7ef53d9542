//! OpenGL render device
//!
//! Implements [`RenderDevice`] on top of a live OpenGL 3.3 core context via
//! `glow`. Opaque engine handles map to native GL objects through per-kind
//! tables; presentation swaps the window's buffers through a detached glfw
//! render context.

use std::collections::HashMap;

use glfw::Context as _;
use glow::HasContext;

use crate::render::api::{
    BufferHandle, BufferTarget, BufferUsage, ClearFlags, DeviceResult, ProgramHandle,
    RenderDevice, ShaderHandle, ShaderStage, VertexArrayHandle,
};
use crate::render::RenderError;

fn gl_buffer_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Vertex => glow::ARRAY_BUFFER,
        BufferTarget::Index => glow::ELEMENT_ARRAY_BUFFER,
    }
}

fn gl_buffer_usage(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::Static => glow::STATIC_DRAW,
        BufferUsage::Dynamic => glow::DYNAMIC_DRAW,
        BufferUsage::Stream => glow::STREAM_DRAW,
    }
}

fn gl_shader_stage(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn gl_clear_mask(flags: ClearFlags) -> u32 {
    let mut mask = 0;
    if flags.contains(ClearFlags::COLOR) {
        mask |= glow::COLOR_BUFFER_BIT;
    }
    if flags.contains(ClearFlags::DEPTH) {
        mask |= glow::DEPTH_BUFFER_BIT;
    }
    if flags.contains(ClearFlags::STENCIL) {
        mask |= glow::STENCIL_BUFFER_BIT;
    }
    mask
}

/// Render device backed by a live OpenGL context
///
/// Engine handles are sequential ids; the per-kind tables map them to the
/// native objects `glow` hands out. Deleting a handle removes the table
/// entry, so stale handles simply miss and are reported dead by the `is_*`
/// queries.
pub struct GlDevice {
    gl: glow::Context,
    render_context: glfw::PRenderContext,
    next_id: u64,
    buffers: HashMap<u64, glow::NativeBuffer>,
    vertex_arrays: HashMap<u64, glow::NativeVertexArray>,
    shaders: HashMap<u64, glow::NativeShader>,
    programs: HashMap<u64, glow::NativeProgram>,
}

impl GlDevice {
    /// Create a device for the given window
    ///
    /// The window's GL context must be current on the calling thread; the
    /// function pointer loader resolves symbols against it.
    pub fn new(window: &mut glfw::Window) -> Self {
        log::debug!("Creating GlDevice...");
        let gl = unsafe {
            glow::Context::from_loader_function(|symbol| {
                window.get_proc_address(symbol) as *const _
            })
        };
        let version = unsafe { gl.get_parameter_string(glow::VERSION) };
        log::info!("OpenGL context: {version}");

        Self {
            gl,
            render_context: window.render_context(),
            next_id: 0,
            buffers: HashMap::new(),
            vertex_arrays: HashMap::new(),
            shaders: HashMap::new(),
            programs: HashMap::new(),
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl RenderDevice for GlDevice {
    fn create_buffer(&mut self) -> DeviceResult<BufferHandle> {
        let native = unsafe { self.gl.create_buffer() }
            .map_err(RenderError::BackendError)?;
        let id = self.next_id();
        self.buffers.insert(id, native);
        Ok(BufferHandle(id))
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferHandle>) {
        let native = buffer.and_then(|handle| self.buffers.get(&handle.0).copied());
        unsafe { self.gl.bind_buffer(gl_buffer_target(target), native) }
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(gl_buffer_target(target), data, gl_buffer_usage(usage))
        }
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        if let Some(native) = self.buffers.remove(&buffer.0) {
            unsafe { self.gl.delete_buffer(native) }
        }
    }

    fn is_buffer(&self, buffer: BufferHandle) -> bool {
        self.buffers.contains_key(&buffer.0)
    }

    fn create_vertex_array(&mut self) -> DeviceResult<VertexArrayHandle> {
        let native = unsafe { self.gl.create_vertex_array() }
            .map_err(RenderError::BackendError)?;
        let id = self.next_id();
        self.vertex_arrays.insert(id, native);
        Ok(VertexArrayHandle(id))
    }

    fn bind_vertex_array(&mut self, array: Option<VertexArrayHandle>) {
        let native = array.and_then(|handle| self.vertex_arrays.get(&handle.0).copied());
        unsafe { self.gl.bind_vertex_array(native) }
    }

    fn vertex_attrib_pointer(&mut self, location: u32, components: i32, stride: i32, offset: i32) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(location, components, glow::FLOAT, false, stride, offset)
        }
    }

    fn enable_vertex_attrib(&mut self, location: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(location) }
    }

    fn delete_vertex_array(&mut self, array: VertexArrayHandle) {
        if let Some(native) = self.vertex_arrays.remove(&array.0) {
            unsafe { self.gl.delete_vertex_array(native) }
        }
    }

    fn is_vertex_array(&self, array: VertexArrayHandle) -> bool {
        self.vertex_arrays.contains_key(&array.0)
    }

    fn create_shader(&mut self, stage: ShaderStage) -> DeviceResult<ShaderHandle> {
        let native = unsafe { self.gl.create_shader(gl_shader_stage(stage)) }
            .map_err(RenderError::BackendError)?;
        let id = self.next_id();
        self.shaders.insert(id, native);
        Ok(ShaderHandle(id))
    }

    fn shader_source(&mut self, shader: ShaderHandle, source: &str) {
        if let Some(&native) = self.shaders.get(&shader.0) {
            unsafe { self.gl.shader_source(native, source) }
        }
    }

    fn compile_shader(&mut self, shader: ShaderHandle) {
        if let Some(&native) = self.shaders.get(&shader.0) {
            unsafe { self.gl.compile_shader(native) }
        }
    }

    fn shader_compile_status(&self, shader: ShaderHandle) -> bool {
        match self.shaders.get(&shader.0) {
            Some(&native) => unsafe { self.gl.get_shader_compile_status(native) },
            None => false,
        }
    }

    fn shader_info_log(&self, shader: ShaderHandle) -> String {
        match self.shaders.get(&shader.0) {
            Some(&native) => unsafe { self.gl.get_shader_info_log(native) },
            None => String::new(),
        }
    }

    fn delete_shader(&mut self, shader: ShaderHandle) {
        if let Some(native) = self.shaders.remove(&shader.0) {
            unsafe { self.gl.delete_shader(native) }
        }
    }

    fn is_shader(&self, shader: ShaderHandle) -> bool {
        self.shaders.contains_key(&shader.0)
    }

    fn create_program(&mut self) -> DeviceResult<ProgramHandle> {
        let native = unsafe { self.gl.create_program() }
            .map_err(RenderError::BackendError)?;
        let id = self.next_id();
        self.programs.insert(id, native);
        Ok(ProgramHandle(id))
    }

    fn attach_shader(&mut self, program: ProgramHandle, shader: ShaderHandle) {
        if let (Some(&program), Some(&shader)) =
            (self.programs.get(&program.0), self.shaders.get(&shader.0))
        {
            unsafe { self.gl.attach_shader(program, shader) }
        }
    }

    fn link_program(&mut self, program: ProgramHandle) {
        if let Some(&native) = self.programs.get(&program.0) {
            unsafe { self.gl.link_program(native) }
        }
    }

    fn program_link_status(&self, program: ProgramHandle) -> bool {
        match self.programs.get(&program.0) {
            Some(&native) => unsafe { self.gl.get_program_link_status(native) },
            None => false,
        }
    }

    fn program_info_log(&self, program: ProgramHandle) -> String {
        match self.programs.get(&program.0) {
            Some(&native) => unsafe { self.gl.get_program_info_log(native) },
            None => String::new(),
        }
    }

    fn use_program(&mut self, program: Option<ProgramHandle>) {
        let native = program.and_then(|handle| self.programs.get(&handle.0).copied());
        unsafe { self.gl.use_program(native) }
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        if let Some(native) = self.programs.remove(&program.0) {
            unsafe { self.gl.delete_program(native) }
        }
    }

    fn is_program(&self, program: ProgramHandle) -> bool {
        self.programs.contains_key(&program.0)
    }

    fn set_clear_color(&mut self, color: [f32; 4]) {
        unsafe { self.gl.clear_color(color[0], color[1], color[2], color[3]) }
    }

    fn clear(&mut self, flags: ClearFlags) {
        unsafe { self.gl.clear(gl_clear_mask(flags)) }
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn draw_indexed(&mut self, index_count: i32, offset: i32) {
        unsafe {
            self.gl
                .draw_elements(glow::TRIANGLES, index_count, glow::UNSIGNED_INT, offset)
        }
    }

    fn present(&mut self) -> DeviceResult<()> {
        self.render_context.swap_buffers();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_mask_mapping() {
        assert_eq!(gl_clear_mask(ClearFlags::COLOR), glow::COLOR_BUFFER_BIT);
        assert_eq!(
            gl_clear_mask(ClearFlags::COLOR | ClearFlags::DEPTH),
            glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT
        );
        assert_eq!(gl_clear_mask(ClearFlags::empty()), 0);
    }

    #[test]
    fn test_enum_mappings() {
        assert_eq!(gl_buffer_target(BufferTarget::Vertex), glow::ARRAY_BUFFER);
        assert_eq!(
            gl_buffer_target(BufferTarget::Index),
            glow::ELEMENT_ARRAY_BUFFER
        );
        assert_eq!(gl_buffer_usage(BufferUsage::Static), glow::STATIC_DRAW);
        assert_eq!(gl_shader_stage(ShaderStage::Fragment), glow::FRAGMENT_SHADER);
    }
}
