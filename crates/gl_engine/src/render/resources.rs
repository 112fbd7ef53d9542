//! GPU resource lifecycle management
//!
//! Owns every GPU-side handle the render core allocates: the vertex and
//! index buffers, the vertex layout binding, the program, and its two stage
//! objects. Allocation happens exactly once in [`ResourceManager::initialize`],
//! release exactly once in [`ResourceManager::teardown`], in strict reverse
//! order of creation. All GPU access goes through the [`RenderDevice`] trait.

use crate::core::config::{ShaderConfig, ShaderFailurePolicy};
use crate::render::api::{
    BufferHandle, BufferTarget, BufferUsage, ProgramHandle, RenderDevice, ShaderHandle,
    ShaderStage, VertexArrayHandle,
};
use crate::render::geometry::{Mesh, Vertex};
use crate::render::shader::ShaderStageSources;
use crate::render::{RenderError, RenderResult};

/// Lifecycle phases of the GPU state owned by the resource manager
///
/// Transitions are one-way: `Uninitialized` to `Initialized` via
/// `initialize`, to `Rendering` on the first frame, to `TornDown` via
/// `teardown`. There is no way back out of `TornDown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No GPU objects exist yet
    Uninitialized,
    /// All resources allocated and ready for per-frame use
    Initialized,
    /// At least one frame has been rendered
    Rendering,
    /// All resources released
    TornDown,
}

/// Resource slots in the order the manager creates them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackedResource {
    VertexBuffer,
    VertexArray,
    IndexBuffer,
    Program,
    VertexShader,
    FragmentShader,
}

/// Owner of all GPU-side buffer and program handles
///
/// The manager is the single owner of GPU object lifetimes; the frame
/// renderer only reads the handles. Teardown replays the recorded creation
/// order in reverse, so the release-order invariant is explicit rather than
/// a sequence of ad hoc calls.
pub struct ResourceManager {
    // GPU object slots, populated by initialize
    vertex_buffer: Option<BufferHandle>,
    vertex_array: Option<VertexArrayHandle>,
    index_buffer: Option<BufferHandle>,
    program: Option<ProgramHandle>,
    vertex_shader: Option<ShaderHandle>,
    fragment_shader: Option<ShaderHandle>,

    // Creation journal replayed in reverse by teardown
    creation_order: Vec<TrackedResource>,
    index_count: i32,
    state: LifecycleState,
}

impl Default for ResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceManager {
    /// Create an empty manager holding no GPU objects
    pub fn new() -> Self {
        Self {
            vertex_buffer: None,
            vertex_array: None,
            index_buffer: None,
            program: None,
            vertex_shader: None,
            fragment_shader: None,
            creation_order: Vec::new(),
            index_count: 0,
            state: LifecycleState::Uninitialized,
        }
    }

    /// Allocate and upload all GPU resources, loading shader sources from disk
    ///
    /// Both shader files are read before the first GPU allocation, so a
    /// missing or unreadable file fails without leaking buffers. Compile and
    /// link diagnostics are logged; whether a failed compile or link aborts
    /// initialization is decided by `policy`.
    pub fn initialize(
        &mut self,
        device: &mut dyn RenderDevice,
        mesh: &Mesh,
        shaders: &ShaderConfig,
        policy: ShaderFailurePolicy,
    ) -> RenderResult<()> {
        let sources = ShaderStageSources::load(shaders)?;
        self.initialize_with_sources(device, mesh, &sources, policy)
    }

    /// Allocate and upload all GPU resources from in-memory shader sources
    ///
    /// Core initialization path; usable without a filesystem. On any error
    /// everything allocated so far is released and the manager returns to
    /// `Uninitialized`.
    pub fn initialize_with_sources(
        &mut self,
        device: &mut dyn RenderDevice,
        mesh: &Mesh,
        sources: &ShaderStageSources,
        policy: ShaderFailurePolicy,
    ) -> RenderResult<()> {
        if self.state != LifecycleState::Uninitialized {
            return Err(RenderError::InitializationFailed(format!(
                "resources already set up (state {:?})",
                self.state
            )));
        }

        log::debug!("Initializing GPU resources...");
        match self.create_all(device, mesh, sources, policy) {
            Ok(()) => {
                self.state = LifecycleState::Initialized;
                log::info!(
                    "GPU resources ready: {} vertices, {} indices",
                    mesh.vertices.len(),
                    self.index_count
                );
                Ok(())
            }
            Err(err) => {
                log::error!("Resource initialization failed, releasing partial allocations: {err}");
                self.unbind_all(device);
                self.release_all(device);
                Err(err)
            }
        }
    }

    fn create_all(
        &mut self,
        device: &mut dyn RenderDevice,
        mesh: &Mesh,
        sources: &ShaderStageSources,
        policy: ShaderFailurePolicy,
    ) -> RenderResult<()> {
        // Vertex buffer first; the layout binding and index data depend on it.
        let vertex_buffer = device.create_buffer()?;
        self.vertex_buffer = Some(vertex_buffer);
        self.creation_order.push(TrackedResource::VertexBuffer);
        device.bind_buffer(BufferTarget::Vertex, Some(vertex_buffer));
        device.buffer_data(BufferTarget::Vertex, mesh.vertex_bytes(), BufferUsage::Static);
        log::debug!(
            "Uploaded vertex buffer {:?} ({} vertices)",
            vertex_buffer,
            mesh.vertices.len()
        );

        let vertex_array = device.create_vertex_array()?;
        self.vertex_array = Some(vertex_array);
        self.creation_order.push(TrackedResource::VertexArray);
        device.bind_vertex_array(Some(vertex_array));
        device.vertex_attrib_pointer(0, 3, std::mem::size_of::<Vertex>() as i32, 0);
        device.enable_vertex_attrib(0);

        // Bound while the layout binding is active so the binding is captured.
        let index_buffer = device.create_buffer()?;
        self.index_buffer = Some(index_buffer);
        self.creation_order.push(TrackedResource::IndexBuffer);
        device.bind_buffer(BufferTarget::Index, Some(index_buffer));
        device.buffer_data(BufferTarget::Index, mesh.index_bytes(), BufferUsage::Static);
        self.index_count = mesh.index_count();
        log::debug!(
            "Uploaded index buffer {:?} ({} indices)",
            index_buffer,
            self.index_count
        );

        let program = device.create_program()?;
        self.program = Some(program);
        self.creation_order.push(TrackedResource::Program);

        self.compile_stage(device, program, ShaderStage::Vertex, &sources.vertex, policy)?;
        self.compile_stage(device, program, ShaderStage::Fragment, &sources.fragment, policy)?;

        device.link_program(program);
        let diagnostics = device.program_info_log(program);
        if device.program_link_status(program) {
            if !diagnostics.is_empty() {
                log::debug!("Program link log: {diagnostics}");
            }
        } else if policy == ShaderFailurePolicy::Strict {
            return Err(RenderError::ProgramLink { log: diagnostics });
        } else {
            log::warn!("Shader program failed to link: {diagnostics}");
        }

        // The program is selected even after a lenient link failure; the
        // observable result is a degraded frame, not an abort.
        device.use_program(Some(program));
        Ok(())
    }

    fn compile_stage(
        &mut self,
        device: &mut dyn RenderDevice,
        program: ProgramHandle,
        stage: ShaderStage,
        source: &str,
        policy: ShaderFailurePolicy,
    ) -> RenderResult<()> {
        let shader = device.create_shader(stage)?;
        match stage {
            ShaderStage::Vertex => {
                self.vertex_shader = Some(shader);
                self.creation_order.push(TrackedResource::VertexShader);
            }
            ShaderStage::Fragment => {
                self.fragment_shader = Some(shader);
                self.creation_order.push(TrackedResource::FragmentShader);
            }
        }

        device.shader_source(shader, source);
        device.compile_shader(shader);
        device.attach_shader(program, shader);

        let diagnostics = device.shader_info_log(shader);
        if device.shader_compile_status(shader) {
            if !diagnostics.is_empty() {
                log::debug!("{stage} shader compile log: {diagnostics}");
            }
        } else if policy == ShaderFailurePolicy::Strict {
            return Err(RenderError::ShaderCompile {
                stage,
                log: diagnostics,
            });
        } else {
            log::warn!("{stage} shader failed to compile: {diagnostics}");
        }
        Ok(())
    }

    /// Release every GPU object this manager owns
    ///
    /// Unbinds all binding points, then deletes resources in exact reverse
    /// order of creation. Outside the ready states this is a logged no-op,
    /// so a failed startup path cannot double-release.
    pub fn teardown(&mut self, device: &mut dyn RenderDevice) {
        if !matches!(
            self.state,
            LifecycleState::Initialized | LifecycleState::Rendering
        ) {
            log::warn!("Teardown requested in state {:?}; ignoring", self.state);
            return;
        }

        log::debug!("Releasing GPU resources...");
        self.unbind_all(device);
        self.release_all(device);
        self.state = LifecycleState::TornDown;
        log::info!("GPU resources released");
    }

    fn unbind_all(&mut self, device: &mut dyn RenderDevice) {
        // Layout binding first; unbinding the index target afterwards cannot
        // disturb the binding it captured.
        device.bind_vertex_array(None);
        device.bind_buffer(BufferTarget::Vertex, None);
        device.bind_buffer(BufferTarget::Index, None);
        device.use_program(None);
    }

    fn release_all(&mut self, device: &mut dyn RenderDevice) {
        while let Some(slot) = self.creation_order.pop() {
            match slot {
                TrackedResource::VertexBuffer => {
                    if let Some(handle) = self.vertex_buffer.take() {
                        device.delete_buffer(handle);
                    }
                }
                TrackedResource::VertexArray => {
                    if let Some(handle) = self.vertex_array.take() {
                        device.delete_vertex_array(handle);
                    }
                }
                TrackedResource::IndexBuffer => {
                    if let Some(handle) = self.index_buffer.take() {
                        device.delete_buffer(handle);
                    }
                }
                TrackedResource::Program => {
                    if let Some(handle) = self.program.take() {
                        device.delete_program(handle);
                    }
                }
                TrackedResource::VertexShader => {
                    if let Some(handle) = self.vertex_shader.take() {
                        device.delete_shader(handle);
                    }
                }
                TrackedResource::FragmentShader => {
                    if let Some(handle) = self.fragment_shader.take() {
                        device.delete_shader(handle);
                    }
                }
            }
        }
        self.index_count = 0;
    }

    /// Mark the first rendered frame
    pub(crate) fn enter_rendering(&mut self) {
        if self.state == LifecycleState::Initialized {
            self.state = LifecycleState::Rendering;
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Whether resources are ready for per-frame use
    pub fn is_ready(&self) -> bool {
        matches!(
            self.state,
            LifecycleState::Initialized | LifecycleState::Rendering
        )
    }

    /// The linked shader program, if initialized
    pub fn program(&self) -> Option<ProgramHandle> {
        self.program
    }

    /// The vertex layout binding, if initialized
    pub fn vertex_array(&self) -> Option<VertexArrayHandle> {
        self.vertex_array
    }

    /// The vertex buffer, if initialized
    pub fn vertex_buffer(&self) -> Option<BufferHandle> {
        self.vertex_buffer
    }

    /// The index buffer, if initialized
    pub fn index_buffer(&self) -> Option<BufferHandle> {
        self.index_buffer
    }

    /// Number of indices the draw call covers
    pub fn index_count(&self) -> i32 {
        self.index_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::HeadlessDevice;

    const VALID_VERT: &str = "#version 330 core\nlayout (location = 0) in vec3 aPosition;\nvoid main() { gl_Position = vec4(aPosition, 1.0); }\n";
    const VALID_FRAG: &str = "#version 330 core\nout vec4 FragColor;\nvoid main() { FragColor = vec4(1.0); }\n";

    fn valid_sources() -> ShaderStageSources {
        ShaderStageSources::from_strings(VALID_VERT, VALID_FRAG)
    }

    #[test]
    fn test_initialize_allocates_all_resources() {
        let mut device = HeadlessDevice::new();
        let mut resources = ResourceManager::new();

        resources
            .initialize_with_sources(
                &mut device,
                &Mesh::quad(),
                &valid_sources(),
                ShaderFailurePolicy::Lenient,
            )
            .unwrap();

        assert_eq!(resources.state(), LifecycleState::Initialized);
        assert!(device.is_buffer(resources.vertex_buffer().unwrap()));
        assert!(device.is_buffer(resources.index_buffer().unwrap()));
        assert!(device.is_vertex_array(resources.vertex_array().unwrap()));
        assert!(device.is_program(resources.program().unwrap()));
        assert!(device.program_link_status(resources.program().unwrap()));
        assert_eq!(resources.index_count(), 6);
    }

    #[test]
    fn test_initialize_twice_is_rejected() {
        let mut device = HeadlessDevice::new();
        let mut resources = ResourceManager::new();
        resources
            .initialize_with_sources(
                &mut device,
                &Mesh::quad(),
                &valid_sources(),
                ShaderFailurePolicy::Lenient,
            )
            .unwrap();

        let err = resources.initialize_with_sources(
            &mut device,
            &Mesh::quad(),
            &valid_sources(),
            ShaderFailurePolicy::Lenient,
        );
        assert!(matches!(err, Err(RenderError::InitializationFailed(_))));
    }

    #[test]
    fn test_teardown_releases_everything() {
        let mut device = HeadlessDevice::new();
        let mut resources = ResourceManager::new();
        resources
            .initialize_with_sources(
                &mut device,
                &Mesh::quad(),
                &valid_sources(),
                ShaderFailurePolicy::Lenient,
            )
            .unwrap();

        let vertex_buffer = resources.vertex_buffer().unwrap();
        let index_buffer = resources.index_buffer().unwrap();
        let vertex_array = resources.vertex_array().unwrap();
        let program = resources.program().unwrap();

        resources.teardown(&mut device);

        assert_eq!(resources.state(), LifecycleState::TornDown);
        assert!(!device.is_buffer(vertex_buffer));
        assert!(!device.is_buffer(index_buffer));
        assert!(!device.is_vertex_array(vertex_array));
        assert!(!device.is_program(program));
        assert_eq!(device.live_object_count(), 0);
        assert!(resources.program().is_none());
    }

    #[test]
    fn test_teardown_before_initialize_is_a_no_op() {
        let mut device = HeadlessDevice::new();
        let mut resources = ResourceManager::new();
        resources.teardown(&mut device);
        assert_eq!(resources.state(), LifecycleState::Uninitialized);
        assert_eq!(device.live_object_count(), 0);
    }

    #[test]
    fn test_strict_compile_failure_rolls_back() {
        let mut device = HeadlessDevice::new();
        let mut resources = ResourceManager::new();
        let sources = ShaderStageSources::from_strings("#error broken stage", VALID_FRAG);

        let err = resources.initialize_with_sources(
            &mut device,
            &Mesh::quad(),
            &sources,
            ShaderFailurePolicy::Strict,
        );

        match err {
            Err(RenderError::ShaderCompile { stage, log }) => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert!(!log.is_empty());
            }
            other => panic!("expected ShaderCompile error, got {other:?}"),
        }
        assert_eq!(resources.state(), LifecycleState::Uninitialized);
        assert_eq!(device.live_object_count(), 0);
    }

    #[test]
    fn test_lenient_compile_failure_still_initializes() {
        let mut device = HeadlessDevice::new();
        let mut resources = ResourceManager::new();
        let sources = ShaderStageSources::from_strings("#error broken stage", VALID_FRAG);

        resources
            .initialize_with_sources(
                &mut device,
                &Mesh::quad(),
                &sources,
                ShaderFailurePolicy::Lenient,
            )
            .unwrap();

        assert_eq!(resources.state(), LifecycleState::Initialized);
        let program = resources.program().unwrap();
        assert!(device.is_program(program));
        assert!(!device.program_link_status(program));
    }
}
