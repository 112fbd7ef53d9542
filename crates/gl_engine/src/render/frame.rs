//! Per-frame draw command sequencing
//!
//! Issues the fixed command sequence for one frame: clear, select program,
//! bind the vertex layout, draw indexed, present. Holds no GPU handles of
//! its own; everything it draws with is read from the [`ResourceManager`].

use crate::core::config::RendererConfig;
use crate::render::api::{ClearFlags, RenderDevice};
use crate::render::resources::ResourceManager;
use crate::render::{RenderError, RenderResult};

/// Renders one frame at a time from resources owned elsewhere
pub struct FrameRenderer {
    clear_color: [f32; 4],
}

impl FrameRenderer {
    /// Create a frame renderer with the configured clear color
    pub fn new(config: &RendererConfig) -> Self {
        log::debug!("Creating FrameRenderer...");
        Self {
            clear_color: config.clear_color,
        }
    }

    /// Render a single frame and present it
    ///
    /// Fails with [`RenderError::NotInitialized`] unless the resource
    /// manager is in a ready state. The sequence is identical every frame;
    /// repeated calls without other state changes produce identical output.
    pub fn render_frame(
        &self,
        device: &mut dyn RenderDevice,
        resources: &mut ResourceManager,
    ) -> RenderResult<()> {
        if !resources.is_ready() {
            return Err(RenderError::NotInitialized);
        }
        let program = resources.program().ok_or(RenderError::NotInitialized)?;
        let vertex_array = resources.vertex_array().ok_or(RenderError::NotInitialized)?;

        device.set_clear_color(self.clear_color);
        device.clear(ClearFlags::COLOR);

        device.use_program(Some(program));
        device.bind_vertex_array(Some(vertex_array));
        device.draw_indexed(resources.index_count(), 0);

        device.present()?;
        resources.enter_rendering();
        Ok(())
    }

    /// Propagate a framebuffer size change to the device viewport
    ///
    /// The viewport always covers the full framebuffer, anchored at the
    /// origin. No other render state changes on resize.
    pub fn on_resize(&self, device: &mut dyn RenderDevice, width: i32, height: i32) {
        log::debug!("Viewport resized to {width}x{height}");
        device.set_viewport(0, 0, width, height);
    }

    /// The clear color applied at the start of every frame
    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ShaderFailurePolicy;
    use crate::render::backends::HeadlessDevice;
    use crate::render::geometry::Mesh;
    use crate::render::resources::LifecycleState;
    use crate::render::shader::ShaderStageSources;

    fn ready_pair() -> (HeadlessDevice, ResourceManager) {
        let mut device = HeadlessDevice::new();
        let mut resources = ResourceManager::new();
        let sources = ShaderStageSources::from_strings(
            "#version 330 core\nvoid main() { gl_Position = vec4(0.0); }\n",
            "#version 330 core\nout vec4 FragColor;\nvoid main() { FragColor = vec4(1.0); }\n",
        );
        resources
            .initialize_with_sources(
                &mut device,
                &Mesh::quad(),
                &sources,
                ShaderFailurePolicy::Lenient,
            )
            .unwrap();
        (device, resources)
    }

    #[test]
    fn test_render_frame_requires_initialization() {
        let mut device = HeadlessDevice::new();
        let mut resources = ResourceManager::new();
        let renderer = FrameRenderer::new(&RendererConfig::default());

        let err = renderer.render_frame(&mut device, &mut resources);
        assert!(matches!(err, Err(RenderError::NotInitialized)));
        assert_eq!(device.presented_frames().len(), 0);
    }

    #[test]
    fn test_render_frame_enters_rendering_state() {
        let (mut device, mut resources) = ready_pair();
        let renderer = FrameRenderer::new(&RendererConfig::default());

        renderer.render_frame(&mut device, &mut resources).unwrap();

        assert_eq!(resources.state(), LifecycleState::Rendering);
        assert_eq!(device.presented_frames().len(), 1);
    }

    #[test]
    fn test_repeated_frames_are_identical() {
        let (mut device, mut resources) = ready_pair();
        let renderer = FrameRenderer::new(&RendererConfig::default());

        renderer.render_frame(&mut device, &mut resources).unwrap();
        renderer.render_frame(&mut device, &mut resources).unwrap();
        renderer.render_frame(&mut device, &mut resources).unwrap();

        let frames = device.presented_frames();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0], frames[1]);
        assert_eq!(frames[1], frames[2]);
    }

    #[test]
    fn test_resize_updates_viewport_only() {
        let (mut device, mut resources) = ready_pair();
        let renderer = FrameRenderer::new(&RendererConfig::default());

        renderer.render_frame(&mut device, &mut resources).unwrap();
        let before = device.presented_frames()[0].clone();

        renderer.on_resize(&mut device, 1024, 768);
        assert_eq!(device.viewport(), (0, 0, 1024, 768));

        renderer.render_frame(&mut device, &mut resources).unwrap();
        let after = device.presented_frames()[1].clone();
        assert_eq!(before.ops, after.ops);
    }
}
