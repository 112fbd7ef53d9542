//! Core engine implementation

use crate::{
    application::{AppEvent, Application},
    config::Config,
    core::config::{RendererConfig, ShaderConfig, WindowConfig},
    foundation::time::Timer,
    render::{FrameRenderer, GlDevice, LifecycleState, Mesh, ResourceManager, Window},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main engine struct
///
/// The engine coordinates the window, the render device, and the GPU
/// resource lifecycle, and drives the main loop.
pub struct Engine {
    /// Window and GL context
    window: Window,

    /// Render device bound to the window's context
    device: GlDevice,

    /// Owner of all GPU resource lifetimes
    resources: ResourceManager,

    /// Per-frame command sequencing
    frame_renderer: FrameRenderer,

    /// Frame timing
    timer: Timer,

    /// Engine configuration
    config: EngineConfig,

    /// Whether the engine should continue running
    running: bool,
}

impl Engine {
    /// Create a new engine instance
    ///
    /// Opens the window, brings up the GL device, and initializes all GPU
    /// resources. The viewport is set from the actual framebuffer size
    /// because no resize event is delivered for the initial geometry.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        log::info!("Initializing engine...");
        config.validate().map_err(EngineError::ConfigError)?;

        let mut window = Window::new(&config.window)
            .map_err(|e| EngineError::InitializationFailed(format!("Window: {}", e)))?;
        let mut device = GlDevice::new(window.glfw_window_mut());

        let mut resources = ResourceManager::new();
        resources
            .initialize(
                &mut device,
                &Mesh::quad(),
                &config.shaders,
                config.renderer.shader_policy,
            )
            .map_err(|e| EngineError::InitializationFailed(format!("GPU resources: {}", e)))?;

        let frame_renderer = FrameRenderer::new(&config.renderer);
        let (width, height) = window.get_framebuffer_size();
        frame_renderer.on_resize(&mut device, width, height);

        Ok(Self {
            window,
            device,
            resources,
            frame_renderer,
            timer: Timer::new(),
            config,
            running: true,
        })
    }

    /// Run the engine main loop with the given application
    ///
    /// Cleanup and GPU resource teardown happen exactly once at loop exit,
    /// whether the loop ended normally or with an error.
    pub fn run<T: Application>(config: EngineConfig, app: &mut T) -> Result<(), EngineError> {
        let mut engine = Self::new(config)?;

        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {}", e)))?;

        log::info!("Starting main loop...");
        let result = Self::main_loop(&mut engine, app);

        app.cleanup(&mut engine);
        engine.resources.teardown(&mut engine.device);
        log::info!("Engine shutdown complete");
        result
    }

    fn main_loop<T: Application>(engine: &mut Engine, app: &mut T) -> Result<(), EngineError> {
        while engine.running && !engine.window.should_close() {
            engine.timer.update();
            let delta_time = engine.timer.delta_time();

            // Gather events before handing control to the application
            engine.window.poll_events();
            let events: Vec<_> = engine.window.flush_events().collect();
            for (_, event) in events {
                if let Some(event) = translate_event(event) {
                    app.handle_event(engine, event)
                        .map_err(|e| EngineError::ApplicationError(format!("App event: {}", e)))?;
                }
            }

            app.update(engine, delta_time)
                .map_err(|e| EngineError::ApplicationError(format!("App update: {}", e)))?;

            app.render(engine)
                .map_err(|e| EngineError::ApplicationError(format!("App render: {}", e)))?;
        }
        Ok(())
    }

    /// Render the current frame
    pub fn render(&mut self) -> Result<(), EngineError> {
        self.frame_renderer
            .render_frame(&mut self.device, &mut self.resources)
            .map_err(|e| EngineError::RenderError(e.to_string()))
    }

    /// Handle an application event
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::WindowResized { width, height } => {
                self.frame_renderer
                    .on_resize(&mut self.device, width, height);
            }
            AppEvent::WindowCloseRequested => {
                self.running = false;
            }
            AppEvent::KeyPressed(_) | AppEvent::KeyReleased(_) => {}
        }
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
        self.window.set_should_close(true);
    }

    /// Whether a key is currently held down
    pub fn is_key_down(&self, key: glfw::Key) -> bool {
        self.window.is_key_down(key)
    }

    /// Get the current frame delta time
    pub fn delta_time(&self) -> f32 {
        self.timer.delta_time()
    }

    /// Average frames per second since the engine started
    pub fn average_fps(&self) -> f32 {
        self.timer.average_fps()
    }

    /// Current framebuffer size in pixels
    pub fn framebuffer_size(&self) -> (i32, i32) {
        self.window.get_framebuffer_size()
    }

    /// Lifecycle state of the GPU resources
    pub fn resource_state(&self) -> LifecycleState {
        self.resources.state()
    }

    /// Get the engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

fn translate_event(event: glfw::WindowEvent) -> Option<AppEvent> {
    match event {
        glfw::WindowEvent::FramebufferSize(width, height) => {
            Some(AppEvent::WindowResized { width, height })
        }
        glfw::WindowEvent::Close => Some(AppEvent::WindowCloseRequested),
        glfw::WindowEvent::Key(key, _, glfw::Action::Press, _) => Some(AppEvent::KeyPressed(key)),
        glfw::WindowEvent::Key(key, _, glfw::Action::Release, _) => {
            Some(AppEvent::KeyReleased(key))
        }
        _ => None,
    }
}

/// Engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window configuration
    pub window: WindowConfig,

    /// Renderer configuration
    pub renderer: RendererConfig,

    /// Shader source locations
    pub shaders: ShaderConfig,
}

impl EngineConfig {
    /// Validate all component configurations
    pub fn validate(&self) -> Result<(), String> {
        self.window.validate()?;
        self.renderer.validate()?;
        self.shaders.validate()?;
        Ok(())
    }
}

impl Config for EngineConfig {}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Initialization error
    #[error("Engine initialization failed: {0}")]
    InitializationFailed(String),

    /// Rendering error
    #[error("Rendering error: {0}")]
    RenderError(String),

    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_defaults_validate() {
        assert!(WindowConfig::default().validate().is_ok());
        assert!(RendererConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validates_with_existing_shader_files() {
        // Shader validation checks file existence.
        let dir = std::env::temp_dir();
        let vert_path = dir.join("gl_engine_engine_config_test.vert");
        let frag_path = dir.join("gl_engine_engine_config_test.frag");
        std::fs::write(&vert_path, "void main() {}").unwrap();
        std::fs::write(&frag_path, "void main() {}").unwrap();

        let config = EngineConfig {
            shaders: ShaderConfig::new(
                vert_path.to_string_lossy().into_owned(),
                frag_path.to_string_lossy().into_owned(),
            ),
            ..EngineConfig::default()
        };
        let result = config.validate();
        std::fs::remove_file(&vert_path).ok();
        std::fs::remove_file(&frag_path).ok();

        assert!(result.is_ok());
    }

    #[test]
    fn test_invalid_clear_color_is_rejected() {
        let config = EngineConfig {
            renderer: RendererConfig::new().with_clear_color([1.5, 0.0, 0.0, 1.0]),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_translate_event_maps_framebuffer_and_keys() {
        let resized = translate_event(glfw::WindowEvent::FramebufferSize(640, 480));
        assert!(matches!(
            resized,
            Some(AppEvent::WindowResized {
                width: 640,
                height: 480
            })
        ));

        let pressed = translate_event(glfw::WindowEvent::Key(
            glfw::Key::Escape,
            0,
            glfw::Action::Press,
            glfw::Modifiers::empty(),
        ));
        assert!(matches!(
            pressed,
            Some(AppEvent::KeyPressed(glfw::Key::Escape))
        ));

        let ignored = translate_event(glfw::WindowEvent::Key(
            glfw::Key::Escape,
            0,
            glfw::Action::Repeat,
            glfw::Modifiers::empty(),
        ));
        assert!(ignored.is_none());
    }
}
