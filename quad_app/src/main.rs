//! Quad demo application
//!
//! Renders the engine's fixed fullscreen quad against a real GL context:
//! the smallest complete exercise of the resource lifecycle, the frame
//! loop, and resize handling. Escape closes the window.

use gl_engine::prelude::*;
use glfw::Key;

const CONFIG_PATH: &str = "quad_app.toml";

struct QuadApp {
    frames: u64,
}

impl Application for QuadApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        let (width, height) = engine.framebuffer_size();
        log::info!("Quad demo ready at {}x{}", width, height);
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
        if engine.is_key_down(Key::Escape) {
            engine.quit();
        }
        Ok(())
    }

    fn render(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        engine.render()?;
        self.frames += 1;
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        log::info!(
            "Rendered {} frames ({:.1} fps average)",
            self.frames,
            engine.average_fps()
        );
    }
}

fn load_config() -> EngineConfig {
    if let Ok(cwd) = std::env::current_dir() {
        log::debug!("Working directory: {:?}", cwd);
    }

    if std::path::Path::new(CONFIG_PATH).exists() {
        match EngineConfig::load_from_file(CONFIG_PATH) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", CONFIG_PATH);
                return config;
            }
            Err(err) => {
                log::warn!("Failed to load {}: {}; using defaults", CONFIG_PATH, err);
            }
        }
    }

    EngineConfig {
        window: WindowConfig::new("Quad Demo", 600, 600),
        ..EngineConfig::default()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    gl_engine::foundation::logging::init_with_level(log::LevelFilter::Info);

    log::info!("Starting quad demo");
    let config = load_config();

    let mut app = QuadApp { frames: 0 };
    Engine::run(config, &mut app)?;

    log::info!("Quad demo finished");
    Ok(())
}
