//! # GL Engine
//!
//! A small rendering engine built on an OpenGL 3.3 core context.
//!
//! ## Features
//!
//! - **Explicit Resource Lifecycle**: One owner for every GPU object, with
//!   teardown in exact reverse order of creation
//! - **Device Abstraction**: The render core is written against a trait, so
//!   it runs unchanged on a headless device in tests
//! - **Shader Failure Policies**: Compile/link diagnostics are logged and
//!   either tolerated or fatal, per configuration
//! - **Cross-Platform Windowing**: GLFW window and context management
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gl_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
//!         if engine.is_key_down(glfw::Key::Escape) {
//!             engine.quit();
//!         }
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, _engine: &mut Engine) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     let mut app = MyApp;
//!     Engine::run(config, &mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod config;
pub mod core;
pub mod foundation;
pub mod render;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use engine::{Engine, EngineConfig, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        application::AppEvent,
        config::{Config, ConfigError},
        core::config::{RendererConfig, ShaderConfig, ShaderFailurePolicy, WindowConfig},
        foundation::time::Timer,
        render::{
            FrameRenderer, HeadlessDevice, LifecycleState, Mesh, RenderDevice, RenderError,
            RenderResult, ResourceManager, ShaderStageSources, Vertex,
        },
        AppError, Application, Engine, EngineConfig, EngineError,
    };
}
