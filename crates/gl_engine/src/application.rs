//! Application trait and lifecycle management

use crate::engine::{Engine, EngineError};
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to create your application on top of the engine.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the engine has created its window and GPU
    /// resources. Use this to set up initial state.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Update the application
    ///
    /// Called every frame before rendering.
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `delta_time` - Time since last frame in seconds
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError>;

    /// Render the application
    ///
    /// Called after update. The default implementation renders one frame
    /// through the engine.
    fn render(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        engine.render()?;
        Ok(())
    }

    /// Handle application events
    ///
    /// Called for each window or input event. The default implementation
    /// forwards to the engine.
    fn handle_event(&mut self, engine: &mut Engine, event: AppEvent) -> Result<(), AppError> {
        engine.handle_event(event);
        Ok(())
    }

    /// Cleanup the application
    ///
    /// Called once when the application is shutting down, before GPU
    /// resources are released.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

/// Application events
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Framebuffer was resized
    WindowResized {
        /// New framebuffer width in pixels
        width: i32,
        /// New framebuffer height in pixels
        height: i32,
    },

    /// Window close requested
    WindowCloseRequested,

    /// Key was pressed
    KeyPressed(glfw::Key),

    /// Key was released
    KeyReleased(glfw::Key),
}
