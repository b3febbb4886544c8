/// Galaxy3D Engine - global state for the shader system
///
/// Holds the active renderer (the RHI context shader variants compile and
/// allocate against when no renderer is passed explicitly) and the global logger.

use std::sync::{OnceLock, RwLock, Arc, Mutex};
use std::time::SystemTime;
use crate::renderer::Renderer;
use crate::error::{Result, Error};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

static ENGINE_STATE: OnceLock<EngineState> = OnceLock::new();

static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

struct EngineState {
    renderer: RwLock<Option<Arc<Mutex<dyn Renderer>>>>,
}

impl EngineState {
    fn new() -> Self {
        Self {
            renderer: RwLock::new(None),
        }
    }
}

fn logger_lock() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::default())))
}

// ===== PUBLIC API =====

/// Engine singleton manager
///
/// # Example
///
/// ```ignore
/// use galaxy_3d_shader::galaxy3d::Engine;
///
/// Engine::initialize()?;
/// Engine::create_renderer(MyD3D11Renderer::new(device)?)?;
/// let technique_instance = TechniqueInstance::with_active_renderer(technique, policy)?;
/// Engine::shutdown();
/// ```
pub struct Engine;

impl Engine {
    fn state() -> Result<&'static EngineState> {
        ENGINE_STATE.get().ok_or_else(|| {
            Error::InitializationFailed(
                "Engine not initialized. Call Engine::initialize() first.".to_string(),
            )
            .logged("galaxy3d::Engine")
        })
    }

    /// Initialize the engine (idempotent)
    pub fn initialize() -> Result<()> {
        ENGINE_STATE.get_or_init(EngineState::new);
        Ok(())
    }

    /// Drop the active renderer
    ///
    /// Instances created earlier keep their own renderer handle and stay valid.
    pub fn shutdown() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut renderer) = state.renderer.write() {
                *renderer = None;
            }
        }
    }

    /// Create and register the active renderer
    ///
    /// # Errors
    ///
    /// - The engine is not initialized
    /// - A renderer is already active
    pub fn create_renderer<R: Renderer + 'static>(renderer: R) -> Result<Arc<Mutex<dyn Renderer>>> {
        let arc_renderer: Arc<Mutex<dyn Renderer>> = Arc::new(Mutex::new(renderer));
        Self::register_renderer(arc_renderer.clone())?;
        crate::engine_info!("galaxy3d::Engine", "Active renderer registered");
        Ok(arc_renderer)
    }

    pub(crate) fn register_renderer(renderer: Arc<Mutex<dyn Renderer>>) -> Result<()> {
        let state = Self::state()?;

        let mut lock = state.renderer.write()
            .map_err(|_| Error::BackendError("Renderer lock poisoned".to_string())
                .logged("galaxy3d::Engine"))?;

        if lock.is_some() {
            return Err(Error::InitializationFailed(
                "Renderer already exists. Call Engine::destroy_renderer() first.".to_string(),
            )
            .logged("galaxy3d::Engine"));
        }

        *lock = Some(renderer);
        Ok(())
    }

    /// Get the active renderer
    ///
    /// # Errors
    ///
    /// - The engine is not initialized
    /// - No renderer has been created
    pub fn renderer() -> Result<Arc<Mutex<dyn Renderer>>> {
        let state = Self::state()?;

        let lock = state.renderer.read()
            .map_err(|_| Error::BackendError("Renderer lock poisoned".to_string())
                .logged("galaxy3d::Engine"))?;

        lock.clone().ok_or_else(|| {
            Error::InitializationFailed(
                "Renderer not created. Call Engine::create_renderer() first.".to_string(),
            )
            .logged("galaxy3d::Engine")
        })
    }

    /// Unregister the active renderer, allowing a new one to be created
    pub fn destroy_renderer() -> Result<()> {
        let state = Self::state()?;

        let mut lock = state.renderer.write()
            .map_err(|_| Error::BackendError("Renderer lock poisoned".to_string())
                .logged("galaxy3d::Engine"))?;

        *lock = None;
        crate::engine_info!("galaxy3d::Engine", "Active renderer destroyed");
        Ok(())
    }

    /// Reset all singletons for testing
    #[cfg(test)]
    pub fn reset_for_testing() {
        Self::shutdown();
    }

    // ===== LOGGING API =====

    /// Replace the global logger
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(logger);
        }
    }

    /// Restore the default console logger
    pub fn reset_logger() {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(DefaultLogger::default());
        }
    }

    /// Log without location (used by engine_trace! .. engine_warn!)
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        if let Ok(lock) = logger_lock().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Log with file:line (used by engine_error!)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if let Ok(lock) = logger_lock().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
