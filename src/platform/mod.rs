//! Operating-system facts the reconciliation loop polls each tick

pub mod process;
pub mod registry;
pub mod window;

use crate::config::{PresenceConfig, VERSION_REGISTRY_PATH, VERSION_REGISTRY_VALUE};

pub use process::{ProcessMatch, ProcessScanner};
pub use window::WindowLister;

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Window system error: {0}")]
    WindowSystem(String),
}

/// Queries the loop needs answered about the running system.
///
/// Implementations report failures instead of guessing; the loop decides
/// what a failed query means.
pub trait SystemProbe {
    /// Take a fresh process snapshot; the process queries below read from it
    fn refresh_processes(&mut self);

    /// Whether any Resolve process is running
    fn target_app_running(&mut self) -> Result<bool, PlatformError>;

    /// Whether the Discord client is running
    fn chat_client_running(&mut self) -> Result<bool, PlatformError>;

    /// Title of the first visible Resolve window, if any
    fn target_window_title(&mut self) -> Result<Option<String>, PlatformError>;

    /// Installed Resolve version string
    fn app_version(&mut self) -> Result<String, PlatformError>;
}

/// Probe backed by the real process table, window system and registry
pub struct NativeProbe {
    scanner: ProcessScanner,
    windows: WindowLister,
    target_processes: Vec<String>,
    chat_client_processes: Vec<String>,
    window_marker: String,
}

impl NativeProbe {
    /// The window system is contacted lazily, so a missing display is a
    /// per-tick fault rather than a startup one.
    pub fn new(config: &PresenceConfig) -> Self {
        Self {
            scanner: ProcessScanner::new(),
            windows: WindowLister::new(),
            target_processes: config.target_processes.clone(),
            chat_client_processes: config.chat_client_processes.clone(),
            window_marker: config.window_marker.clone(),
        }
    }
}

impl SystemProbe for NativeProbe {
    fn refresh_processes(&mut self) {
        self.scanner.refresh();
    }

    fn target_app_running(&mut self) -> Result<bool, PlatformError> {
        let found = self.scanner.find(&self.target_processes);
        for proc in &found {
            tracing::debug!("Found Resolve process: {} (PID: {})", proc.name, proc.pid);
        }
        Ok(!found.is_empty())
    }

    fn chat_client_running(&mut self) -> Result<bool, PlatformError> {
        Ok(!self.scanner.find(&self.chat_client_processes).is_empty())
    }

    fn target_window_title(&mut self) -> Result<Option<String>, PlatformError> {
        let titles = self.windows.visible_titles()?;
        Ok(window::select_target_title(&titles, &self.window_marker))
    }

    fn app_version(&mut self) -> Result<String, PlatformError> {
        registry::read_local_machine_string(VERSION_REGISTRY_PATH, VERSION_REGISTRY_VALUE)
    }
}
