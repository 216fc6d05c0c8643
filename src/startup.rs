//! Checks that must pass before the presence loop can start

use crate::config::PresenceConfig;
use crate::platform::NativeProbe;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to start the async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Validate settings and build the native probe.
///
/// The window system is not contacted here; an unreachable display only
/// degrades the title at each tick.
pub fn check_dependencies(config: &PresenceConfig) -> Result<NativeProbe, StartupError> {
    tracing::info!("Checking dependencies...");
    config.validate().map_err(StartupError::InvalidConfig)?;
    let probe = NativeProbe::new(config);
    tracing::info!("All dependencies are available");
    Ok(probe)
}

/// Tell the user why the process is about to exit.
///
/// On Windows the message is also shown in a dialog, since a console opened
/// from Explorer closes as soon as the process exits.
pub fn report_startup_error(err: &StartupError) {
    tracing::error!("Fatal error: {}", err);

    #[cfg(target_os = "windows")]
    show_error_dialog(&err.to_string());
}

#[cfg(target_os = "windows")]
fn show_error_dialog(message: &str) {
    use windows::core::*;
    use windows::Win32::UI::WindowsAndMessaging::*;

    let text = HSTRING::from(format!(
        "Resolve Presence could not start.\n\n{}",
        message
    ));

    unsafe {
        MessageBoxW(
            None,
            &text,
            w!("Resolve Presence - Startup Error"),
            MB_OK | MB_ICONERROR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_invalid_config_is_fatal() {
        let config = PresenceConfig {
            poll_interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(
            check_dependencies(&config),
            Err(StartupError::InvalidConfig(_))
        ));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_starts_without_display() {
        std::env::remove_var("DISPLAY");
        assert!(check_dependencies(&PresenceConfig::default()).is_ok());
    }

    #[test]
    fn test_error_messages() {
        let err = StartupError::InvalidConfig("poll_interval must be non-zero".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: poll_interval must be non-zero"
        );

        let err = StartupError::from(std::io::Error::other("no threads"));
        assert_eq!(
            err.to_string(),
            "Failed to start the async runtime: no threads"
        );
    }
}
