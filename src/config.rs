//! Compiled-in settings for the presence bridge

use std::time::Duration;

use crate::presence::ActivityButton;

/// Discord Application ID for the Resolve presence
pub const DISCORD_APP_ID: i64 = 1378792739767980042;

/// Substring every Resolve main window title carries
pub const RESOLVE_WINDOW_MARKER: &str = "DaVinci Resolve";

/// Version reported when the version store cannot be read
pub const UNKNOWN_VERSION: &str = "Unknown Version";

/// Registry location of the installed Resolve version (under HKLM)
pub const VERSION_REGISTRY_PATH: &str = r"SOFTWARE\Blackmagic Design\DaVinci Resolve";
pub const VERSION_REGISTRY_VALUE: &str = "Version";

/// Executable names of Resolve, free and Studio editions
pub const RESOLVE_PROCESS_NAMES: &[&str] = &["resolve.exe", "resolve studio.exe", "resolve"];

/// Executable names of the Discord desktop client and its release channels
pub const DISCORD_PROCESS_NAMES: &[&str] = &[
    "discord.exe",
    "discordptb.exe",
    "discordcanary.exe",
    "discord",
    "discordptb",
    "discordcanary",
];

#[derive(Debug, Clone)]
pub struct PresenceConfig {
    pub app_id: i64,
    /// Delay between ticks while Resolve state is being mirrored
    pub poll_interval: Duration,
    /// Delay used while Discord is absent or refuses the connection
    pub retry_interval: Duration,
    /// How long to wait for the Discord handshake before giving up
    pub handshake_timeout: Duration,
    pub target_processes: Vec<String>,
    pub chat_client_processes: Vec<String>,
    pub window_marker: String,
    pub large_image: String,
    pub buttons: Vec<ActivityButton>,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            app_id: DISCORD_APP_ID,
            poll_interval: Duration::from_secs(15),
            retry_interval: Duration::from_secs(5),
            handshake_timeout: Duration::from_secs(10),
            target_processes: RESOLVE_PROCESS_NAMES.iter().map(|s| s.to_string()).collect(),
            chat_client_processes: DISCORD_PROCESS_NAMES.iter().map(|s| s.to_string()).collect(),
            window_marker: RESOLVE_WINDOW_MARKER.to_string(),
            large_image: "resolve_logo".to_string(),
            buttons: Vec::new(),
        }
    }
}

impl PresenceConfig {
    /// Reject settings that would make the loop spin or the SDK refuse to start
    pub fn validate(&self) -> Result<(), String> {
        if self.app_id <= 0 {
            return Err(format!("invalid Discord application id {}", self.app_id));
        }
        if self.poll_interval.is_zero() || self.retry_interval.is_zero() {
            return Err("poll intervals must be non-zero".to_string());
        }
        if self.target_processes.is_empty() || self.chat_client_processes.is_empty() {
            return Err("process allow-lists must not be empty".to_string());
        }
        Ok(())
    }
}
