use std::future::Future;

/// A link button shown under the activity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityButton {
    pub label: String,
    pub url: String,
}

/// The rendered activity pushed to the presence service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub state: String,
    pub details: String,
    pub large_image: String,
    pub large_text: String,
    pub buttons: Vec<ActivityButton>,
}

#[derive(Debug, thiserror::Error)]
pub enum PresenceError {
    #[error("Presence service not available: {0}")]
    Unavailable(String),

    #[error("Timed out waiting for the presence service handshake")]
    HandshakeTimeout,

    #[error("Presence service disconnected: {0}")]
    Disconnected(String),

    #[error("Presence service error: {0}")]
    Sdk(String),
}

/// Opens sessions with a presence service (Discord, etc.)
pub trait PresenceClient {
    type Session: PresenceSession;

    /// Returns the name of this presence service (for logging)
    fn name(&self) -> &'static str;

    /// Open a new session
    fn connect(&mut self) -> impl Future<Output = Result<Self::Session, PresenceError>>;
}

/// A live session with a presence service
pub trait PresenceSession {
    /// Replace the displayed activity
    fn update(&mut self, activity: &Activity) -> impl Future<Output = Result<(), PresenceError>>;

    /// Remove the displayed activity
    fn clear(&mut self) -> impl Future<Output = Result<(), PresenceError>>;

    /// Shut the session down. Failures are not reported.
    fn close(self) -> impl Future<Output = ()>;
}
