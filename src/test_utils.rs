//! Fakes shared by the unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::platform::{PlatformError, SystemProbe};
use crate::presence::{Activity, PresenceClient, PresenceError, PresenceSession};

/// Scripted system facts
#[derive(Debug, Clone, Default)]
pub struct FakeProbe {
    pub chat_running: bool,
    pub app_running: bool,
    pub title: Option<String>,
    pub version: Option<String>,
    pub fail_process_query: bool,
    pub fail_window_query: bool,
    pub panic_on_title: bool,
    pub chat_queries: Arc<AtomicUsize>,
    pub refreshes: Arc<AtomicUsize>,
}

impl FakeProbe {
    /// How many times any clone of this probe was asked about Discord
    pub fn chat_queries(&self) -> usize {
        self.chat_queries.load(Ordering::SeqCst)
    }

    /// How many process snapshots any clone of this probe has taken
    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    fn process_query(&self, answer: bool) -> Result<bool, PlatformError> {
        if self.fail_process_query {
            Err(PlatformError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "access denied",
            )))
        } else {
            Ok(answer)
        }
    }
}

impl SystemProbe for FakeProbe {
    fn refresh_processes(&mut self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }

    fn target_app_running(&mut self) -> Result<bool, PlatformError> {
        self.process_query(self.app_running)
    }

    fn chat_client_running(&mut self) -> Result<bool, PlatformError> {
        self.chat_queries.fetch_add(1, Ordering::SeqCst);
        self.process_query(self.chat_running)
    }

    fn target_window_title(&mut self) -> Result<Option<String>, PlatformError> {
        if self.panic_on_title {
            panic!("window enumeration blew up");
        }
        if self.fail_window_query {
            return Err(PlatformError::WindowSystem("no display".to_string()));
        }
        Ok(self.title.clone())
    }

    fn app_version(&mut self) -> Result<String, PlatformError> {
        self.version
            .clone()
            .ok_or(PlatformError::Unsupported("registry lookup"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Connect,
    Update(Activity),
    Clear,
    Close,
}

#[derive(Debug, Default)]
struct Recorder {
    calls: Vec<Call>,
    fail_connect: bool,
    fail_update: bool,
    fail_clear: bool,
}

/// Presence client that records every call made through it or its sessions
#[derive(Debug, Clone, Default)]
pub struct RecordingClient {
    inner: Arc<Mutex<Recorder>>,
}

impl RecordingClient {
    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    pub fn set_fail_connect(&self, fail: bool) {
        self.inner.lock().unwrap().fail_connect = fail;
    }

    pub fn set_fail_update(&self, fail: bool) {
        self.inner.lock().unwrap().fail_update = fail;
    }

    pub fn set_fail_clear(&self, fail: bool) {
        self.inner.lock().unwrap().fail_clear = fail;
    }
}

pub struct RecordingSession {
    inner: Arc<Mutex<Recorder>>,
}

impl PresenceClient for RecordingClient {
    type Session = RecordingSession;

    fn name(&self) -> &'static str {
        "Recording"
    }

    async fn connect(&mut self) -> Result<RecordingSession, PresenceError> {
        let mut recorder = self.inner.lock().unwrap();
        recorder.calls.push(Call::Connect);
        if recorder.fail_connect {
            return Err(PresenceError::Unavailable("connection refused".to_string()));
        }
        Ok(RecordingSession {
            inner: Arc::clone(&self.inner),
        })
    }
}

impl PresenceSession for RecordingSession {
    async fn update(&mut self, activity: &Activity) -> Result<(), PresenceError> {
        let mut recorder = self.inner.lock().unwrap();
        recorder.calls.push(Call::Update(activity.clone()));
        if recorder.fail_update {
            return Err(PresenceError::Disconnected("pipe closed".to_string()));
        }
        Ok(())
    }

    async fn clear(&mut self) -> Result<(), PresenceError> {
        let mut recorder = self.inner.lock().unwrap();
        recorder.calls.push(Call::Clear);
        if recorder.fail_clear {
            return Err(PresenceError::Disconnected("pipe closed".to_string()));
        }
        Ok(())
    }

    async fn close(self) {
        self.inner.lock().unwrap().calls.push(Call::Close);
    }
}
