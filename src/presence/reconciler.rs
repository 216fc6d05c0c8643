//! Keeps the Discord activity in step with what Resolve is doing

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures_util::FutureExt;

use super::state::{derive_state, PresenceState};
use super::traits::{PresenceClient, PresenceSession};
use crate::config::{PresenceConfig, UNKNOWN_VERSION};
use crate::platform::SystemProbe;

/// What a single tick ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Discord is not running; any session was closed
    ClientAbsent,
    /// Discord is running but refused the connection
    ConnectFailed,
    /// Resolve is not running and the activity was cleared
    Cleared,
    /// Clearing the activity failed; the session was dropped
    ClearFailed,
    /// The activity for this state was published
    Published(PresenceState),
    /// Publishing failed; the session was dropped
    PushFailed(PresenceState),
}

impl TickOutcome {
    /// Delay before the next tick. Connection trouble retries sooner.
    pub fn next_delay(&self, config: &PresenceConfig) -> Duration {
        match self {
            TickOutcome::ClientAbsent | TickOutcome::ConnectFailed => config.retry_interval,
            _ => config.poll_interval,
        }
    }

    fn keeps_session(&self) -> bool {
        !matches!(self, TickOutcome::ClearFailed | TickOutcome::PushFailed(_))
    }
}

/// Polls the system and mirrors Resolve's state into the presence service.
///
/// Owns the only session handle. The handle is created lazily once Discord is
/// seen running and dropped as soon as Discord disappears or a push fails.
pub struct Reconciler<P, C: PresenceClient> {
    config: PresenceConfig,
    probe: P,
    client: C,
    session: Option<C::Session>,
    last_state: Option<PresenceState>,
}

impl<P: SystemProbe, C: PresenceClient> Reconciler<P, C> {
    pub fn new(config: PresenceConfig, probe: P, client: C) -> Self {
        Self {
            config,
            probe,
            client,
            session: None,
            last_state: None,
        }
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn config(&self) -> &PresenceConfig {
        &self.config
    }

    #[cfg(test)]
    pub fn probe_mut(&mut self) -> &mut P {
        &mut self.probe
    }

    /// Run one reconciliation pass
    pub async fn tick(&mut self) -> TickOutcome {
        self.probe.refresh_processes();

        if !self.chat_client_running() {
            if let Some(session) = self.session.take() {
                tracing::info!("{} is no longer running, closing session", self.client.name());
                session.close().await;
            } else {
                tracing::debug!("{} is not running", self.client.name());
            }
            self.last_state = None;
            return TickOutcome::ClientAbsent;
        }

        let mut session = match self.session.take() {
            Some(session) => session,
            None => {
                tracing::info!("Connecting to {}...", self.client.name());
                match self.client.connect().await {
                    Ok(session) => {
                        tracing::info!("Successfully connected to {}", self.client.name());
                        self.last_state = None;
                        session
                    }
                    Err(e) => {
                        tracing::warn!("Failed to connect to {}: {}", self.client.name(), e);
                        return TickOutcome::ConnectFailed;
                    }
                }
            }
        };

        let state = self.observe();
        let outcome = self.publish(&mut session, state).await;

        if outcome.keeps_session() {
            self.session = Some(session);
        } else {
            tracing::info!("Dropping {} session, will reconnect", self.client.name());
            session.close().await;
            self.last_state = None;
        }

        outcome
    }

    /// Tick until `shutdown` resolves, then clear presence and close the session
    pub async fn run_until<F: Future<Output = ()>>(mut self, shutdown: F) {
        tokio::pin!(shutdown);

        loop {
            let result = AssertUnwindSafe(self.tick()).catch_unwind().await;
            let delay = match result {
                Ok(outcome) => outcome.next_delay(&self.config),
                Err(panic) => {
                    tracing::error!("Error in main loop: {}", panic_message(&*panic));
                    self.session = None;
                    self.last_state = None;
                    self.config.poll_interval
                }
            };

            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        self.shutdown().await;
    }

    async fn shutdown(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.clear().await {
                tracing::debug!("Failed to clear status on shutdown: {}", e);
            }
            session.close().await;
        }
        tracing::info!("Presence loop stopped");
    }

    fn chat_client_running(&mut self) -> bool {
        match self.probe.chat_client_running() {
            Ok(running) => running,
            Err(e) => {
                tracing::warn!("Failed to check for {} process: {}", self.client.name(), e);
                false
            }
        }
    }

    /// Gather this tick's facts about Resolve and classify them
    fn observe(&mut self) -> PresenceState {
        let running = match self.probe.target_app_running() {
            Ok(running) => running,
            Err(e) => {
                tracing::warn!("Failed to check for Resolve processes: {}", e);
                false
            }
        };

        if !running {
            return PresenceState::Cleared;
        }

        let app_name = &self.config.window_marker;
        let title = match self.probe.target_window_title() {
            Ok(Some(title)) => title,
            Ok(None) => {
                tracing::debug!("No Resolve windows found");
                app_name.clone()
            }
            Err(e) => {
                tracing::warn!("Error getting window title: {}", e);
                app_name.clone()
            }
        };

        let version = match self.probe.app_version() {
            Ok(version) => version,
            Err(e) => {
                tracing::debug!("Error getting Resolve version: {}", e);
                UNKNOWN_VERSION.to_string()
            }
        };

        derive_state(&title, &version, app_name)
    }

    async fn publish(&mut self, session: &mut C::Session, state: PresenceState) -> TickOutcome {
        let activity = state.to_activity(
            &self.config.window_marker,
            &self.config.large_image,
            &self.config.buttons,
        );

        let changed = self.last_state.as_ref() != Some(&state);

        match activity {
            None => match session.clear().await {
                Ok(()) => {
                    if changed {
                        tracing::info!("Resolve not running, status cleared");
                    }
                    self.last_state = Some(state);
                    TickOutcome::Cleared
                }
                Err(e) => {
                    tracing::warn!("Failed to clear status: {}", e);
                    TickOutcome::ClearFailed
                }
            },
            Some(activity) => match session.update(&activity).await {
                Ok(()) => {
                    if changed {
                        tracing::info!("Status updated: {} ({})", activity.state, activity.details);
                    } else {
                        tracing::debug!("Status refreshed: {}", activity.state);
                    }
                    self.last_state = Some(state.clone());
                    TickOutcome::Published(state)
                }
                Err(e) => {
                    tracing::warn!("Failed to update status: {}", e);
                    TickOutcome::PushFailed(state)
                }
            },
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
