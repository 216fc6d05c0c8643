//! Discord Rich Presence integration using discord-sdk

use std::time::Duration;

use discord_sdk::{
    activity::{ActivityBuilder, Assets, Button},
    wheel::{UserState, Wheel},
    Discord, Subscriptions,
};

use crate::config::PresenceConfig;
use crate::presence::{Activity, PresenceClient, PresenceError, PresenceSession};

/// Discord rejects activity strings longer than this many bytes
const MAX_FIELD_LEN: usize = 128;

/// Discord rejects activity strings shorter than this many characters
const MIN_FIELD_CHARS: usize = 2;

/// Discord shows at most two buttons
const MAX_BUTTONS: usize = 2;

const ELLIPSIS: &str = "...";

/// Fit a string into Discord's activity field limits
fn fit_field(value: &str) -> String {
    let mut fitted = if value.len() > MAX_FIELD_LEN {
        let mut end = MAX_FIELD_LEN - ELLIPSIS.len();
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}{}", &value[..end], ELLIPSIS)
    } else {
        value.to_string()
    };

    while fitted.chars().count() < MIN_FIELD_CHARS {
        fitted.push(' ');
    }

    fitted
}

fn sdk_error(e: discord_sdk::Error) -> PresenceError {
    PresenceError::Sdk(format!("{:?}", e))
}

/// Opens Discord IPC sessions for the configured application
pub struct DiscordClient {
    app_id: i64,
    handshake_timeout: Duration,
}

impl DiscordClient {
    pub fn new(config: &PresenceConfig) -> Self {
        Self {
            app_id: config.app_id,
            handshake_timeout: config.handshake_timeout,
        }
    }
}

/// A connected Discord session
pub struct DiscordSession {
    discord: Discord,
    _wheel: Wheel,
}

impl PresenceClient for DiscordClient {
    type Session = DiscordSession;

    fn name(&self) -> &'static str {
        "Discord"
    }

    async fn connect(&mut self) -> Result<DiscordSession, PresenceError> {
        let (wheel, handler) = Wheel::new(Box::new(|err| {
            tracing::debug!("Discord error: {:?}", err);
        }));

        let mut user_spoke = wheel.user();

        let discord = Discord::new(self.app_id, Subscriptions::ACTIVITY, Box::new(handler))
            .map_err(|e| PresenceError::Unavailable(format!("{:?}", e)))?;

        let handshake = tokio::time::timeout(self.handshake_timeout, async {
            if user_spoke.0.changed().await.is_err() {
                Err(PresenceError::Disconnected(
                    "Discord connection closed".to_string(),
                ))
            } else {
                match &*user_spoke.0.borrow() {
                    UserState::Connected(user) => Ok(user.clone()),
                    UserState::Disconnected(err) => {
                        Err(PresenceError::Disconnected(format!("{:?}", err)))
                    }
                }
            }
        })
        .await;

        let user = match handshake {
            Ok(Ok(user)) => user,
            Ok(Err(e)) => {
                discord.disconnect().await;
                return Err(e);
            }
            Err(_) => {
                discord.disconnect().await;
                return Err(PresenceError::HandshakeTimeout);
            }
        };

        tracing::info!("Discord Rich Presence connected as {}", user.username);

        Ok(DiscordSession {
            discord,
            _wheel: wheel,
        })
    }
}

impl PresenceSession for DiscordSession {
    async fn update(&mut self, activity: &Activity) -> Result<(), PresenceError> {
        let mut builder = ActivityBuilder::new()
            .state(fit_field(&activity.state))
            .details(fit_field(&activity.details))
            .assets(Assets::default().large(
                activity.large_image.clone(),
                Some(fit_field(&activity.large_text)),
            ));

        for button in activity.buttons.iter().take(MAX_BUTTONS) {
            builder = builder.button(Button {
                label: fit_field(&button.label),
                url: button.url.clone(),
            });
        }

        self.discord
            .update_activity(builder)
            .await
            .map(|_| ())
            .map_err(sdk_error)
    }

    async fn clear(&mut self) -> Result<(), PresenceError> {
        self.discord.clear_activity().await.map(|_| ()).map_err(sdk_error)
    }

    async fn close(self) {
        self.discord.disconnect().await;
        tracing::info!("Discord Rich Presence disconnected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_field_passes_normal_text() {
        assert_eq!(fit_field("Editing: MyFilm"), "Editing: MyFilm");
    }

    #[test]
    fn test_fit_field_truncates_long_text() {
        let long = "x".repeat(300);
        let fitted = fit_field(&long);
        assert_eq!(fitted.len(), MAX_FIELD_LEN);
        assert!(fitted.ends_with("..."));
    }

    #[test]
    fn test_fit_field_respects_char_boundaries() {
        let long = "é".repeat(100);
        let fitted = fit_field(&long);
        assert!(fitted.len() <= MAX_FIELD_LEN);
        assert!(fitted.ends_with("..."));
        assert!(fitted.trim_end_matches("...").chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_fit_field_pads_short_text() {
        assert_eq!(fit_field("A"), "A ");
        assert_eq!(fit_field(""), "  ");
    }
}
