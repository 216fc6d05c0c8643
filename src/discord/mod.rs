mod presence;

pub use presence::{DiscordClient, DiscordSession};
