mod reconciler;
mod state;
mod traits;

pub use reconciler::{Reconciler, TickOutcome};
pub use state::{derive_state, is_studio, project_name, PresenceState, PROJECT_MANAGER_MARKER};
pub use traits::{Activity, ActivityButton, PresenceClient, PresenceError, PresenceSession};
