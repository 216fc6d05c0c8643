//! Presence derivation from the Resolve window title and version

use super::traits::{Activity, ActivityButton};

/// Title fragment shown while the project browser is open
pub const PROJECT_MANAGER_MARKER: &str = "Project Manager";

/// Edition suffixes Resolve appends to its window title
const EDITION_SUFFIXES: &[&str] = &[" - Studio", " - Free"];

const STUDIO_MARKER: &str = "Studio";

/// The current state of presence to display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceState {
    /// Resolve is not running, nothing should be shown
    Cleared,
    /// Resolve is open on the project browser
    InProjectManager { studio: bool, version: String },
    /// Resolve has a named project open
    EditingProject {
        project_name: String,
        studio: bool,
        version: String,
    },
    /// Resolve is running but the project could not be identified
    EditingUnknown { studio: bool, version: String },
}

/// Studio edition if either the title or the version says so (case-sensitive)
pub fn is_studio(window_title: &str, version: &str) -> bool {
    window_title.contains(STUDIO_MARKER) || version.contains(STUDIO_MARKER)
}

/// Strip the application name and edition suffixes from a window title.
///
/// The single `-` separator left in front (`"- MyFilm"`) is dropped along with
/// surrounding whitespace. Dashes belonging to the name itself are kept.
pub fn project_name(window_title: &str, app_name: &str) -> String {
    let mut name = window_title.replace(app_name, "");
    for suffix in EDITION_SUFFIXES {
        name = name.replace(suffix, "");
    }
    let name = name.trim();
    name.strip_prefix('-').unwrap_or(name).trim().to_string()
}

/// Classify a running Resolve instance from its window title and version
pub fn derive_state(window_title: &str, version: &str, app_name: &str) -> PresenceState {
    let studio = is_studio(window_title, version);
    let version = version.to_string();

    if window_title.contains(PROJECT_MANAGER_MARKER) {
        return PresenceState::InProjectManager { studio, version };
    }

    let project_name = project_name(window_title, app_name);
    if project_name.is_empty() {
        PresenceState::EditingUnknown { studio, version }
    } else {
        PresenceState::EditingProject {
            project_name,
            studio,
            version,
        }
    }
}

impl PresenceState {
    fn edition(studio: bool) -> &'static str {
        if studio {
            "Studio"
        } else {
            "Free"
        }
    }

    /// Render the activity for this state; `None` means presence should be cleared
    pub fn to_activity(
        &self,
        app_name: &str,
        large_image: &str,
        buttons: &[ActivityButton],
    ) -> Option<Activity> {
        let (state, studio, version) = match self {
            PresenceState::Cleared => return None,
            PresenceState::InProjectManager { studio, version } => {
                ("In Project Manager".to_string(), *studio, version)
            }
            PresenceState::EditingProject {
                project_name,
                studio,
                version,
            } => (format!("Editing: {}", project_name), *studio, version),
            PresenceState::EditingUnknown { studio, version } => {
                ("Editing".to_string(), *studio, version)
            }
        };

        let details = format!("{} {}", app_name, Self::edition(studio));
        let large_text = format!("{} {}", details, version);

        Some(Activity {
            state,
            details,
            large_image: large_image.to_string(),
            large_text,
            buttons: buttons.to_vec(),
        })
    }
}
