//! Process detection by executable name.

use sysinfo::{ProcessesToUpdate, System};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessMatch {
    pub name: String,
    pub pid: u32,
}

/// Check a process name against an allow-list, ignoring case
pub fn name_matches(name: &str, allow_list: &[String]) -> bool {
    let name_lower = name.to_lowercase();
    allow_list.iter().any(|allowed| allowed.to_lowercase() == name_lower)
}

/// Keep the `(name, pid)` pairs whose name is on the allow-list
pub fn filter_matches<'a, I>(processes: I, allow_list: &[String]) -> Vec<ProcessMatch>
where
    I: IntoIterator<Item = (&'a str, u32)>,
{
    processes
        .into_iter()
        .filter(|(name, _)| name_matches(name, allow_list))
        .map(|(name, pid)| ProcessMatch {
            name: name.to_string(),
            pid,
        })
        .collect()
}

/// Reusable process table snapshot
pub struct ProcessScanner {
    sys: System,
}

impl ProcessScanner {
    pub fn new() -> Self {
        Self { sys: System::new() }
    }

    /// Re-read the process table
    pub fn refresh(&mut self) {
        self.sys.refresh_processes(ProcessesToUpdate::All, true);
    }

    /// Every process in the last snapshot whose name is on the allow-list
    pub fn find(&self, allow_list: &[String]) -> Vec<ProcessMatch> {
        let names: Vec<(String, u32)> = self
            .sys
            .processes()
            .iter()
            .map(|(pid, p)| (p.name().to_string_lossy().to_string(), pid.as_u32()))
            .collect();

        filter_matches(names.iter().map(|(n, pid)| (n.as_str(), *pid)), allow_list)
    }
}

impl Default for ProcessScanner {
    fn default() -> Self {
        Self::new()
    }
}
