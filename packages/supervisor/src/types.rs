use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// One process as reported by the supervisor's listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessEntry {
    /// Supervisor-assigned handle, reused after deletion.
    pub pm_id: u32,
    pub name: String,
    /// Raw supervisor status (`online`, `stopped`, `errored`, ...).
    pub status: Option<String>,
    /// Launch arguments passed to the process.
    pub args: Vec<String>,
    /// Start time of the current run in epoch milliseconds.
    pub started_at_ms: Option<i64>,
    pub restart_count: u32,
}

/// Addresses a supervised process by id or by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProcessRef {
    Id(u32),
    Name(String),
}

impl fmt::Display for ProcessRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessRef::Id(id) => write!(f, "{}", id),
            ProcessRef::Name(name) => f.write_str(name),
        }
    }
}

/// Request to launch a new supervised process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub name: String,
    /// Executable the supervisor runs.
    pub script: PathBuf,
    pub args: Vec<String>,
    /// Restart the process whenever it exits unexpectedly.
    pub autorestart: bool,
    pub env: BTreeMap<String, String>,
}

impl LaunchSpec {
    pub fn new(name: impl Into<String>, script: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
            args,
            autorestart: true,
            env: BTreeMap::new(),
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_ref_display() {
        assert_eq!(ProcessRef::Id(7).to_string(), "7");
        assert_eq!(ProcessRef::Name("site".into()).to_string(), "site");
    }

    #[test]
    fn test_launch_spec_defaults_to_autorestart() {
        let spec = LaunchSpec::new("site", "/usr/bin/nserve-static", vec![])
            .with_env("NSERVE_ENV", "production");
        assert!(spec.autorestart);
        assert_eq!(spec.env.get("NSERVE_ENV").map(String::as_str), Some("production"));
    }
}
