use nserve_config::constants::{ALL_SERVERS, MAX_PORT, MIN_PORT};
use nserve_supervisor::SupervisorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Status of a managed server as reported by the supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Online,
    Stopped,
    Errored,
    Unknown,
}

impl ServerStatus {
    /// Maps a raw supervisor status; anything unrecognized is `Unknown`.
    pub fn from_supervisor(raw: Option<&str>) -> Self {
        match raw {
            Some("online") => ServerStatus::Online,
            Some("stopped") => ServerStatus::Stopped,
            Some("errored") => ServerStatus::Errored,
            _ => ServerStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServerStatus::Online => "online",
            ServerStatus::Stopped => "stopped",
            ServerStatus::Errored => "errored",
            ServerStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A supervisor process recognized as one of ours.
///
/// Never stored: rebuilt from the supervisor listing on every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedServer {
    pub name: String,
    pub process_id: u32,
    /// Value of the `--port=` launch argument, `N/A` when absent.
    pub port: String,
    /// Value of the `--dir=` launch argument, `N/A` when absent.
    pub directory: String,
    pub status: ServerStatus,
    pub uptime_seconds: Option<u64>,
    pub restart_count: u32,
}

/// Lifecycle action applied by the bulk engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Stop,
    Start,
    Restart,
    Delete,
}

impl BulkAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BulkAction::Stop => "stop",
            BulkAction::Start => "start",
            BulkAction::Restart => "restart",
            BulkAction::Delete => "delete",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            BulkAction::Stop => "stopped",
            BulkAction::Start => "started",
            BulkAction::Restart => "restarted",
            BulkAction::Delete => "deleted",
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which servers a bulk action addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    All,
    Named(String),
}

impl Target {
    pub fn parse(raw: &str) -> Self {
        if raw == ALL_SERVERS {
            Target::All
        } else {
            Target::Named(raw.to_string())
        }
    }
}

/// Result of applying an action to one server.
#[derive(Debug)]
pub struct TargetOutcome {
    pub name: String,
    pub result: Result<(), ServerError>,
}

/// Outcome of a bulk action.
#[derive(Debug)]
pub enum BulkReport {
    /// The supervisor hosts no managed servers at all.
    NoManagedServers,
    /// `start <name>` on a server that is already online.
    AlreadyOnline { name: String },
    /// `start all` while every managed server is already online.
    NothingToStart,
    /// Per-target outcomes, in completion order.
    Completed {
        action: BulkAction,
        outcomes: Vec<TargetOutcome>,
    },
}

impl BulkReport {
    pub fn succeeded(&self) -> Vec<&str> {
        match self {
            BulkReport::Completed { outcomes, .. } => outcomes
                .iter()
                .filter(|o| o.result.is_ok())
                .map(|o| o.name.as_str())
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn failed(&self) -> Vec<(&str, &ServerError)> {
        match self {
            BulkReport::Completed { outcomes, .. } => outcomes
                .iter()
                .filter_map(|o| o.result.as_ref().err().map(|e| (o.name.as_str(), e)))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Failure-dominant: one failed target fails the whole action.
    pub fn is_success(&self) -> bool {
        self.failed().is_empty()
    }
}

/// Outcome of the `autostart` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutostartReport {
    /// Instructions printed by the supervisor's boot-script generator.
    pub instructions: String,
}

impl AutostartReport {
    /// The command the user still has to run as root, if the supervisor
    /// printed one. Absent when the install already happened.
    pub fn elevated_command(&self) -> Option<&str> {
        self.instructions
            .lines()
            .map(str::trim)
            .find(|line| line.starts_with("sudo "))
    }
}

/// Error types for registry operations
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Name cannot be '{}'", ALL_SERVERS)]
    InvalidName,

    #[error("Directory not found: {}", .path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("Port must be a number between {} and {} (got '{input}')", MIN_PORT, MAX_PORT)]
    InvalidPort { input: String },

    #[error("Port {port} is already in use")]
    PortInUse { port: u16 },

    #[error("Failed to connect to supervisor: {reason}")]
    SupervisorConnect { reason: String },

    #[error("Failed to {action} server '{target}': {reason}")]
    Supervisor {
        action: &'static str,
        target: String,
        reason: String,
    },

    #[error("Server '{name}' not found")]
    ServerNotFound { name: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ServerError {
    /// Attributes a supervisor failure to a specific server and action.
    pub fn supervisor_call(action: &'static str, target: &str, err: SupervisorError) -> Self {
        match err {
            SupervisorError::Connect { reason } => ServerError::SupervisorConnect { reason },
            SupervisorError::Call { reason, .. } => ServerError::Supervisor {
                action,
                target: target.to_string(),
                reason,
            },
            other => ServerError::Supervisor {
                action,
                target: target.to_string(),
                reason: other.to_string(),
            },
        }
    }
}

impl From<SupervisorError> for ServerError {
    fn from(err: SupervisorError) -> Self {
        match err {
            SupervisorError::Connect { reason } => ServerError::SupervisorConnect { reason },
            SupervisorError::Call {
                action,
                target,
                reason,
            } => ServerError::Supervisor {
                action,
                target,
                reason,
            },
            other => ServerError::Supervisor {
                action: "list",
                target: "processes".to_string(),
                reason: other.to_string(),
            },
        }
    }
}

/// Result type for registry operations
pub type ServerResult<T> = Result<T, ServerError>;
