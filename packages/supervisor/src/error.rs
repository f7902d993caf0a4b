use thiserror::Error;

/// Error types for supervisor interaction
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("Failed to connect to supervisor: {reason}")]
    Connect { reason: String },

    #[error("Supervisor failed to {action} '{target}': {reason}")]
    Call {
        action: &'static str,
        target: String,
        reason: String,
    },

    #[error("Unexpected supervisor output: {0}")]
    InvalidOutput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Result type for supervisor operations
pub type SupervisorResult<T> = Result<T, SupervisorError>;
