use nserve_config::ConfigError;
use nserve_servers::{BulkAction, ServerError};
use thiserror::Error;

/// Main error type returned by command handlers
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Some targets of a bulk action failed; each failure was already reported.
    #[error("Failed to {action} {failed} of {total} server(s)")]
    PartialFailure {
        action: BulkAction,
        failed: usize,
        total: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_failure_message() {
        let err = CliError::PartialFailure {
            action: BulkAction::Restart,
            failed: 1,
            total: 3,
        };
        assert_eq!(err.to_string(), "Failed to restart 1 of 3 server(s)");
    }

    #[test]
    fn test_server_errors_are_transparent() {
        let err = CliError::from(ServerError::PortInUse { port: 8080 });
        assert_eq!(err.to_string(), "Port 8080 is already in use");
    }
}
