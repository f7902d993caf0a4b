// ABOUTME: Creation workflow for new managed servers
// ABOUTME: Validates input before any supervisor contact, then launches the worker

use nserve_config::constants::{ALL_SERVERS, DEFAULT_NAME_PREFIX, MAX_PORT, MIN_PORT};
use nserve_supervisor::{with_session, Connector, LaunchSpec, Supervisor};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

use crate::filter::launch_args;
use crate::port::is_port_available;
use crate::registry::list_servers;
use crate::types::{ManagedServer, ServerError, ServerResult};

/// Environment handed to every launched worker.
const WORKER_ENV: (&str, &str) = ("NSERVE_ENV", "production");

/// Raw creation input as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub name: Option<String>,
    pub directory: PathBuf,
    /// Kept as text so non-numeric input surfaces as an invalid port.
    pub port: String,
}

/// Creation input that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub name: String,
    pub directory: PathBuf,
    pub port: u16,
}

impl ValidatedRequest {
    pub fn launch_spec(&self, script: &Path) -> LaunchSpec {
        LaunchSpec::new(
            self.name.clone(),
            script,
            launch_args(self.port, &self.directory),
        )
        .with_env(WORKER_ENV.0, WORKER_ENV.1)
    }
}

/// Synchronous checks, first failure wins: reserved name, directory
/// existence, port range. Relative directories resolve against `cwd`.
pub fn validate_request(request: &CreateRequest, cwd: &Path) -> ServerResult<ValidatedRequest> {
    if request.name.as_deref() == Some(ALL_SERVERS) {
        return Err(ServerError::InvalidName);
    }

    let directory = absolutize(&request.directory, cwd);
    debug!("Resolved directory: {}", directory.display());
    if !directory.exists() {
        return Err(ServerError::DirectoryNotFound { path: directory });
    }

    let port = parse_port(&request.port)?;

    let name = match request.name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("{}-{}", DEFAULT_NAME_PREFIX, port),
    };

    Ok(ValidatedRequest {
        name,
        directory,
        port,
    })
}

/// Runs every pre-launch check, including the port probe.
pub async fn prepare_server(request: &CreateRequest, cwd: &Path) -> ServerResult<ValidatedRequest> {
    let validated = validate_request(request, cwd)?;
    if !is_port_available(validated.port).await {
        return Err(ServerError::PortInUse {
            port: validated.port,
        });
    }
    Ok(validated)
}

/// A server the supervisor accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchedServer {
    pub name: String,
    pub directory: PathBuf,
    pub port: u16,
    /// The supervisor's row for the new server, when it could be read back.
    pub listing: Option<ManagedServer>,
}

/// Asks the supervisor to launch the worker.
///
/// Only the launch call decides the outcome. The listing is re-read to report
/// the new server's row; if that read fails the server is still running, so
/// the failure is logged and `listing` is left empty.
pub async fn launch_server(
    session: &dyn Supervisor,
    validated: &ValidatedRequest,
    script: &Path,
) -> ServerResult<LaunchedServer> {
    let spec = validated.launch_spec(script);
    session
        .start(&spec)
        .await
        .map_err(|e| ServerError::supervisor_call("start", &validated.name, e))?;

    info!(
        "Launched '{}' on port {} serving {}",
        validated.name,
        validated.port,
        validated.directory.display()
    );

    let listing = match list_servers(session).await {
        Ok(servers) => {
            let row = servers
                .into_iter()
                .find(|server| server.name == validated.name);
            if row.is_none() {
                warn!("'{}' was not reported by the supervisor after launch", validated.name);
            }
            row
        }
        Err(e) => {
            warn!("Could not read back '{}' after launch: {}", validated.name, e);
            None
        }
    };

    Ok(LaunchedServer {
        name: validated.name.clone(),
        directory: validated.directory.clone(),
        port: validated.port,
        listing,
    })
}

/// Full creation workflow: validate, probe, then launch inside one scoped
/// supervisor session. Invalid input never opens a session.
pub async fn create_server(
    connector: &dyn Connector,
    request: &CreateRequest,
    script: &Path,
) -> ServerResult<LaunchedServer> {
    let cwd = std::env::current_dir()?;
    let validated = prepare_server(request, &cwd).await?;

    with_session(connector, |session| async move {
        launch_server(session.as_ref(), &validated, script).await
    })
    .await
}

fn parse_port(input: &str) -> ServerResult<u16> {
    let invalid = || ServerError::InvalidPort {
        input: input.to_string(),
    };
    let value: i64 = input.trim().parse().map_err(|_| invalid())?;
    if value < i64::from(MIN_PORT) || value > i64::from(MAX_PORT) {
        return Err(invalid());
    }
    u16::try_from(value).map_err(|_| invalid())
}

/// Joins `path` onto `cwd` when relative and folds `.` and `..` lexically.
fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    let mut resolved = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}
