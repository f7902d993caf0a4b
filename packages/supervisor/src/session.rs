// ABOUTME: Supervisor trait seam and scoped session discipline
// ABOUTME: Every command connects once, runs its body, and disconnects on every exit path

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use crate::error::SupervisorResult;
use crate::types::{LaunchSpec, ProcessEntry, ProcessRef};

/// An open session with the process supervisor.
///
/// Per-process calls are independent and may be issued concurrently from
/// several tasks sharing the same session.
#[async_trait]
pub trait Supervisor: Send + Sync {
    /// Full process list, including processes this tool did not create.
    async fn list(&self) -> SupervisorResult<Vec<ProcessEntry>>;

    async fn start(&self, spec: &LaunchSpec) -> SupervisorResult<()>;

    async fn stop(&self, target: &ProcessRef) -> SupervisorResult<()>;

    async fn restart(&self, target: &ProcessRef) -> SupervisorResult<()>;

    async fn delete(&self, target: &ProcessRef) -> SupervisorResult<()>;

    /// Persist the current process list for boot recovery.
    async fn dump(&self) -> SupervisorResult<()>;

    /// Register the supervisor to launch at OS boot.
    ///
    /// Returns the supervisor's instructions, which may include a command the
    /// user has to run with elevated privileges.
    async fn startup(&self) -> SupervisorResult<String>;

    async fn disconnect(&self);
}

/// Opens supervisor sessions.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> SupervisorResult<Arc<dyn Supervisor>>;
}

/// Runs `body` inside a supervisor session.
///
/// Connects before the body runs and disconnects exactly once after it
/// settles, whether it returned `Ok` or `Err`. A connection failure is
/// returned without running the body.
pub async fn with_session<T, E, F, Fut>(connector: &dyn Connector, body: F) -> Result<T, E>
where
    F: FnOnce(Arc<dyn Supervisor>) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<crate::error::SupervisorError>,
{
    let session = connector.connect().await?;
    debug!("Supervisor session opened");

    let result = body(Arc::clone(&session)).await;

    session.disconnect().await;
    debug!("Supervisor session closed");
    result
}
