// ABOUTME: Registry operations over the managed subset of supervisor processes
// ABOUTME: Bulk stop/start/restart/delete with concurrent fan-out and failure-dominant aggregation

use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use nserve_supervisor::{ProcessRef, Supervisor};
use tracing::{debug, info, warn};

use crate::filter::filter_managed;
use crate::types::{
    AutostartReport, BulkAction, BulkReport, ManagedServer, ServerError, ServerResult,
    ServerStatus, Target, TargetOutcome,
};

/// Lists every managed server, in supervisor order.
pub async fn list_servers(session: &dyn Supervisor) -> ServerResult<Vec<ManagedServer>> {
    let processes = session.list().await?;
    let servers = filter_managed(&processes, Utc::now().timestamp_millis());
    debug!(
        "{} of {} supervisor processes are managed servers",
        servers.len(),
        processes.len()
    );
    Ok(servers)
}

/// Applies `action` to the server named `target`, or to every managed server
/// when `target` is `all`.
///
/// Per-server calls run concurrently and a failing server never stops the
/// others. `start all` skips servers that are already online; the other
/// actions address every managed server.
pub async fn apply_bulk(
    session: &dyn Supervisor,
    action: BulkAction,
    target: &str,
) -> ServerResult<BulkReport> {
    let servers = list_servers(session).await?;
    if servers.is_empty() {
        return Ok(BulkReport::NoManagedServers);
    }

    let targets: Vec<ManagedServer> = match Target::parse(target) {
        Target::All => {
            let targets: Vec<ManagedServer> = servers
                .into_iter()
                .filter(|server| {
                    action != BulkAction::Start || server.status != ServerStatus::Online
                })
                .collect();
            if targets.is_empty() {
                return Ok(BulkReport::NothingToStart);
            }
            targets
        }
        Target::Named(name) => {
            let server = servers
                .into_iter()
                .find(|server| server.name == name)
                .ok_or(ServerError::ServerNotFound { name })?;
            if action == BulkAction::Start && server.status == ServerStatus::Online {
                return Ok(BulkReport::AlreadyOnline { name: server.name });
            }
            vec![server]
        }
    };

    info!("Applying {} to {} server(s)", action, targets.len());

    let mut pending: FuturesUnordered<_> = targets
        .iter()
        .map(|server| async move {
            TargetOutcome {
                name: server.name.clone(),
                result: dispatch(session, action, server).await,
            }
        })
        .collect();

    let mut outcomes = Vec::with_capacity(targets.len());
    while let Some(outcome) = pending.next().await {
        match &outcome.result {
            Ok(()) => info!("Server '{}' {}", outcome.name, action.past_tense()),
            Err(e) => warn!("Server '{}' failed to {}: {}", outcome.name, action, e),
        }
        outcomes.push(outcome);
    }

    Ok(BulkReport::Completed { action, outcomes })
}

/// Stop, restart and delete address the process id. Start reuses
/// restart-by-name to bring a stopped process back.
async fn dispatch(
    session: &dyn Supervisor,
    action: BulkAction,
    server: &ManagedServer,
) -> ServerResult<()> {
    let by_id = ProcessRef::Id(server.process_id);
    let result = match action {
        BulkAction::Stop => session.stop(&by_id).await,
        BulkAction::Restart => session.restart(&by_id).await,
        BulkAction::Delete => session.delete(&by_id).await,
        BulkAction::Start => session.restart(&ProcessRef::Name(server.name.clone())).await,
    };
    result.map_err(|e| ServerError::supervisor_call(action.as_str(), &server.name, e))
}

/// Persists the supervisor's process list for boot recovery.
pub async fn save(session: &dyn Supervisor) -> ServerResult<()> {
    session
        .dump()
        .await
        .map_err(|e| ServerError::supervisor_call("save", "process list", e))?;
    info!("Process list saved");
    Ok(())
}

/// Registers the supervisor for OS boot, then persists the current list.
pub async fn autostart(session: &dyn Supervisor) -> ServerResult<AutostartReport> {
    let instructions = session
        .startup()
        .await
        .map_err(|e| ServerError::supervisor_call("configure startup for", "supervisor", e))?;
    save(session).await?;
    Ok(AutostartReport { instructions })
}
