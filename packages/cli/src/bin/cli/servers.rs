// ABOUTME: Handlers for creating, listing and bulk-managing static servers
// ABOUTME: Each handler runs inside one scoped supervisor session

use colored::*;
use nserve_servers::{
    apply_bulk, create_server, list_servers, BulkAction, BulkReport, CreateRequest, ServerError,
};
use nserve_supervisor::{with_session, Connector};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::output;
use nserve_cli::CliError;

pub async fn create(
    connector: &dyn Connector,
    dir: PathBuf,
    port: String,
    name: Option<String>,
    worker: &Path,
) -> Result<(), CliError> {
    let request = CreateRequest {
        name,
        directory: dir,
        port,
    };

    debug!("Creating server from {}", request.directory.display());
    let server = create_server(connector, &request, worker).await?;

    println!(
        "{}",
        format!("🚀 Server '{}' started successfully!", server.name).green()
    );
    println!(
        "{}",
        format!("   Serving: {}", server.directory.display()).blue()
    );
    println!("{}", format!("   URL: http://localhost:{}", server.port).blue());
    if let Some(row) = &server.listing {
        println!("{}", format!("   Status: {}", row.status).blue());
    }
    println!(
        "{}",
        "   Process is running in the background with PM2".blue()
    );
    println!("{}", "   To view all servers: n-serve list".yellow());
    println!(
        "{}",
        format!("   To restart: n-serve restart {}", server.name).yellow()
    );
    Ok(())
}

pub async fn list(connector: &dyn Connector) -> Result<(), CliError> {
    let servers = with_session(connector, |session| async move {
        list_servers(session.as_ref()).await
    })
    .await?;

    if servers.is_empty() {
        println!("{}", "No static servers are currently running".yellow());
        return Ok(());
    }

    println!("{}", output::servers_table(&servers));
    Ok(())
}

pub async fn bulk(
    connector: &dyn Connector,
    action: BulkAction,
    name: &str,
) -> Result<(), CliError> {
    debug!("Applying {} to '{}'", action, name);
    let report = with_session(connector, |session| async move {
        apply_bulk(session.as_ref(), action, name).await
    })
    .await?;

    report_bulk(&report)
}

fn report_bulk(report: &BulkReport) -> Result<(), CliError> {
    match report {
        BulkReport::NoManagedServers => {
            println!("{}", "No static servers are currently registered".yellow());
        }
        BulkReport::AlreadyOnline { name } => {
            println!("{}", format!("Server '{}' is already running", name).yellow());
        }
        BulkReport::NothingToStart => {
            println!("{}", "No stopped servers to start".yellow());
        }
        BulkReport::Completed { action, outcomes } => {
            for outcome in outcomes {
                match &outcome.result {
                    Ok(()) => println!(
                        "{}",
                        format!(
                            "✅ Successfully {} server '{}'",
                            action.past_tense(),
                            outcome.name
                        )
                        .green()
                    ),
                    Err(e) => eprintln!("{}", describe_failure(e).red()),
                }
            }

            let failed = report.failed().len();
            if failed > 0 {
                return Err(CliError::PartialFailure {
                    action: *action,
                    failed,
                    total: outcomes.len(),
                });
            }
        }
    }
    Ok(())
}

fn describe_failure(error: &ServerError) -> String {
    format!("❌ {}", error)
}
