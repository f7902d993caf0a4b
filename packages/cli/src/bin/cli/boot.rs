// ABOUTME: Boot persistence commands: save the process list and install autostart

use colored::*;
use nserve_cli::CliError;
use nserve_servers::{autostart as install_autostart, save as save_process_list};
use nserve_supervisor::{with_session, Connector};

pub async fn save(connector: &dyn Connector) -> Result<(), CliError> {
    with_session(connector, |session| async move {
        save_process_list(session.as_ref()).await
    })
    .await?;

    println!("{}", "✅ Process list saved successfully!".green());
    Ok(())
}

pub async fn autostart(connector: &dyn Connector) -> Result<(), CliError> {
    let report = with_session(connector, |session| async move {
        install_autostart(session.as_ref()).await
    })
    .await?;

    println!("{}", "✅ PM2 startup configuration generated!".green());
    if let Some(command) = report.elevated_command() {
        println!(
            "{}",
            "To complete setup, run the following command with sudo:".yellow()
        );
        println!("{}", command.cyan());
    }
    println!("{}", "✅ Current process list saved!".green());
    Ok(())
}
