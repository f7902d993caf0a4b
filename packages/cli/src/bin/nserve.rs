use clap::{Args, Parser, Subcommand};
use colored::*;
use nserve_cli::{init_tracing, CliError};
use nserve_config::constants::DEFAULT_PORT;
use nserve_config::Settings;
use nserve_servers::BulkAction;
use nserve_supervisor::Pm2Connector;
use std::path::PathBuf;
use std::process;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "n-serve")]
#[command(about = "Serve static files as background servers supervised by PM2")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(flatten)]
    serve: ServeArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options for the default command, which creates and launches a server
#[derive(Args, Debug)]
struct ServeArgs {
    /// Directory to serve
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT.to_string())]
    port: String,

    /// Process name (defaults to static-serve-<port>)
    #[arg(short, long)]
    name: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all static servers
    List,
    /// Restart a server (use 'all' to restart all)
    Restart { name: String },
    /// Stop a server (use 'all' to stop all)
    Stop { name: String },
    /// Start a stopped server (use 'all' to start all)
    Start { name: String },
    /// Delete a server (use 'all' to delete all)
    Delete { name: String },
    /// Save the current process list
    Save,
    /// Start the process manager and saved servers after reboot
    Autostart,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), CliError::from(e));
            process::exit(1);
        }
    };
    init_tracing(settings.log_filter.as_deref());

    if let Err(e) = handle_command(cli, &settings).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(cli: Cli, settings: &Settings) -> Result<(), CliError> {
    let connector = Pm2Connector::new(&settings.pm2_bin);

    match cli.command {
        None => {
            let ServeArgs { dir, port, name } = cli.serve;
            cli::servers::create(&connector, dir, port, name, &settings.static_bin).await
        }
        Some(Commands::List) => cli::servers::list(&connector).await,
        Some(Commands::Restart { name }) => {
            cli::servers::bulk(&connector, BulkAction::Restart, &name).await
        }
        Some(Commands::Stop { name }) => {
            cli::servers::bulk(&connector, BulkAction::Stop, &name).await
        }
        Some(Commands::Start { name }) => {
            cli::servers::bulk(&connector, BulkAction::Start, &name).await
        }
        Some(Commands::Delete { name }) => {
            cli::servers::bulk(&connector, BulkAction::Delete, &name).await
        }
        Some(Commands::Save) => cli::boot::save(&connector).await,
        Some(Commands::Autostart) => cli::boot::autostart(&connector).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_uses_defaults() {
        let cli = Cli::try_parse_from(["n-serve"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.serve.dir, PathBuf::from("."));
        assert_eq!(cli.serve.port, "3000");
        assert!(cli.serve.name.is_none());
    }

    #[test]
    fn test_default_command_short_flags() {
        let cli = Cli::try_parse_from([
            "n-serve", "-d", "/srv/site", "-p", "8080", "-n", "site",
        ])
        .unwrap();
        assert_eq!(cli.serve.dir, PathBuf::from("/srv/site"));
        assert_eq!(cli.serve.port, "8080");
        assert_eq!(cli.serve.name.as_deref(), Some("site"));
    }

    #[test]
    fn test_non_numeric_port_reaches_validation() {
        let cli = Cli::try_parse_from(["n-serve", "--port", "http"]).unwrap();
        assert_eq!(cli.serve.port, "http");
    }

    #[test]
    fn test_bulk_subcommands_take_a_name() {
        let cli = Cli::try_parse_from(["n-serve", "restart", "all"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Restart { name }) if name == "all"));

        let cli = Cli::try_parse_from(["n-serve", "delete", "site"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Delete { name }) if name == "site"));

        assert!(Cli::try_parse_from(["n-serve", "stop"]).is_err());
    }

    #[test]
    fn test_serve_options_conflict_with_subcommands() {
        assert!(Cli::try_parse_from(["n-serve", "--port", "8080", "list"]).is_err());
    }
}
