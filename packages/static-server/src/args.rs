use nserve_config::constants::{DEFAULT_PORT, DIR_ARG_PREFIX, PORT_ARG_PREFIX};
use std::path::PathBuf;
use tracing::warn;

/// Launch arguments of the worker: `--port=<int>` and `--dir=<path>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerArgs {
    pub port: u16,
    pub directory: PathBuf,
}

impl WorkerArgs {
    /// Parses launch arguments by prefix, first match wins.
    ///
    /// A missing or malformed port falls back to the default port; a missing
    /// or empty directory falls back to `cwd`.
    pub fn parse<I, S>(args: I, cwd: PathBuf) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut port_arg: Option<String> = None;
        let mut dir_arg: Option<String> = None;

        for arg in args {
            let arg = arg.as_ref();
            if port_arg.is_none() {
                port_arg = arg.strip_prefix(PORT_ARG_PREFIX).map(str::to_string);
            }
            if dir_arg.is_none() {
                dir_arg = arg.strip_prefix(DIR_ARG_PREFIX).map(str::to_string);
            }
        }

        let port = match port_arg {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) if port != 0 => port,
                _ => {
                    warn!("Ignoring malformed port '{}', using {}", raw, DEFAULT_PORT);
                    DEFAULT_PORT
                }
            },
            None => DEFAULT_PORT,
        };

        let directory = dir_arg
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .unwrap_or(cwd);

        WorkerArgs { port, directory }
    }
}
