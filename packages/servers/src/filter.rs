// ABOUTME: Managed-process filter over the supervisor's full process list
// ABOUTME: A process is ours iff a launch argument starts with --dir=

use nserve_config::constants::{DIR_ARG_PREFIX, PORT_ARG_PREFIX};
use nserve_supervisor::ProcessEntry;
use std::path::Path;

use crate::types::{ManagedServer, ServerStatus};

const NOT_AVAILABLE: &str = "N/A";

/// Launch arguments handed to the static worker.
pub fn launch_args(port: u16, directory: &Path) -> Vec<String> {
    vec![
        format!("{}{}", PORT_ARG_PREFIX, port),
        format!("{}{}", DIR_ARG_PREFIX, directory.display()),
    ]
}

/// Value of the first argument carrying `prefix`.
pub fn arg_value<'a>(args: &'a [String], prefix: &str) -> Option<&'a str> {
    args.iter().find_map(|arg| arg.strip_prefix(prefix))
}

pub fn is_managed(entry: &ProcessEntry) -> bool {
    entry.args.iter().any(|arg| arg.starts_with(DIR_ARG_PREFIX))
}

/// Projects the managed subset of `processes`, keeping supervisor order.
///
/// `now_ms` is the current time in epoch milliseconds, used to derive uptime.
pub fn filter_managed(processes: &[ProcessEntry], now_ms: i64) -> Vec<ManagedServer> {
    processes
        .iter()
        .filter(|entry| is_managed(entry))
        .map(|entry| ManagedServer {
            name: entry.name.clone(),
            process_id: entry.pm_id,
            port: arg_value(&entry.args, PORT_ARG_PREFIX)
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
            directory: arg_value(&entry.args, DIR_ARG_PREFIX)
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
            status: ServerStatus::from_supervisor(entry.status.as_deref()),
            uptime_seconds: entry
                .started_at_ms
                .filter(|started| *started > 0)
                .map(|started| (now_ms.saturating_sub(started).max(0) / 1000) as u64),
            restart_count: entry.restart_count,
        })
        .collect()
}

/// Compact uptime: seconds, minutes, hours or days, floored.
pub fn format_uptime(seconds: Option<u64>) -> String {
    match seconds {
        None => NOT_AVAILABLE.to_string(),
        Some(s) if s < 60 => format!("{}s", s),
        Some(s) if s < 3_600 => format!("{}m", s / 60),
        Some(s) if s < 86_400 => format!("{}h", s / 3_600),
        Some(s) => format!("{}d", s / 86_400),
    }
}
