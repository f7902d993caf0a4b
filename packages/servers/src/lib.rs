//! n-serve server registry
//!
//! Maps user-facing server names onto supervisor processes. A process belongs
//! to this tool when its launch arguments carry a `--dir=` entry; everything
//! else under the same supervisor is ignored.
//!
//! The entry points are [`create_server`] for launching a new server and
//! [`apply_bulk`] for stop/start/restart/delete across one or all servers.

pub mod create;
pub mod filter;
pub mod port;
pub mod registry;
pub mod types;

#[cfg(test)]
mod test_support;

pub use create::{
    create_server, launch_server, prepare_server, validate_request, CreateRequest,
    LaunchedServer, ValidatedRequest,
};
pub use filter::{filter_managed, format_uptime, is_managed, launch_args};
pub use port::is_port_available;
pub use registry::{apply_bulk, autostart, list_servers, save};
pub use types::{
    AutostartReport, BulkAction, BulkReport, ManagedServer, ServerError, ServerResult,
    ServerStatus, Target, TargetOutcome,
};
