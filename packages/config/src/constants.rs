// ABOUTME: Environment variable names and shared defaults
// ABOUTME: Centralized definitions used by the CLI, the registry layer and the static worker

// Supervisor Configuration
pub const NSERVE_PM2_BIN: &str = "NSERVE_PM2_BIN";

// Static Worker Configuration
pub const NSERVE_STATIC_BIN: &str = "NSERVE_STATIC_BIN";

// Logging
pub const NSERVE_LOG: &str = "NSERVE_LOG";

/// Default supervisor executable, resolved through `PATH`.
pub const DEFAULT_PM2_BIN: &str = "pm2";

/// File name of the static worker binary shipped next to `n-serve`.
pub const STATIC_WORKER_NAME: &str = "nserve-static";

/// Lowest port a managed server may bind (privileged ports are refused).
pub const MIN_PORT: u16 = 1024;
pub const MAX_PORT: u16 = 65535;
pub const DEFAULT_PORT: u16 = 3000;

/// Default server names are `<prefix>-<port>`.
pub const DEFAULT_NAME_PREFIX: &str = "static-serve";

/// Reserved target that addresses every managed server at once.
pub const ALL_SERVERS: &str = "all";

// Launch argument prefixes shared by the registry filter and the worker.
pub const PORT_ARG_PREFIX: &str = "--port=";
pub const DIR_ARG_PREFIX: &str = "--dir=";
