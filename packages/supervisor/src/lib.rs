//! n-serve supervisor seam
//!
//! Process supervision is owned by an external daemon (PM2). This crate
//! defines the narrow interface the registry layer needs from it, the wire
//! types exchanged across that interface, a scoped session helper, and the
//! production adapter that drives the `pm2` executable.

pub mod error;
pub mod pm2;
pub mod session;
pub mod types;

pub use error::{SupervisorError, SupervisorResult};
pub use pm2::{Pm2Connector, Pm2Session};
pub use session::{with_session, Connector, Supervisor};
pub use types::{LaunchSpec, ProcessEntry, ProcessRef};
