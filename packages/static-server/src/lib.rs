//! n-serve static worker
//!
//! The process the supervisor launches for every managed server. It reads
//! `--port=` and `--dir=` from its arguments and serves the directory over
//! HTTP with directory-index resolution and a single-page-app fallback to
//! `index.html`.

pub mod args;
pub mod server;

pub use args::WorkerArgs;
pub use server::{router, StaticServer, StaticServerConfig, StaticServerError};
