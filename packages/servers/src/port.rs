use std::net::Ipv4Addr;
use tokio::net::TcpListener;
use tracing::debug;

/// Checks whether `port` can be bound on the wildcard interface.
///
/// The probe listener is dropped before returning, so the port is never left
/// bound. The answer is advisory: another process may take the port between
/// this check and the server's own bind.
pub async fn is_port_available(port: u16) -> bool {
    match TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await {
        Ok(listener) => {
            drop(listener);
            true
        }
        Err(e) => {
            debug!("Port {} is not available: {}", port, e);
            false
        }
    }
}
