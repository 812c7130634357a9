//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter when enabled
//! - Open the UDP socket (fatal on failure)
//! - Register HTTP, HTTPS and raw TCP listeners in one group
//! - Run the group until a listener dies

use std::net::AddrParseError;

use tokio::net::{TcpStream, UdpSocket};

use crate::config::ServerConfig;
use crate::http::build_router;
use crate::lifecycle::group::{GroupError, ListenerGroup};
use crate::net::{open_udp_socket, ListenerError};
use crate::observability::metrics;

const DATAGRAM_BUFFER: usize = 64 * 1024;

/// Error type for startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid metrics address {address}: {source}")]
    MetricsAddress {
        address: String,
        #[source]
        source: AddrParseError,
    },

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("UDP setup failed: {0}")]
    Udp(#[source] ListenerError),

    #[error(transparent)]
    Group(#[from] GroupError),
}

/// Bring up everything `config` asks for and supervise it.
///
/// Returns `Ok(())` only when no listener is configured at all.
pub async fn start(config: ServerConfig) -> Result<(), StartupError> {
    let observability = &config.observability;
    if observability.metrics_enabled {
        let addr = observability
            .metrics_address
            .parse()
            .map_err(|source| StartupError::MetricsAddress {
                address: observability.metrics_address.clone(),
                source,
            })?;
        metrics::install_exporter(addr)?;
    }

    let mut group = ListenerGroup::from_config(&config.listener, build_router(&config));

    if let Some(tcp) = &config.tcp {
        group.add_tcp(&tcp.address, config.accept.clone(), echo_stream);
    }

    if let Some(udp) = &config.udp {
        let socket = open_udp_socket(&udp.address, udp.buffer_bytes)
            .await
            .map_err(StartupError::Udp)?;
        group.add("udp", echo_datagrams(socket, udp.address.clone()));
    }

    tracing::info!(listeners = group.len(), "Starting listener group");
    group.run().await?;
    Ok(())
}

async fn echo_stream(mut stream: TcpStream) {
    let (mut reader, mut writer) = stream.split();
    match tokio::io::copy(&mut reader, &mut writer).await {
        Ok(bytes) => tracing::debug!(bytes, "Echo connection closed"),
        Err(e) => tracing::debug!(error = %e, "Echo connection failed"),
    }
}

async fn echo_datagrams(socket: UdpSocket, address: String) -> Result<(), ListenerError> {
    let mut buf = vec![0u8; DATAGRAM_BUFFER];
    loop {
        let (len, peer) = socket
            .recv_from(&mut buf)
            .await
            .map_err(|e| ListenerError::serve(&address, e))?;

        if let Err(e) = socket.send_to(&buf[..len], peer).await {
            tracing::debug!(peer_addr = %peer, error = %e, "Failed to echo datagram");
        }
    }
}
