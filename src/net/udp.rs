//! UDP socket setup with buffer sizing.

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

use crate::net::addr::resolve;
use crate::net::error::ListenerError;

/// Bind a UDP socket on `address` and size both kernel buffers to `buffer_bytes`.
///
/// Resolution and bind failures are returned; callers treat them as fatal.
/// Failing to set a buffer size is only logged, since the OS default still
/// works, so the socket is returned whenever the bind succeeded.
pub async fn open_udp_socket(address: &str, buffer_bytes: usize) -> Result<UdpSocket, ListenerError> {
    let addr = resolve(address).await?;

    let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))
        .map_err(|e| ListenerError::bind(address, e))?;
    socket
        .bind(&addr.into())
        .map_err(|e| ListenerError::bind(address, e))?;

    if let Err(e) = socket.set_recv_buffer_size(buffer_bytes) {
        tracing::warn!(target: "bootstrap", address, buffer_bytes, error = %e, "Failed to set UDP read buffer");
    }
    if let Err(e) = socket.set_send_buffer_size(buffer_bytes) {
        tracing::warn!(target: "bootstrap", address, buffer_bytes, error = %e, "Failed to set UDP write buffer");
    }

    tracing::info!(
        address = %addr,
        recv_buffer = ?socket.recv_buffer_size().ok(),
        send_buffer = ?socket.send_buffer_size().ok(),
        "UDP socket bound"
    );

    socket
        .set_nonblocking(true)
        .map_err(|e| ListenerError::bind(address, e))?;

    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket).map_err(|e| ListenerError::bind(address, e))
}
