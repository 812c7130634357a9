//! Address resolution.

use std::io;
use std::net::SocketAddr;

use tokio::net::lookup_host;

use crate::net::error::ListenerError;

/// Resolve a `host:port` string to its first socket address.
pub async fn resolve(address: &str) -> Result<SocketAddr, ListenerError> {
    let mut addrs = lookup_host(address)
        .await
        .map_err(|e| ListenerError::resolve(address, e))?;

    addrs.next().ok_or_else(|| {
        ListenerError::resolve(
            address,
            io::Error::new(io::ErrorKind::NotFound, "no addresses found"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_literal_address() {
        let addr = resolve("127.0.0.1:4000").await.unwrap();
        assert_eq!(addr, "127.0.0.1:4000".parse::<SocketAddr>().unwrap());
    }

    #[tokio::test]
    async fn missing_port_is_resolve_error() {
        let err = resolve("127.0.0.1").await.unwrap_err();
        assert!(matches!(err, ListenerError::Resolve { .. }));
    }
}
