//! TCP accept loop with transient-error backoff.
//!
//! # Responsibilities
//! - Bind to the configured address
//! - Accept incoming TCP connections one at a time
//! - Retry transient accept errors with capped exponential backoff
//! - Hand each connection to its own detached task
//!
//! The loop keeps no handle to dispatched work and never waits on it.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tracing::Instrument;

use crate::config::AcceptConfig;
use crate::net::connection::ConnectionId;
use crate::net::error::ListenerError;
use crate::observability::metrics;
use crate::resilience::{is_transient_accept_error, AcceptBackoff};

/// Source of inbound connections for an [`AcceptLoop`].
pub trait Acceptor: Send {
    /// Connection handed to the handler.
    type Conn: Send + 'static;

    /// Wait for the next connection.
    fn accept(&mut self) -> impl Future<Output = io::Result<(Self::Conn, SocketAddr)>> + Send;
}

/// Receives accept loop events.
///
/// Injected into the loop so callers decide where retry notices go.
pub trait AcceptObserver: Send + Sync {
    /// A transient accept error occurred; the loop sleeps `delay` before retrying.
    fn accept_retry(&self, address: &str, error: &io::Error, delay: Duration);

    /// A connection was accepted and is about to be dispatched.
    fn connection_accepted(&self, _address: &str, _peer: SocketAddr, _id: ConnectionId) {}
}

/// Default observer: structured log events plus counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl AcceptObserver for TracingObserver {
    fn accept_retry(&self, address: &str, error: &io::Error, delay: Duration) {
        tracing::warn!(
            target: "bootstrap",
            address = %address,
            error = %error,
            delay = ?delay,
            "Accept error; retrying"
        );
        metrics::record_accept_retry(address);
    }

    fn connection_accepted(&self, address: &str, peer: SocketAddr, id: ConnectionId) {
        tracing::debug!(
            address = %address,
            peer_addr = %peer,
            connection_id = %id,
            "Connection accepted"
        );
        metrics::record_connection_accepted(address);
    }
}

/// Plain TCP acceptor.
///
/// Applies `TCP_NODELAY` to every accepted stream before returning it.
#[derive(Debug)]
pub struct TcpAcceptor {
    inner: TcpListener,
    nodelay: bool,
}

impl TcpAcceptor {
    /// Bind a new listening socket.
    pub async fn bind(address: &str, nodelay: bool) -> Result<Self, ListenerError> {
        let inner = TcpListener::bind(address)
            .await
            .map_err(|e| ListenerError::bind(address, e))?;

        if let Ok(local_addr) = inner.local_addr() {
            tracing::info!(address = %local_addr, nodelay, "Listener bound");
        }

        Ok(Self::from_listener(inner, nodelay))
    }

    /// Wrap an already bound listener.
    pub fn from_listener(inner: TcpListener, nodelay: bool) -> Self {
        Self { inner, nodelay }
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr()
    }
}

impl Acceptor for TcpAcceptor {
    type Conn = TcpStream;

    async fn accept(&mut self) -> io::Result<(TcpStream, SocketAddr)> {
        let (stream, peer) = self.inner.accept().await?;

        if let Err(e) = stream.set_nodelay(self.nodelay) {
            tracing::debug!(peer_addr = %peer, error = %e, "Failed to set TCP_NODELAY");
        }

        Ok((stream, peer))
    }
}

/// Accept loop bound to exactly one acceptor.
pub struct AcceptLoop<A> {
    acceptor: A,
    address: String,
    backoff: AcceptBackoff,
    observer: Arc<dyn AcceptObserver>,
}

impl AcceptLoop<TcpAcceptor> {
    /// Bind `address` and build a loop around it. Bind failures are not retried.
    pub async fn bind(address: &str, config: &AcceptConfig) -> Result<Self, ListenerError> {
        let acceptor = TcpAcceptor::bind(address, config.nodelay).await?;
        Ok(Self::new(acceptor, address, config))
    }

    /// Get the local address of the underlying socket.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.acceptor.local_addr()
    }
}

impl<A: Acceptor> AcceptLoop<A> {
    pub fn new(acceptor: A, address: impl Into<String>, config: &AcceptConfig) -> Self {
        Self {
            acceptor,
            address: address.into(),
            backoff: AcceptBackoff::new(config.min_delay(), config.max_delay()),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the event observer.
    pub fn with_observer(mut self, observer: Arc<dyn AcceptObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Accept connections until a non-transient error occurs.
    ///
    /// Each connection is moved into `handler` and the resulting future is
    /// spawned on its own task inside a `connection` span. Never returns `Ok`.
    pub async fn run<H, Fut>(mut self, handler: H) -> Result<(), ListenerError>
    where
        H: Fn(A::Conn) -> Fut + Send,
        Fut: Future<Output = ()> + Send + 'static,
    {
        loop {
            match self.acceptor.accept().await {
                Ok((conn, peer)) => {
                    self.backoff.reset();

                    let id = ConnectionId::next();
                    self.observer.connection_accepted(&self.address, peer, id);

                    let span = tracing::info_span!("connection", id = %id, peer = %peer);
                    tokio::spawn(handler(conn).instrument(span));
                }
                Err(e) if is_transient_accept_error(&e) => {
                    let delay = self.backoff.next_delay();
                    self.observer.accept_retry(&self.address, &e, delay);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!(address = %self.address, error = %e, "Accept loop stopped");
                    return Err(ListenerError::accept(self.address, e));
                }
            }
        }
    }
}

/// Bind `address` with default tuning and run the accept loop on it.
pub async fn run_accept_loop<H, Fut>(address: &str, handler: H) -> Result<(), ListenerError>
where
    H: Fn(TcpStream) -> Fut + Send,
    Fut: Future<Output = ()> + Send + 'static,
{
    AcceptLoop::bind(address, &AcceptConfig::default())
        .await?
        .run(handler)
        .await
}
