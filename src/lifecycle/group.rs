//! Concurrent listener supervision.
//!
//! A [`ListenerGroup`] collects serve loops (HTTP, HTTPS, raw TCP accept
//! loops, or any future that only finishes on failure), starts them together
//! and returns as soon as the first one finishes. There is no success exit:
//! a serve loop that returns, for any reason, is a lost listener.
//!
//! ```text
//! Idle → Starting(n) → Running → Terminated
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::pin::Pin;

use axum::Router;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};

use crate::config::{AcceptConfig, ListenerConfig};
use crate::net::listener::{AcceptLoop, Acceptor};
use crate::net::tls::load_tls_config;
use crate::net::ListenerError;
use crate::observability::metrics;

type ServeFuture = Pin<Box<dyn Future<Output = Result<(), ListenerError>> + Send>>;

/// Lifecycle of a listener group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    /// Listeners registered, nothing started yet.
    Idle,
    /// Spawning `n` listeners.
    Starting(usize),
    /// All listeners spawned; waiting for the first to finish.
    Running,
    /// A listener finished and the group gave up.
    Terminated,
}

/// Why a listener group stopped.
#[derive(Debug, thiserror::Error)]
pub enum GroupError {
    #[error("{name} listener failed: {source}")]
    Listener {
        name: String,
        #[source]
        source: ListenerError,
    },

    #[error("{name} listener stopped unexpectedly")]
    Exited { name: String },

    #[error("{name} listener panicked: {source}")]
    Panicked {
        name: String,
        #[source]
        source: JoinError,
    },
}

impl GroupError {
    /// Name of the listener that ended the group.
    pub fn listener_name(&self) -> &str {
        match self {
            Self::Listener { name, .. } | Self::Exited { name } | Self::Panicked { name, .. } => name,
        }
    }
}

/// A set of listeners that live and die together.
pub struct ListenerGroup {
    units: Vec<(String, ServeFuture)>,
    state: watch::Sender<GroupState>,
}

impl ListenerGroup {
    pub fn new() -> Self {
        let (state, _) = watch::channel(GroupState::Idle);
        Self {
            units: Vec::new(),
            state,
        }
    }

    /// HTTPS (if a TLS address is set) and plain HTTP (if a plain address is
    /// set), both serving `router`.
    pub fn from_config(config: &ListenerConfig, router: Router) -> Self {
        let mut group = Self::new();
        if let Some(address) = config.tls() {
            group.add_https(address, &config.cert_path, &config.key_path, router.clone());
        }
        if let Some(address) = config.plain() {
            group.add_http(address, router);
        }
        group
    }

    /// Register an arbitrary serve loop under `name`.
    pub fn add<F>(&mut self, name: impl Into<String>, serve: F) -> &mut Self
    where
        F: Future<Output = Result<(), ListenerError>> + Send + 'static,
    {
        self.units.push((name.into(), Box::pin(serve)));
        self
    }

    /// Plain HTTP on `address`. Binding happens when the group runs.
    pub fn add_http(&mut self, address: &str, router: Router) -> &mut Self {
        let address = address.to_string();
        self.add("http", async move {
            let listener = TcpListener::bind(&address)
                .await
                .map_err(|e| ListenerError::bind(&address, e))?;
            serve_http(listener, address, router).await
        })
    }

    /// Plain HTTP on an already bound listener.
    pub fn add_http_listener(&mut self, listener: TcpListener, router: Router) -> &mut Self {
        let address = listener
            .local_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_default();
        self.add("http", serve_http(listener, address, router))
    }

    /// HTTPS on `address` using the PEM certificate/key pair. The certificate
    /// is loaded and the socket bound when the group runs.
    pub fn add_https(
        &mut self,
        address: &str,
        cert_path: impl Into<PathBuf>,
        key_path: impl Into<PathBuf>,
        router: Router,
    ) -> &mut Self {
        let address = address.to_string();
        let cert_path = cert_path.into();
        let key_path = key_path.into();
        self.add("https", async move {
            let tls = load_tls_config(&cert_path, &key_path).await?;
            let listener = TcpListener::bind(&address)
                .await
                .and_then(TcpListener::into_std)
                .map_err(|e| ListenerError::bind(&address, e))?;
            tracing::info!(address = %address, "HTTPS listener starting");

            axum_server::from_tcp_rustls(listener, tls)
                .serve(router.into_make_service_with_connect_info::<SocketAddr>())
                .await
                .map_err(|e| ListenerError::serve(&address, e))
        })
    }

    /// Raw TCP accept loop on `address`. Binding happens when the group runs.
    pub fn add_tcp<H, Fut>(&mut self, address: &str, config: AcceptConfig, handler: H) -> &mut Self
    where
        H: Fn(TcpStream) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let address = address.to_string();
        self.add("tcp", async move {
            AcceptLoop::bind(&address, &config).await?.run(handler).await
        })
    }

    /// An already built accept loop.
    pub fn add_accept_loop<A, H, Fut>(&mut self, accept_loop: AcceptLoop<A>, handler: H) -> &mut Self
    where
        A: Acceptor + 'static,
        H: Fn(A::Conn) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.add("tcp", accept_loop.run(handler))
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Watch the group's state.
    pub fn state(&self) -> watch::Receiver<GroupState> {
        self.state.subscribe()
    }

    /// Start every listener and wait for the first one to finish.
    ///
    /// An empty group returns `Ok(())` right away without spawning anything.
    /// Otherwise this only returns with the error of whichever listener
    /// finished first; the others are aborted on return.
    pub async fn run(self) -> Result<(), GroupError> {
        let Self { units, state } = self;
        let transition = |next: GroupState| {
            tracing::debug!(state = ?next, "Listener group state");
            state.send_replace(next);
        };

        if units.is_empty() {
            tracing::info!("No listeners configured; listener group has nothing to do");
            return Ok(());
        }

        transition(GroupState::Starting(units.len()));

        let mut tasks = JoinSet::new();
        let mut names = HashMap::new();
        for (name, serve) in units {
            let handle = tasks.spawn(serve);
            tracing::debug!(listener = %name, "Listener task spawned");
            names.insert(handle.id(), name);
        }

        transition(GroupState::Running);

        let error = match tasks.join_next_with_id().await {
            Some(Ok((id, Ok(())))) => GroupError::Exited {
                name: take_name(&mut names, id),
            },
            Some(Ok((id, Err(source)))) => GroupError::Listener {
                name: take_name(&mut names, id),
                source,
            },
            Some(Err(source)) => GroupError::Panicked {
                name: take_name(&mut names, source.id()),
                source,
            },
            None => return Ok(()),
        };

        transition(GroupState::Terminated);
        metrics::record_listener_failure(error.listener_name());
        tracing::error!(
            listener = %error.listener_name(),
            error = %error,
            abandoned = tasks.len(),
            "Listener group terminated"
        );

        Err(error)
    }
}

impl Default for ListenerGroup {
    fn default() -> Self {
        Self::new()
    }
}

fn take_name(names: &mut HashMap<tokio::task::Id, String>, id: tokio::task::Id) -> String {
    names.remove(&id).unwrap_or_else(|| "unknown".to_string())
}

async fn serve_http(listener: TcpListener, address: String, router: Router) -> Result<(), ListenerError> {
    tracing::info!(address = %address, "HTTP listener starting");
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| ListenerError::serve(address, e))
}

/// Serve `router` on every address in `config` until one listener fails.
pub async fn run_listener_group(config: &ListenerConfig, router: Router) -> Result<(), GroupError> {
    ListenerGroup::from_config(config, router).run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::time::Duration;

    #[tokio::test]
    async fn empty_group_completes_immediately() {
        let group = ListenerGroup::new();
        let state = group.state();
        assert!(group.is_empty());

        group.run().await.unwrap();
        assert_eq!(*state.borrow(), GroupState::Idle);
    }

    #[tokio::test]
    async fn config_without_addresses_is_noop() {
        let config = ListenerConfig {
            plain_address: None,
            tls_address: Some(String::new()),
            ..Default::default()
        };
        let group = ListenerGroup::from_config(&config, Router::new());
        assert_eq!(group.len(), 0);
        run_listener_group(&config, Router::new()).await.unwrap();
    }

    #[test]
    fn config_with_both_addresses_registers_two() {
        let config = ListenerConfig {
            plain_address: Some("127.0.0.1:0".into()),
            tls_address: Some("127.0.0.1:0".into()),
            cert_path: "cert.pem".into(),
            key_path: "key.pem".into(),
        };
        assert_eq!(ListenerGroup::from_config(&config, Router::new()).len(), 2);
    }

    #[tokio::test]
    async fn first_failure_ends_group() {
        let mut group = ListenerGroup::new();
        group
            .add("healthy", std::future::pending::<Result<(), ListenerError>>())
            .add("failing", async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Err(ListenerError::accept("127.0.0.1:1", io::Error::from(io::ErrorKind::InvalidInput)))
            });
        let state = group.state();

        let err = group.run().await.unwrap_err();

        assert_eq!(err.listener_name(), "failing");
        assert!(matches!(err, GroupError::Listener { source: ListenerError::Accept { .. }, .. }));
        assert_eq!(*state.borrow(), GroupState::Terminated);
    }

    #[tokio::test]
    async fn clean_exit_is_still_an_error() {
        let mut group = ListenerGroup::new();
        group.add("quitter", async { Ok(()) });

        let err = group.run().await.unwrap_err();
        assert!(matches!(err, GroupError::Exited { ref name } if name == "quitter"));
    }

    #[tokio::test]
    async fn panicking_listener_is_reported() {
        let mut group = ListenerGroup::new();
        group.add("boom", async { panic!("listener blew up") });

        let err = group.run().await.unwrap_err();
        assert!(matches!(err, GroupError::Panicked { ref name, .. } if name == "boom"));
    }

    #[tokio::test]
    async fn https_with_missing_cert_fails_group() {
        let mut group = ListenerGroup::new();
        group.add_https("127.0.0.1:0", "/no/cert.pem", "/no/key.pem", Router::new());

        let err = group.run().await.unwrap_err();
        assert_eq!(err.listener_name(), "https");
        assert!(matches!(err, GroupError::Listener { source: ListenerError::Tls(_), .. }));
    }

    #[tokio::test]
    async fn accept_loop_fatal_error_fails_group() {
        struct ClosedAcceptor;

        impl Acceptor for ClosedAcceptor {
            type Conn = ();

            async fn accept(&mut self) -> io::Result<((), SocketAddr)> {
                Err(io::Error::from(io::ErrorKind::InvalidInput))
            }
        }

        let accept_loop = AcceptLoop::new(ClosedAcceptor, "127.0.0.1:9", &AcceptConfig::default());
        let mut group = ListenerGroup::new();
        group
            .add("healthy", std::future::pending::<Result<(), ListenerError>>())
            .add_accept_loop(accept_loop, |_conn| async {});

        let err = group.run().await.unwrap_err();
        assert!(matches!(
            err,
            GroupError::Listener { ref name, source: ListenerError::Accept { .. } } if name == "tcp"
        ));
    }

    #[tokio::test]
    async fn bind_failure_fails_group() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = taken.local_addr().unwrap().to_string();

        let mut group = ListenerGroup::new();
        group.add_http(&address, Router::new());

        let err = group.run().await.unwrap_err();
        assert!(matches!(err, GroupError::Listener { source: ListenerError::Bind { .. }, .. }));
    }
}
