//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, transient-error backoff)
//!     → connection.rs (connection id for the handler's span)
//!     → Hand off to caller's handler on a detached task
//!
//! Datagram sockets:
//!     → udp.rs (resolve, bind, buffer sizing)
//!
//! HTTPS:
//!     → tls.rs (certificate/key pair → rustls config)
//! ```
//!
//! # Design Decisions
//! - One accept loop per listening socket; the loop owns it
//! - Handlers never block acceptance
//! - TLS is pass-through: load a cert/key pair, nothing more

pub mod addr;
pub mod connection;
pub mod error;
pub mod listener;
pub mod tls;
pub mod udp;

pub use connection::ConnectionId;
pub use error::ListenerError;
pub use listener::{run_accept_loop, AcceptLoop, AcceptObserver, Acceptor, TcpAcceptor, TracingObserver};
pub use udp::open_udp_socket;
