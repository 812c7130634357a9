//! Listener bootstrap library.
//!
//! Opens and supervises network listeners (raw TCP, UDP, HTTP, HTTPS) and
//! hands accepted connections to caller-supplied handlers.
//!
//! ```text
//!   ListenerGroup ──┬── HTTP  (axum::serve)
//!                   ├── HTTPS (axum-server + rustls)
//!                   └── TCP   (AcceptLoop → handler per connection)
//!
//!   open_udp_socket → bound, buffer-tuned UdpSocket
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod resilience;
pub mod util;

pub use config::ServerConfig;
pub use lifecycle::{run_listener_group, GroupError, ListenerGroup};
pub use net::{open_udp_socket, run_accept_loop, AcceptLoop, ListenerError};
