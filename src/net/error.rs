//! Error type for listener operations.

use std::io;

/// Terminal failure of a listener.
///
/// Transient accept errors never show up here; the accept loop absorbs them.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// Address lookup produced an error or no usable address.
    #[error("failed to resolve {address}: {source}")]
    Resolve {
        address: String,
        #[source]
        source: io::Error,
    },

    /// Failed to bind or listen on the address.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// Accept failed with a non-retryable error.
    #[error("accept on {address} failed: {source}")]
    Accept {
        address: String,
        #[source]
        source: io::Error,
    },

    /// A protocol serve loop returned an error.
    #[error("serving on {address} failed: {source}")]
    Serve {
        address: String,
        #[source]
        source: io::Error,
    },

    /// Certificate or key could not be loaded.
    #[error("failed to load TLS material: {0}")]
    Tls(#[source] io::Error),
}

impl ListenerError {
    pub fn resolve(address: impl Into<String>, source: io::Error) -> Self {
        Self::Resolve {
            address: address.into(),
            source,
        }
    }

    pub fn bind(address: impl Into<String>, source: io::Error) -> Self {
        Self::Bind {
            address: address.into(),
            source,
        }
    }

    pub fn accept(address: impl Into<String>, source: io::Error) -> Self {
        Self::Accept {
            address: address.into(),
            source,
        }
    }

    pub fn serve(address: impl Into<String>, source: io::Error) -> Self {
        Self::Serve {
            address: address.into(),
            source,
        }
    }

    /// The underlying I/O error.
    pub fn io_error(&self) -> &io::Error {
        match self {
            Self::Resolve { source, .. }
            | Self::Bind { source, .. }
            | Self::Accept { source, .. }
            | Self::Serve { source, .. }
            | Self::Tls(source) => source,
        }
    }
}
