//! Accept error classification.
//!
//! Decides from the error kind and the raw OS code whether a failed `accept`
//! can be retried. Message text is never inspected.

use std::io::{self, ErrorKind};

/// Returns true when a failed accept is worth retrying after a pause.
///
/// Covers per-connection failures (the peer went away before the accept
/// completed) and resource exhaustion such as running out of file
/// descriptors. Anything else, including a closed listener, is fatal.
pub fn is_transient_accept_error(err: &io::Error) -> bool {
    if matches!(
        err.kind(),
        ErrorKind::ConnectionAborted
            | ErrorKind::ConnectionReset
            | ErrorKind::Interrupted
            | ErrorKind::WouldBlock
            | ErrorKind::TimedOut
            | ErrorKind::OutOfMemory
    ) {
        return true;
    }

    err.raw_os_error().is_some_and(is_transient_os_code)
}

#[cfg(unix)]
fn is_transient_os_code(code: i32) -> bool {
    matches!(
        code,
        libc::EMFILE
            | libc::ENFILE
            | libc::ENOBUFS
            | libc::ENOMEM
            | libc::EAGAIN
            | libc::EINTR
            | libc::ECONNABORTED
            | libc::ECONNRESET
            | libc::ETIMEDOUT
            | libc::EPROTO
            | libc::EPERM
    )
}

#[cfg(not(unix))]
fn is_transient_os_code(_code: i32) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peer_side_failures_are_transient() {
        for kind in [
            ErrorKind::ConnectionAborted,
            ErrorKind::ConnectionReset,
            ErrorKind::Interrupted,
            ErrorKind::WouldBlock,
            ErrorKind::TimedOut,
        ] {
            assert!(is_transient_accept_error(&io::Error::from(kind)), "{kind:?}");
        }
    }

    #[cfg(unix)]
    #[test]
    fn descriptor_exhaustion_is_transient() {
        for code in [libc::EMFILE, libc::ENFILE, libc::ENOBUFS, libc::ENOMEM] {
            assert!(is_transient_accept_error(&io::Error::from_raw_os_error(code)), "{code}");
        }
    }

    #[cfg(unix)]
    #[test]
    fn closed_listener_is_fatal() {
        for code in [libc::EBADF, libc::EINVAL, libc::ENOTSOCK] {
            assert!(!is_transient_accept_error(&io::Error::from_raw_os_error(code)), "{code}");
        }
    }

    #[test]
    fn message_text_is_ignored() {
        let err = io::Error::other("temporary failure, connection reset");
        assert!(!is_transient_accept_error(&err));
    }

    #[test]
    fn other_kinds_are_fatal() {
        for kind in [ErrorKind::InvalidInput, ErrorKind::NotConnected, ErrorKind::AddrInUse] {
            assert!(!is_transient_accept_error(&io::Error::from(kind)), "{kind:?}");
        }
    }
}
