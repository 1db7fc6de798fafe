//! Errors found throughout this crate

use thiserror::Error;
use x11rb::errors::{ConnectError, ConnectionError, ReplyError, ReplyOrIdError};

/// Errors that occur from interacting with the X-Server
#[derive(Debug, Error)]
pub enum Error {
    /// Failure to connect to the server
    #[error("failed to connect to the X11 server: {0}")]
    Connect(#[from] ConnectError),

    /// The connection was lost or a request could not be sent
    #[error("connection to the X11 server failed: {0}")]
    Connection(#[from] ConnectionError),

    /// The server answered a request with an error
    #[error("X11 protocol error: {0}")]
    Protocol(String),

    /// An [`ErrorTrap`](crate::x::trap::ErrorTrap) was entered while another
    /// one was still active
    #[error("an error trap is already active; traps cannot be nested")]
    TrapAlreadyActive,

    /// A coordinate or size does not fit the 16-bit fields of a request
    #[error("{what} {value} does not fit in an X11 request")]
    OutOfRange {
        /// Which value was too large
        what:  &'static str,
        /// The value itself
        value: i64,
    },

    /// The interned atom ids do not line up with the atom names
    #[error("atom table holds {found} ids but {expected} names are known")]
    AtomTable {
        /// Number of names in the table
        expected: usize,
        /// Number of ids that were given
        found:    usize,
    },
}

impl From<ReplyError> for Error {
    fn from(e: ReplyError) -> Self {
        match e {
            ReplyError::ConnectionError(e) => Self::Connection(e),
            ReplyError::X11Error(e) => Self::Protocol(format!("{:?}", e)),
        }
    }
}

impl From<ReplyOrIdError> for Error {
    fn from(e: ReplyOrIdError) -> Self {
        match e {
            ReplyOrIdError::ConnectionError(e) => Self::Connection(e),
            ReplyOrIdError::X11Error(e) => Self::Protocol(format!("{:?}", e)),
            ReplyOrIdError::IdsExhausted => Self::Protocol(String::from("X11 ids exhausted")),
        }
    }
}

impl Error {
    /// Whether the error came from the server rejecting a request (as opposed
    /// to the connection itself failing)
    pub(crate) const fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }
}

/// Shorthand for results carrying this crate's [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;
