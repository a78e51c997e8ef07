//! Transfer error taxonomy.
//!
//! The façade collapses every variant to `bool`/`Option` at the public
//! boundary; the session layer surfaces them as-is for callers and tests
//! that want diagnostics.

use suppaftp::Status;
use thiserror::Error;

pub type TransferResult<T> = Result<T, TransferError>;

#[derive(Debug, Error)]
pub enum TransferError {
    /// The server answered login with something other than a positive
    /// completion reply. An expected outcome, not a fault — the session
    /// is closed before this is returned.
    #[error("login rejected by server ({status:?})")]
    AuthRejected { status: Status },

    /// Transport or protocol fault reported by the FTP client library.
    #[error("ftp client fault: {0}")]
    Client(#[from] suppaftp::FtpError),

    /// I/O fault on a local file or while copying a transfer stream.
    #[error("i/o fault: {0}")]
    Io(#[from] std::io::Error),
}

impl TransferError {
    /// Whether this is the expected bad-credentials outcome rather than a fault.
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, Self::AuthRejected { .. })
    }
}
