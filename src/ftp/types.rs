//! Connection parameters and behaviour toggles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bytes moved per read/write when streaming a transfer.
pub(crate) const TRANSFER_CHUNK: usize = 1024;

/// Where and as whom to connect for one exchange.
///
/// Built from caller arguments, used for a single operation, then discarded.
#[derive(Clone, Serialize, Deserialize)]
pub struct FtpEndpoint {
    pub host: String,
    pub port: u16,
    pub account: String,
    pub password: String,
}

impl FtpEndpoint {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        account: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            account: account.into(),
            password: password.into(),
        }
    }
}

// Credentials must never reach log output.
impl fmt::Debug for FtpEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FtpEndpoint")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("account", &self.account)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Switches preserved from the legacy transfer utility this crate replaces.
///
/// The defaults reproduce its observable behaviour exactly; call sites that
/// prefer unsurprising semantics can pass [`TransferPolicy::strict`] to the
/// `*_with_policy` operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPolicy {
    /// Report an upload batch with no entries as a failed upload.
    pub empty_batch_fails: bool,
    /// Report a download that matched no remote entry as a success.
    pub missing_remote_ok: bool,
}

impl TransferPolicy {
    /// The inherited contract: empty batches fail, missing downloads succeed.
    pub const fn legacy() -> Self {
        Self {
            empty_batch_fails: true,
            missing_remote_ok: true,
        }
    }

    /// Empty batches succeed vacuously, missing downloads fail.
    pub const fn strict() -> Self {
        Self {
            empty_batch_fails: false,
            missing_remote_ok: false,
        }
    }
}

impl Default for TransferPolicy {
    fn default() -> Self {
        Self::legacy()
    }
}
