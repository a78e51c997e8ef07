//! # ftp-shuttle — one-shot FTP upload/download façade
//!
//! Thin wrapper over [`suppaftp`]: every operation opens its own session,
//! authenticates, moves bytes in binary mode, and releases the connection
//! before returning. No pooling, no retries, no protocol logic of its own.
//!
//! Architecture:
//! - `ftp::types` — connection parameters and behaviour toggles
//! - `ftp::error` — the error taxonomy behind the boolean façade
//! - `ftp::session` — per-call connect / login / configure / transfer / release
//! - `ftp::facade` — `upload_file`, `upload_files`, `download_file`, `get_bytes`
//!
//! ```no_run
//! use ftp_shuttle::{upload_file, FtpEndpoint};
//!
//! let endpoint = FtpEndpoint::new("ftp.example.com", 21, "deploy", "secret");
//! let mut payload: &[u8] = b"hello";
//! let sent = upload_file(&endpoint, "/inbox", "hello.txt", &mut payload);
//! ```

pub mod ftp;

pub use ftp::error::{TransferError, TransferResult};
pub use ftp::facade::{
    download_file, download_file_with_policy, get_bytes, upload_file, upload_files,
    upload_files_with_policy,
};
pub use ftp::session::FtpSession;
pub use ftp::types::{FtpEndpoint, TransferPolicy};
