//! One-shot FTP transfer façade.
//!
//! - `types` — connection parameters and behaviour toggles
//! - `error` — transfer error taxonomy
//! - `session` — per-call session over the FTP client library
//! - `facade` — the boolean/optional public operations

pub mod error;
pub mod facade;
pub mod session;
pub mod types;

pub use error::{TransferError, TransferResult};
pub use facade::{
    download_file, download_file_with_policy, get_bytes, upload_file, upload_files,
    upload_files_with_policy,
};
pub use session::FtpSession;
pub use types::{FtpEndpoint, TransferPolicy};
