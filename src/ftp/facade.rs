//! The boolean/optional public operations.
//!
//! Every operation opens its own session, performs its transfers, and has
//! released the connection by the time it returns — success, refusal, or
//! fault. Faults never escape as errors: they are logged here and collapsed
//! to `false`/`None`, so callers cannot tell a bad password from an
//! unreachable network. That contract is inherited and deliberate.

use crate::ftp::error::{TransferError, TransferResult};
use crate::ftp::session::FtpSession;
use crate::ftp::types::{FtpEndpoint, TransferPolicy};
use log::{debug, error, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Upload one stream as `remote_name` inside `remote_dir`.
///
/// The directory is created if absent. Returns `false` on rejected
/// credentials, a refused store, or any fault.
pub fn upload_file<R: Read + ?Sized>(
    endpoint: &FtpEndpoint,
    remote_dir: &str,
    remote_name: &str,
    input: &mut R,
) -> bool {
    let mut session = match open_for(endpoint, "upload") {
        Some(session) => session,
        None => return false,
    };
    let outcome: TransferResult<bool> = (|| {
        session.prepare_dir(remote_dir)?;
        session.store(remote_name, input)
    })();
    finish_flag(session, endpoint, "upload", remote_name, outcome)
}

/// Upload a batch of `(remote_name, stream)` entries into `remote_dir`,
/// under the default (legacy) policy. See [`upload_files_with_policy`].
pub fn upload_files<I, R>(endpoint: &FtpEndpoint, remote_dir: &str, files: I) -> bool
where
    I: IntoIterator<Item = (String, R)>,
    R: Read,
{
    upload_files_with_policy(endpoint, remote_dir, files, TransferPolicy::default())
}

/// Upload a batch of `(remote_name, stream)` entries into `remote_dir`.
///
/// Entries are attempted in iteration order and the batch stops at the first
/// refused store — later entries are not attempted. The result is the flag of
/// the last attempted entry. With `policy.empty_batch_fails` (the default) a
/// batch with no entries is reported as a failed upload.
pub fn upload_files_with_policy<I, R>(
    endpoint: &FtpEndpoint,
    remote_dir: &str,
    files: I,
    policy: TransferPolicy,
) -> bool
where
    I: IntoIterator<Item = (String, R)>,
    R: Read,
{
    let mut session = match open_for(endpoint, "batch upload") {
        Some(session) => session,
        None => return false,
    };
    let outcome: TransferResult<bool> = (|| {
        session.prepare_dir(remote_dir)?;
        let mut flag = false;
        let mut attempted = false;
        for (name, mut input) in files {
            attempted = true;
            flag = session.store(&name, &mut input)?;
            if !flag {
                warn!("batch upload stopped at {name}: server refused the store");
                break;
            }
        }
        if !attempted {
            flag = !policy.empty_batch_fails;
            debug!("batch upload had no entries, reporting {flag}");
        }
        Ok(flag)
    })();
    finish_flag(session, endpoint, "batch upload", remote_dir, outcome)
}

/// Download `file_name` from `remote_dir` into `local_dir`, under the
/// default (legacy) policy. See [`download_file_with_policy`].
pub fn download_file(
    endpoint: &FtpEndpoint,
    remote_dir: &str,
    file_name: &str,
    local_dir: &Path,
) -> bool {
    download_file_with_policy(endpoint, remote_dir, file_name, local_dir, TransferPolicy::default())
}

/// Download `file_name` from `remote_dir` into `local_dir/<file_name>`.
///
/// The remote directory is listed and every entry whose name equals
/// `file_name` is retrieved (names are unique under normal FTP semantics, so
/// at most one). The local file is created before the retrieve, and a
/// per-file server refusal leaves it empty without failing the call. With
/// `policy.missing_remote_ok` (the default) the call succeeds even when
/// nothing matched and no file was written.
pub fn download_file_with_policy(
    endpoint: &FtpEndpoint,
    remote_dir: &str,
    file_name: &str,
    local_dir: &Path,
    policy: TransferPolicy,
) -> bool {
    let mut session = match open_for(endpoint, "download") {
        Some(session) => session,
        None => return false,
    };
    let outcome: TransferResult<u32> = (|| {
        session.enter(remote_dir)?;
        let names = session.entries()?;
        let mut matched = 0u32;
        for name in names.iter().filter(|name| name.as_str() == file_name) {
            let target = local_dir.join(name);
            let mut file = File::create(&target)?;
            if !session.fetch_to(name, &mut file)? {
                warn!("server refused retrieve of {name}; {} left empty", target.display());
            }
            matched += 1;
        }
        // The legacy tool flagged a download as successful only after a clean
        // logout, unlike the upload paths.
        session.logout()?;
        Ok(matched)
    })();
    match outcome {
        Ok(matched) => {
            if matched == 0 {
                debug!("no remote entry named {file_name} under {remote_dir}");
                if !policy.missing_remote_ok {
                    return false;
                }
            }
            true
        }
        Err(err) => {
            error!(
                "download of {file_name} via {}:{} failed: {err}",
                endpoint.host, endpoint.port
            );
            false
        }
    }
}

/// Retrieve `file_name` from `remote_dir` into memory.
///
/// `None` for rejected credentials, faults, and empty retrieves — a missing
/// remote file and a zero-length one are indistinguishable here.
pub fn get_bytes(endpoint: &FtpEndpoint, remote_dir: &str, file_name: &str) -> Option<Vec<u8>> {
    let mut session = match open_for(endpoint, "fetch") {
        Some(session) => session,
        None => return None,
    };
    let outcome: TransferResult<Vec<u8>> = (|| {
        session.enter(remote_dir)?;
        session.fetch(file_name)
    })();
    match outcome {
        // Inherited behaviour: the non-empty path returns without QUIT.
        // Dropping the session still closes the connection.
        Ok(bytes) if !bytes.is_empty() => Some(bytes),
        Ok(_) => {
            if let Err(err) = session.logout() {
                warn!("logout after empty fetch failed: {err}");
            }
            None
        }
        Err(err) => {
            error!(
                "fetch of {file_name} via {}:{} failed: {err}",
                endpoint.host, endpoint.port
            );
            None
        }
    }
}

/// Open a session, collapsing the open-time outcomes the way every public
/// operation does: rejected credentials are a quiet `None`, faults a loud one.
fn open_for(endpoint: &FtpEndpoint, what: &str) -> Option<FtpSession> {
    match FtpSession::open(endpoint) {
        Ok(session) => Some(session),
        Err(TransferError::AuthRejected { status }) => {
            warn!(
                "{what} via {}:{}: login rejected ({status:?})",
                endpoint.host, endpoint.port
            );
            None
        }
        Err(err) => {
            error!("{what} via {}:{}: {err}", endpoint.host, endpoint.port);
            None
        }
    }
}

/// Log out and report on the non-fault paths; log and fail on faults, which
/// skip the logout the way the legacy tool's exception path did. The session
/// drops here either way, releasing the connection.
fn finish_flag(
    mut session: FtpSession,
    endpoint: &FtpEndpoint,
    what: &str,
    target: &str,
    outcome: TransferResult<bool>,
) -> bool {
    match outcome {
        Ok(flag) => {
            // A failed QUIT after the transfer does not change its outcome.
            if let Err(err) = session.logout() {
                warn!("logout after {what} failed: {err}");
            }
            flag
        }
        Err(err) => {
            error!(
                "{what} of {target} via {}:{} failed: {err}",
                endpoint.host, endpoint.port
            );
            false
        }
    }
}
