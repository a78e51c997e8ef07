//! Per-call FTP session: connect, authenticate, configure, transfer, release.
//!
//! A session wraps one [`suppaftp::FtpStream`] and lives for exactly one
//! public operation. Dropping the session closes the control socket, so the
//! connection is released on every exit path, including panics.

use crate::ftp::error::{TransferError, TransferResult};
use crate::ftp::types::{FtpEndpoint, TRANSFER_CHUNK};
use log::{debug, warn};
use std::io::{self, Read, Write};
use suppaftp::types::FileType;
use suppaftp::{list, FtpError as ClientError, FtpStream};
use uuid::Uuid;

/// A connected, authenticated FTP session.
#[derive(Debug)]
pub struct FtpSession {
    id: String,
    ftp: FtpStream,
}

impl FtpSession {
    /// Open a control connection to the endpoint and log in.
    ///
    /// A login reply outside the positive classes comes back as
    /// [`TransferError::AuthRejected`] with the connection already closed.
    /// Transport faults during connect or login propagate as-is.
    pub fn open(endpoint: &FtpEndpoint) -> TransferResult<Self> {
        let id = Uuid::new_v4().to_string();
        debug!("[{id}] connecting to {}:{}", endpoint.host, endpoint.port);
        let mut ftp = FtpStream::connect((endpoint.host.as_str(), endpoint.port))?;
        if let Err(err) = ftp.login(endpoint.account.as_str(), endpoint.password.as_str()) {
            return match err {
                ClientError::UnexpectedResponse(resp) => {
                    debug!(
                        "[{id}] login as {} rejected: {:?}",
                        endpoint.account, resp.status
                    );
                    // `ftp` drops here, which closes the rejected connection.
                    Err(TransferError::AuthRejected {
                        status: resp.status,
                    })
                }
                other => Err(other.into()),
            };
        }
        debug!("[{id}] logged in as {}", endpoint.account);
        Ok(Self { id, ftp })
    }

    /// Correlation id used in this session's log lines.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Ensure `dir` exists, enter it, and switch to binary transfer mode.
    ///
    /// Each step tolerates a server refusal (directory already present, TYPE
    /// not accepted) the way the legacy tool ignored those boolean returns;
    /// only transport faults abort. The control channel is UTF-8 by
    /// construction of the underlying client. Idempotent for an existing
    /// directory.
    pub fn prepare_dir(&mut self, dir: &str) -> TransferResult<()> {
        allow_refusal(&self.id, "MKD", self.ftp.mkdir(dir))?;
        allow_refusal(&self.id, "CWD", self.ftp.cwd(dir))?;
        allow_refusal(
            &self.id,
            "TYPE I",
            self.ftp.transfer_type(FileType::Binary),
        )?;
        Ok(())
    }

    /// Enter `dir` without the creation/transfer-mode setup; the download
    /// paths never ran those. A refusal is ignored, transport faults abort.
    pub fn enter(&mut self, dir: &str) -> TransferResult<()> {
        allow_refusal(&self.id, "CWD", self.ftp.cwd(dir))
    }

    /// Store `input` under `name` in the current directory.
    ///
    /// `Ok(true)` when the server accepted and completed the store,
    /// `Ok(false)` when it refused it, `Err` on a transport fault.
    pub fn store<R: Read + ?Sized>(&mut self, name: &str, input: &mut R) -> TransferResult<bool> {
        let mut sink = match self.ftp.put_with_stream(name) {
            Ok(sink) => sink,
            Err(ClientError::UnexpectedResponse(resp)) => {
                warn!("[{}] STOR {name} refused: {:?}", self.id, resp.status);
                return Ok(false);
            }
            Err(other) => return Err(other.into()),
        };
        let written = copy_chunked(input, &mut sink)?;
        match self.ftp.finalize_put_stream(sink) {
            Ok(()) => {
                debug!("[{}] stored {name} ({written} bytes)", self.id);
                Ok(true)
            }
            Err(ClientError::UnexpectedResponse(resp)) => {
                warn!("[{}] STOR {name} not completed: {:?}", self.id, resp.status);
                Ok(false)
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Retrieve `name` from the current directory into `output`.
    ///
    /// Same `Ok(bool)`/`Err` split as [`FtpSession::store`].
    pub fn fetch_to<W: Write + ?Sized>(
        &mut self,
        name: &str,
        output: &mut W,
    ) -> TransferResult<bool> {
        let mut source = match self.ftp.retr_as_stream(name) {
            Ok(source) => source,
            Err(ClientError::UnexpectedResponse(resp)) => {
                warn!("[{}] RETR {name} refused: {:?}", self.id, resp.status);
                return Ok(false);
            }
            Err(other) => return Err(other.into()),
        };
        let read = copy_chunked(&mut source, output)?;
        match self.ftp.finalize_retr_stream(source) {
            Ok(()) => {
                debug!("[{}] retrieved {name} ({read} bytes)", self.id);
                Ok(true)
            }
            Err(ClientError::UnexpectedResponse(resp)) => {
                warn!("[{}] RETR {name} not completed: {:?}", self.id, resp.status);
                Ok(false)
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Retrieve `name` into memory.
    ///
    /// A server refusal comes back as an empty buffer: at this call site a
    /// missing file and a zero-length file are indistinguishable, which the
    /// callers rely on.
    pub fn fetch(&mut self, name: &str) -> TransferResult<Vec<u8>> {
        match self.ftp.retr_as_buffer(name) {
            Ok(buffer) => {
                let bytes = buffer.into_inner();
                debug!("[{}] retrieved {name} ({} bytes)", self.id, bytes.len());
                Ok(bytes)
            }
            Err(ClientError::UnexpectedResponse(resp)) => {
                debug!("[{}] RETR {name} refused: {:?}", self.id, resp.status);
                Ok(Vec::new())
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Names of all entries in the current directory, via LIST.
    ///
    /// Listing lines the parser cannot make sense of are skipped. A refused
    /// LIST yields an empty set.
    pub fn entries(&mut self) -> TransferResult<Vec<String>> {
        let lines = match self.ftp.list(None) {
            Ok(lines) => lines,
            Err(ClientError::UnexpectedResponse(resp)) => {
                warn!("[{}] LIST refused: {:?}", self.id, resp.status);
                return Ok(Vec::new());
            }
            Err(other) => return Err(other.into()),
        };
        let mut names = Vec::with_capacity(lines.len());
        for line in &lines {
            match list::File::try_from(line.as_str()) {
                Ok(entry) => names.push(entry.name().to_string()),
                Err(err) => {
                    debug!("[{}] skipping unparsable listing line {line:?}: {err}", self.id)
                }
            }
        }
        Ok(names)
    }

    /// Send QUIT. The caller decides how much a failed logout matters: the
    /// download path treats it as a fault, the other paths only log it.
    pub fn logout(&mut self) -> TransferResult<()> {
        self.ftp.quit()?;
        debug!("[{}] logged out", self.id);
        Ok(())
    }
}

/// Treat a server refusal as a no-op, keep transport faults fatal.
///
/// The legacy tool issued these commands without checking their boolean
/// results; this is the same contract with the fault channel kept intact.
fn allow_refusal(id: &str, what: &str, outcome: Result<(), ClientError>) -> TransferResult<()> {
    match outcome {
        Ok(()) => Ok(()),
        Err(ClientError::UnexpectedResponse(resp)) => {
            debug!("[{id}] {what} refused: {:?}", resp.status);
            Ok(())
        }
        Err(other) => Err(other.into()),
    }
}

/// Copy in fixed 1024-byte chunks, the transfer buffer size the legacy tool
/// configured on its client.
fn copy_chunked<R: Read + ?Sized, W: Write + ?Sized>(
    input: &mut R,
    output: &mut W,
) -> io::Result<u64> {
    let mut buf = [0u8; TRANSFER_CHUNK];
    let mut total = 0u64;
    loop {
        let n = input.read(&mut buf)?;
        if n == 0 {
            break;
        }
        output.write_all(&buf[..n])?;
        total += n as u64;
    }
    Ok(total)
}
