//! Minimal single-client FTP stub used by the contract tests.
//!
//! Speaks just enough of the protocol for the blocking suppaftp client:
//! USER/PASS, TYPE, MKD, CWD, PASV, STOR, RETR, LIST, QUIT. One control
//! connection is served at a time; the contract operations are strictly
//! sequential, so that is all the tests need.

use ftp_shuttle::FtpEndpoint;
use std::collections::{HashMap, HashSet};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

pub const ACCOUNT: &str = "courier";
pub const PASSWORD: &str = "open-sesame";

#[derive(Default)]
pub struct StubState {
    /// Flat remote namespace: name -> contents. STOR inserts, RETR/LIST read.
    pub files: HashMap<String, Vec<u8>>,
    /// Directories CWD will accept. MKD adds to this set.
    pub dirs: HashSet<String>,
    /// Names whose STOR is refused with 550.
    pub reject_stores: HashSet<String>,
    /// Every STOR the client attempted, accepted or not, in order.
    pub stor_attempts: Vec<String>,
    /// Every MKD the client issued, in order.
    pub mkd_log: Vec<String>,
    /// Number of QUITs received.
    pub quits: usize,
}

pub struct StubFtp {
    pub port: u16,
    pub state: Arc<Mutex<StubState>>,
}

impl StubFtp {
    pub fn spawn(state: StubState) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
        let port = listener.local_addr().expect("stub addr").port();
        let state = Arc::new(Mutex::new(state));
        let shared = Arc::clone(&state);
        thread::spawn(move || {
            for conn in listener.incoming() {
                match conn {
                    Ok(sock) => {
                        let _ = serve(sock, &shared);
                    }
                    Err(_) => break,
                }
            }
        });
        StubFtp { port, state }
    }

    pub fn endpoint(&self) -> FtpEndpoint {
        FtpEndpoint::new("127.0.0.1", self.port, ACCOUNT, PASSWORD)
    }

    pub fn endpoint_with_password(&self, password: &str) -> FtpEndpoint {
        FtpEndpoint::new("127.0.0.1", self.port, ACCOUNT, password)
    }
}

fn serve(sock: TcpStream, state: &Arc<Mutex<StubState>>) -> std::io::Result<()> {
    let mut reader = BufReader::new(sock.try_clone()?);
    let mut ctrl = sock;
    let mut data_listener: Option<TcpListener> = None;

    send(&mut ctrl, "220 stub ftp ready")?;
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            // Client dropped the connection without QUIT.
            return Ok(());
        }
        let trimmed = line.trim_end();
        let (verb, arg) = match trimmed.split_once(' ') {
            Some((verb, arg)) => (verb.to_ascii_uppercase(), arg.to_string()),
            None => (trimmed.to_ascii_uppercase(), String::new()),
        };
        match verb.as_str() {
            "USER" => send(&mut ctrl, "331 password required")?,
            "PASS" => {
                if arg == PASSWORD {
                    send(&mut ctrl, "230 logged in")?;
                } else {
                    send(&mut ctrl, "530 login incorrect")?;
                }
            }
            "TYPE" => send(&mut ctrl, "200 type set")?,
            "MKD" => {
                let created = {
                    let mut st = state.lock().unwrap();
                    st.mkd_log.push(arg.clone());
                    st.dirs.insert(arg.clone())
                };
                if created {
                    send(&mut ctrl, "257 directory created")?;
                } else {
                    send(&mut ctrl, "550 already exists")?;
                }
            }
            "CWD" => {
                let known = state.lock().unwrap().dirs.contains(&arg);
                if known {
                    send(&mut ctrl, "250 okay")?;
                } else {
                    send(&mut ctrl, "550 no such directory")?;
                }
            }
            "PASV" => {
                let listener = TcpListener::bind("127.0.0.1:0")?;
                let port = listener.local_addr()?.port();
                data_listener = Some(listener);
                send(
                    &mut ctrl,
                    &format!(
                        "227 entering passive mode (127,0,0,1,{},{})",
                        port >> 8,
                        port & 0xff
                    ),
                )?;
            }
            "STOR" => {
                let rejected = {
                    let mut st = state.lock().unwrap();
                    st.stor_attempts.push(arg.clone());
                    st.reject_stores.contains(&arg)
                };
                if rejected {
                    send(&mut ctrl, "550 store refused")?;
                    // The client always dials the data port; drain the
                    // connection so nothing lingers.
                    if let Some(listener) = data_listener.take() {
                        let _ = listener.accept();
                    }
                    continue;
                }
                let listener = data_listener.take().expect("STOR without PASV");
                send(&mut ctrl, "150 opening data connection")?;
                let (mut data, _) = listener.accept()?;
                let mut body = Vec::new();
                data.read_to_end(&mut body)?;
                drop(data);
                state.lock().unwrap().files.insert(arg, body);
                send(&mut ctrl, "226 transfer complete")?;
            }
            "RETR" => match state.lock().unwrap().files.get(&arg).cloned() {
                None => {
                    send(&mut ctrl, "550 no such file")?;
                    if let Some(listener) = data_listener.take() {
                        let _ = listener.accept();
                    }
                }
                Some(bytes) => {
                    let listener = data_listener.take().expect("RETR without PASV");
                    send(&mut ctrl, "150 opening data connection")?;
                    let (mut data, _) = listener.accept()?;
                    data.write_all(&bytes)?;
                    drop(data);
                    send(&mut ctrl, "226 transfer complete")?;
                }
            },
            "LIST" => {
                let listener = data_listener.take().expect("LIST without PASV");
                send(&mut ctrl, "150 here comes the listing")?;
                let (mut data, _) = listener.accept()?;
                let listing: Vec<String> = {
                    let st = state.lock().unwrap();
                    st.files
                        .iter()
                        .map(|(name, bytes)| {
                            format!("-rw-r--r-- 1 ftp ftp {} Jan 12 2024 {}", bytes.len(), name)
                        })
                        .collect()
                };
                for entry in listing {
                    write!(data, "{entry}\r\n")?;
                }
                drop(data);
                send(&mut ctrl, "226 transfer complete")?;
            }
            "QUIT" => {
                state.lock().unwrap().quits += 1;
                send(&mut ctrl, "221 goodbye")?;
                return Ok(());
            }
            _ => send(&mut ctrl, "502 not implemented")?,
        }
    }
}

fn send(ctrl: &mut TcpStream, reply: &str) -> std::io::Result<()> {
    write!(ctrl, "{reply}\r\n")?;
    ctrl.flush()
}
