//! GTP client for communicating with Go engines.
//!
//! This module spawns GTP-compatible engines as subprocesses and drives them
//! over stdin/stdout. Framing and error classification come from the
//! [`gtp`] crate; this module owns the process lifecycle.
//!
//! # Example
//!
//! ```no_run
//! use go_arena::gtp_client::{GameSettings, GtpClient};
//! use go_core::Color;
//!
//! let mut client = GtpClient::new("gnugo", vec!["--mode".into(), "gtp".into()]);
//! client.start()?;
//! client.init_game(&GameSettings::default())?;
//! let reply = client.genmove(Color::Black)?;
//! println!("Engine played: {}", reply);
//! client.stop();
//! # Ok::<(), go_arena::gtp_client::ClientError>(())
//! ```

use go_core::{Color, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use gtp::{Command as GtpCommand, GtpConnection, GtpError};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;

/// How long [`GtpClient::stop`] waits for the engine to exit after `quit`.
pub const QUIT_TIMEOUT: Duration = Duration::from_secs(1);

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Largest handicap accepted by [`GtpClient::init_game`].
pub const MAX_HANDICAP: u8 = 9;

/// Errors that can occur when communicating with a GTP engine.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Failed to spawn the engine process.
    #[error("Failed to spawn process: {0}")]
    Spawn(#[source] std::io::Error),
    /// A command was issued while no engine process is attached.
    #[error("Engine is not running")]
    NotRunning,
    /// [`GtpClient::start`] was called on a running client.
    #[error("Engine is already running")]
    AlreadyRunning,
    /// An argument was rejected before anything was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The engine failed a command or broke the protocol.
    #[error(transparent)]
    Protocol(#[from] GtpError),
}

/// Parameters sent to an engine at the start of every game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameSettings {
    pub board_size: u8,
    pub komi: f64,
    /// Number of fixed handicap stones; 0 for an even game.
    pub handicap: u8,
    /// Main time in seconds.
    pub main_time: u32,
    /// Canadian byo-yomi period in seconds.
    pub byo_yomi_time: u32,
    /// Stones to play per byo-yomi period.
    pub byo_yomi_stones: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            board_size: 19,
            komi: 7.5,
            handicap: 0,
            main_time: 0,
            byo_yomi_time: 1,
            byo_yomi_stones: 1,
        }
    }
}

/// A running engine process with its protocol channel.
struct Session {
    process: Child,
    connection: GtpConnection<BufReader<ChildStdout>, ChildStdin>,
}

/// A client for a GTP engine running as a subprocess.
///
/// # Lifecycle
///
/// 1. Create with [`GtpClient::new`]; nothing is spawned yet
/// 2. [`GtpClient::start`] spawns the process and checks the protocol version
/// 3. Issue commands; one at a time, each waits for its response
/// 4. [`GtpClient::stop`] (or drop) sends `quit` and reaps the process
///
/// A response that cannot be framed, or an engine that closes its output,
/// leaves the stream in an unknown state, so the client stops the process
/// and later commands fail with [`ClientError::NotRunning`].
pub struct GtpClient {
    program: PathBuf,
    args: Vec<String>,
    session: Option<Session>,
}

impl GtpClient {
    /// Creates a client for `program` with `args`. The process is not started.
    pub fn new<P: AsRef<Path>>(program: P, args: Vec<String>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args,
            session: None,
        }
    }

    /// Returns the program this client runs.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Returns true between a successful [`start`](Self::start) and the
    /// next [`stop`](Self::stop).
    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// Spawns the engine and performs the protocol version handshake.
    ///
    /// # Errors
    ///
    /// - [`ClientError::AlreadyRunning`] if a process is already attached
    /// - [`ClientError::Spawn`] if the process cannot be spawned
    /// - [`ClientError::Protocol`] with [`GtpError::Handshake`] if the
    ///   engine does not speak protocol version 2; the process is stopped
    pub fn start(&mut self) -> Result<(), ClientError> {
        if self.session.is_some() {
            return Err(ClientError::AlreadyRunning);
        }

        let mut process = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(ClientError::Spawn)?;

        let (stdin, stdout) = match (process.stdin.take(), process.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = process.kill();
                let _ = process.wait();
                return Err(ClientError::Spawn(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "engine pipes were not captured",
                )));
            }
        };

        self.session = Some(Session {
            process,
            connection: GtpConnection::new(BufReader::new(stdout), stdin),
        });
        tracing::info!("Started engine {:?}", self.program);

        let handshake = match self.session.as_mut() {
            Some(session) => session.connection.handshake(),
            None => return Err(ClientError::NotRunning),
        };
        if let Err(e) = handshake {
            tracing::warn!("Handshake with {:?} failed: {}", self.program, e);
            self.stop();
            return Err(e.into());
        }
        Ok(())
    }

    /// Sends a raw command and returns the success payload lines.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotRunning`] without a process. Engine failures are
    /// returned as [`GtpError::Engine`]; framing failures and disconnects
    /// also stop the process.
    pub fn send(&mut self, verb: &str, args: &[&str]) -> Result<Vec<String>, ClientError> {
        let session = self.session.as_mut().ok_or(ClientError::NotRunning)?;
        let command = GtpCommand::with_args(verb, args.iter().copied());
        tracing::debug!("> {}", command);

        match session.connection.exchange(&command).and_then(|r| r.into_payload()) {
            Ok(lines) => {
                tracing::debug!("< {:?}", lines);
                Ok(lines)
            }
            Err(e @ GtpError::Engine(_)) => {
                tracing::debug!("< {}", e);
                Err(e.into())
            }
            Err(e) => {
                tracing::warn!("Session with {:?} broken: {}", self.program, e);
                self.stop();
                Err(e.into())
            }
        }
    }

    /// Sends a command whose success payload must be exactly one line.
    fn send_single(&mut self, verb: &str, args: &[&str]) -> Result<String, ClientError> {
        let mut lines = self.send(verb, args)?;
        if lines.len() == 1 {
            Ok(lines.remove(0))
        } else {
            self.stop();
            Err(GtpError::MalformedResponse(format!(
                "{}: expected one line, got {:?}",
                verb, lines
            ))
            .into())
        }
    }

    /// Asks the engine to quit and reaps the process.
    ///
    /// Waits up to [`QUIT_TIMEOUT`] for a clean exit, then kills the process.
    /// Does nothing if no process is attached.
    pub fn stop(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };

        let _ = session.connection.send_command(&GtpCommand::new("quit"));
        let deadline = Instant::now() + QUIT_TIMEOUT;
        loop {
            match session.process.try_wait() {
                Ok(Some(status)) => {
                    tracing::info!("Engine {:?} exited with {}", self.program, status);
                    return;
                }
                Ok(None) if Instant::now() < deadline => std::thread::sleep(EXIT_POLL_INTERVAL),
                _ => break,
            }
        }

        tracing::warn!("Engine {:?} did not quit in time, killing it", self.program);
        let _ = session.process.kill();
        let _ = session.process.wait();
    }

    /// Sets the board size (5 to 25).
    pub fn boardsize(&mut self, size: u8) -> Result<(), ClientError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(ClientError::InvalidArgument(format!(
                "board size {} outside {}..={}",
                size, MIN_BOARD_SIZE, MAX_BOARD_SIZE
            )));
        }
        self.send("boardsize", &[size.to_string().as_str()]).map(drop)
    }

    pub fn clear_board(&mut self) -> Result<(), ClientError> {
        self.send("clear_board", &[]).map(drop)
    }

    /// Takes back the last move.
    pub fn undo(&mut self) -> Result<(), ClientError> {
        self.send("undo", &[]).map(drop)
    }

    pub fn komi(&mut self, komi: f64) -> Result<(), ClientError> {
        self.send("komi", &[komi.to_string().as_str()]).map(drop)
    }

    /// Tells the engine that `color` played `mv` (a vertex, `pass` or
    /// `resign`).
    pub fn play(&mut self, color: Color, mv: &str) -> Result<(), ClientError> {
        self.send("play", &[color.to_gtp(), mv]).map(drop)
    }

    /// Asks the engine to choose and play a move for `color`.
    pub fn genmove(&mut self, color: Color) -> Result<String, ClientError> {
        self.send_single("genmove", &[color.to_gtp()])
    }

    /// Returns the engine's own score string, e.g. `B+3.5`.
    pub fn final_score(&mut self) -> Result<String, ClientError> {
        self.send_single("final_score", &[])
    }

    /// Returns the engine's board drawing.
    pub fn showboard(&mut self) -> Result<String, ClientError> {
        Ok(self.send("showboard", &[])?.join("\n"))
    }

    pub fn time_settings(
        &mut self,
        main_time: u32,
        byo_yomi_time: u32,
        byo_yomi_stones: u32,
    ) -> Result<(), ClientError> {
        self.send(
            "time_settings",
            &[
                main_time.to_string().as_str(),
                byo_yomi_time.to_string().as_str(),
                byo_yomi_stones.to_string().as_str(),
            ],
        )
        .map(drop)
    }

    /// Places fixed handicap stones and returns their vertices.
    pub fn fixed_handicap(&mut self, stones: u8) -> Result<Vec<String>, ClientError> {
        let lines = self.send("fixed_handicap", &[stones.to_string().as_str()])?;
        Ok(lines
            .iter()
            .flat_map(|line| line.split_whitespace())
            .map(str::to_string)
            .collect())
    }

    pub fn list_commands(&mut self) -> Result<Vec<String>, ClientError> {
        self.send("list_commands", &[])
    }

    pub fn known_command(&mut self, verb: &str) -> Result<bool, ClientError> {
        Ok(self.send_single("known_command", &[verb])? == "true")
    }

    pub fn name(&mut self) -> Result<String, ClientError> {
        self.send_single("name", &[])
    }

    pub fn version(&mut self) -> Result<String, ClientError> {
        self.send_single("version", &[])
    }

    /// Returns `name version`.
    pub fn full_name(&mut self) -> Result<String, ClientError> {
        let name = self.name()?;
        let version = self.version()?;
        Ok(format!("{} {}", name, version))
    }

    pub fn protocol_version(&mut self) -> Result<String, ClientError> {
        self.send_single("protocol_version", &[])
    }

    /// Prepares the engine for a new game.
    ///
    /// Sends `boardsize`, `clear_board`, `komi` and `time_settings`, then
    /// `fixed_handicap` when `settings.handicap > 0`. Returns the handicap
    /// vertices (empty for an even game).
    ///
    /// # Errors
    ///
    /// [`ClientError::InvalidArgument`] if the board size or handicap is out
    /// of range; nothing is sent in that case.
    pub fn init_game(&mut self, settings: &GameSettings) -> Result<Vec<String>, ClientError> {
        if settings.handicap > MAX_HANDICAP {
            return Err(ClientError::InvalidArgument(format!(
                "handicap {} outside 1..={}",
                settings.handicap, MAX_HANDICAP
            )));
        }
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&settings.board_size) {
            return Err(ClientError::InvalidArgument(format!(
                "board size {} outside {}..={}",
                settings.board_size, MIN_BOARD_SIZE, MAX_BOARD_SIZE
            )));
        }

        self.boardsize(settings.board_size)?;
        self.clear_board()?;
        self.komi(settings.komi)?;
        self.time_settings(
            settings.main_time,
            settings.byo_yomi_time,
            settings.byo_yomi_stones,
        )?;
        if settings.handicap > 0 {
            self.fixed_handicap(settings.handicap)
        } else {
            Ok(Vec::new())
        }
    }
}

impl Drop for GtpClient {
    fn drop(&mut self) {
        self.stop();
    }
}
