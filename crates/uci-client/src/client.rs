//! Engine subprocess management.

use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;

use crate::{EngineMessage, UciError};

/// Maximum number of lines to read before giving up on a handshake reply.
pub const MAX_HANDSHAKE_LINES: usize = 1000;

/// Identification reported by the engine during the `uci` handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineId {
    pub name: String,
    pub author: String,
}

impl Default for EngineId {
    fn default() -> Self {
        Self {
            name: "Unknown Engine".to_string(),
            author: "Unknown Author".to_string(),
        }
    }
}

/// A client for communicating with a UCI-compatible chess engine.
///
/// `UciClient` manages a subprocess running a chess engine and provides
/// methods to send UCI commands and receive responses over stdin/stdout
/// pipes. Only one query can be outstanding at a time.
///
/// # Lifecycle
///
/// 1. Spawn the engine with [`UciClient::spawn`]
/// 2. Run the handshake with [`UciClient::init`]
/// 3. Ask for moves with [`UciClient::best_move`]
/// 4. Shut down with [`UciClient::quit`] (or rely on [`Drop`])
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use uci_client::UciClient;
///
/// let mut client = UciClient::spawn("/usr/bin/stockfish")?;
/// let id = client.init()?;
/// println!("{} by {}", id.name, id.author);
/// let mv = client.best_move(None, &[], Duration::from_millis(500))?;
/// println!("Best move: {}", mv);
/// # Ok::<(), uci_client::UciError>(())
/// ```
pub struct UciClient {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    id: EngineId,
}

impl UciClient {
    /// Spawns the engine executable at `path`.
    ///
    /// The process is not yet initialized; call [`init`](Self::init) after
    /// spawning.
    ///
    /// # Errors
    ///
    /// Returns [`UciError::NotFound`] if the executable does not exist and
    /// [`UciError::SpawnError`] for any other spawn failure.
    pub fn spawn<P: AsRef<Path>>(path: P) -> Result<Self, UciError> {
        let path = path.as_ref();
        Self::spawn_command(Command::new(path)).map_err(|e| match e {
            UciError::SpawnError(io) if io.kind() == ErrorKind::NotFound => {
                UciError::NotFound(path.display().to_string())
            }
            other => other,
        })
    }

    /// Spawns an engine from a prepared command, e.g. an interpreter plus a
    /// script argument. Stdin and stdout are replaced with pipes and stderr is
    /// discarded.
    pub fn spawn_command(mut command: Command) -> Result<Self, UciError> {
        let mut process = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(UciError::SpawnError)?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| UciError::InvalidResponse("engine stdin unavailable".into()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| UciError::InvalidResponse("engine stdout unavailable".into()))?;

        tracing::debug!(pid = process.id(), "engine process spawned");

        Ok(Self {
            process,
            stdin,
            stdout: BufReader::new(stdout),
            id: EngineId::default(),
        })
    }

    /// Writes one command line to the engine.
    pub fn send(&mut self, cmd: &str) -> Result<(), UciError> {
        tracing::debug!("> {}", cmd);
        writeln!(self.stdin, "{}", cmd)?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Reads and parses one line from the engine.
    ///
    /// Blocks until a complete line is available.
    ///
    /// # Errors
    ///
    /// Returns [`UciError::Disconnected`] once the engine has closed stdout.
    pub fn read_message(&mut self) -> Result<EngineMessage, UciError> {
        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(UciError::Disconnected);
        }
        tracing::debug!("< {}", line.trim_end());
        Ok(EngineMessage::parse(&line))
    }

    /// Runs the `uci` and `isready` handshakes.
    ///
    /// Returns the identification the engine reported; missing fields keep
    /// their [`EngineId::default`] values.
    pub fn init(&mut self) -> Result<EngineId, UciError> {
        self.send("uci")?;

        let mut id = EngineId::default();
        let mut lines_read = 0;
        loop {
            if lines_read >= MAX_HANDSHAKE_LINES {
                return Err(UciError::HandshakeFailed("uci"));
            }
            lines_read += 1;
            match self.read_message()? {
                EngineMessage::Id { name, author } => {
                    if let Some(name) = name.filter(|n| !n.is_empty()) {
                        id.name = name;
                    }
                    if let Some(author) = author.filter(|a| !a.is_empty()) {
                        id.author = author;
                    }
                }
                EngineMessage::UciOk => break,
                _ => {}
            }
        }

        self.is_ready()?;
        self.id = id.clone();
        Ok(id)
    }

    /// Sends `isready` and waits for `readyok`.
    pub fn is_ready(&mut self) -> Result<(), UciError> {
        self.send("isready")?;
        for _ in 0..MAX_HANDSHAKE_LINES {
            if self.read_message()? == EngineMessage::ReadyOk {
                return Ok(());
            }
        }
        Err(UciError::HandshakeFailed("isready"))
    }

    /// The identification captured by the last [`init`](Self::init).
    pub fn id(&self) -> &EngineId {
        &self.id
    }

    /// Returns true while the engine process has not exited.
    pub fn is_alive(&mut self) -> bool {
        matches!(self.process.try_wait(), Ok(None))
    }

    /// Sets the current position for the engine.
    ///
    /// `fen` of `None` means the standard starting position; `moves` are in
    /// UCI notation (e.g. `["e2e4", "e7e5"]`).
    pub fn set_position(&mut self, fen: Option<&str>, moves: &[String]) -> Result<(), UciError> {
        let mut cmd = match fen {
            Some(fen) => format!("position fen {}", fen),
            None => "position startpos".to_string(),
        };
        if !moves.is_empty() {
            cmd.push_str(" moves ");
            cmd.push_str(&moves.join(" "));
        }
        self.send(&cmd)
    }

    /// Sends `go <time_control>` and waits for `bestmove`.
    ///
    /// # Errors
    ///
    /// Returns [`UciError::InvalidResponse`] when the engine answers with an
    /// empty or null move.
    pub fn go(&mut self, time_control: &str) -> Result<String, UciError> {
        self.send(&format!("go {}", time_control))?;

        loop {
            if let EngineMessage::BestMove { mv, .. } = self.read_message()? {
                return match mv.as_str() {
                    "" | "(none)" | "0000" => Err(UciError::InvalidResponse(format!(
                        "bestmove {}",
                        mv
                    ))),
                    _ => Ok(mv),
                };
            }
        }
    }

    /// Sets the position and searches it for `think_time`.
    pub fn best_move(
        &mut self,
        fen: Option<&str>,
        moves: &[String],
        think_time: Duration,
    ) -> Result<String, UciError> {
        if !self.is_alive() {
            return Err(UciError::NotAlive);
        }
        self.set_position(fen, moves)?;
        self.go(&format!("movetime {}", think_time.as_millis()))
    }

    /// Sends `quit` and waits for the process to exit.
    pub fn quit(&mut self) -> Result<(), UciError> {
        self.send("quit")?;
        let _ = self.process.wait();
        Ok(())
    }
}

impl Drop for UciClient {
    fn drop(&mut self) {
        let _ = self.send("quit");
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uci_error_display() {
        let not_found = UciError::NotFound("/opt/engine".to_string());
        assert_eq!(not_found.to_string(), "Chess engine not found: /opt/engine");

        assert_eq!(UciError::NotAlive.to_string(), "Engine not alive!");
        assert_eq!(
            UciError::InvalidResponse("bad data".to_string()).to_string(),
            "Invalid response: bad data"
        );
    }

    #[test]
    fn test_spawn_nonexistent_executable_returns_not_found() {
        let result = UciClient::spawn("/nonexistent/path/to/engine");
        match result {
            Err(UciError::NotFound(path)) => assert_eq!(path, "/nonexistent/path/to/engine"),
            Err(other) => panic!("Expected NotFound, got {other:?}"),
            Ok(_) => panic!("Expected NotFound, got a client"),
        }
    }

    #[test]
    fn test_uci_error_from_io_error() {
        let io_error = std::io::Error::new(ErrorKind::BrokenPipe, "pipe closed");
        let uci_error: UciError = io_error.into();
        match uci_error {
            UciError::Io(e) => assert_eq!(e.kind(), ErrorKind::BrokenPipe),
            _ => panic!("Expected Io variant"),
        }
    }

    #[test]
    fn test_default_engine_id() {
        let id = EngineId::default();
        assert_eq!(id.name, "Unknown Engine");
        assert_eq!(id.author, "Unknown Author");
    }
}
