//! The game log: one encoded command per line, on disk.
//!
//! The same lines that cross the network are appended to a log file,
//! which makes a saved game nothing more than a replayable transcript.
//! Replay is forgiving by construction: a malformed line is reported
//! and skipped, and every line after it still applies — one corrupt
//! entry must never cost the rest of the session.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tessera_piece::Command;
use tessera_proto::CommandCodec;

/// An append-only command transcript.
pub struct GameLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl GameLog {
    /// Creates (or truncates) a log file at `path`.
    pub fn create(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let writer = BufWriter::new(File::create(&path)?);
        tracing::info!(path = %path.display(), "game log opened");
        Ok(Self { path, writer })
    }

    /// The file this log writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one encoded command line.
    ///
    /// Flushes immediately: the log is the crash-recovery story, so a
    /// line that was applied must be on disk.
    pub fn record(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{line}")?;
        self.writer.flush()
    }

    /// Reads a transcript back into commands.
    ///
    /// Undecodable lines are logged and counted in
    /// [`Replay::skipped`], not returned as errors — the taxonomy is
    /// per-command, and the stream keeps going.
    pub fn replay(
        path: impl AsRef<Path>,
        codec: &CommandCodec,
    ) -> io::Result<Replay> {
        let text = std::fs::read_to_string(path)?;
        let mut commands = Vec::new();
        let mut skipped = 0;
        for (index, line) in text.lines().enumerate() {
            match codec.decode(line) {
                Ok(command) => commands.push(command),
                Err(error) => {
                    skipped += 1;
                    tracing::warn!(
                        line_number = index + 1,
                        line,
                        %error,
                        "skipping undecodable log line"
                    );
                }
            }
        }
        Ok(Replay { commands, skipped })
    }
}

/// The result of reading a transcript.
#[derive(Debug)]
pub struct Replay {
    /// Every command that decoded, in recorded order.
    pub commands: Vec<Command>,
    /// How many lines were skipped as undecodable.
    pub skipped: usize,
}
