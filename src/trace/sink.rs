//! Output destination for trace records
//!
//! Exactly one sink is active at a time. Writers and sink switches take the
//! same lock, so each record lands wholly in one destination.

use std::fs::{File, OpenOptions};
use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::{Result, TraceError};

/// Which destination is currently active
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkKind {
    Console,
    File(PathBuf),
}

enum Sink {
    Console(Stdout),
    File { path: PathBuf, file: File },
}

impl Sink {
    fn kind(&self) -> SinkKind {
        match self {
            Sink::Console(_) => SinkKind::Console,
            Sink::File { path, .. } => SinkKind::File(path.clone()),
        }
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        match self {
            Sink::Console(stdout) => {
                let mut out = stdout.lock();
                out.write_all(buf.as_bytes())?;
                out.flush()
            }
            Sink::File { file, .. } => {
                file.write_all(buf.as_bytes())?;
                file.flush()
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Console(stdout) => stdout.flush(),
            Sink::File { file, .. } => file.flush(),
        }
    }
}

/// Owns the active sink
pub struct SinkManager {
    sink: Mutex<Sink>,
}

impl SinkManager {
    /// Create a manager writing to stdout
    pub fn new() -> Self {
        Self {
            sink: Mutex::new(Sink::Console(io::stdout())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Sink> {
        // Every write completes or fails as a whole, so the sink is usable
        // even if a writer panicked while holding the lock.
        self.sink
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append all further records to `path`, creating it if absent.
    ///
    /// The file is opened before the active sink is touched; on failure the
    /// current sink stays in place.
    pub fn set_log_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| TraceError::SinkOpen {
                path: path.clone(),
                source,
            })?;

        let mut sink = self.lock();
        if let Err(e) = sink.flush() {
            tracing::warn!("Failed to flush previous trace sink: {}", e);
        }
        *sink = Sink::File {
            path: path.clone(),
            file,
        };
        drop(sink);

        tracing::info!("Trace output redirected to {}", path.display());
        Ok(())
    }

    /// Make stdout the sole sink again
    pub fn reset_to_console(&self) {
        let mut sink = self.lock();
        if let Err(e) = sink.flush() {
            tracing::warn!("Failed to flush previous trace sink: {}", e);
        }
        *sink = Sink::Console(io::stdout());
    }

    /// Write one line followed by a newline to the active sink
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        self.lock().write_line(line)
    }

    pub fn flush(&self) -> io::Result<()> {
        self.lock().flush()
    }

    /// Describe the active sink
    pub fn kind(&self) -> SinkKind {
        self.lock().kind()
    }
}

impl Default for SinkManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SinkManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkManager")
            .field("sink", &self.kind())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_sink_is_console() {
        let sinks = SinkManager::new();
        assert_eq!(sinks.kind(), SinkKind::Console);
    }

    #[test]
    fn test_set_log_file_creates_and_appends() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("trace.log");
        std::fs::write(&path, "existing\n").unwrap();

        let sinks = SinkManager::new();
        sinks.set_log_file(&path).unwrap();
        assert_eq!(sinks.kind(), SinkKind::File(path.clone()));

        sinks.write_line("first").unwrap();
        sinks.write_line("second").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "existing\nfirst\nsecond\n");
    }

    #[test]
    fn test_failed_open_keeps_previous_sink() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("good.log");
        let bad = temp_dir.path().join("missing-dir").join("bad.log");

        let sinks = SinkManager::new();
        sinks.set_log_file(&good).unwrap();

        let err = sinks.set_log_file(&bad).unwrap_err();
        assert!(matches!(err, TraceError::SinkOpen { ref path, .. } if *path == bad));
        assert_eq!(sinks.kind(), SinkKind::File(good.clone()));

        sinks.write_line("still here").unwrap();
        assert_eq!(std::fs::read_to_string(&good).unwrap(), "still here\n");
        assert!(!bad.exists());
    }

    #[test]
    fn test_switch_moves_writes_to_new_file_only() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first.log");
        let second = temp_dir.path().join("second.log");

        let sinks = SinkManager::new();
        sinks.set_log_file(&first).unwrap();
        sinks.write_line("a").unwrap();
        sinks.set_log_file(&second).unwrap();
        sinks.write_line("b").unwrap();

        assert_eq!(std::fs::read_to_string(&first).unwrap(), "a\n");
        assert_eq!(std::fs::read_to_string(&second).unwrap(), "b\n");
    }

    #[test]
    fn test_reset_to_console() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("trace.log");

        let sinks = SinkManager::new();
        sinks.set_log_file(&path).unwrap();
        sinks.reset_to_console();
        assert_eq!(sinks.kind(), SinkKind::Console);
    }

    #[test]
    fn test_concurrent_writes_during_switch_are_not_lost() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first.log");
        let second = temp_dir.path().join("second.log");

        let sinks = SinkManager::new();
        sinks.set_log_file(&first).unwrap();

        std::thread::scope(|s| {
            for t in 0..4 {
                let sinks = &sinks;
                s.spawn(move || {
                    for i in 0..100 {
                        sinks.write_line(&format!("writer-{}-line-{}", t, i)).unwrap();
                    }
                });
            }
            sinks.set_log_file(&second).unwrap();
        });

        let a = std::fs::read_to_string(&first).unwrap();
        let b = std::fs::read_to_string(&second).unwrap();
        let lines: Vec<&str> = a.lines().chain(b.lines()).collect();
        assert_eq!(lines.len(), 400);
        assert!(lines.iter().all(|l| l.starts_with("writer-")));
    }
}
