// Injected feeder event log
//
// The feeder components report everything through this capability instead of
// a fixed global file, so tests can swap in an in-memory sink. FileLog is
// the production sink: it appends `[timestamp] [LEVEL] message` lines and
// degrades to stderr when the file cannot be opened.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Local;
use tracing::{error, info, warn};

/// Severity of a feeder event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

/// Logging capability handed to the feeder at construction.
pub trait EventLog: Send + Sync {
    fn log(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }
}

/// Append-only file sink with a secondary diagnostic stream fallback.
pub struct FileLog {
    path: PathBuf,
    fallback: Mutex<Box<dyn Write + Send>>,
    // Sink failure is reported once, not per record
    fallback_reported: AtomicBool,
}

impl FileLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_fallback(path, Box::new(io::stderr()))
    }

    /// Use a custom fallback stream instead of stderr.
    pub fn with_fallback(path: impl Into<PathBuf>, stream: Box<dyn Write + Send>) -> Self {
        Self {
            path: path.into(),
            fallback: Mutex::new(stream),
            fallback_reported: AtomicBool::new(false),
        }
    }

    fn fall_back(&self, line: &str, open_error: Option<&std::io::Error>) {
        let mut stream = self.fallback.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(e) = open_error {
            if !self.fallback_reported.swap(true, Ordering::Relaxed) {
                let _ = writeln!(stream, "Could not open log file {}: {}", self.path.display(), e);
            }
        }
        let _ = writeln!(stream, "{}", line);
    }
}

impl EventLog for FileLog {
    fn log(&self, level: Level, message: &str) {
        // Mirror into tracing so console diagnostics match the file
        match level {
            Level::Info => info!("{}", message),
            Level::Warn => warn!("{}", message),
            Level::Error => error!("{}", message),
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("[{}] [{}] {}", timestamp, level.as_str(), message);

        let opened = OpenOptions::new().create(true).append(true).open(&self.path);
        match opened {
            Ok(mut file) => {
                if writeln!(file, "{}", line).is_err() {
                    self.fall_back(&line, None);
                }
            }
            Err(e) => self.fall_back(&line, Some(&e)),
        }
    }
}

/// In-memory sink for tests: captures records, touches no files.
#[derive(Default)]
pub struct MemoryLog {
    records: Mutex<Vec<(Level, String)>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(Level, String)> {
        self.records.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Number of records at the given level.
    pub fn count(&self, level: Level) -> usize {
        self.records().iter().filter(|(l, _)| *l == level).count()
    }
}

impl EventLog for MemoryLog {
    fn log(&self, level: Level, message: &str) {
        self.records
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push((level, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn unopenable_sink_falls_back_with_single_notice() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the log's parent directory should be makes every
        // open fail
        let clash = dir.path().join("logs");
        std::fs::write(&clash, b"not a directory").unwrap();

        let buf = SharedBuf::default();
        let log = FileLog::with_fallback(clash.join("feeder.log"), Box::new(buf.clone()));

        log.info("first");
        log.warn("second");
        log.error("third");

        let out = buf.contents();
        assert_eq!(out.matches("Could not open log file").count(), 1);
        assert!(out.contains("[INFO] first"));
        assert!(out.contains("[WARN] second"));
        assert!(out.contains("[ERROR] third"));
    }

    #[test]
    fn file_log_appends_formatted_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feeder.log");
        let log = FileLog::new(&path);

        log.info("feeder started");
        log.error("motor run failed");

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[INFO] feeder started"));
        assert!(lines[1].contains("[ERROR] motor run failed"));
        assert!(lines[0].starts_with('['));
    }

    #[test]
    fn memory_log_counts_by_level() {
        let log = MemoryLog::new();
        log.warn("bad config line");
        log.warn("another bad line");
        log.error("no steps");

        assert_eq!(log.count(Level::Warn), 2);
        assert_eq!(log.count(Level::Error), 1);
        assert_eq!(log.count(Level::Info), 0);
    }
}
