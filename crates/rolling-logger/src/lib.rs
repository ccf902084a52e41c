//! Rolling Logger
//!
//! tracing-subscriber setup writing to stderr and to a daily log file
//! (`<app>.<YYYY-MM-DD>.log`, oldest files pruned past `max_files`).
//! The most recent lines are also kept in a circular buffer so a UI can
//! show them without touching the filesystem. `log` records are bridged
//! into tracing.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::prelude::*;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("log directory error: {0}")]
    Io(#[from] io::Error),
    #[error("logger already initialized")]
    AlreadyInitialized,
    #[error("logger not initialized")]
    NotInitialized,
    #[error("failed to install subscriber: {0}")]
    Subscriber(String),
}

/// Logger settings
#[derive(Debug, Clone)]
pub struct LoggerOptions {
    pub log_dir: PathBuf,
    pub app_name: String,
    /// Daily files kept on disk
    pub max_files: usize,
    /// Lines kept in memory
    pub buffer_lines: usize,
    pub level: tracing::Level,
}

impl LoggerOptions {
    pub fn new(log_dir: impl Into<PathBuf>, app_name: &str) -> Self {
        Self {
            log_dir: log_dir.into(),
            app_name: app_name.to_string(),
            max_files: 7,
            buffer_lines: 500,
            level: tracing::Level::INFO,
        }
    }
}

struct RollingState {
    dir: PathBuf,
    prefix: String,
    max_files: usize,
    current_date: String,
    file: Option<File>,
    recent: VecDeque<String>,
    capacity: usize,
}

impl RollingState {
    fn file_name(&self, date: &str) -> String {
        format!("{}.{}.log", self.prefix, date)
    }

    fn rotate_if_needed(&mut self, date: &str) -> io::Result<()> {
        if self.file.is_some() && self.current_date == date {
            return Ok(());
        }
        let path = self.dir.join(self.file_name(date));
        self.file = Some(OpenOptions::new().create(true).append(true).open(path)?);
        self.current_date = date.to_string();
        self.prune()
    }

    /// Remove the oldest files beyond `max_files`
    fn prune(&self) -> io::Result<()> {
        let head = format!("{}.", self.prefix);
        let mut files: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.starts_with(&head) && n.ends_with(".log"))
                    .unwrap_or(false)
            })
            .collect();
        if files.len() <= self.max_files {
            return Ok(());
        }
        // Date stamps sort lexicographically
        files.sort();
        let excess = files.len() - self.max_files;
        for old in files.into_iter().take(excess) {
            fs::remove_file(old)?;
        }
        Ok(())
    }

    fn remember(&mut self, buf: &[u8]) {
        if self.capacity == 0 {
            return;
        }
        for line in String::from_utf8_lossy(buf).lines() {
            if line.is_empty() {
                continue;
            }
            if self.recent.len() == self.capacity {
                self.recent.pop_front();
            }
            self.recent.push_back(line.to_string());
        }
    }

    fn write_dated(&mut self, date: &str, buf: &[u8]) -> io::Result<()> {
        self.rotate_if_needed(date)?;
        if let Some(file) = self.file.as_mut() {
            file.write_all(buf)?;
        }
        self.remember(buf);
        Ok(())
    }
}

/// Rolling file writer shared by every formatted event
#[derive(Clone)]
pub struct RollingWriter {
    state: Arc<Mutex<RollingState>>,
}

impl RollingWriter {
    pub fn new(options: &LoggerOptions) -> Result<Self, LoggerError> {
        fs::create_dir_all(&options.log_dir)?;
        Ok(Self {
            state: Arc::new(Mutex::new(RollingState {
                dir: options.log_dir.clone(),
                prefix: options.app_name.clone(),
                max_files: options.max_files.max(1),
                current_date: String::new(),
                file: None,
                recent: VecDeque::with_capacity(options.buffer_lines),
                capacity: options.buffer_lines,
            })),
        })
    }

    fn today() -> String {
        chrono::Local::now().format("%Y-%m-%d").to_string()
    }

    /// Most recent lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        match self.state.lock() {
            Ok(state) => state.recent.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Path of the file currently written to
    pub fn current_file(&self) -> Option<PathBuf> {
        let state = self.state.lock().ok()?;
        if state.file.is_none() {
            return None;
        }
        Some(state.dir.join(state.file_name(&state.current_date)))
    }

    fn write_dated(&self, date: &str, buf: &[u8]) -> io::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer poisoned"))?;
        state.write_dated(date, buf)
    }
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_dated(&Self::today(), buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer poisoned"))?;
        match state.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

static LOGGER: OnceLock<RollingWriter> = OnceLock::new();

/// Initialize with default retention (7 files, 500 buffered lines)
pub fn init_logger(log_dir: impl Into<PathBuf>, app_name: &str) -> Result<(), LoggerError> {
    init_logger_with(LoggerOptions::new(log_dir, app_name))
}

/// Install the global subscriber; fails if one is already installed
pub fn init_logger_with(options: LoggerOptions) -> Result<(), LoggerError> {
    if LOGGER.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }
    let writer = RollingWriter::new(&options)?;

    tracing_subscriber::registry()
        .with(LevelFilter::from_level(options.level))
        .with(fmt::layer().with_writer(io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(writer.clone()))
        .try_init()
        .map_err(|e| LoggerError::Subscriber(e.to_string()))?;

    LOGGER.set(writer).map_err(|_| LoggerError::AlreadyInitialized)?;
    log::info!("{} logging to {}", options.app_name, options.log_dir.display());
    Ok(())
}

fn logger() -> Result<&'static RollingWriter, LoggerError> {
    LOGGER.get().ok_or(LoggerError::NotInitialized)
}

pub fn info(msg: &str) -> Result<(), LoggerError> {
    logger()?;
    tracing::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), LoggerError> {
    logger()?;
    tracing::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), LoggerError> {
    logger()?;
    tracing::error!("{}", msg);
    Ok(())
}

/// Recent log lines from the global logger (empty before init)
pub fn recent_lines() -> Vec<String> {
    LOGGER.get().map(RollingWriter::recent_lines).unwrap_or_default()
}

/// Directory of the active log file
pub fn log_dir() -> Option<PathBuf> {
    LOGGER
        .get()
        .and_then(RollingWriter::current_file)
        .and_then(|p| p.parent().map(Path::to_path_buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(dir: &Path) -> LoggerOptions {
        let mut opts = LoggerOptions::new(dir, "Kanban");
        opts.max_files = 2;
        opts.buffer_lines = 3;
        opts
    }

    #[test]
    fn test_write_creates_daily_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = RollingWriter::new(&options(dir.path())).unwrap();
        writer.write_all(b"first line\n").unwrap();
        writer.flush().unwrap();

        let file = writer.current_file().expect("file");
        let content = fs::read_to_string(file).unwrap();
        assert_eq!(content, "first line\n");
    }

    #[test]
    fn test_ring_buffer_keeps_latest_lines() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RollingWriter::new(&options(dir.path())).unwrap();
        for i in 0..5 {
            writer.write_dated("2026-01-01", format!("line {}\n", i).as_bytes()).unwrap();
        }
        assert_eq!(writer.recent_lines(), vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn test_rotation_prunes_oldest_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RollingWriter::new(&options(dir.path())).unwrap();
        writer.write_dated("2026-01-01", b"a\n").unwrap();
        writer.write_dated("2026-01-02", b"b\n").unwrap();
        writer.write_dated("2026-01-03", b"c\n").unwrap();

        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["Kanban.2026-01-02.log", "Kanban.2026-01-03.log"]);
    }

    #[test]
    fn test_helpers_require_init() {
        assert!(matches!(info("hello"), Err(LoggerError::NotInitialized)));
        assert!(recent_lines().is_empty());
        assert_eq!(log_dir(), None);
    }
}
