//! Session logger — an injectable handle that writes level-tagged lines.
//!
//! The binary opens one log file per session in the OS data directory and
//! **truncates it at each launch**, so it only ever holds the most recent
//! session:
//!
//!   Windows:  `%APPDATA%\PixelScribe\pixelscribe.log`
//!   Linux:    `~/.local/share/PixelScribe/pixelscribe.log`
//!   macOS:    `~/Library/Application Support/PixelScribe/pixelscribe.log`
//!
//! Components receive a [`Logger`] at construction and log through the
//! `log_info!` / `log_warn!` / `log_err!` / `log_debug!` / `log_trace!`
//! macros, which take the handle as their first argument.  Tests use
//! [`Logger::memory`] to capture lines or [`Logger::disabled`] to drop them.

use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

/// Severity, ordered from most to least verbose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Level {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn tag(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Case-insensitive; `WARNING` is accepted as an alias for `WARN`.
impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Level::Trace),
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

enum Sink {
    File(Mutex<File>),
    Stderr,
    Memory(Mutex<Vec<String>>),
    Disabled,
}

struct Shared {
    level: Level,
    sink: Sink,
    echo_stderr: bool,
    path: Option<PathBuf>,
}

/// Cheap-to-clone logging handle.  Clones share the same sink.
#[derive(Clone)]
pub struct Logger {
    shared: Arc<Shared>,
    component: Option<&'static str>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.shared.level)
            .field("component", &self.component)
            .field("path", &self.shared.path)
            .finish()
    }
}

#[macro_export]
macro_rules! log_trace {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::logger::Level::Trace, || format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::logger::Level::Debug, || format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::logger::Level::Info, || format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::logger::Level::Warn, || format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_err {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log($crate::logger::Level::Error, || format!($($arg)*))
    };
}

impl Logger {
    fn from_sink(level: Level, sink: Sink, echo_stderr: bool, path: Option<PathBuf>) -> Self {
        Self {
            shared: Arc::new(Shared { level, sink, echo_stderr, path }),
            component: None,
        }
    }

    /// Open the session log at the platform location (see the module docs).
    pub fn session(level: Level, echo_stderr: bool, session_id: &str) -> Self {
        Self::open(default_log_path(), level, echo_stderr, session_id)
    }

    /// Truncate `path`, write the session header and log into it.
    ///
    /// If the file can't be opened the logger degrades to stderr; logging
    /// never stops the editor from starting.
    pub fn open(path: PathBuf, level: Level, echo_stderr: bool, session_id: &str) -> Self {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        let file = match OpenOptions::new().create(true).write(true).truncate(true).open(&path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("[logger] Failed to open log file {:?}: {}", path, e);
                return Self::stderr(level);
            }
        };

        let started = match unix_seconds() {
            Some(secs) => format!("{} UTC (unix {})", clock(secs), secs),
            None => "at an unknown time".to_string(),
        };
        let header = format!(
            "=== PixelScribe session {} started {} ===\nLog file: {}\n",
            session_id,
            started,
            path.display()
        );

        let logger = Self::from_sink(level, Sink::File(Mutex::new(file)), echo_stderr, Some(path));
        logger.write_line(&header);
        logger
    }

    /// Log to stderr only.
    pub fn stderr(level: Level) -> Self {
        Self::from_sink(level, Sink::Stderr, false, None)
    }

    /// Keep lines in memory; read them back with [`Logger::lines`].
    pub fn memory(level: Level) -> Self {
        Self::from_sink(level, Sink::Memory(Mutex::new(Vec::new())), false, None)
    }

    /// Drop everything.
    pub fn disabled() -> Self {
        Self::from_sink(Level::Error, Sink::Disabled, false, None)
    }

    /// A handle sharing this sink whose lines are tagged with `component`.
    pub fn named(&self, component: &'static str) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            component: Some(component),
        }
    }

    pub fn level(&self) -> Level {
        self.shared.level
    }

    /// Path of the session log file, when logging to a file.
    pub fn path(&self) -> Option<&PathBuf> {
        self.shared.path.as_ref()
    }

    pub fn enabled(&self, level: Level) -> bool {
        !matches!(self.shared.sink, Sink::Disabled) && level >= self.shared.level
    }

    /// Format and write a line if `level` passes the filter.  The message
    /// closure only runs for enabled levels.
    pub fn log<F: FnOnce() -> String>(&self, level: Level, msg: F) {
        if !self.enabled(level) {
            return;
        }
        let line = match self.component {
            Some(c) => format!("[{}] [{}] [{}] {}", timestamp(), level, c, msg()),
            None => format!("[{}] [{}] {}", timestamp(), level, msg()),
        };
        self.write_line(&line);
    }

    /// Write a raw line.  I/O errors are swallowed.
    pub fn write_line(&self, line: &str) {
        match &self.shared.sink {
            Sink::File(mutex) => {
                if let Ok(mut file) = mutex.lock() {
                    let _ = writeln!(file, "{}", line);
                }
                if self.shared.echo_stderr {
                    eprintln!("{}", line);
                }
            }
            Sink::Stderr => eprintln!("{}", line),
            Sink::Memory(lines) => {
                if let Ok(mut lines) = lines.lock() {
                    lines.push(line.to_string());
                }
            }
            Sink::Disabled => {}
        }
    }

    /// Lines captured by a memory logger (empty for every other sink).
    pub fn lines(&self) -> Vec<String> {
        match &self.shared.sink {
            Sink::Memory(lines) => lines.lock().map(|l| l.clone()).unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Mirror panics into this log before running the previous hook.
    pub fn install_panic_hook(&self) {
        let logger = self.clone();
        let prev = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            logger.write_line(&format!("[{}] [PANIC] {}", timestamp(), info));
            prev(info);
        }));
    }
}

/// `<data dir>/PixelScribe/pixelscribe.log`.
pub fn default_log_path() -> PathBuf {
    data_dir(|key| std::env::var_os(key))
        .join("PixelScribe")
        .join("pixelscribe.log")
}

/// Per-user data directory, resolved through `var` so lookups can be faked.
/// Falls back to the working directory when nothing is set.
fn data_dir(var: impl Fn(&str) -> Option<OsString>) -> PathBuf {
    let native = if cfg!(target_os = "windows") {
        var("APPDATA").map(PathBuf::from)
    } else if cfg!(target_os = "macos") {
        var("HOME").map(|home| Path::new(&home).join("Library").join("Application Support"))
    } else {
        None
    };

    native
        .or_else(|| var("XDG_DATA_HOME").map(PathBuf::from))
        .or_else(|| var("HOME").map(|home| Path::new(&home).join(".local").join("share")))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn unix_seconds() -> Option<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
}

/// `HH:MM:SS` within the UTC day.
fn clock(secs: u64) -> String {
    let day = secs % 86_400;
    format!("{:02}:{:02}:{:02}", day / 3600, day % 3600 / 60, day % 60)
}

fn timestamp() -> String {
    unix_seconds().map_or_else(|| "??:??:??".to_string(), clock)
}
