//! Process-wide codec log.
//!
//! Messages are kept in a bounded ring so a long transmission cannot grow the
//! log without limit. With echo enabled each entry is also written to stderr
//! as it is recorded.

use chrono::Local;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Entries retained by the global logger.
pub const LOG_CAPACITY: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Success => write!(f, "OK"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogMessage {
    pub timestamp: chrono::DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

impl std::fmt::Display for LogMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{}] {:<4} {}", self.timestamp.format("%H:%M:%S"), self.level, self.message)
    }
}

pub struct Logger {
    entries: Mutex<VecDeque<LogMessage>>,
    capacity: usize,
}

impl Logger {
    pub fn new(capacity: usize) -> Self {
        Logger { entries: Mutex::new(VecDeque::with_capacity(capacity.min(LOG_CAPACITY))), capacity }
    }

    // A panic while holding the lock leaves the ring intact, so keep using it.
    fn entries(&self) -> MutexGuard<'_, VecDeque<LogMessage>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        let entry = LogMessage { timestamp: Local::now(), level, message: message.into() };
        if is_echo() {
            eprintln!("{}", entry);
        }

        let mut entries = self.entries();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        if self.capacity > 0 {
            entries.push_back(entry);
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    /// Snapshot of the retained entries, oldest first.
    pub fn get_messages(&self) -> Vec<LogMessage> {
        self.entries().iter().cloned().collect()
    }
}

lazy_static::lazy_static! {
    static ref GLOBAL_LOGGER: Arc<Logger> = Arc::new(Logger::new(LOG_CAPACITY));
}

static VERBOSE_MODE: AtomicBool = AtomicBool::new(false);
static ECHO_MODE: AtomicBool = AtomicBool::new(false);

/// Enables the `log_verbose!` messages.
pub fn set_verbose(verbose: bool) {
    VERBOSE_MODE.store(verbose, Ordering::SeqCst);
}

pub fn is_verbose() -> bool {
    VERBOSE_MODE.load(Ordering::SeqCst)
}

/// Mirror every logged message to stderr as it is recorded.
pub fn set_echo(echo: bool) {
    ECHO_MODE.store(echo, Ordering::SeqCst);
}

pub fn is_echo() -> bool {
    ECHO_MODE.load(Ordering::SeqCst)
}

pub fn get_logger() -> Arc<Logger> {
    Arc::clone(&GLOBAL_LOGGER)
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logging::get_logger().info(format!($($arg)*))
    }
}

#[macro_export]
macro_rules! log_success {
    ($($arg:tt)*) => {
        $crate::logging::get_logger().success(format!($($arg)*))
    }
}

#[macro_export]
macro_rules! log_verbose {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            $crate::logging::get_logger().info(format!($($arg)*));
        }
    }
}
