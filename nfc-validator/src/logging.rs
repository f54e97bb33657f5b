// nfc-validator/src/logging.rs
//! Event log collaborator.
//!
//! The reader and ticketing layers report what they do through an
//! [`EventLog`]. Logging is fire-and-forget: nothing here returns an error.

use log::{error, info};

use crate::Error;

pub trait EventLog {
    fn record(&mut self, message: &str);

    fn record_error(&mut self, err: &Error);

    /// Flush deferred entries. Immediate logs have nothing to do.
    fn commit(&mut self) {}
}

/// Forwards every entry to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFacade;

impl EventLog for LogFacade {
    fn record(&mut self, message: &str) {
        info!("{}", message);
    }

    fn record_error(&mut self, err: &Error) {
        error!("{} ({:?})", err, err.kind());
    }
}

/// Entry kept by the buffering logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Message(String),
    Error(String),
}

/// Accumulates entries and hands them to the `log` facade on `commit`.
#[derive(Debug, Default)]
pub struct BufferedLog {
    pending: Vec<LogEntry>,
}

impl BufferedLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[LogEntry] {
        &self.pending
    }
}

impl EventLog for BufferedLog {
    fn record(&mut self, message: &str) {
        self.pending.push(LogEntry::Message(message.to_string()));
    }

    fn record_error(&mut self, err: &Error) {
        self.pending.push(LogEntry::Error(err.to_string()));
    }

    fn commit(&mut self) {
        for entry in self.pending.drain(..) {
            match entry {
                LogEntry::Message(m) => info!("{}", m),
                LogEntry::Error(e) => error!("{}", e),
            }
        }
    }
}

/// Keeps every entry in memory, for tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryLog {
    pub entries: Vec<LogEntry>,
    pub commits: usize,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| match e {
            LogEntry::Message(m) => Some(m.as_str()),
            LogEntry::Error(_) => None,
        })
    }

    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| match e {
            LogEntry::Error(m) => Some(m.as_str()),
            LogEntry::Message(_) => None,
        })
    }
}

impl EventLog for MemoryLog {
    fn record(&mut self, message: &str) {
        self.entries.push(LogEntry::Message(message.to_string()));
    }

    fn record_error(&mut self, err: &Error) {
        self.entries.push(LogEntry::Error(err.to_string()));
    }

    fn commit(&mut self) {
        self.commits += 1;
    }
}

impl<T: EventLog + ?Sized> EventLog for Box<T> {
    fn record(&mut self, message: &str) {
        (**self).record(message)
    }

    fn record_error(&mut self, err: &Error) {
        (**self).record_error(err)
    }

    fn commit(&mut self) {
        (**self).commit()
    }
}
