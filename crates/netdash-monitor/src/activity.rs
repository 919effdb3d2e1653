use chrono::{DateTime, Local};

/// `log` target every activity entry is forwarded under.
pub const ACTIVITY_LOG_TARGET: &str = "netdash::activity";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

/// Human-readable session history shown in the dashboard. Append-only and
/// uncapped; every entry is also forwarded to the `log` facade.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: Vec<LogEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        log::log!(target: ACTIVITY_LOG_TARGET, log::Level::from(level), "{message}");
        self.entries.push(LogEntry {
            at: Local::now(),
            level,
            message,
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Error, message);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Newest `count` entries, oldest first.
    pub fn tail(&self, count: usize) -> &[LogEntry] {
        let start = self.entries.len().saturating_sub(count);
        &self.entries[start..]
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_keeps_newest_at_bottom() {
        let mut log = ActivityLog::new();
        for n in 0..5 {
            log.info(format!("entry {n}"));
        }
        let tail: Vec<&str> = log.tail(2).iter().map(|e| e.message.as_str()).collect();
        assert_eq!(tail, vec!["entry 3", "entry 4"]);
        assert_eq!(log.tail(50).len(), 5);
    }
}
