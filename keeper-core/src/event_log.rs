//! Capped, most-recent-first event log shared by both trackers
use serde::{Deserialize, Serialize};

/// Classification of a log entry, used by the UI to pick styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    #[default]
    Normal,
    Round,
    Important,
    Success,
    Failure,
    Hazard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub message: String,
    pub kind: EventKind,
}

/// Append-only log with newest entries first, dropping the oldest past `cap`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    entries: Vec<LogEntry>,
    cap: usize,
}

impl EventLog {
    #[must_use]
    pub fn with_cap(cap: usize) -> Self {
        Self {
            entries: Vec::new(),
            cap,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, kind: EventKind) {
        self.entries.insert(
            0,
            LogEntry {
                message: message.into(),
                kind,
            },
        );
        if self.entries.len() > self.cap {
            self.entries.pop();
        }
    }

    /// Entries, newest first.
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_entry_first() {
        let mut log = EventLog::with_cap(10);
        log.push("one", EventKind::Normal);
        log.push("two", EventKind::Round);
        assert_eq!(log.latest().map(|e| e.message.as_str()), Some("two"));
        assert_eq!(log.entries()[1].message, "one");
    }

    #[test]
    fn cap_drops_oldest() {
        let mut log = EventLog::with_cap(3);
        for i in 0..5 {
            log.push(format!("entry {i}"), EventKind::Normal);
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.latest().map(|e| e.message.as_str()), Some("entry 4"));
        assert_eq!(log.entries()[2].message, "entry 2");
    }
}
