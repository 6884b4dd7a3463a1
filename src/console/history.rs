//! Interaction History Module
//!
//! Time-stamped, append-only record of submitted lines. Uses a ring buffer
//! capped at a maximum size (oldest entries evicted first) and can optionally
//! keep only the most recent copy of repeated lines.
//!
//! On disk every entry is a timestamp line followed by the entry text:
//!
//! ```text
//! ### 2024-05-01 14:03:12.481
//! help
//! ```

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::Path;

use chrono::{Local, NaiveDateTime};

/// Timestamp layout used both for display and for the history file
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

const TIMESTAMP_MARKER: &str = "### ";

/// A submitted line and when it was submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub timestamp: NaiveDateTime,
    pub text: String,
}

impl HistoryEntry {
    /// Create an entry stamped with the current local time
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            text: text.into(),
        }
    }

    /// Timestamp rendered with [`TIMESTAMP_FORMAT`]
    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Bounded interaction history
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    max_size: usize,
    unique: bool,
}

impl History {
    /// Create an empty history holding at most `max_size` entries
    pub fn new(max_size: usize, unique: bool) -> Self {
        Self {
            entries: VecDeque::new(),
            max_size,
            unique,
        }
    }

    /// Append a line stamped with the current time; empty lines are ignored
    pub fn add(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.push(HistoryEntry::new(text));
    }

    /// Append an existing entry, applying the uniqueness and size rules
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.max_size == 0 {
            return;
        }

        if self.unique {
            self.entries.retain(|existing| existing.text != entry.text);
        }

        while self.entries.len() >= self.max_size {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Change the size cap, evicting the oldest entries if needed
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
        while self.entries.len() > max_size {
            self.entries.pop_front();
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Enable or disable deduplication for future appends
    pub fn set_unique(&mut self, unique: bool) {
        self.unique = unique;
    }

    /// Entries oldest first
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Get the most recent entry
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Read every entry stored in a history file.
    ///
    /// Text lines without a preceding timestamp line get the current time.
    pub fn read_file(path: &Path) -> io::Result<Vec<HistoryEntry>> {
        let content = fs::read_to_string(path)?;
        let mut entries = Vec::new();
        let mut pending: Option<NaiveDateTime> = None;

        for line in content.lines() {
            if let Some(stamp) = line.strip_prefix(TIMESTAMP_MARKER) {
                let parsed = NaiveDateTime::parse_from_str(stamp.trim(), TIMESTAMP_FORMAT);
                if let Ok(timestamp) = parsed {
                    pending = Some(timestamp);
                    continue;
                }
            }

            if line.is_empty() {
                continue;
            }

            let mut entry = HistoryEntry::new(line);
            if let Some(timestamp) = pending.take() {
                entry.timestamp = timestamp;
            }
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Write the whole history to `path`, replacing its content
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut content = String::new();
        for entry in &self.entries {
            content.push_str(TIMESTAMP_MARKER);
            content.push_str(&entry.timestamp_string());
            content.push('\n');
            content.push_str(&entry.text);
            content.push('\n');
        }
        fs::write(path, content)
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(10_000, true)
    }
}
