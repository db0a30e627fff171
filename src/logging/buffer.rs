//! This module provides a bounded buffer of recently written log lines.
//!
//! The `LogBuffer` is teed next to the terminal sink so the `logs` menu
//! command can replay what scrolled past.
use super::{Channel, LogSink};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A ring buffer of the most recent lines.
pub struct LogBuffer {
    /// The circular buffer of lines.
    entries: Mutex<VecDeque<(Channel, String)>>,
    /// The maximum number of lines to keep.
    max_size: usize,
}

impl LogBuffer {
    /// Creates a new `LogBuffer`.
    ///
    /// # Arguments
    ///
    /// * `max_size` - The maximum number of lines to store in the buffer.
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(max_size)),
            max_size,
        }
    }

    /// Returns up to `count` of the most recent lines, oldest first.
    pub fn recent(&self, count: usize) -> Vec<(Channel, String)> {
        let entries = self.lock();
        let skip = entries.len().saturating_sub(count);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<(Channel, String)>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl LogSink for LogBuffer {
    fn write(&self, channel: Channel, line: &str) {
        if self.max_size == 0 {
            return;
        }
        let mut entries = self.lock();
        if entries.len() >= self.max_size {
            entries.pop_front();
        }
        entries.push_back((channel, line.to_string()));
    }
}
