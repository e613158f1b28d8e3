//! In-memory sink that records every metric as a StatsD line.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::error::MetricsResult;
use crate::sink::MetricSink;
use crate::statsd::{format_line, MetricKind};
use crate::tracker::{RequestTracker, Tracker};

/// Sink that keeps formatted lines in memory instead of sending them.
///
/// Clones share the same buffer, so a test can hand one clone to the code
/// under test and inspect another.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    prefix: String,
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// Create a sink with no metric prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that prefixes every metric name like a real client would.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            lines: Arc::default(),
        }
    }

    /// Snapshot of the recorded lines, without trailing newlines.
    pub fn lines(&self) -> Vec<String> {
        self.buffer().clone()
    }

    /// Number of recorded lines containing `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.buffer().iter().filter(|l| l.contains(needle)).count()
    }

    /// Drop everything recorded so far.
    pub fn clear(&self) {
        self.buffer().clear();
    }

    fn buffer(&self) -> MutexGuard<'_, Vec<String>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, name: &str, value: i64, kind: MetricKind, tags: &[&str]) {
        let line = format_line(&self.prefix, name, value, kind, tags);
        self.buffer().push(line.trim_end().to_string());
    }
}

impl MetricSink for MemorySink {
    fn increment(&self, name: &str, tags: &[&str]) -> MetricsResult<()> {
        self.count(name, 1, tags)
    }

    fn count(&self, name: &str, value: i64, tags: &[&str]) -> MetricsResult<()> {
        self.record(name, value, MetricKind::Counter, tags);
        Ok(())
    }

    fn timing(&self, name: &str, duration: Duration, tags: &[&str]) -> MetricsResult<()> {
        let millis = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        self.record(name, millis, MetricKind::Timing, tags);
        Ok(())
    }

    fn start(&self, subject: &str, operation: &str) -> Box<dyn RequestTracker> {
        Box::new(Tracker::start(self.clone(), subject, operation))
    }
}
