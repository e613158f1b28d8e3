//! The `MetricSink` contract and its no-op implementation.

use std::fmt;
use std::time::Duration;

use crate::error::MetricsResult;
use crate::tracker::RequestTracker;

/// Destination for counters and timings.
///
/// Implementations must be cheap to call inline on a request path. Every
/// method returns a [`MetricsResult`] so failures can be observed, but no
/// caller is allowed to fail a request because of one.
pub trait MetricSink: Send + Sync {
    /// Increment counter `name` by one.
    fn increment(&self, name: &str, tags: &[&str]) -> MetricsResult<()>;

    /// Add `value` to counter `name`.
    fn count(&self, name: &str, value: i64, tags: &[&str]) -> MetricsResult<()>;

    /// Record a timing for `name`, truncated to whole milliseconds.
    fn timing(&self, name: &str, duration: Duration, tags: &[&str]) -> MetricsResult<()>;

    /// Begin tracking a single call of `operation` on `subject`.
    fn start(&self, subject: &str, operation: &str) -> Box<dyn RequestTracker>;
}

/// Sink that performs no I/O. Used when no metrics backend is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopSink;

impl MetricSink for NopSink {
    fn increment(&self, _name: &str, _tags: &[&str]) -> MetricsResult<()> {
        Ok(())
    }

    fn count(&self, _name: &str, _value: i64, _tags: &[&str]) -> MetricsResult<()> {
        Ok(())
    }

    fn timing(&self, _name: &str, _duration: Duration, _tags: &[&str]) -> MetricsResult<()> {
        Ok(())
    }

    fn start(&self, _subject: &str, _operation: &str) -> Box<dyn RequestTracker> {
        Box::new(NopTracker)
    }
}

/// Tracker handed out by [`NopSink`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NopTracker;

impl RequestTracker for NopTracker {
    fn succeeded(&self) -> MetricsResult<()> {
        Ok(())
    }

    fn failed(&self) -> MetricsResult<()> {
        Ok(())
    }

    fn failed_with_error(&self, _err: &dyn fmt::Display) -> MetricsResult<()> {
        Ok(())
    }

    fn finished(&self) -> MetricsResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nop_sink_never_fails() {
        let sink = NopSink;
        assert!(sink.increment("a", &[]).is_ok());
        assert!(sink.count("a", 42, &["k:v"]).is_ok());
        assert!(sink.timing("a", Duration::from_millis(3), &[]).is_ok());
    }

    #[test]
    fn nop_tracker_never_fails() {
        let tracker = NopSink.start("skills", "GetSkill");
        assert!(tracker.succeeded().is_ok());
        assert!(tracker.failed().is_ok());
        assert!(tracker.failed_with_error(&"boom").is_ok());
        assert!(tracker.finished().is_ok());
    }
}
