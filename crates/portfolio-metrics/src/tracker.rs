//! Per-call request tracking.
//!
//! A tracker is created when an operation begins and reports elapsed time
//! plus an outcome when it ends. The outcome calls (`succeeded`, `failed`,
//! `failed_with_error`) emit one counter and one timing each; `finished`
//! emits a single neutral timing and is meant to run unconditionally at
//! scope exit, so a call that also reported an outcome produces two timings.

use std::fmt;
use std::time::Instant;

use crate::error::MetricsResult;
use crate::sink::MetricSink;

/// Longest tag value produced by [`sanitize_tag`], in characters.
const MAX_TAG_LEN: usize = 50;

/// Handle for a single in-flight call.
pub trait RequestTracker: Send {
    /// The call completed successfully.
    fn succeeded(&self) -> MetricsResult<()>;

    /// The call failed without a reportable reason.
    fn failed(&self) -> MetricsResult<()>;

    /// The call failed; the reason is attached as a sanitized `error:` tag.
    fn failed_with_error(&self, err: &dyn fmt::Display) -> MetricsResult<()>;

    /// Neutral completion timing, independent of the outcome.
    fn finished(&self) -> MetricsResult<()>;
}

/// Tracker that emits through any [`MetricSink`].
///
/// Metric names are `<subject>.<operation>.<suffix>`; the sink adds its
/// own prefix.
pub struct Tracker<S> {
    sink: S,
    subject: String,
    operation: String,
    started: Instant,
}

impl<S: MetricSink> Tracker<S> {
    /// Start tracking and emit the `started` counter.
    pub fn start(sink: S, subject: &str, operation: &str) -> Self {
        let tracker = Self {
            sink,
            subject: subject.to_string(),
            operation: operation.to_string(),
            started: Instant::now(),
        };
        let _ = tracker.sink.increment(&tracker.metric_name("started"), &[]);
        tracker
    }

    fn metric_name(&self, suffix: &str) -> String {
        format!("{}.{}.{}", self.subject, self.operation, suffix)
    }

    /// Emit the outcome counter and the timing, attempting both even if the
    /// first send fails.
    fn report(&self, outcome: &str, outcome_tags: &[&str], timing_tags: &[&str]) -> MetricsResult<()> {
        let elapsed = self.started.elapsed();
        let counted = self.sink.increment(&self.metric_name(outcome), outcome_tags);
        let timed = self
            .sink
            .timing(&self.metric_name("timing"), elapsed, timing_tags);
        counted.and(timed)
    }
}

impl<S: MetricSink + 'static> RequestTracker for Tracker<S> {
    fn succeeded(&self) -> MetricsResult<()> {
        self.report("succeeded", &[], &["status:success"])
    }

    fn failed(&self) -> MetricsResult<()> {
        self.report("failed", &[], &["status:failed"])
    }

    fn failed_with_error(&self, err: &dyn fmt::Display) -> MetricsResult<()> {
        let error_tag = format!("error:{}", sanitize_tag(&err.to_string()));
        self.report(
            "failed",
            &[error_tag.as_str()],
            &["status:failed", error_tag.as_str()],
        )
    }

    fn finished(&self) -> MetricsResult<()> {
        self.sink.timing(
            &self.metric_name("timing"),
            self.started.elapsed(),
            &["status:finished"],
        )
    }
}

/// Reduce arbitrary text to a safe tag value.
///
/// Keeps the first 50 characters. ASCII letters, digits, `-`, `_` and `.`
/// pass through; runs of spaces and colons collapse into a single `_`;
/// anything else is dropped. An empty result becomes `"unknown"`.
pub fn sanitize_tag(input: &str) -> String {
    let mut out = String::with_capacity(MAX_TAG_LEN);
    let mut pending_separator = false;

    for c in input.chars().take(MAX_TAG_LEN) {
        if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
            if pending_separator {
                out.push('_');
                pending_separator = false;
            }
            out.push(c);
        } else if matches!(c, ' ' | ':') {
            pending_separator = true;
        }
    }
    if pending_separator {
        out.push('_');
    }

    if out.is_empty() {
        "unknown".to_string()
    } else {
        out
    }
}
