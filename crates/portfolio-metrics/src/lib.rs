//! portfolio-metrics: fire-and-forget metric emission for the portfolio service.
//!
//! A [`MetricSink`] accepts counters and timings and hands out per-call
//! [`RequestTracker`]s. Emission is best effort: every operation returns a
//! [`MetricsResult`] that callers are expected to ignore or log, never
//! propagate into business logic.
//!
//! # Architecture
//!
//! ```text
//! MetricSink
//!   ├── StatsdSink  → one UDP datagram per metric (non-blocking try_send)
//!   ├── NopSink     → no I/O, used when no StatsD address is configured
//!   └── MemorySink  → in-memory line buffer for tests
//!
//! sink.start(subject, operation) → Box<dyn RequestTracker>
//!   ├── succeeded()          → <subject>.<operation>.succeeded + timing
//!   ├── failed()             → <subject>.<operation>.failed + timing
//!   ├── failed_with_error(e) → failed + timing, tagged error:<sanitized>
//!   └── finished()           → timing tagged status:finished
//! ```
//!
//! # Wire format
//!
//! `prefix.subject.operation.suffix:value|type[|#tag1,tag2]\n` where `type`
//! is `c` for counters and `ms` for integer-millisecond timings.

pub mod error;
pub mod memory;
pub mod sink;
pub mod statsd;
pub mod tracker;

pub use error::{MetricsError, MetricsResult};
pub use memory::MemorySink;
pub use sink::{MetricSink, NopSink, NopTracker};
pub use statsd::{format_line, MetricKind, StatsdConfig, StatsdSink, DEFAULT_PREFIX};
pub use tracker::{sanitize_tag, RequestTracker, Tracker};
