//! StatsD client over UDP.
//!
//! Each metric becomes one datagram. Sends use `try_send` on a connected
//! socket, so emission never waits: a full socket buffer or an unreachable
//! collector yields an error that callers drop. There is no acknowledgment
//! and no retry.

use std::fmt::Write;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::UdpSocket;
use tracing::{debug, trace};

use crate::error::{MetricsError, MetricsResult};
use crate::sink::MetricSink;
use crate::tracker::{RequestTracker, Tracker};

/// Prefix applied to every metric unless configured otherwise.
pub const DEFAULT_PREFIX: &str = "portfolio_grpc.api";

/// Upper bound on resolving and connecting to the collector at startup.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// StatsD metric type marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Timing,
}

impl MetricKind {
    fn suffix(self) -> &'static str {
        match self {
            MetricKind::Counter => "c",
            MetricKind::Timing => "ms",
        }
    }
}

/// Format one metric line, including the trailing newline.
///
/// `portfolio_grpc.api.skills.GetSkill.failed:1|c|#error:skill_not_found\n`
pub fn format_line(prefix: &str, name: &str, value: i64, kind: MetricKind, tags: &[&str]) -> String {
    let mut line = String::with_capacity(prefix.len() + name.len() + 32);
    if !prefix.is_empty() {
        line.push_str(prefix);
        line.push('.');
    }
    let _ = write!(line, "{name}:{value}|{}", kind.suffix());
    if !tags.is_empty() {
        line.push_str("|#");
        line.push_str(&tags.join(","));
    }
    line.push('\n');
    line
}

/// Where to send metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsdConfig {
    /// Collector host name or IP.
    pub host: String,
    /// Collector UDP port.
    pub port: u16,
    /// Prepended to every metric name.
    pub prefix: String,
}

/// UDP StatsD sink. Cheap to clone; clones share one socket.
#[derive(Debug, Clone)]
pub struct StatsdSink {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    socket: UdpSocket,
    prefix: String,
}

impl StatsdSink {
    /// Resolve the collector and connect a local UDP socket to it.
    pub async fn connect(config: &StatsdConfig) -> MetricsResult<Self> {
        let target = format!("{}:{}", config.host, config.port);
        let socket = tokio::time::timeout(CONNECT_TIMEOUT, connect_socket(&target))
            .await
            .map_err(|_| MetricsError::Timeout(target.clone()))??;

        debug!(%target, prefix = %config.prefix, "statsd sink connected");
        Ok(Self {
            inner: Arc::new(Inner {
                socket,
                prefix: config.prefix.clone(),
            }),
        })
    }

    /// Address of the collector this sink sends to.
    pub fn peer_addr(&self) -> MetricsResult<SocketAddr> {
        Ok(self.inner.socket.peer_addr()?)
    }

    fn send(&self, name: &str, value: i64, kind: MetricKind, tags: &[&str]) -> MetricsResult<()> {
        let line = format_line(&self.inner.prefix, name, value, kind, tags);
        if let Err(e) = self.inner.socket.try_send(line.as_bytes()) {
            trace!(error = %e, metric = %name, "statsd send dropped");
            return Err(e.into());
        }
        Ok(())
    }
}

async fn connect_socket(target: &str) -> MetricsResult<UdpSocket> {
    let remote = tokio::net::lookup_host(target)
        .await?
        .next()
        .ok_or_else(|| MetricsError::Resolve(target.to_string()))?;

    let local = if remote.is_ipv4() {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
    } else {
        SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
    };

    let socket = UdpSocket::bind(local).await?;
    socket.connect(remote).await?;
    // `try_send` only succeeds once the reactor has seen the socket writable.
    socket.writable().await?;
    Ok(socket)
}

impl MetricSink for StatsdSink {
    fn increment(&self, name: &str, tags: &[&str]) -> MetricsResult<()> {
        self.count(name, 1, tags)
    }

    fn count(&self, name: &str, value: i64, tags: &[&str]) -> MetricsResult<()> {
        self.send(name, value, MetricKind::Counter, tags)
    }

    fn timing(&self, name: &str, duration: Duration, tags: &[&str]) -> MetricsResult<()> {
        let millis = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        self.send(name, millis, MetricKind::Timing, tags)
    }

    fn start(&self, subject: &str, operation: &str) -> Box<dyn RequestTracker> {
        Box::new(Tracker::start(self.clone(), subject, operation))
    }
}
