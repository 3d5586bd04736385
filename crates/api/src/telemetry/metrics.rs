//! Prometheus metrics registry for the HTTP surface.
//!
//! The recorder is owned by [`HttpMetrics`] and handed to the middleware and
//! the scrape handler explicitly. Nothing is installed as the process-global
//! `metrics` recorder.

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusRecorder};

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
pub const ACTIVE_CONNECTIONS: &str = "active_connections";

const PROCESS_START_TIME_SECONDS: &str = "process_start_time_seconds";
const PROCESS_UPTIME_SECONDS: &str = "process_uptime_seconds";
const PROCESS_CPU_SECONDS_TOTAL: &str = "process_cpu_seconds_total";
const PROCESS_RESIDENT_MEMORY_BYTES: &str = "process_resident_memory_bytes";
const PROCESS_VIRTUAL_MEMORY_BYTES: &str = "process_virtual_memory_bytes";
const TOKIO_WORKERS_COUNT: &str = "tokio_workers_count";
const TOKIO_ALIVE_TASKS: &str = "tokio_alive_tasks";

/// Latency buckets in seconds.
const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Series that must appear in every scrape, even before the first sample.
const DECLARED_SERIES: &[(&str, &str, &str)] = &[
    (HTTP_REQUESTS_TOTAL, "counter", "Total number of HTTP requests"),
    (
        HTTP_REQUEST_DURATION_SECONDS,
        "histogram",
        "Duration of HTTP requests in seconds",
    ),
    (ACTIVE_CONNECTIONS, "gauge", "Number of active connections"),
];

/// Shared handle to the request metrics registry. Cheap to clone.
#[derive(Clone)]
pub struct HttpMetrics {
    recorder: Arc<PrometheusRecorder>,
    started_at: Instant,
    started_unix: f64,
}

impl std::fmt::Debug for HttpMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMetrics")
            .field("started_unix", &self.started_unix)
            .finish_non_exhaustive()
    }
}

impl HttpMetrics {
    /// Builds a fresh, empty registry.
    pub fn new() -> Result<Self, BuildError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(HTTP_REQUEST_DURATION_SECONDS.to_string()),
                DURATION_BUCKETS,
            )?
            .build_recorder();

        let started_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();

        let metrics = Self {
            recorder: Arc::new(recorder),
            started_at: Instant::now(),
            started_unix,
        };
        metrics.describe();
        Ok(metrics)
    }

    fn describe(&self) {
        ::metrics::with_local_recorder(self.recorder.as_ref(), || {
            ::metrics::describe_counter!(HTTP_REQUESTS_TOTAL, "Total number of HTTP requests");
            ::metrics::describe_histogram!(
                HTTP_REQUEST_DURATION_SECONDS,
                ::metrics::Unit::Seconds,
                "Duration of HTTP requests in seconds"
            );
            ::metrics::describe_gauge!(ACTIVE_CONNECTIONS, "Number of active connections");
            ::metrics::describe_gauge!(
                PROCESS_START_TIME_SECONDS,
                ::metrics::Unit::Seconds,
                "Start time of the process since unix epoch in seconds"
            );
            ::metrics::describe_gauge!(
                PROCESS_UPTIME_SECONDS,
                ::metrics::Unit::Seconds,
                "Seconds since the process started"
            );
            ::metrics::describe_gauge!(
                PROCESS_CPU_SECONDS_TOTAL,
                ::metrics::Unit::Seconds,
                "Total user and system CPU time spent in seconds"
            );
            ::metrics::describe_gauge!(
                PROCESS_RESIDENT_MEMORY_BYTES,
                ::metrics::Unit::Bytes,
                "Resident memory size in bytes"
            );
            ::metrics::describe_gauge!(
                PROCESS_VIRTUAL_MEMORY_BYTES,
                ::metrics::Unit::Bytes,
                "Virtual memory size in bytes"
            );
            ::metrics::describe_gauge!(TOKIO_WORKERS_COUNT, "Number of tokio runtime workers");
            ::metrics::describe_gauge!(TOKIO_ALIVE_TASKS, "Number of alive tokio tasks");

            ::metrics::gauge!(ACTIVE_CONNECTIONS).set(0.0);
        });
    }

    /// Time since the registry (and with it the process) started.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Records one completed request.
    pub fn record_request(&self, method: &str, route: &str, status: u16, elapsed: Duration) {
        let labels = [
            ("method", method.to_owned()),
            ("route", route.to_owned()),
            ("status", status.to_string()),
        ];
        ::metrics::with_local_recorder(self.recorder.as_ref(), || {
            ::metrics::counter!(HTTP_REQUESTS_TOTAL, &labels).increment(1);
            ::metrics::histogram!(HTTP_REQUEST_DURATION_SECONDS, &labels)
                .record(elapsed.as_secs_f64());
        });
    }

    /// Marks a request as in flight until the returned guard is dropped.
    pub fn track_connection(&self) -> ConnectionGuard {
        self.adjust_active(1.0);
        ConnectionGuard {
            metrics: self.clone(),
        }
    }

    fn adjust_active(&self, delta: f64) {
        ::metrics::with_local_recorder(self.recorder.as_ref(), || {
            ::metrics::gauge!(ACTIVE_CONNECTIONS).increment(delta);
        });
    }

    /// Refreshes the runtime gauges and renders the text exposition format.
    pub fn render(&self) -> String {
        self.refresh_runtime();
        let mut out = self.recorder.handle().render();
        declare_missing_series(&mut out);
        out
    }

    fn refresh_runtime(&self) {
        let uptime = self.uptime().as_secs_f64();
        let cpu = process_cpu_seconds();
        let memory = memory_stats::memory_stats();
        let runtime = tokio::runtime::Handle::try_current().ok().map(|handle| {
            let m = handle.metrics();
            (m.num_workers(), m.num_alive_tasks())
        });

        ::metrics::with_local_recorder(self.recorder.as_ref(), || {
            ::metrics::gauge!(PROCESS_START_TIME_SECONDS).set(self.started_unix);
            ::metrics::gauge!(PROCESS_UPTIME_SECONDS).set(uptime);
            if let Some(cpu) = cpu {
                ::metrics::gauge!(PROCESS_CPU_SECONDS_TOTAL).set(cpu);
            }
            if let Some(usage) = memory {
                ::metrics::gauge!(PROCESS_RESIDENT_MEMORY_BYTES).set(usage.physical_mem as f64);
                ::metrics::gauge!(PROCESS_VIRTUAL_MEMORY_BYTES).set(usage.virtual_mem as f64);
            }
            if let Some((workers, alive)) = runtime {
                ::metrics::gauge!(TOKIO_WORKERS_COUNT).set(workers as f64);
                ::metrics::gauge!(TOKIO_ALIVE_TASKS).set(alive as f64);
            }
        });
    }
}

/// Decrements `active_connections` on drop, including when the request
/// future is cancelled.
#[must_use]
pub struct ConnectionGuard {
    metrics: HttpMetrics,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.metrics.adjust_active(-1.0);
    }
}

/// User plus system CPU time consumed by this process so far.
#[cfg(unix)]
fn process_cpu_seconds() -> Option<f64> {
    let mut usage = std::mem::MaybeUninit::<libc::rusage>::uninit();
    // SAFETY: getrusage only writes into the buffer we hand it.
    let ret = unsafe { libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) };
    if ret != 0 {
        return None;
    }
    // SAFETY: a zero return means the struct was filled in.
    let usage = unsafe { usage.assume_init() };
    let seconds = |tv: libc::timeval| tv.tv_sec as f64 + tv.tv_usec as f64 / 1_000_000.0;
    Some(seconds(usage.ru_utime) + seconds(usage.ru_stime))
}

#[cfg(not(unix))]
fn process_cpu_seconds() -> Option<f64> {
    None
}

// The exporter only emits series that have a sample. Labelled series with no
// samples yet still get their HELP/TYPE header.
fn declare_missing_series(out: &mut String) {
    for (name, kind, help) in DECLARED_SERIES {
        if out.contains(&format!("# TYPE {name} ")) {
            continue;
        }
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&format!("# HELP {name} {help}\n# TYPE {name} {kind}\n"));
    }
}
