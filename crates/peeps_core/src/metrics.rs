//! Metrics collection and logging setup for the simulation.
//!
//! The world only talks to a [`MetricsSink`]; [`Metrics`] keeps simple
//! in-memory aggregates and [`NoopSink`] drops everything.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Receiver for named numeric samples.
pub trait MetricsSink: Send + Sync {
    fn record(&self, name: &str, value: f64);

    /// Called once per completed turn.
    fn turn_completed(&self, _turn: u64) {}
}

/// Sink that discards every sample.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl MetricsSink for NoopSink {
    fn record(&self, _name: &str, _value: f64) {}
}

/// Aggregate of all samples recorded under one name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Series {
    pub count: u64,
    pub last: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
}

impl Series {
    fn new(value: f64) -> Self {
        Self {
            count: 1,
            last: value,
            min: value,
            max: value,
            sum: value,
        }
    }

    fn push(&mut self, value: f64) {
        self.count += 1;
        self.last = value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// In-memory metrics collector.
pub struct Metrics {
    turn_count: AtomicU64,
    series: Mutex<BTreeMap<String, Series>>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            turn_count: AtomicU64::new(0),
            series: Mutex::new(BTreeMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Number of turns reported through [`MetricsSink::turn_completed`].
    #[must_use]
    pub fn turn_count(&self) -> u64 {
        self.turn_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn series(&self, name: &str) -> Option<Series> {
        self.series
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .copied()
    }

    /// Copy of every series, ordered by name.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, Series> {
        self.series
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl MetricsSink for Metrics {
    fn record(&self, name: &str, value: f64) {
        let mut series = self.series.lock().unwrap_or_else(|e| e.into_inner());
        series
            .entry(name.to_string())
            .and_modify(|s| s.push(value))
            .or_insert_with(|| Series::new(value));
    }

    fn turn_completed(&self, turn: u64) {
        let count = self.turn_count.fetch_add(1, Ordering::Relaxed) + 1;
        if count.is_multiple_of(1000) {
            tracing::info!(
                turn,
                elapsed_ms = self.elapsed().as_millis() as u64,
                "Simulation turn"
            );
        }
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set. Calling this twice is
/// harmless; the second call is ignored.
pub fn init_logging(default_filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .finish(),
    )
    .ok();
}
