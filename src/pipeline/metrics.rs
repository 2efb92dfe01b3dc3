//! Counters collected over a benchmark matrix run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Metrics for a run. Counters are atomic so the pipeline can hold them
/// behind a shared reference while mutating.
#[derive(Debug)]
pub struct Metrics {
    /// Sources compiled (shims and benchmarks)
    pub compiles: AtomicU64,

    /// Benchmark runs completed
    pub runs_completed: AtomicU64,

    /// Result CSV files collected into the working directory
    pub csv_collected: AtomicU64,

    start: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            compiles: AtomicU64::new(0),
            runs_completed: AtomicU64::new(0),
            csv_collected: AtomicU64::new(0),
            start: Instant::now(),
        }
    }

    pub fn add_compile(&self) {
        self.compiles.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_run_completed(&self) {
        self.runs_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_csv_collected(&self, count: u64) {
        self.csv_collected.fetch_add(count, Ordering::Relaxed);
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl std::fmt::Display for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "compiles: {}, runs: {}, csv files: {}, elapsed: {:.1}s",
            self.compiles.load(Ordering::Relaxed),
            self.runs_completed.load(Ordering::Relaxed),
            self.csv_collected.load(Ordering::Relaxed),
            self.elapsed().as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = Metrics::new();
        metrics.add_compile();
        metrics.add_compile();
        metrics.add_run_completed();
        metrics.add_csv_collected(3);

        assert_eq!(metrics.compiles.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.runs_completed.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.csv_collected.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_display() {
        let metrics = Metrics::new();
        metrics.add_run_completed();
        let text = format!("{}", metrics);
        assert!(text.contains("runs: 1"));
    }
}
