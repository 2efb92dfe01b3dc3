//! Benchmark source discovery and per-benchmark working directories.

mod discover;
mod workspace;

pub use discover::{discover_benchmarks, group_name, BenchSource};
pub use workspace::BenchWorkspace;
