//! Sequential compile-and-run orchestration.

mod metrics;
mod runner;

pub use metrics::Metrics;
pub use runner::{run_args, Pipeline, RunStats};
