//! JVM benchmark matrix runner.
//!
//! Compiles and runs every benchmark source under every discovered
//! language/runtime version, collects the per-run CSV timing data, and
//! aggregates it into a single multi-sheet spreadsheet.
//!
//! # Architecture
//!
//! - **Toolchain**: Java (`JAVA_HOME`) and Scala (base-path scan) discovery
//! - **Bench**: benchmark source discovery and per-benchmark directories
//! - **Pipeline**: the sequential compile-and-run loop with run metrics
//! - **Report**: CSV block aggregation and the cross-tabulated spreadsheet
//!
//! # Usage
//!
//! ```no_run
//! use bench_matrix::{run_matrix, Config};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     run_matrix(&config)?;
//!     Ok(())
//! }
//! ```

pub mod bench;
pub mod config;
pub mod pipeline;
pub mod report;
pub mod toolchain;

pub use config::Config;
pub use pipeline::{Metrics, Pipeline, RunStats};
pub use toolchain::{Lang, Toolchain};

use anyhow::Result;

/// Run the full benchmark matrix: discover, compile, run, aggregate, report.
pub fn run_matrix(config: &Config) -> Result<RunStats> {
    config.validate()?;

    tracing::info!("Starting benchmark matrix run");

    let benchmarks = bench::discover_benchmarks(&config.workdir, &config.instrument_files)?;
    if benchmarks.is_empty() {
        anyhow::bail!(
            "no benchmark sources found in {}",
            config.workdir.display()
        );
    }
    tracing::info!("Found {} benchmark source(s)", benchmarks.len());

    let toolchains = toolchain::discover(config, &benchmarks)?;
    for tc in &toolchains {
        tracing::info!("Toolchain {}: {}", tc.tag, tc.runner.display());
    }

    let pipeline = Pipeline::new(config, toolchains, benchmarks);
    tracing::info!("{} run(s) in the matrix", pipeline.total_runs());

    let stats = pipeline.run()?;

    aggregate_and_write(config)?;

    Ok(stats)
}

/// Aggregate the CSV files in the working directory into the spreadsheet.
/// Usable on its own to rebuild the report from results already on disk.
pub fn aggregate_and_write(config: &Config) -> Result<()> {
    let block_len = report::block_len(config.min_size, config.max_size);
    let tables = report::aggregate_dir(&config.workdir, block_len)?;

    if tables.is_empty() {
        tracing::warn!(
            "no result CSV files in {}; nothing to report",
            config.workdir.display()
        );
        return Ok(());
    }

    let output = config.output_path();
    report::write_workbook(&output, &tables, config)?;
    tracing::info!("Report written to {}", output.display());

    Ok(())
}
