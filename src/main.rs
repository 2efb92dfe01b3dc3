//! Benchmark matrix CLI.
//!
//! Compiles and runs JVM micro-benchmarks under every available
//! language/runtime version and aggregates the results into one spreadsheet.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bench_matrix::{bench, toolchain, Config};

#[derive(Parser)]
#[command(name = "bench-matrix")]
#[command(about = "Run JVM micro-benchmarks across runtime versions", long_about = None)]
struct Cli {
    /// Optional configuration file (YAML or JSON); flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct Overrides {
    /// JVM heap size in GiB, used for both -Xms and -Xmx
    #[arg(long, global = true)]
    heap_size: Option<u32>,

    /// Maximum elements per benchmark
    #[arg(short = 'M', long, global = true)]
    max_size: Option<u64>,

    /// Minimum elements per benchmark
    #[arg(short = 'm', long, global = true)]
    min_size: Option<u64>,

    /// Run time for each size in seconds
    #[arg(short = 't', long, global = true)]
    run_time: Option<u64>,

    /// Base path to Scala installations or builds
    #[arg(short = 's', long, global = true)]
    scala_base_path: Option<PathBuf>,

    /// Directory holding the benchmark sources
    #[arg(short = 'w', long, global = true)]
    workdir: Option<PathBuf>,

    /// Output spreadsheet path
    #[arg(short = 'o', long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile and run the full matrix, then write the report (default)
    Run,

    /// List discovered toolchains and benchmarks without running anything
    Discover,

    /// Aggregate CSV files already in the working directory into the report
    Aggregate,

    /// Generate a sample configuration file
    GenerateConfig {
        /// Where to write the configuration file
        #[arg(default_value = "bench-matrix.yaml")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        None | Some(Commands::Run) => {
            let stats = bench_matrix::run_matrix(&config)?;
            println!("{}", stats);
        }

        Some(Commands::Discover) => {
            discover_command(&config)?;
        }

        Some(Commands::Aggregate) => {
            config.validate()?;
            bench_matrix::aggregate_and_write(&config)?;
        }

        Some(Commands::GenerateConfig { path }) => {
            generate_config_command(&path)?;
        }
    }

    Ok(())
}

/// Build the effective configuration: file (if given), then flag overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let o = &cli.overrides;
    if let Some(heap) = o.heap_size {
        config.heap_size_gb = heap;
    }
    if let Some(max) = o.max_size {
        config.max_size = max;
    }
    if let Some(min) = o.min_size {
        config.min_size = min;
    }
    if let Some(run_time) = o.run_time {
        config.run_time_secs = run_time;
    }
    if let Some(base) = &o.scala_base_path {
        config.scala_base_path = Some(base.clone());
    }
    if let Some(workdir) = &o.workdir {
        config.workdir = workdir.clone();
    }
    if let Some(output) = &o.output {
        config.output = output.clone();
    }

    Ok(config)
}

fn discover_command(config: &Config) -> Result<()> {
    config.validate()?;

    let benchmarks = bench::discover_benchmarks(&config.workdir, &config.instrument_files)?;
    let toolchains = toolchain::discover(config, &benchmarks)?;

    println!("\n=== Toolchains ===");
    if toolchains.is_empty() {
        println!("(none)");
    }
    for tc in &toolchains {
        println!("{:10} {}", tc.tag, tc.runner.display());
    }

    println!("\n=== Benchmarks ===");
    if benchmarks.is_empty() {
        println!("(none)");
    }
    for bm in &benchmarks {
        println!("{:6} {:24} -> worksheet '{}'", bm.lang.to_string(), bm.class_name, bm.group);
    }

    let per_lang = |lang| {
        benchmarks.iter().filter(|b| b.lang == lang).count()
            * toolchains.iter().filter(|t: &&toolchain::Toolchain| t.lang == lang).count()
    };
    let total = per_lang(bench_matrix::Lang::Java) + per_lang(bench_matrix::Lang::Scala);
    println!("\nTotal runs in the matrix: {}\n", total);

    Ok(())
}

fn generate_config_command(output: &Path) -> Result<()> {
    let yaml = r#"# bench-matrix configuration

# JVM heap size in GiB, applied as both -Xms and -Xmx
heap_size_gb: 28

# Element count range; each benchmark steps from min to max in powers of ten
min_size: 1000
max_size: 1000000000

# Run time for each size step, in seconds
run_time_secs: 300

# Base path holding Scala installations or local builds, e.g.
# scala-2.12.4/ (plain install) or scala-2.13.1-src/ (source build).
# Required only when Scala benchmark sources are present.
# scala_base_path: "/opt/scala"

# Directory holding the benchmark sources and the instrumentation shim
workdir: "."

# Output spreadsheet; relative paths resolve against workdir
output: "benchmarks.xlsx"

# Instrumentation shim source files copied next to every benchmark.
# The first entry's file stem is the JVM main class that drives runs.
instrument_files:
  - "Instruments.scala"
"#;

    std::fs::write(output, yaml)?;
    println!("Generated sample configuration at: {}", output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_default() {
        // No subcommand - should default to Run
        let cli = Cli::try_parse_from(["bench-matrix"]);
        assert!(cli.is_ok());
        assert!(cli.unwrap().command.is_none());
    }

    #[test]
    fn test_cli_parse_flags() {
        let cli = Cli::try_parse_from([
            "bench-matrix",
            "-m",
            "100",
            "-M",
            "100000",
            "-t",
            "30",
            "-s",
            "/opt/scala",
        ])
        .unwrap();

        let config = load_config(&cli).unwrap();
        assert_eq!(config.min_size, 100);
        assert_eq!(config.max_size, 100_000);
        assert_eq!(config.run_time_secs, 30);
        assert_eq!(config.scala_base_path, Some(PathBuf::from("/opt/scala")));
        // Untouched fields keep defaults
        assert_eq!(config.heap_size_gb, 28);
    }

    #[test]
    fn test_cli_parse_subcommands() {
        assert!(Cli::try_parse_from(["bench-matrix", "discover"]).is_ok());
        assert!(Cli::try_parse_from(["bench-matrix", "aggregate", "-w", "/tmp"]).is_ok());
        assert!(Cli::try_parse_from(["bench-matrix", "generate-config", "c.yaml"]).is_ok());
    }
}
