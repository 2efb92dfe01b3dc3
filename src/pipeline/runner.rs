//! The sequential benchmark matrix loop.
//!
//! For every benchmark source and every toolchain of its language:
//! compile the instrumentation shim(s), compile the benchmark, run it with
//! the configured heap and size range, then clear the generated class files.
//! Each external process runs to completion before the next starts; the
//! first non-zero exit aborts the whole run.

use crate::bench::{BenchSource, BenchWorkspace};
use crate::config::Config;
use crate::pipeline::Metrics;
use crate::toolchain::{Lang, Toolchain};
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::Command;

/// The full compile-and-run matrix for one configuration.
pub struct Pipeline<'a> {
    config: &'a Config,
    toolchains: Vec<Toolchain>,
    benchmarks: Vec<BenchSource>,
    metrics: Metrics,
}

/// Statistics from a completed run.
#[derive(Debug, Default)]
pub struct RunStats {
    pub benchmarks: usize,
    pub runs: usize,
    pub csv_files: usize,
    pub elapsed_secs: f64,
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Benchmarks: {}, Runs: {}, CSV files: {}, Elapsed: {:.1}s",
            self.benchmarks, self.runs, self.csv_files, self.elapsed_secs
        )
    }
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a Config,
        toolchains: Vec<Toolchain>,
        benchmarks: Vec<BenchSource>,
    ) -> Self {
        Self {
            config,
            toolchains,
            benchmarks,
            metrics: Metrics::new(),
        }
    }

    fn toolchains_for(&self, lang: Lang) -> Vec<&Toolchain> {
        self.toolchains.iter().filter(|t| t.lang == lang).collect()
    }

    /// Total number of (benchmark, toolchain) runs in the matrix.
    pub fn total_runs(&self) -> usize {
        self.benchmarks
            .iter()
            .map(|b| self.toolchains_for(b.lang).len())
            .sum()
    }

    /// Run the whole matrix sequentially.
    pub fn run(&self) -> Result<RunStats> {
        let total = self.total_runs();
        let mut run_no = 1usize;
        let mut benchmarks_run = 0usize;

        for source in &self.benchmarks {
            let toolchains = self.toolchains_for(source.lang);
            if toolchains.is_empty() {
                tracing::warn!(
                    "no {} toolchain available, skipping {}",
                    source.lang,
                    source.class_name
                );
                continue;
            }

            let workspace = BenchWorkspace::create(
                &self.config.workdir,
                source,
                &self.config.instrument_files,
            )?;

            for toolchain in toolchains {
                self.compile(&workspace, source, toolchain)?;
                self.run_one(&workspace, source, toolchain, run_no, total)?;
                workspace.remove_class_files()?;
                run_no += 1;
            }

            let moved = workspace.collect_csv_files()?;
            if moved == 0 {
                tracing::warn!("{} produced no CSV output", source.class_name);
            }
            self.metrics.add_csv_collected(moved as u64);
            benchmarks_run += 1;
        }

        tracing::info!("run finished: {}", self.metrics);

        Ok(RunStats {
            benchmarks: benchmarks_run,
            runs: run_no - 1,
            csv_files: self.metrics.csv_collected.load(std::sync::atomic::Ordering::Relaxed)
                as usize,
            elapsed_secs: self.metrics.elapsed().as_secs_f64(),
        })
    }

    /// Compile the instrumentation shim(s) and the benchmark source.
    ///
    /// The shim is Scala, so it always goes through a Scala compiler: the
    /// toolchain's own `scalac` for Scala toolchains, the one on PATH for
    /// Java toolchains.
    fn compile(
        &self,
        workspace: &BenchWorkspace,
        source: &BenchSource,
        toolchain: &Toolchain,
    ) -> Result<()> {
        let scala_compiler: &Path = match toolchain.lang {
            Lang::Scala => toolchain.compiler.as_path(),
            Lang::Java => Path::new("scalac"),
        };

        for shim in &self.config.instrument_files {
            self.run_compiler(workspace.dir(), scala_compiler, shim)?;
        }

        let file_name = source
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .context("benchmark source without a file name")?;
        self.run_compiler(workspace.dir(), &toolchain.compiler, file_name)?;

        Ok(())
    }

    fn run_compiler(&self, dir: &Path, compiler: &Path, file: &str) -> Result<()> {
        tracing::debug!("compiling {} with {}", file, compiler.display());

        let status = Command::new(compiler)
            .arg(file)
            .current_dir(dir)
            .status()
            .with_context(|| format!("failed to start compiler {}", compiler.display()))?;

        if !status.success() {
            bail!(
                "compiling {} with {} failed ({})",
                file,
                compiler.display(),
                status
            );
        }

        self.metrics.add_compile();
        Ok(())
    }

    /// Run one benchmark under one toolchain, capturing stdout and stderr in
    /// `<class>_<tag>.txt` inside the benchmark directory.
    fn run_one(
        &self,
        workspace: &BenchWorkspace,
        source: &BenchSource,
        toolchain: &Toolchain,
        run_no: usize,
        total: usize,
    ) -> Result<()> {
        let log_name = format!("{}_{}.txt", source.class_name, toolchain.tag);
        let log_path = workspace.dir().join(&log_name);

        tracing::info!(
            "({:3}/{}) {} {} {}",
            run_no,
            total,
            toolchain.runner_name(),
            source.class_name,
            toolchain.tag
        );

        let mut log = File::create(&log_path)
            .with_context(|| format!("failed to create log file {}", log_path.display()))?;
        writeln!(
            log,
            "# {} {} started {}",
            source.class_name,
            toolchain.tag,
            chrono::Local::now().format("%c")
        )?;
        let log_err = log.try_clone()?;

        let args = run_args(self.config, source, toolchain);
        let status = Command::new(&toolchain.runner)
            .args(&args)
            .current_dir(workspace.dir())
            .stdout(log)
            .stderr(log_err)
            .status()
            .with_context(|| format!("failed to start {}", toolchain.runner.display()))?;

        if !status.success() {
            bail!(
                "benchmark {} under {} failed ({}); check the log at {}",
                source.class_name,
                toolchain.tag,
                status,
                log_path.display()
            );
        }

        self.metrics.add_run_completed();
        Ok(())
    }
}

/// Arguments for one benchmark run.
///
/// Scala launchers need JVM options prefixed with `-J`; `-cp .` lets the
/// runtime find the compiled classes and any copied JFR profile.
pub fn run_args(config: &Config, source: &BenchSource, toolchain: &Toolchain) -> Vec<String> {
    let prefix = toolchain.lang.jvm_opt_prefix();

    vec![
        format!("{}-Xms{}g", prefix, config.heap_size_gb),
        format!("{}-Xmx{}g", prefix, config.heap_size_gb),
        "-cp".to_string(),
        ".".to_string(),
        config.instrument_main_class().to_string(),
        source.class_name.clone(),
        config.min_size.to_string(),
        config.max_size.to_string(),
        config.run_time_secs.to_string(),
        toolchain.tag.clone(),
    ]
}
