//! Per-benchmark working directory management.
//!
//! Every benchmark is compiled and run inside its own subdirectory of the
//! working directory, seeded with the benchmark source, the instrumentation
//! shim(s), and any JFR profile (`.jfc`) files. Generated `.class` files are
//! deleted between toolchain runs so one version's output never leaks into
//! the next; result CSVs are moved back up when the benchmark finishes.

use crate::bench::BenchSource;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// The directory a single benchmark is built and run in.
#[derive(Debug)]
pub struct BenchWorkspace {
    /// Parent working directory CSVs are collected into
    root: PathBuf,

    /// Benchmark directory, `<root>/<class_name>`
    dir: PathBuf,
}

impl BenchWorkspace {
    /// Create (recreating if present) the benchmark directory and copy in the
    /// source file, shims, and `.jfc` files from the working directory.
    pub fn create(
        workdir: &Path,
        source: &BenchSource,
        instrument_files: &[String],
    ) -> Result<Self> {
        let dir = workdir.join(&source.class_name);

        if dir.is_dir() {
            std::fs::remove_dir_all(&dir)
                .with_context(|| format!("failed to clear {}", dir.display()))?;
        }
        std::fs::create_dir(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        copy_into(&dir, &source.path)?;

        for shim in instrument_files {
            copy_into(&dir, &workdir.join(shim))?;
        }

        for jfc in files_with_extension(workdir, "jfc")? {
            copy_into(&dir, &jfc)?;
        }

        Ok(Self {
            root: workdir.to_path_buf(),
            dir,
        })
    }

    /// The benchmark directory commands run in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Delete `.class` files generated by the last compile.
    pub fn remove_class_files(&self) -> Result<()> {
        for class_file in files_with_extension(&self.dir, "class")? {
            std::fs::remove_file(&class_file)
                .with_context(|| format!("failed to remove {}", class_file.display()))?;
        }
        Ok(())
    }

    /// Move result CSVs back into the working directory, returning how many
    /// files were moved.
    pub fn collect_csv_files(&self) -> Result<usize> {
        let mut moved = 0;
        for csv_file in files_with_extension(&self.dir, "csv")? {
            let name = csv_file
                .file_name()
                .context("CSV file without a name")?
                .to_os_string();
            std::fs::rename(&csv_file, self.root.join(&name)).with_context(|| {
                format!("failed to move {} to {}", csv_file.display(), self.root.display())
            })?;
            moved += 1;
        }
        Ok(moved)
    }
}

/// List files in `dir` with the given extension, sorted for determinism.
fn files_with_extension(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(ext) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn copy_into(dir: &Path, file: &Path) -> Result<()> {
    let name = file
        .file_name()
        .with_context(|| format!("no file name in {}", file.display()))?;
    std::fs::copy(file, dir.join(name))
        .with_context(|| format!("failed to copy {} into {}", file.display(), dir.display()))?;
    Ok(())
}
