//! Benchmark source file discovery.
//!
//! Sources follow the `{Ja|Sc}BM<NAME>.{java|scala}` naming convention. The
//! class to be benchmarked has the same name as the file; sources sharing
//! `<NAME>` end up grouped in the same report worksheet.

use crate::toolchain::Lang;
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

/// One benchmark source file.
#[derive(Debug, Clone)]
pub struct BenchSource {
    /// Path to the source file
    pub path: PathBuf,

    /// File stem, which is also the JVM class name
    pub class_name: String,

    /// Worksheet group, the part of the stem after the first `BM`
    pub group: String,

    /// Source language, from the file extension
    pub lang: Lang,
}

/// Extract the worksheet group from a benchmark file stem.
/// `JaBMHashMap` -> `HashMap`.
pub fn group_name(stem: &str) -> Option<&str> {
    stem.split_once("BM")
        .map(|(_, group)| group)
        .filter(|g| !g.is_empty())
}

/// Extract the worksheet group from a source file stem, enforcing the full
/// `{Ja|Sc}BM<NAME>` convention: the language prefix must match the file's
/// extension. `JaBMHashMap` + Java -> `HashMap`; `XxBMFoo` -> `None`.
fn source_group(stem: &str, lang: Lang) -> Option<&str> {
    stem.strip_prefix(lang.source_prefix())
        .and_then(|rest| rest.strip_prefix("BM"))
        .filter(|g| !g.is_empty())
}

/// Find benchmark sources in `workdir`, excluding instrumentation shim files.
///
/// Files whose stem does not follow the `BM` naming convention are skipped
/// with a warning. The result is ordered Java first, then Scala, lexically
/// within each language.
pub fn discover_benchmarks(
    workdir: &Path,
    instrument_files: &[String],
) -> Result<Vec<BenchSource>> {
    if !workdir.is_dir() {
        bail!("working directory not found: {}", workdir.display());
    }

    let mut benchmarks = Vec::new();

    for entry in std::fs::read_dir(workdir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let lang = match path.extension().and_then(|e| e.to_str()) {
            Some("java") => Lang::Java,
            Some("scala") => Lang::Scala,
            _ => continue,
        };

        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };

        if instrument_files.iter().any(|f| f == file_name) {
            continue;
        }

        let stem = file_name
            .strip_suffix(&format!(".{}", lang.extension()))
            .unwrap_or(file_name);

        let Some(group) = source_group(stem, lang) else {
            tracing::warn!(
                "skipping {}: file name does not follow the {{Ja|Sc}}BM<NAME> convention",
                path.display()
            );
            continue;
        };

        benchmarks.push(BenchSource {
            path: path.clone(),
            class_name: stem.to_string(),
            group: group.to_string(),
            lang,
        });
    }

    benchmarks.sort_by(|a, b| a.lang.cmp(&b.lang).then_with(|| a.class_name.cmp(&b.class_name)));
    Ok(benchmarks)
}
