//! Discovery of JVM language toolchains (runtimes and their compilers).

mod java;
mod scala;

pub use java::discover_java;
pub use scala::discover_scala;

use crate::bench::BenchSource;
use crate::config::Config;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Benchmark source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lang {
    Java,
    Scala,
}

impl Lang {
    /// Source file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Lang::Java => "java",
            Lang::Scala => "scala",
        }
    }

    /// File name prefix in the `{Ja|Sc}BM<NAME>` naming convention.
    pub fn source_prefix(self) -> &'static str {
        match self {
            Lang::Java => "Ja",
            Lang::Scala => "Sc",
        }
    }

    /// Prefix for JVM options passed through the language launcher.
    /// The `scala` script forwards `-J`-prefixed options to the underlying JVM.
    pub fn jvm_opt_prefix(self) -> &'static str {
        match self {
            Lang::Java => "",
            Lang::Scala => "-J",
        }
    }

    /// Version tag prefix (`J1.8`, `S2.12`, ...).
    pub fn tag_prefix(self) -> char {
        match self {
            Lang::Java => 'J',
            Lang::Scala => 'S',
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lang::Java => write!(f, "java"),
            Lang::Scala => write!(f, "scala"),
        }
    }
}

/// One runtime/compiler pair a benchmark is built and run with.
#[derive(Debug, Clone)]
pub struct Toolchain {
    /// Runtime launcher (`.../bin/java` or `.../bin/scala`)
    pub runner: PathBuf,

    /// Compiler binary, the runner name with a `c` suffix
    pub compiler: PathBuf,

    /// Version tag used in log/CSV naming and report columns
    pub tag: String,

    /// Language this toolchain compiles and runs
    pub lang: Lang,
}

impl Toolchain {
    /// Build a toolchain from its runner path; the compiler is derived by
    /// appending `c` to the runner's file name (java -> javac, scala -> scalac).
    pub fn new(runner: PathBuf, tag: String, lang: Lang) -> Self {
        let mut compiler_name = runner
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        compiler_name.push("c");
        let compiler = runner.with_file_name(compiler_name);

        Self {
            runner,
            compiler,
            tag,
            lang,
        }
    }

    /// Short runner name for progress output.
    pub fn runner_name(&self) -> &str {
        self.runner
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("?")
    }
}

/// Discover every toolchain the given benchmark set needs.
///
/// Java comes from `JAVA_HOME`; Scala installs are scanned under the
/// configured base path, but only when Scala sources are present.
pub fn discover(config: &Config, benchmarks: &[BenchSource]) -> Result<Vec<Toolchain>> {
    let needs = |lang: Lang| benchmarks.iter().any(|b| b.lang == lang);

    let mut toolchains = Vec::new();

    if needs(Lang::Java) {
        toolchains.extend(discover_java()?);
    }

    if needs(Lang::Scala) {
        let base = config.scala_base_path.as_deref().context(
            "Scala benchmark sources found but no Scala base path configured \
             (use --scala-base-path)",
        )?;
        toolchains.extend(discover_scala(base)?);
    }

    Ok(toolchains)
}

/// Extract the version component from an install directory name.
///
/// `jdk-1.8.0-oracle` and `scala-2.12.4` both carry the version in the
/// second dash-separated field.
pub(crate) fn version_component(dir_name: &str) -> Option<&str> {
    dir_name.split('-').nth(1).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiler_derived_from_runner() {
        let tc = Toolchain::new(
            PathBuf::from("/opt/jdk-1.8.0-oracle/bin/java"),
            "J1.8.0".to_string(),
            Lang::Java,
        );
        assert_eq!(tc.compiler, PathBuf::from("/opt/jdk-1.8.0-oracle/bin/javac"));
        assert_eq!(tc.runner_name(), "java");

        let tc = Toolchain::new(
            PathBuf::from("/opt/scala-2.12.4/bin/scala"),
            "S2.12.4".to_string(),
            Lang::Scala,
        );
        assert_eq!(tc.compiler, PathBuf::from("/opt/scala-2.12.4/bin/scalac"));
    }

    #[test]
    fn test_version_component() {
        assert_eq!(version_component("jdk-1.8.0-oracle"), Some("1.8.0"));
        assert_eq!(version_component("scala-2.12.4"), Some("2.12.4"));
        assert_eq!(version_component("scala-2.13.1-src"), Some("2.13.1"));
        assert_eq!(version_component("scala"), None);
        assert_eq!(version_component("scala-"), None);
    }

    #[test]
    fn test_jvm_opt_prefix() {
        assert_eq!(Lang::Java.jvm_opt_prefix(), "");
        assert_eq!(Lang::Scala.jvm_opt_prefix(), "-J");
    }

    #[test]
    fn test_lang_naming() {
        assert_eq!(Lang::Java.extension(), "java");
        assert_eq!(Lang::Scala.extension(), "scala");
        assert_eq!(Lang::Java.source_prefix(), "Ja");
        assert_eq!(Lang::Scala.source_prefix(), "Sc");
        assert_eq!(Lang::Java.tag_prefix(), 'J');
        assert_eq!(Lang::Scala.tag_prefix(), 'S');
    }
}
