//! Java toolchain discovery via `JAVA_HOME`.

use super::{version_component, Lang, Toolchain};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Discover the default Java installation from the `JAVA_HOME` environment
/// variable. The install directory name carries the version
/// (e.g. `jdk-1.8.0-oracle` -> tag `J1.8.0`).
pub fn discover_java() -> Result<Vec<Toolchain>> {
    let home = std::env::var("JAVA_HOME").context("JAVA_HOME is not set")?;
    Ok(vec![java_toolchain_from_home(Path::new(&home))?])
}

fn java_toolchain_from_home(home: &Path) -> Result<Toolchain> {
    if !home.is_dir() {
        bail!(
            "JAVA_HOME does not point at a directory: {}",
            home.display()
        );
    }

    let dir_name = home.file_name().and_then(|n| n.to_str()).unwrap_or("");

    let version = version_component(dir_name).with_context(|| {
        format!(
            "cannot parse a Java version from the JAVA_HOME directory name '{}'",
            dir_name
        )
    })?;

    if !dir_name.ends_with("-oracle") {
        tracing::warn!(
            "Java installation at {} does not look like an Oracle JDK",
            home.display()
        );
    }

    let runner = home.join("bin").join("java");
    Ok(Toolchain::new(
        runner,
        format!("{}{}", Lang::Java.tag_prefix(), version),
        Lang::Java,
    ))
}
