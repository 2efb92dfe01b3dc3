//! Scala toolchain discovery under a base directory.
//!
//! Scala installations or build folders must start with `scala` followed by
//! the version number, e.g. `scala-2.12.4` or `scala-2.13.1-src`. Plain
//! installations carry the launcher at `bin/scala`; source builds at
//! `build/pack/bin/scala`.

use super::{version_component, Lang, Toolchain};
use anyhow::{bail, Result};
use std::path::Path;

/// Scan `base` for Scala installations and return one toolchain per install,
/// sorted by tag for a deterministic run order.
pub fn discover_scala(base: &Path) -> Result<Vec<Toolchain>> {
    if !base.is_dir() {
        bail!(
            "Base path to Scala installation/build(s) can not be found: {}",
            base.display()
        );
    }

    let mut toolchains = Vec::new();

    for entry in std::fs::read_dir(base)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }

        let dir_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if name.starts_with("scala") => name,
            _ => continue,
        };

        let Some(version) = version_component(dir_name) else {
            tracing::warn!(
                "skipping {}: no version in directory name",
                path.display()
            );
            continue;
        };

        // Plain installation or local build layout
        let runner = if path.join("bin").is_dir() {
            path.join("bin").join("scala")
        } else if path.join("build").is_dir() {
            path.join("build").join("pack").join("bin").join("scala")
        } else {
            tracing::warn!(
                "skipping {}: neither bin/ nor build/ found",
                path.display()
            );
            continue;
        };

        toolchains.push(Toolchain::new(
            runner,
            format!("{}{}", Lang::Scala.tag_prefix(), version),
            Lang::Scala,
        ));
    }

    if toolchains.is_empty() {
        bail!(
            "no usable Scala installation found under {}",
            base.display()
        );
    }

    toolchains.sort_by(|a, b| a.tag.cmp(&b.tag));
    Ok(toolchains)
}
