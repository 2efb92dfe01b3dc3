//! Configuration for the benchmark matrix runner.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for a benchmark matrix run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JVM heap size in GiB, applied as both -Xms and -Xmx
    #[serde(default = "default_heap_size_gb")]
    pub heap_size_gb: u32,

    /// Maximum element count per benchmark
    #[serde(default = "default_max_size")]
    pub max_size: u64,

    /// Minimum element count per benchmark
    #[serde(default = "default_min_size")]
    pub min_size: u64,

    /// Run time for each size step, in seconds
    #[serde(default = "default_run_time_secs")]
    pub run_time_secs: u64,

    /// Base path holding Scala installations or local builds.
    /// Required only when Scala benchmark sources are present.
    #[serde(default)]
    pub scala_base_path: Option<PathBuf>,

    /// Directory holding the benchmark sources and instrumentation shim
    #[serde(default = "default_workdir")]
    pub workdir: PathBuf,

    /// Output spreadsheet path; relative paths resolve against `workdir`
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Instrumentation shim source files copied next to every benchmark.
    /// The first entry's file stem is the JVM main class that drives runs.
    #[serde(default = "default_instrument_files")]
    pub instrument_files: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            heap_size_gb: default_heap_size_gb(),
            max_size: default_max_size(),
            min_size: default_min_size(),
            run_time_secs: default_run_time_secs(),
            scala_base_path: None,
            workdir: default_workdir(),
            output: default_output(),
            instrument_files: default_instrument_files(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML or JSON file.
    /// Format is auto-detected from file extension (.yaml, .yml, or .json).
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config: Config = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&contents)?,
            "json" => serde_json::from_str(&contents)?,
            _ => {
                // Try YAML first (it's a superset of JSON)
                serde_yaml::from_str(&contents)?
            }
        };
        Ok(config)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Serialize configuration to YAML.
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// The JVM main class that drives each run, taken from the first shim file.
    pub fn instrument_main_class(&self) -> &str {
        self.instrument_files
            .first()
            .map(|f| f.split('.').next().unwrap_or(f.as_str()))
            .unwrap_or("Instruments")
    }

    /// Output spreadsheet path, with relative paths anchored at the workdir.
    pub fn output_path(&self) -> PathBuf {
        if self.output.is_absolute() {
            self.output.clone()
        } else {
            self.workdir.join(&self.output)
        }
    }

    /// Validate the configuration.
    ///
    /// Size values that are not a clean power-of-ten ratio only warn: the
    /// aggregation block length is derived from `log10(max/min)`, so CSVs
    /// produced with mismatched values misalign silently.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.heap_size_gb == 0 {
            anyhow::bail!("Heap size must be > 0");
        }
        if self.min_size == 0 {
            anyhow::bail!("Minimum size must be > 0");
        }
        if self.max_size < self.min_size {
            anyhow::bail!(
                "Maximum size ({}) must be >= minimum size ({})",
                self.max_size,
                self.min_size
            );
        }
        if self.run_time_secs == 0 {
            anyhow::bail!("Run time must be > 0");
        }
        if self.instrument_files.is_empty() {
            anyhow::bail!("At least one instrumentation shim file is required");
        }

        if !is_power_of_ten_ratio(self.min_size, self.max_size) {
            tracing::warn!(
                "max_size/min_size ({}/{}) is not a power of ten; \
                 aggregated rows may misalign",
                self.max_size,
                self.min_size
            );
        }

        Ok(())
    }
}

/// True when `max` is `min` scaled by an exact power of ten.
fn is_power_of_ten_ratio(min: u64, max: u64) -> bool {
    if min == 0 || max % min != 0 {
        return false;
    }
    let mut ratio = max / min;
    while ratio % 10 == 0 {
        ratio /= 10;
    }
    ratio == 1
}

// Default value functions for serde
fn default_heap_size_gb() -> u32 {
    28
}
fn default_max_size() -> u64 {
    1_000_000_000
}
fn default_min_size() -> u64 {
    1_000
}
fn default_run_time_secs() -> u64 {
    300
}
fn default_workdir() -> PathBuf {
    PathBuf::from(".")
}
fn default_output() -> PathBuf {
    PathBuf::from("benchmarks.xlsx")
}
fn default_instrument_files() -> Vec<String> {
    vec!["Instruments.scala".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.heap_size_gb, 28);
        assert_eq!(config.min_size, 1_000);
        assert_eq!(config.max_size, 1_000_000_000);
        assert_eq!(config.run_time_secs, 300);
    }

    #[test]
    fn test_validation_rejects_zero_min_size() {
        let config = Config {
            min_size: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_inverted_sizes() {
        let config = Config {
            min_size: 1_000_000,
            max_size: 1_000,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_shim_list() {
        let config = Config {
            instrument_files: vec![],
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_power_of_ten_ratio() {
        assert!(is_power_of_ten_ratio(1_000, 1_000));
        assert!(is_power_of_ten_ratio(1_000, 1_000_000_000));
        assert!(!is_power_of_ten_ratio(1_000, 5_000));
        assert!(!is_power_of_ten_ratio(1_000, 1_500_000));
    }

    #[test]
    fn test_instrument_main_class() {
        let config = Config::default();
        assert_eq!(config.instrument_main_class(), "Instruments");

        let config = Config {
            instrument_files: vec!["Probe.scala".to_string()],
            ..Config::default()
        };
        assert_eq!(config.instrument_main_class(), "Probe");
    }

    #[test]
    fn test_output_path_resolution() {
        let config = Config {
            workdir: PathBuf::from("/tmp/bench"),
            output: PathBuf::from("report.xlsx"),
            ..Config::default()
        };
        assert_eq!(config.output_path(), PathBuf::from("/tmp/bench/report.xlsx"));

        let config = Config {
            workdir: PathBuf::from("/tmp/bench"),
            output: PathBuf::from("/out/report.xlsx"),
            ..Config::default()
        };
        assert_eq!(config.output_path(), PathBuf::from("/out/report.xlsx"));
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
heap_size_gb: 4
max_size: 100000
min_size: 100
run_time_secs: 30
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.heap_size_gb, 4);
        assert_eq!(config.max_size, 100_000);
        assert_eq!(config.min_size, 100);
        assert_eq!(config.run_time_secs, 30);
        // Unspecified fields fall back to defaults
        assert_eq!(config.instrument_files, vec!["Instruments.scala"]);
        assert!(config.validate().is_ok());
    }
}
