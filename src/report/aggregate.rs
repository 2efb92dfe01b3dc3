//! Aggregation of per-run CSV blocks into cross-tabulated tables.
//!
//! Each result CSV holds repeating blocks of `1 tag line + 1 header line +
//! k data rows`, one data row per size magnitude. A data row starts with the
//! size and its logarithm, followed by the four metrics (runs, operations,
//! time per run, time per operation). Aggregation drops the two size columns
//! and appends the metric columns position-wise into per-tag sequences, so
//! each sequence ends up indexed by size magnitude in input order.

use crate::bench::group_name;
use crate::report::magnitude_steps;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Number of metric columns in a data row, after the size columns.
pub const METRIC_COUNT: usize = 4;

/// Four equal-length value sequences for one runtime tag, in metric order:
/// runs, operations, time per run, time per operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSeries {
    pub metrics: [Vec<String>; METRIC_COUNT],
}

/// Per-benchmark table: runtime tag -> metric sequences.
/// BTreeMap keeps tags in the lexical order the report layout requires.
pub type BenchTable = BTreeMap<String, TagSeries>;

/// All aggregated results: worksheet group -> table.
pub type ReportTables = BTreeMap<String, BenchTable>;

/// Number of lines in one CSV block: one row per size magnitude, plus the
/// tag line and the header line.
pub fn block_len(min_size: u64, max_size: u64) -> usize {
    magnitude_steps(min_size, max_size) + 2
}

/// Parse one CSV stream into `table`.
///
/// The line index within each `block_len`-sized block selects the role:
/// 0 is the tag line (starting a fresh series for that tag), 1 the header,
/// the rest are data rows. There is no validation that `block_len` matches
/// the file; mismatched sizes shift the roles and misalign rows.
pub fn parse_csv<R: Read>(reader: R, block_len: usize, table: &mut BenchTable) -> Result<()> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut current_tag: Option<String> = None;

    for (line_n, record) in csv_reader.records().enumerate() {
        let record = record?;

        match line_n % block_len {
            0 => {
                let tag = record
                    .get(0)
                    .map(str::to_string)
                    .filter(|t| !t.is_empty())
                    .with_context(|| format!("empty tag line at record {}", line_n))?;
                table.insert(tag.clone(), TagSeries::default());
                current_tag = Some(tag);
            }
            1 => {
                // Column header line, discarded
            }
            _ => {
                let tag = current_tag
                    .as_deref()
                    .with_context(|| format!("data row before any tag line at record {}", line_n))?;
                let series = table
                    .get_mut(tag)
                    .context("tag vanished from table during parse")?;

                // Drop the size and log(size) columns
                for (metric_n, value) in record.iter().skip(2).take(METRIC_COUNT).enumerate() {
                    series.metrics[metric_n].push(value.to_string());
                }
            }
        }
    }

    Ok(())
}

/// Aggregate every `*.csv` in `workdir` into per-group tables, deleting each
/// file once parsed. The worksheet group is the file stem after the first
/// `BM`; files not following the naming convention are left in place.
pub fn aggregate_dir(workdir: &Path, block_len: usize) -> Result<ReportTables> {
    let mut csv_files = Vec::new();
    for entry in std::fs::read_dir(workdir)
        .with_context(|| format!("failed to read {}", workdir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("csv") {
            csv_files.push(path);
        }
    }
    csv_files.sort();

    let mut tables = ReportTables::new();

    for csv_file in csv_files {
        let stem = csv_file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();

        let Some(group) = group_name(stem) else {
            tracing::warn!(
                "skipping {}: no BM marker in file name",
                csv_file.display()
            );
            continue;
        };

        tracing::debug!("aggregating {} into group {}", csv_file.display(), group);

        let file = std::fs::File::open(&csv_file)
            .with_context(|| format!("failed to open {}", csv_file.display()))?;
        let table = tables.entry(group.to_string()).or_default();
        parse_csv(file, block_len, table)
            .with_context(|| format!("failed to parse {}", csv_file.display()))?;

        std::fs::remove_file(&csv_file)
            .with_context(|| format!("failed to remove {}", csv_file.display()))?;
    }

    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CSV_ONE_TAG: &str = "\
J1.8.0
Size,Log(Size),Runs,Ops,Time/run,Time/op
1000,3,120,120000,2500.0,2.5
10000,4,80,800000,3750.0,0.375
100000,5,40,4000000,7500.0,0.075
";

    #[test]
    fn test_parse_reproduces_metric_sequences_in_input_order() {
        // 3 size magnitudes + tag + header
        let block = block_len(1_000, 100_000);
        assert_eq!(block, 5);

        let mut table = BenchTable::new();
        parse_csv(CSV_ONE_TAG.as_bytes(), block, &mut table).unwrap();

        let series = &table["J1.8.0"];
        assert_eq!(series.metrics[0], vec!["120", "80", "40"]);
        assert_eq!(series.metrics[1], vec!["120000", "800000", "4000000"]);
        assert_eq!(series.metrics[2], vec!["2500.0", "3750.0", "7500.0"]);
        assert_eq!(series.metrics[3], vec!["2.5", "0.375", "0.075"]);
    }

    #[test]
    fn test_parse_multiple_blocks_one_file() {
        let csv = "\
J1.8.0
Size,Log(Size),Runs,Ops,Time/run,Time/op
1000,3,120,120000,2500.0,2.5
10000,4,80,800000,3750.0,0.375
J9.0.1
Size,Log(Size),Runs,Ops,Time/run,Time/op
1000,3,150,150000,2000.0,2.0
10000,4,95,950000,3150.0,0.315
";
        let block = block_len(1_000, 10_000);
        let mut table = BenchTable::new();
        parse_csv(csv.as_bytes(), block, &mut table).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table["J1.8.0"].metrics[0], vec!["120", "80"]);
        assert_eq!(table["J9.0.1"].metrics[0], vec!["150", "95"]);
        // Lexical tag order out of the BTreeMap
        let tags: Vec<&String> = table.keys().collect();
        assert_eq!(tags, vec!["J1.8.0", "J9.0.1"]);
    }

    #[test]
    fn test_repeated_tag_resets_series() {
        let csv = "\
J1.8.0
Size,Log(Size),Runs,Ops,Time/run,Time/op
1000,3,120,120000,2500.0,2.5
J1.8.0
Size,Log(Size),Runs,Ops,Time/run,Time/op
1000,3,99,99000,3000.0,3.0
";
        let block = block_len(1_000, 1_000);
        let mut table = BenchTable::new();
        parse_csv(csv.as_bytes(), block, &mut table).unwrap();

        assert_eq!(table["J1.8.0"].metrics[0], vec!["99"]);
    }

    #[test]
    fn test_block_len() {
        assert_eq!(block_len(1_000, 1_000_000_000), 9);
        assert_eq!(block_len(1_000, 1_000), 3);
    }

    #[test]
    fn test_aggregate_dir_groups_and_removes_files() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("JaBMHashMap.csv"),
            "J1.8.0\nSize,Log,Runs,Ops,TpR,TpO\n1000,3,1,2,3,4\n",
        )
        .unwrap();
        std::fs::write(
            tmp.path().join("ScBMHashMap.csv"),
            "S2.12.4\nSize,Log,Runs,Ops,TpR,TpO\n1000,3,5,6,7,8\n",
        )
        .unwrap();
        std::fs::write(tmp.path().join("unrelated.csv"), "x\n").unwrap();

        let tables = aggregate_dir(tmp.path(), block_len(1_000, 1_000)).unwrap();

        // Both language variants land in the same worksheet group
        assert_eq!(tables.len(), 1);
        let table = &tables["HashMap"];
        assert_eq!(table.len(), 2);
        assert_eq!(table["J1.8.0"].metrics[0], vec!["1"]);
        assert_eq!(table["S2.12.4"].metrics[3], vec!["8"]);

        // Parsed files are consumed; non-conforming ones are left alone
        assert!(!tmp.path().join("JaBMHashMap.csv").exists());
        assert!(!tmp.path().join("ScBMHashMap.csv").exists());
        assert!(tmp.path().join("unrelated.csv").exists());
    }
}
