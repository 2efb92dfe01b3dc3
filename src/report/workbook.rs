//! Cross-tabulated spreadsheet layout.
//!
//! One worksheet per benchmark group. Row 0 carries a merged, centered label
//! per metric spanning that metric's tag columns; row 1 the `Size` column
//! header and the sorted tags, repeated once per metric; data rows follow
//! with sizes ascending geometrically.

use crate::config::Config;
use crate::report::{ReportTables, SizeSteps, METRIC_COUNT};
use anyhow::{Context, Result};
use rust_xlsxwriter::{ColNum, Format, FormatAlign, RowNum, Workbook};
use std::path::Path;

/// Largest integer f64 can hold without rounding (2^53).
const MAX_EXACT_INT_F64: u64 = 1 << 53;

/// Worksheet column for the tag at `tag_idx` under metric `metric_idx`,
/// given `num_tags` tag columns per metric group. Column 0 holds the size.
pub fn column_for(tag_idx: usize, metric_idx: usize, num_tags: usize) -> usize {
    1 + tag_idx + metric_idx * num_tags
}

fn metric_labels(run_time_secs: u64) -> [String; METRIC_COUNT] {
    [
        format!("Runs in {} secs", run_time_secs),
        format!("Ops in {} secs", run_time_secs),
        "Time/run (us)".to_string(),
        "Time/Op (us)".to_string(),
    ]
}

/// Write the aggregated tables to a single spreadsheet at `path`.
///
/// Cell values that parse as numbers are written numerically, everything
/// else as text. Series shorter than the size sequence leave trailing cells
/// blank.
pub fn write_workbook(path: &Path, tables: &ReportTables, config: &Config) -> Result<()> {
    let mut workbook = Workbook::new();
    let centered = Format::new().set_align(FormatAlign::Center);
    let labels = metric_labels(config.run_time_secs);

    for (group, table) in tables {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(group.as_str())
            .with_context(|| format!("invalid worksheet name '{}'", group))?;

        let tags: Vec<&String> = table.keys().collect();
        let num_tags = tags.len();
        if num_tags == 0 {
            continue;
        }

        // Merged metric labels across each metric's tag columns
        for (metric_n, label) in labels.iter().enumerate() {
            let first = column_for(0, metric_n, num_tags) as ColNum;
            let last = column_for(num_tags - 1, metric_n, num_tags) as ColNum;
            if first == last {
                worksheet.write_string_with_format(0, first, label.as_str(), &centered)?;
            } else {
                worksheet.merge_range(0, first, 0, last, label.as_str(), &centered)?;
            }
        }

        // Tag header row; each tag repeats once per metric
        worksheet.write_string(1, 0, "Size")?;
        for metric_n in 0..METRIC_COUNT {
            for (tag_n, tag) in tags.iter().enumerate() {
                worksheet.write_string(
                    1,
                    column_for(tag_n, metric_n, num_tags) as ColNum,
                    tag.as_str(),
                )?;
            }
        }

        // Data rows, one per size magnitude
        for (row_offset, size) in SizeSteps::new(config.min_size, config.max_size).enumerate() {
            let row = (2 + row_offset) as RowNum;
            // f64 only represents integers exactly up to 2^53
            if size <= MAX_EXACT_INT_F64 {
                worksheet.write_number(row, 0, size as f64)?;
            } else {
                worksheet.write_string(row, 0, size.to_string())?;
            }

            for metric_n in 0..METRIC_COUNT {
                for (tag_n, tag) in tags.iter().enumerate() {
                    let Some(value) = table[*tag].metrics[metric_n].get(row_offset) else {
                        continue;
                    };
                    let col = column_for(tag_n, metric_n, num_tags) as ColNum;
                    match value.parse::<f64>() {
                        Ok(number) => worksheet.write_number(row, col, number)?,
                        Err(_) => worksheet.write_string(row, col, value.as_str())?,
                    };
                }
            }
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("failed to write spreadsheet {}", path.display()))?;

    Ok(())
}
