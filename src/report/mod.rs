//! Results aggregation and spreadsheet report generation.

mod aggregate;
mod sizes;
mod workbook;


pub use aggregate::{
    aggregate_dir, block_len, parse_csv, BenchTable, ReportTables, TagSeries, METRIC_COUNT,
};
pub use sizes::{magnitude_steps, SizeSteps};
pub use workbook::{column_for, write_workbook};
