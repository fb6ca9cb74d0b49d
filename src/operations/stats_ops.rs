use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;
use vacstat_core::{open_dataset, run_statistics, Translator};

use crate::ui::format_statistics;

/// Aggregate statistics over a CSV file and return the printable output
pub fn run_stats(file: &Path, profession: &str, json: bool, translator: &Translator) -> Result<String> {
    let stream = open_dataset(file, translator)?;
    let report = run_statistics(stream, profession, translator)?;

    info!(
        years = report.salary_by_year.len(),
        cities = report.salary_by_city.len(),
        "statistics finished"
    );

    if json {
        serde_json::to_string_pretty(&report).context("serializing statistics report")
    } else {
        Ok(format_statistics(&report))
    }
}
