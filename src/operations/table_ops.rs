use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;
use vacstat_core::{open_dataset, run_query, Query, QueryParams, Translator};

use crate::ui::render_table;

/// Run a table query over a CSV file and return the printable output
pub fn run_table(
    file: &Path,
    params: &QueryParams,
    json: bool,
    translator: &Translator,
) -> Result<String> {
    let stream = open_dataset(file, translator)?;
    let query = Query::parse(params, stream.schema(), translator)?;
    let table = run_query(stream, &query, translator)?;

    info!(matched = table.matched, shown = table.rows.len(), "query finished");

    if json {
        serde_json::to_string_pretty(&table).context("serializing query table")
    } else {
        Ok(render_table(&table))
    }
}
