pub mod stats_ops;
pub mod table_ops;

pub use stats_ops::run_stats;
pub use table_ops::run_table;

use anyhow::{Context, Result};
use std::path::Path;
use vacstat_core::Translator;

/// Load translation tables from an override file, or use the built-in ones
pub fn load_translator(path: Option<&Path>) -> Result<Translator> {
    match path {
        Some(path) => {
            let translator = Translator::from_json_file(path)
                .with_context(|| format!("loading translation tables from {}", path.display()))?;
            tracing::info!(path = %path.display(), "loaded translation tables");
            Ok(translator)
        }
        None => Ok(Translator::default()),
    }
}
