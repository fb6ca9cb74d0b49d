pub mod formatting;

pub use formatting::{format_statistics, render_table};
