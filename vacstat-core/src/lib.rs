// Public modules
pub mod builder;
pub mod cleaning;
pub mod dataset;
pub mod error;
pub mod filtering;
pub mod models;
pub mod query;
pub mod schema;
pub mod sorting;
pub mod stats;
pub mod translator;

// Re-export commonly used types for convenience
pub use builder::{parse_published_at, RecordBuilder};
pub use cleaning::{clean_field, clean_multi_value, truncate_display};
pub use dataset::{open_dataset, VacancyStream};
pub use error::{Result, VacancyError};
pub use filtering::{filter_vacancies, parse_filter, VacancyFilter};
pub use models::{CondensedVacancy, Currency, Experience, FieldKey, FullVacancy, Salary, Vacancy};
pub use query::{
    build_table, format_amount, format_cell, format_salary, parse_columns, run_query, DisplayRange,
    Query, QueryParams, QueryTable, TableRow, NUMBER_COLUMN,
};
pub use schema::{resolve_schema, ResolvedSchema, Schema, SourceField};
pub use sorting::{parse_reverse_flag, sort_key, sort_vacancies, SortSpec, SortValue};
pub use stats::{
    collect_statistics, run_statistics, CityCount, CityShare, CitySalary, StatisticsReport,
    StatsAggregator,
};
pub use translator::{BoolNames, Translator};
