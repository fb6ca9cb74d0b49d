use serde::Serialize;
use std::io::Read;

use crate::cleaning::truncate_display;
use crate::dataset::VacancyStream;
use crate::error::{Result, VacancyError};
use crate::filtering::{filter_vacancies, parse_filter, VacancyFilter};
use crate::models::{FieldKey, Salary, Vacancy};
use crate::schema::Schema;
use crate::sorting::{sort_vacancies, SortSpec};
use crate::translator::Translator;

/// Header of the row-number column, always shown first
pub const NUMBER_COLUMN: &str = "№";

/// Cells longer than this many characters are cut and marked with "..."
pub const MAX_CELL_CHARS: usize = 100;

const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y";

/// Raw query parameters as the user typed them
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pub filter: String,
    pub sort_field: String,
    pub reverse: String,
    pub range: String,
    pub columns: String,
}

/// 1-based inclusive window of rows to display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayRange {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl DisplayRange {
    /// Parse "start end", "start" or an empty string (everything)
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || VacancyError::InvalidRange {
            input: input.to_string(),
        };

        let bounds = input
            .split_whitespace()
            .map(|part| part.parse::<usize>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>>>()?;

        let range = match bounds.as_slice() {
            [] => DisplayRange::default(),
            [start] => DisplayRange {
                start: Some(*start),
                end: None,
            },
            [start, end] => DisplayRange {
                start: Some(*start),
                end: Some(*end),
            },
            _ => return Err(invalid()),
        };

        match (range.start, range.end) {
            (Some(0), _) => Err(invalid()),
            (Some(start), Some(end)) if start > end => Err(invalid()),
            _ => Ok(range),
        }
    }

    /// Zero-based half-open slice bounds for `total` rows, clamped
    pub fn slice_bounds(&self, total: usize) -> (usize, usize) {
        let start = self.start.map(|s| s - 1).unwrap_or(0).min(total);
        let end = self.end.unwrap_or(total).min(total).max(start);
        (start, end)
    }
}

/// Parse a comma-separated list of column display names.
/// Columns keep the table's own order whatever order they were requested in.
pub fn parse_columns(input: &str, schema: Schema, translator: &Translator) -> Result<Vec<FieldKey>> {
    let requested: Vec<&str> = input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != NUMBER_COLUMN)
        .collect();

    if requested.is_empty() {
        return Ok(schema.columns());
    }

    let mut keys = Vec::with_capacity(requested.len());
    for name in requested {
        let key = translator
            .field_from_name(name)
            .filter(|key| schema.has_column(*key))
            .ok_or_else(|| VacancyError::InvalidColumns {
                column: name.to_string(),
            })?;
        keys.push(key);
    }

    Ok(schema
        .columns()
        .into_iter()
        .filter(|key| keys.contains(key))
        .collect())
}

/// Fully parsed query, ready to run against a stream
#[derive(Debug, Clone)]
pub struct Query {
    pub filter: Option<VacancyFilter>,
    pub sort: SortSpec,
    pub range: DisplayRange,
    pub columns: Vec<FieldKey>,
}

impl Query {
    /// Validate every parameter before any row is read. The checks run in
    /// the order filter, sort field, sort direction, range, columns.
    pub fn parse(params: &QueryParams, schema: Schema, translator: &Translator) -> Result<Self> {
        let filter = parse_filter(&params.filter, translator)?;
        let sort = SortSpec::parse(&params.sort_field, &params.reverse, translator)?;
        let range = DisplayRange::parse(&params.range)?;
        let columns = parse_columns(&params.columns, schema, translator)?;

        Ok(Self {
            filter,
            sort,
            range,
            columns,
        })
    }
}

/// One display row: its position in the full result and formatted cells
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub number: usize,
    pub cells: Vec<String>,
}

/// Query output handed to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct QueryTable {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
    /// Number of vacancies that passed the filter, before the range cut
    pub matched: usize,
}

/// Run a query over a vacancy stream.
///
/// The stream is consumed once: rows are filtered lazily as they are read
/// and only matching vacancies are kept for sorting.
pub fn run_query<R: Read>(
    mut stream: VacancyStream<'_, R>,
    query: &Query,
    translator: &Translator,
) -> Result<QueryTable> {
    let matched = filter_vacancies(stream.by_ref(), query.filter.as_ref())
        .collect::<Result<Vec<_>>>()?;
    stream.finish()?;

    if matched.is_empty() {
        return Err(VacancyError::EmptyResult);
    }
    tracing::info!(matched = matched.len(), "vacancies passed the filter");

    let sorted = sort_vacancies(matched, &query.sort, translator)?;
    Ok(build_table(&sorted, query, translator))
}

/// Number the sorted vacancies, cut the display range and format the
/// requested columns
pub fn build_table(sorted: &[Vacancy], query: &Query, translator: &Translator) -> QueryTable {
    let (start, end) = query.range.slice_bounds(sorted.len());

    let headers = std::iter::once(NUMBER_COLUMN.to_string())
        .chain(
            query
                .columns
                .iter()
                .map(|key| translator.field_name(*key).to_string()),
        )
        .collect();

    let rows = sorted[start..end]
        .iter()
        .enumerate()
        .map(|(offset, vacancy)| TableRow {
            number: start + offset + 1,
            cells: query
                .columns
                .iter()
                .map(|key| format_cell(vacancy, *key, translator))
                .collect(),
        })
        .collect();

    QueryTable {
        headers,
        rows,
        matched: sorted.len(),
    }
}

/// Format one field of a vacancy for display
pub fn format_cell(vacancy: &Vacancy, key: FieldKey, translator: &Translator) -> String {
    let value = match key {
        FieldKey::Name => vacancy.name().to_string(),
        FieldKey::Description => vacancy.description().unwrap_or_default().to_string(),
        FieldKey::KeySkills => vacancy
            .key_skills()
            .map(|skills| skills.join("\n"))
            .unwrap_or_default(),
        FieldKey::ExperienceId => vacancy
            .experience()
            .map(|exp| translator.experience_name(exp).to_string())
            .unwrap_or_default(),
        FieldKey::Premium => vacancy
            .premium()
            .map(|premium| translator.premium_names.name(premium).to_string())
            .unwrap_or_default(),
        FieldKey::EmployerName => vacancy.employer_name().unwrap_or_default().to_string(),
        FieldKey::Salary => format_salary(vacancy.salary(), translator),
        FieldKey::SalaryCurrency => translator
            .currency_name(vacancy.salary().salary_currency)
            .to_string(),
        FieldKey::AreaName => vacancy.area_name().to_string(),
        FieldKey::PublishedAt => vacancy.published_at().format(DISPLAY_DATE_FORMAT).to_string(),
    };

    truncate_display(&value, MAX_CELL_CHARS)
}

/// "from - to (currency) (gross)"; the gross clause is left out when the
/// source file does not carry it
pub fn format_salary(salary: &Salary, translator: &Translator) -> String {
    let mut formatted = format!(
        "{} - {} ({})",
        format_amount(salary.salary_from),
        format_amount(salary.salary_to),
        translator.currency_name(salary.salary_currency)
    );

    if let Some(gross) = salary.salary_gross {
        formatted.push_str(&format!(" ({})", translator.gross_names.name(gross)));
    }

    formatted
}

/// Round to a whole number and group thousands with spaces: 1234567.8 -> "1 234 568"
pub fn format_amount(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        grouped.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    grouped
}
