use std::collections::BTreeMap;
use std::fmt::Display;
use tabled::builder::Builder;
use tabled::settings::object::Segment;
use tabled::settings::{Modify, Style, Width};
use vacstat_core::{QueryTable, StatisticsReport};

/// Maximum visible width of a table column
pub const COLUMN_WIDTH: usize = 20;

/// Render a query table in ASCII style with a rule after every row.
/// Cells wrap on word boundaries at `COLUMN_WIDTH` characters.
pub fn render_table(table: &QueryTable) -> String {
    let mut builder = Builder::default();
    builder.push_record(table.headers.iter().cloned());
    for row in &table.rows {
        builder.push_record(std::iter::once(row.number.to_string()).chain(row.cells.iter().cloned()));
    }

    let mut rendered = builder.build();
    rendered
        .with(Style::ascii())
        .with(Modify::new(Segment::all()).with(Width::wrap(COLUMN_WIDTH).keep_words()));
    rendered.to_string()
}

fn format_year_map<V: Display>(map: &BTreeMap<i32, V>) -> String {
    let entries: Vec<String> = map.iter().map(|(year, value)| format!("{}: {}", year, value)).collect();
    format!("{{{}}}", entries.join(", "))
}

fn format_city_map<'a, V: 'a>(entries: impl Iterator<Item = (&'a str, V)>, fmt_value: impl Fn(V) -> String) -> String {
    let entries: Vec<String> = entries
        .map(|(city, value)| format!("'{}': {}", city, fmt_value(value)))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

/// Format the statistics report as six labelled lines
pub fn format_statistics(report: &StatisticsReport) -> String {
    let salary_by_city = format_city_map(
        report
            .salary_by_city
            .iter()
            .map(|row| (row.area_name.as_str(), row.salary)),
        |salary| salary.to_string(),
    );
    let share_by_city = format_city_map(
        report
            .share_by_city
            .iter()
            .map(|row| (row.area_name.as_str(), row.share)),
        |share| format!("{:?}", share),
    );

    [
        format!("Динамика уровня зарплат по годам: {}", format_year_map(&report.salary_by_year)),
        format!("Динамика количества вакансий по годам: {}", format_year_map(&report.count_by_year)),
        format!(
            "Динамика уровня зарплат по годам для выбранной профессии: {}",
            format_year_map(&report.profession_salary_by_year)
        ),
        format!(
            "Динамика количества вакансий по годам для выбранной профессии: {}",
            format_year_map(&report.profession_count_by_year)
        ),
        format!("Уровень зарплат по городам (в порядке убывания): {}", salary_by_city),
        format!("Доля вакансий по городам (в порядке убывания): {}", share_by_city),
    ]
    .join("\n")
}
