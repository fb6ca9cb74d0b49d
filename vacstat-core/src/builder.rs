use chrono::{DateTime, NaiveDateTime};

use crate::cleaning::{clean_field, clean_multi_value};
use crate::error::Result;
use crate::models::{CondensedVacancy, Currency, Experience, FullVacancy, Salary, Vacancy};
use crate::schema::{ResolvedSchema, Schema, SourceField};
use crate::translator::Translator;

const SOURCE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Turns raw CSV rows into vacancies for one resolved header
#[derive(Debug)]
pub struct RecordBuilder<'a> {
    resolved: ResolvedSchema,
    translator: &'a Translator,
}

/// One row after cleaning, addressed by source column
struct CleanRow {
    values: Vec<String>,
    key_skills: Vec<String>,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(resolved: ResolvedSchema, translator: &'a Translator) -> Self {
        Self {
            resolved,
            translator,
        }
    }

    pub fn schema(&self) -> Schema {
        self.resolved.schema
    }

    /// Build a vacancy from a raw row.
    ///
    /// Returns `Ok(None)` when the row is rejected: wrong width, a field
    /// that is blank before cleaning, or a number/date/flag that does not parse. An unknown
    /// currency code is the only row-level problem reported as an error.
    pub fn build<S: AsRef<str>>(&self, raw: &[S]) -> Result<Option<Vacancy>> {
        if raw.len() != self.resolved.width() {
            tracing::debug!(
                expected = self.resolved.width(),
                found = raw.len(),
                "dropping row with wrong field count"
            );
            return Ok(None);
        }

        let row = match self.clean_row(raw) {
            Some(row) => row,
            None => {
                tracing::debug!("dropping row with a blank field");
                return Ok(None);
            }
        };

        let currency: Currency = self.value(&row, SourceField::SalaryCurrency).parse()?;
        self.translator.rate_to_rub(currency)?;

        let vacancy = match self.resolved.schema {
            Schema::Full => self.build_full(&row, currency),
            Schema::Condensed => self.build_condensed(&row, currency),
        };

        if vacancy.is_none() {
            tracing::debug!("dropping row with unparsable values");
        }

        Ok(vacancy)
    }

    fn clean_row<S: AsRef<str>>(&self, raw: &[S]) -> Option<CleanRow> {
        let mut values = vec![String::new(); raw.len()];
        let mut key_skills = Vec::new();

        for &field in self.resolved.schema.fields() {
            let idx = self.resolved.position(field)?;
            let raw_value = raw[idx].as_ref();
            // emptiness is judged on the raw text, before markup is stripped
            if raw_value.trim().is_empty() {
                return None;
            }

            if field.is_multi_value() {
                key_skills = clean_multi_value(raw_value);
            } else {
                values[idx] = clean_field(raw_value);
            }
        }

        Some(CleanRow { values, key_skills })
    }

    fn value<'r>(&self, row: &'r CleanRow, field: SourceField) -> &'r str {
        self.resolved
            .position(field)
            .and_then(|idx| row.values.get(idx))
            .map(String::as_str)
            .unwrap_or_default()
    }

    fn salary(&self, row: &CleanRow, currency: Currency, with_gross: bool) -> Option<Salary> {
        let salary_gross = if with_gross {
            Some(parse_flag(self.value(row, SourceField::SalaryGross))?)
        } else {
            None
        };

        Some(Salary {
            salary_from: parse_amount(self.value(row, SourceField::SalaryFrom))?,
            salary_to: parse_amount(self.value(row, SourceField::SalaryTo))?,
            salary_currency: currency,
            salary_gross,
        })
    }

    fn build_full(&self, row: &CleanRow, currency: Currency) -> Option<Vacancy> {
        Some(Vacancy::Full(FullVacancy {
            name: self.value(row, SourceField::Name).to_string(),
            description: self.value(row, SourceField::Description).to_string(),
            key_skills: row.key_skills.clone(),
            experience_id: Experience::from_code(self.value(row, SourceField::ExperienceId))?,
            premium: parse_flag(self.value(row, SourceField::Premium))?,
            employer_name: self.value(row, SourceField::EmployerName).to_string(),
            salary: self.salary(row, currency, true)?,
            area_name: self.value(row, SourceField::AreaName).to_string(),
            published_at: parse_published_at(self.value(row, SourceField::PublishedAt))?,
        }))
    }

    fn build_condensed(&self, row: &CleanRow, currency: Currency) -> Option<Vacancy> {
        Some(Vacancy::Condensed(CondensedVacancy {
            name: self.value(row, SourceField::Name).to_string(),
            salary: self.salary(row, currency, false)?,
            area_name: self.value(row, SourceField::AreaName).to_string(),
            published_at: parse_published_at(self.value(row, SourceField::PublishedAt))?,
        }))
    }
}

/// Parse a source timestamp such as `2022-07-05T18:19:30+0300` and keep the
/// local wall-clock time, dropping the offset
pub fn parse_published_at(value: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_str(value, SOURCE_DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
        .map(|dt| dt.naive_local())
}

fn parse_amount(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|amount| amount.is_finite())
}

fn parse_flag(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VacancyError;
    use crate::schema::resolve_schema;
    use chrono::{Datelike, Timelike};

    const FULL_HEADER: [&str; 12] = [
        "name",
        "description",
        "key_skills",
        "experience_id",
        "premium",
        "employer_name",
        "salary_from",
        "salary_to",
        "salary_gross",
        "salary_currency",
        "area_name",
        "published_at",
    ];

    const CONDENSED_HEADER: [&str; 6] = [
        "name",
        "salary_from",
        "salary_to",
        "salary_currency",
        "area_name",
        "published_at",
    ];

    fn full_row() -> Vec<&'static str> {
        vec![
            "<b>Rust developer</b>",
            "<p>Write&nbsp;services</p>  in   Rust",
            "Rust\nSQL\r\nGit",
            "between1And3",
            "FALSE",
            "Acme",
            "100000.0",
            "150000",
            "True",
            "RUR",
            "Москва",
            "2022-07-05T18:19:30+0300",
        ]
    }

    #[test]
    fn test_build_full_vacancy() {
        let translator = Translator::default();
        let builder = RecordBuilder::new(resolve_schema(&FULL_HEADER).unwrap(), &translator);

        let vacancy = builder.build(&full_row()).unwrap().unwrap();
        assert_eq!(vacancy.name(), "Rust developer");
        assert_eq!(vacancy.description(), Some("Write&nbsp;services in Rust"));
        assert_eq!(
            vacancy.key_skills().unwrap(),
            &["Rust".to_string(), "SQL".to_string(), "Git".to_string()]
        );
        assert_eq!(vacancy.experience(), Some(Experience::Between1And3));
        assert_eq!(vacancy.premium(), Some(false));
        assert_eq!(vacancy.salary().salary_gross, Some(true));
        assert_eq!(vacancy.salary().salary_from, 100000.0);
        assert_eq!(vacancy.area_name(), "Москва");

        let published = vacancy.published_at();
        assert_eq!((published.year(), published.month(), published.day()), (2022, 7, 5));
        assert_eq!(published.hour(), 18);
    }

    #[test]
    fn test_build_condensed_vacancy() {
        let translator = Translator::default();
        let builder = RecordBuilder::new(resolve_schema(&CONDENSED_HEADER).unwrap(), &translator);

        let row = ["A", "1000", "2000", "RUR", "Moscow", "2022-01-01T00:00:00+0300"];
        let vacancy = builder.build(&row).unwrap().unwrap();
        assert!(matches!(vacancy, Vacancy::Condensed(_)));
        assert_eq!(vacancy.salary().salary_gross, None);
        assert_eq!(vacancy.key_skills(), None);
        assert_eq!(vacancy.description(), None);
    }

    #[test]
    fn test_wrong_width_or_empty_field_is_dropped() {
        let translator = Translator::default();
        let builder = RecordBuilder::new(resolve_schema(&CONDENSED_HEADER).unwrap(), &translator);

        let short = ["A", "1000", "2000", "RUR", "Moscow"];
        assert!(builder.build(&short).unwrap().is_none());

        let blank = ["A", "1000", "2000", "RUR", " \u{a0} ", "2022-01-01T00:00:00+0300"];
        assert!(builder.build(&blank).unwrap().is_none());
    }

    #[test]
    fn test_markup_only_field_is_kept_empty() {
        let translator = Translator::default();
        let builder = RecordBuilder::new(resolve_schema(&CONDENSED_HEADER).unwrap(), &translator);

        let row = ["A", "1000", "2000", "RUR", "  <br> ", "2022-01-01T00:00:00+0300"];
        let vacancy = builder.build(&row).unwrap().unwrap();
        assert_eq!(vacancy.area_name(), "");
    }

    #[test]
    fn test_unparsable_values_are_dropped() {
        let translator = Translator::default();
        let builder = RecordBuilder::new(resolve_schema(&CONDENSED_HEADER).unwrap(), &translator);

        let bad_amount = ["A", "lots", "2000", "RUR", "Moscow", "2022-01-01T00:00:00+0300"];
        assert!(builder.build(&bad_amount).unwrap().is_none());

        let bad_date = ["A", "1000", "2000", "RUR", "Moscow", "01.01.2022"];
        assert!(builder.build(&bad_date).unwrap().is_none());
    }

    #[test]
    fn test_unknown_currency_is_fatal() {
        let translator = Translator::default();
        let builder = RecordBuilder::new(resolve_schema(&CONDENSED_HEADER).unwrap(), &translator);

        let row = ["A", "1000", "2000", "XXX", "Moscow", "2022-01-01T00:00:00+0300"];
        assert!(matches!(
            builder.build(&row),
            Err(VacancyError::UnknownCurrency { .. })
        ));
    }

    #[test]
    fn test_offset_is_discarded() {
        let with_colon = parse_published_at("2022-01-01T23:30:00+03:00").unwrap();
        let without_colon = parse_published_at("2022-01-01T23:30:00+0300").unwrap();
        assert_eq!(with_colon, without_colon);
        assert_eq!(with_colon.hour(), 23);
        assert_eq!(with_colon.day(), 1);
    }
}
