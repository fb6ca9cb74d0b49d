use chrono::NaiveDateTime;
use std::cmp::Ordering;

use crate::error::{Result, VacancyError};
use crate::models::{FieldKey, Vacancy};
use crate::translator::Translator;

/// Extracted sort key. Vacancies lacking the field get `Missing`, which
/// orders before every present value.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Missing,
    Number(f64),
    Flag(bool),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl SortValue {
    pub fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Missing, SortValue::Missing) => Ordering::Equal,
            (SortValue::Missing, _) => Ordering::Less,
            (_, SortValue::Missing) => Ordering::Greater,
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Flag(a), SortValue::Flag(b)) => a.cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Timestamp(a), SortValue::Timestamp(b)) => a.cmp(b),
            // keys of one field always share a variant
            _ => Ordering::Equal,
        }
    }
}

/// Requested ordering of query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub field: Option<FieldKey>,
    pub descending: bool,
}

impl SortSpec {
    /// Parse the sort field display name and the reverse flag.
    /// An empty field means input order is kept.
    pub fn parse(field: &str, reverse: &str, translator: &Translator) -> Result<Self> {
        let field = field.trim();
        let field = if field.is_empty() {
            None
        } else {
            Some(
                translator
                    .field_from_name(field)
                    .ok_or_else(|| VacancyError::UnknownSortField {
                        field: field.to_string(),
                    })?,
            )
        };

        Ok(Self {
            field,
            descending: parse_reverse_flag(reverse, translator)?,
        })
    }
}

/// The reverse flag accepts the "yes"/"no" display words, or nothing
pub fn parse_reverse_flag(value: &str, translator: &Translator) -> Result<bool> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(false);
    }

    translator
        .premium_names
        .parse(value)
        .ok_or_else(|| VacancyError::InvalidSortDirection {
            value: value.to_string(),
        })
}

/// Extract the sort key of one field from a vacancy
pub fn sort_key(vacancy: &Vacancy, field: FieldKey, translator: &Translator) -> Result<SortValue> {
    let text = |value: Option<&str>| {
        value
            .map(|s| SortValue::Text(s.to_string()))
            .unwrap_or(SortValue::Missing)
    };

    let key = match field {
        FieldKey::Name => SortValue::Text(vacancy.name().to_string()),
        FieldKey::Description => text(vacancy.description()),
        FieldKey::KeySkills => vacancy
            .key_skills()
            .map(|skills| SortValue::Number(skills.len() as f64))
            .unwrap_or(SortValue::Missing),
        FieldKey::ExperienceId => vacancy
            .experience()
            .map(|exp| SortValue::Number(f64::from(exp.rank())))
            .unwrap_or(SortValue::Missing),
        FieldKey::Premium => vacancy
            .premium()
            .map(SortValue::Flag)
            .unwrap_or(SortValue::Missing),
        FieldKey::EmployerName => text(vacancy.employer_name()),
        FieldKey::Salary => SortValue::Number(vacancy.salary().to_rub(translator)?),
        FieldKey::SalaryCurrency => {
            SortValue::Text(vacancy.salary().salary_currency.code().to_string())
        }
        FieldKey::AreaName => SortValue::Text(vacancy.area_name().to_string()),
        FieldKey::PublishedAt => SortValue::Timestamp(vacancy.published_at()),
    };

    Ok(key)
}

/// Sort vacancies by the requested field.
///
/// Ascending order is a stable sort. Descending order is the ascending
/// result reversed, so flipping the direction always mirrors the output.
/// Without a sort field the input order is returned unchanged.
pub fn sort_vacancies(
    vacancies: Vec<Vacancy>,
    sort: &SortSpec,
    translator: &Translator,
) -> Result<Vec<Vacancy>> {
    let Some(field) = sort.field else {
        return Ok(vacancies);
    };

    let mut keyed = vacancies
        .into_iter()
        .map(|vacancy| -> Result<(SortValue, Vacancy)> {
            Ok((sort_key(&vacancy, field, translator)?, vacancy))
        })
        .collect::<Result<Vec<_>>>()?;

    keyed.sort_by(|(a, _), (b, _)| a.compare(b));
    if sort.descending {
        keyed.reverse();
    }

    Ok(keyed.into_iter().map(|(_, vacancy)| vacancy).collect())
}
