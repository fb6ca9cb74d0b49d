use chrono::NaiveDate;

use crate::error::{Result, VacancyError};
use crate::models::{Currency, Experience, FieldKey, Vacancy};
use crate::translator::Translator;

const FILTER_DATE_FORMAT: &str = "%d.%m.%Y";

/// A single field constraint, with the value already parsed into the
/// type its field needs
#[derive(Debug, Clone, PartialEq)]
pub enum VacancyFilter {
    KeySkills(Vec<String>),
    Salary(i64),
    PublishedAt(NaiveDate),
    ExperienceId(Experience),
    Premium(bool),
    SalaryCurrency(Currency),
    Name(String),
    AreaName(String),
    EmployerName(String),
    Description(String),
}

impl VacancyFilter {
    pub fn key(&self) -> FieldKey {
        match self {
            VacancyFilter::KeySkills(_) => FieldKey::KeySkills,
            VacancyFilter::Salary(_) => FieldKey::Salary,
            VacancyFilter::PublishedAt(_) => FieldKey::PublishedAt,
            VacancyFilter::ExperienceId(_) => FieldKey::ExperienceId,
            VacancyFilter::Premium(_) => FieldKey::Premium,
            VacancyFilter::SalaryCurrency(_) => FieldKey::SalaryCurrency,
            VacancyFilter::Name(_) => FieldKey::Name,
            VacancyFilter::AreaName(_) => FieldKey::AreaName,
            VacancyFilter::EmployerName(_) => FieldKey::EmployerName,
            VacancyFilter::Description(_) => FieldKey::Description,
        }
    }

    /// Check if a vacancy satisfies the constraint.
    /// A vacancy that does not carry the field never matches.
    pub fn matches(&self, vacancy: &Vacancy) -> bool {
        match self {
            VacancyFilter::KeySkills(required) => vacancy
                .key_skills()
                .map(|skills| required.iter().all(|skill| skills.contains(skill)))
                .unwrap_or(false),
            VacancyFilter::Salary(amount) => vacancy.salary().contains(*amount as f64),
            VacancyFilter::PublishedAt(date) => vacancy.published_date() == *date,
            VacancyFilter::ExperienceId(experience) => vacancy.experience() == Some(*experience),
            VacancyFilter::Premium(premium) => vacancy.premium() == Some(*premium),
            VacancyFilter::SalaryCurrency(currency) => {
                vacancy.salary().salary_currency == *currency
            }
            VacancyFilter::Name(name) => vacancy.name() == name.as_str(),
            VacancyFilter::AreaName(area) => vacancy.area_name() == area.as_str(),
            VacancyFilter::EmployerName(employer) => vacancy.employer_name() == Some(employer.as_str()),
            VacancyFilter::Description(text) => vacancy.description() == Some(text.as_str()),
        }
    }
}

/// Parse a filter string in the format "DisplayName: value".
/// An empty string means no filter.
pub fn parse_filter(input: &str, translator: &Translator) -> Result<Option<VacancyFilter>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let (name, value) = input
        .split_once(':')
        .ok_or_else(|| VacancyError::MalformedFilterSyntax {
            input: input.to_string(),
        })?;
    let (name, value) = (name.trim(), value.trim());

    let key = translator
        .field_from_name(name)
        .ok_or_else(|| VacancyError::UnknownFilterField {
            field: name.to_string(),
        })?;

    let invalid = || VacancyError::InvalidFilterValue {
        field: name.to_string(),
        value: value.to_string(),
    };

    let filter = match key {
        FieldKey::KeySkills => {
            let skills: Vec<String> = value
                .split(',')
                .map(|skill| skill.trim().to_string())
                .filter(|skill| !skill.is_empty())
                .collect();
            if skills.is_empty() {
                return Err(invalid());
            }
            VacancyFilter::KeySkills(skills)
        }
        FieldKey::Salary => VacancyFilter::Salary(value.parse().map_err(|_| invalid())?),
        FieldKey::PublishedAt => VacancyFilter::PublishedAt(
            NaiveDate::parse_from_str(value, FILTER_DATE_FORMAT).map_err(|_| invalid())?,
        ),
        FieldKey::ExperienceId => {
            VacancyFilter::ExperienceId(translator.experience_from_name(value).ok_or_else(invalid)?)
        }
        FieldKey::Premium => {
            VacancyFilter::Premium(translator.premium_names.parse(value).ok_or_else(invalid)?)
        }
        FieldKey::SalaryCurrency => {
            VacancyFilter::SalaryCurrency(translator.currency_from_name(value).ok_or_else(invalid)?)
        }
        FieldKey::Name => VacancyFilter::Name(value.to_string()),
        FieldKey::AreaName => VacancyFilter::AreaName(value.to_string()),
        FieldKey::EmployerName => VacancyFilter::EmployerName(value.to_string()),
        FieldKey::Description => VacancyFilter::Description(value.to_string()),
    };

    Ok(Some(filter))
}

/// Lazily narrow a vacancy stream. Errors pass through untouched so the
/// consumer still sees them; with no filter every vacancy passes.
pub fn filter_vacancies<'f, I>(
    vacancies: I,
    filter: Option<&'f VacancyFilter>,
) -> impl Iterator<Item = Result<Vacancy>> + 'f
where
    I: Iterator<Item = Result<Vacancy>> + 'f,
{
    vacancies.filter(move |item| match (item, filter) {
        (Ok(vacancy), Some(filter)) => filter.matches(vacancy),
        _ => true,
    })
}
