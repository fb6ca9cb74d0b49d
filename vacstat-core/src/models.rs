use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, VacancyError};
use crate::translator::Translator;

/// Salary currencies accepted in the source data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Azn,
    Byr,
    Eur,
    Gel,
    Kgs,
    Kzt,
    Rur,
    Uah,
    Usd,
    Uzs,
}

impl Currency {
    pub const ALL: [Currency; 10] = [
        Currency::Azn,
        Currency::Byr,
        Currency::Eur,
        Currency::Gel,
        Currency::Kgs,
        Currency::Kzt,
        Currency::Rur,
        Currency::Uah,
        Currency::Usd,
        Currency::Uzs,
    ];

    /// Three-letter code as it appears in the CSV export
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Azn => "AZN",
            Currency::Byr => "BYR",
            Currency::Eur => "EUR",
            Currency::Gel => "GEL",
            Currency::Kgs => "KGS",
            Currency::Kzt => "KZT",
            Currency::Rur => "RUR",
            Currency::Uah => "UAH",
            Currency::Usd => "USD",
            Currency::Uzs => "UZS",
        }
    }
}

impl FromStr for Currency {
    type Err = VacancyError;

    fn from_str(s: &str) -> Result<Self> {
        Currency::ALL
            .into_iter()
            .find(|currency| currency.code() == s)
            .ok_or_else(|| VacancyError::UnknownCurrency {
                code: s.to_string(),
            })
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Required work experience, ranked from none to the longest bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Experience {
    NoExperience,
    Between1And3,
    Between3And6,
    MoreThan6,
}

impl Experience {
    pub const ALL: [Experience; 4] = [
        Experience::NoExperience,
        Experience::Between1And3,
        Experience::Between3And6,
        Experience::MoreThan6,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Experience::NoExperience => "noExperience",
            Experience::Between1And3 => "between1And3",
            Experience::Between3And6 => "between3And6",
            Experience::MoreThan6 => "moreThan6",
        }
    }

    /// Sort rank, 1 for no experience up to 4 for more than six years
    pub fn rank(&self) -> u8 {
        match self {
            Experience::NoExperience => 1,
            Experience::Between1And3 => 2,
            Experience::Between3And6 => 3,
            Experience::MoreThan6 => 4,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Experience::ALL.into_iter().find(|exp| exp.code() == code)
    }
}

/// Every field a vacancy can expose, used as filter key, sort key and
/// display column alike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Name,
    Description,
    KeySkills,
    ExperienceId,
    Premium,
    EmployerName,
    Salary,
    SalaryCurrency,
    AreaName,
    PublishedAt,
}

impl FieldKey {
    pub const ALL: [FieldKey; 10] = [
        FieldKey::Name,
        FieldKey::Description,
        FieldKey::KeySkills,
        FieldKey::ExperienceId,
        FieldKey::Premium,
        FieldKey::EmployerName,
        FieldKey::Salary,
        FieldKey::SalaryCurrency,
        FieldKey::AreaName,
        FieldKey::PublishedAt,
    ];

    /// Table columns in display order. The currency is shown inside the
    /// salary column, so it has no column of its own.
    pub const COLUMNS: [FieldKey; 9] = [
        FieldKey::Name,
        FieldKey::Description,
        FieldKey::KeySkills,
        FieldKey::ExperienceId,
        FieldKey::Premium,
        FieldKey::EmployerName,
        FieldKey::Salary,
        FieldKey::AreaName,
        FieldKey::PublishedAt,
    ];
}

/// Salary fork of a vacancy
#[derive(Debug, Clone, PartialEq)]
pub struct Salary {
    pub salary_from: f64,
    pub salary_to: f64,
    pub salary_currency: Currency,
    /// Absent for files in the condensed schema
    pub salary_gross: Option<bool>,
}

impl Salary {
    pub fn midpoint(&self) -> f64 {
        (self.salary_from + self.salary_to) / 2.0
    }

    /// Midpoint of the fork converted to rubles
    pub fn to_rub(&self, translator: &Translator) -> Result<f64> {
        Ok(self.midpoint() * translator.rate_to_rub(self.salary_currency)?)
    }

    /// Check whether `amount` lies inside the fork, bounds included
    pub fn contains(&self, amount: f64) -> bool {
        self.salary_from <= amount && amount <= self.salary_to
    }
}

/// Vacancy from a file with the full 12-column schema
#[derive(Debug, Clone, PartialEq)]
pub struct FullVacancy {
    pub name: String,
    pub description: String,
    pub key_skills: Vec<String>,
    pub experience_id: Experience,
    pub premium: bool,
    pub employer_name: String,
    pub salary: Salary,
    pub area_name: String,
    pub published_at: NaiveDateTime,
}

/// Vacancy from a file with the condensed 6-column schema
#[derive(Debug, Clone, PartialEq)]
pub struct CondensedVacancy {
    pub name: String,
    pub salary: Salary,
    pub area_name: String,
    pub published_at: NaiveDateTime,
}

/// A vacancy in whichever shape its file provides.
///
/// Query and statistics code only goes through the accessors below, so it
/// never branches on the schema itself. Fields the condensed shape lacks
/// come back as `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Vacancy {
    Full(FullVacancy),
    Condensed(CondensedVacancy),
}

impl Vacancy {
    pub fn name(&self) -> &str {
        match self {
            Vacancy::Full(v) => &v.name,
            Vacancy::Condensed(v) => &v.name,
        }
    }

    pub fn salary(&self) -> &Salary {
        match self {
            Vacancy::Full(v) => &v.salary,
            Vacancy::Condensed(v) => &v.salary,
        }
    }

    pub fn area_name(&self) -> &str {
        match self {
            Vacancy::Full(v) => &v.area_name,
            Vacancy::Condensed(v) => &v.area_name,
        }
    }

    pub fn published_at(&self) -> NaiveDateTime {
        match self {
            Vacancy::Full(v) => v.published_at,
            Vacancy::Condensed(v) => v.published_at,
        }
    }

    pub fn published_date(&self) -> NaiveDate {
        self.published_at().date()
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Vacancy::Full(v) => Some(&v.description),
            Vacancy::Condensed(_) => None,
        }
    }

    pub fn key_skills(&self) -> Option<&[String]> {
        match self {
            Vacancy::Full(v) => Some(&v.key_skills),
            Vacancy::Condensed(_) => None,
        }
    }

    pub fn experience(&self) -> Option<Experience> {
        match self {
            Vacancy::Full(v) => Some(v.experience_id),
            Vacancy::Condensed(_) => None,
        }
    }

    pub fn premium(&self) -> Option<bool> {
        match self {
            Vacancy::Full(v) => Some(v.premium),
            Vacancy::Condensed(_) => None,
        }
    }

    pub fn employer_name(&self) -> Option<&str> {
        match self {
            Vacancy::Full(v) => Some(&v.employer_name),
            Vacancy::Condensed(_) => None,
        }
    }
}
