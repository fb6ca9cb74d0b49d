use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Result, VacancyError};
use crate::models::{Currency, Experience, FieldKey};

/// Display strings for a boolean value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoolNames {
    pub yes: String,
    pub no: String,
}

impl BoolNames {
    pub fn name(&self, value: bool) -> &str {
        if value {
            &self.yes
        } else {
            &self.no
        }
    }

    pub fn parse(&self, name: &str) -> Option<bool> {
        if name == self.yes {
            Some(true)
        } else if name == self.no {
            Some(false)
        } else {
            None
        }
    }
}

/// Lookup tables shared by record building, querying and statistics.
///
/// Built once per run and passed by reference. `Translator::default()`
/// carries the stock tables; an alternate set can be loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Translator {
    pub currency_to_rub: HashMap<Currency, f64>,
    pub currency_names: HashMap<Currency, String>,
    pub experience_names: HashMap<Experience, String>,
    pub premium_names: BoolNames,
    pub gross_names: BoolNames,
    pub field_names: HashMap<FieldKey, String>,
}

impl Default for Translator {
    fn default() -> Self {
        let currency_to_rub = HashMap::from([
            (Currency::Azn, 35.68),
            (Currency::Byr, 23.91),
            (Currency::Eur, 59.90),
            (Currency::Gel, 21.74),
            (Currency::Kgs, 0.76),
            (Currency::Kzt, 0.13),
            (Currency::Rur, 1.0),
            (Currency::Uah, 1.64),
            (Currency::Usd, 60.66),
            (Currency::Uzs, 0.0055),
        ]);

        let currency_names = HashMap::from([
            (Currency::Azn, "Манаты".to_string()),
            (Currency::Byr, "Белорусские рубли".to_string()),
            (Currency::Eur, "Евро".to_string()),
            (Currency::Gel, "Грузинский лари".to_string()),
            (Currency::Kgs, "Киргизский сом".to_string()),
            (Currency::Kzt, "Тенге".to_string()),
            (Currency::Rur, "Рубли".to_string()),
            (Currency::Uah, "Гривны".to_string()),
            (Currency::Usd, "Доллары".to_string()),
            (Currency::Uzs, "Узбекский сум".to_string()),
        ]);

        let experience_names = HashMap::from([
            (Experience::NoExperience, "Нет опыта".to_string()),
            (Experience::Between1And3, "От 1 года до 3 лет".to_string()),
            (Experience::Between3And6, "От 3 до 6 лет".to_string()),
            (Experience::MoreThan6, "Более 6 лет".to_string()),
        ]);

        let field_names = HashMap::from([
            (FieldKey::Name, "Название".to_string()),
            (FieldKey::Description, "Описание".to_string()),
            (FieldKey::KeySkills, "Навыки".to_string()),
            (FieldKey::ExperienceId, "Опыт работы".to_string()),
            (FieldKey::Premium, "Премиум-вакансия".to_string()),
            (FieldKey::EmployerName, "Компания".to_string()),
            (FieldKey::Salary, "Оклад".to_string()),
            (FieldKey::SalaryCurrency, "Идентификатор валюты оклада".to_string()),
            (FieldKey::AreaName, "Название региона".to_string()),
            (FieldKey::PublishedAt, "Дата публикации вакансии".to_string()),
        ]);

        Self {
            currency_to_rub,
            currency_names,
            experience_names,
            premium_names: BoolNames {
                yes: "Да".to_string(),
                no: "Нет".to_string(),
            },
            gross_names: BoolNames {
                yes: "Без вычета налогов".to_string(),
                no: "С вычетом налогов".to_string(),
            },
            field_names,
        }
    }
}

impl Translator {
    /// Load a complete set of tables from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let translator: Translator = serde_json::from_str(contents)?;
        Ok(translator)
    }

    /// Conversion rate to rubles. A currency missing from the table is an
    /// error rather than a silent zero.
    pub fn rate_to_rub(&self, currency: Currency) -> Result<f64> {
        self.currency_to_rub
            .get(&currency)
            .copied()
            .ok_or_else(|| VacancyError::UnknownCurrency {
                code: currency.code().to_string(),
            })
    }

    pub fn currency_name(&self, currency: Currency) -> &str {
        self.currency_names
            .get(&currency)
            .map(String::as_str)
            .unwrap_or_else(|| currency.code())
    }

    pub fn currency_from_name(&self, name: &str) -> Option<Currency> {
        inverse_lookup(&self.currency_names, name)
    }

    pub fn experience_name(&self, experience: Experience) -> &str {
        self.experience_names
            .get(&experience)
            .map(String::as_str)
            .unwrap_or_else(|| experience.code())
    }

    pub fn experience_from_name(&self, name: &str) -> Option<Experience> {
        inverse_lookup(&self.experience_names, name)
    }

    pub fn field_name(&self, key: FieldKey) -> &str {
        self.field_names
            .get(&key)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn field_from_name(&self, name: &str) -> Option<FieldKey> {
        inverse_lookup(&self.field_names, name)
    }
}

fn inverse_lookup<K: Copy>(table: &HashMap<K, String>, name: &str) -> Option<K> {
    table
        .iter()
        .find(|(_, display)| display.as_str() == name)
        .map(|(key, _)| *key)
}
