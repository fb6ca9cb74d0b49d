use std::collections::HashMap;

use crate::error::{Result, VacancyError};
use crate::models::FieldKey;

/// Column names a CSV export may carry in its header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceField {
    Name,
    Description,
    KeySkills,
    ExperienceId,
    Premium,
    EmployerName,
    SalaryFrom,
    SalaryTo,
    SalaryGross,
    SalaryCurrency,
    AreaName,
    PublishedAt,
}

impl SourceField {
    pub fn from_header(name: &str) -> Option<Self> {
        let field = match name {
            "name" => SourceField::Name,
            "description" => SourceField::Description,
            "key_skills" => SourceField::KeySkills,
            "experience_id" => SourceField::ExperienceId,
            "premium" => SourceField::Premium,
            "employer_name" => SourceField::EmployerName,
            "salary_from" => SourceField::SalaryFrom,
            "salary_to" => SourceField::SalaryTo,
            "salary_gross" => SourceField::SalaryGross,
            "salary_currency" => SourceField::SalaryCurrency,
            "area_name" => SourceField::AreaName,
            "published_at" => SourceField::PublishedAt,
            _ => return None,
        };
        Some(field)
    }

    /// Only key skills hold several line-separated values
    pub fn is_multi_value(&self) -> bool {
        matches!(self, SourceField::KeySkills)
    }
}

/// The two record shapes a file can have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Full,
    Condensed,
}

impl Schema {
    const FULL_FIELDS: [SourceField; 12] = [
        SourceField::Name,
        SourceField::Description,
        SourceField::KeySkills,
        SourceField::ExperienceId,
        SourceField::Premium,
        SourceField::EmployerName,
        SourceField::SalaryFrom,
        SourceField::SalaryTo,
        SourceField::SalaryGross,
        SourceField::SalaryCurrency,
        SourceField::AreaName,
        SourceField::PublishedAt,
    ];

    const CONDENSED_FIELDS: [SourceField; 6] = [
        SourceField::Name,
        SourceField::SalaryFrom,
        SourceField::SalaryTo,
        SourceField::SalaryCurrency,
        SourceField::AreaName,
        SourceField::PublishedAt,
    ];

    /// Pick the schema from the header width alone
    pub fn from_width(width: usize) -> Result<Self> {
        match width {
            12 => Ok(Schema::Full),
            6 => Ok(Schema::Condensed),
            other => Err(VacancyError::UnsupportedSchema {
                reason: format!("expected 12 or 6 columns, found {}", other),
            }),
        }
    }

    /// Source columns in canonical order
    pub fn fields(&self) -> &'static [SourceField] {
        match self {
            Schema::Full => &Self::FULL_FIELDS,
            Schema::Condensed => &Self::CONDENSED_FIELDS,
        }
    }

    /// Display columns available for this schema, in display order
    pub fn columns(&self) -> Vec<FieldKey> {
        FieldKey::COLUMNS
            .into_iter()
            .filter(|key| self.has_column(*key))
            .collect()
    }

    pub fn has_column(&self, key: FieldKey) -> bool {
        match self {
            Schema::Full => key != FieldKey::SalaryCurrency,
            Schema::Condensed => matches!(
                key,
                FieldKey::Name | FieldKey::Salary | FieldKey::AreaName | FieldKey::PublishedAt
            ),
        }
    }
}

/// A header resolved to its schema and the position of every column
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    pub schema: Schema,
    width: usize,
    positions: HashMap<SourceField, usize>,
}

impl ResolvedSchema {
    /// Number of columns every data row must have
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn position(&self, field: SourceField) -> Option<usize> {
        self.positions.get(&field).copied()
    }
}

/// Resolve a header row to one of the supported schemas.
/// The width decides the schema, then every header name must be a known
/// column of that schema, each appearing once. Column order is free.
pub fn resolve_schema<S: AsRef<str>>(headers: &[S]) -> Result<ResolvedSchema> {
    let schema = Schema::from_width(headers.len())?;
    let mut positions = HashMap::new();

    for (idx, header) in headers.iter().enumerate() {
        let name = header.as_ref().trim().trim_start_matches('\u{feff}');
        let field = SourceField::from_header(name).ok_or_else(|| VacancyError::UnsupportedSchema {
            reason: format!("unknown column '{}'", name),
        })?;

        if !schema.fields().contains(&field) {
            return Err(VacancyError::UnsupportedSchema {
                reason: format!("column '{}' does not belong to the {:?} schema", name, schema),
            });
        }

        if positions.insert(field, idx).is_some() {
            return Err(VacancyError::UnsupportedSchema {
                reason: format!("duplicate column '{}'", name),
            });
        }
    }

    Ok(ResolvedSchema {
        schema,
        width: headers.len(),
        positions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_resolve_full_schema() {
        let resolved = resolve_schema(&FULL_HEADER).unwrap();
        assert_eq!(resolved.schema, Schema::Full);
        assert_eq!(resolved.width(), 12);
        assert_eq!(resolved.position(SourceField::SalaryGross), Some(8));
        assert_eq!(resolved.position(SourceField::PublishedAt), Some(11));
    }

    #[test]
    fn test_resolve_condensed_schema() {
        let header = [
            "name",
            "salary_from",
            "salary_to",
            "salary_currency",
            "area_name",
            "published_at",
        ];
        let resolved = resolve_schema(&header).unwrap();
        assert_eq!(resolved.schema, Schema::Condensed);
        assert_eq!(resolved.position(SourceField::AreaName), Some(4));
        assert_eq!(resolved.position(SourceField::KeySkills), None);
    }

    #[test]
    fn test_reordered_header_keeps_positions() {
        let header = [
            "published_at",
            "area_name",
            "salary_currency",
            "salary_to",
            "salary_from",
            "name",
        ];
        let resolved = resolve_schema(&header).unwrap();
        assert_eq!(resolved.position(SourceField::Name), Some(5));
        assert_eq!(resolved.position(SourceField::PublishedAt), Some(0));
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let mut header = FULL_HEADER.map(String::from);
        header[0] = format!("\u{feff}{}", header[0]);
        assert!(resolve_schema(&header).is_ok());
    }

    #[test]
    fn test_other_widths_are_rejected() {
        for width in [0, 1, 5, 7, 11, 13] {
            let header = vec!["name"; width];
            assert!(matches!(
                resolve_schema(&header),
                Err(VacancyError::UnsupportedSchema { .. })
            ));
        }
    }

    #[test]
    fn test_unknown_or_foreign_columns_are_rejected() {
        let unknown = ["name", "salary_from", "salary_to", "salary_currency", "city", "published_at"];
        assert!(resolve_schema(&unknown).is_err());

        let foreign = ["name", "salary_from", "salary_to", "premium", "area_name", "published_at"];
        assert!(resolve_schema(&foreign).is_err());

        let duplicate = ["name", "name", "salary_to", "salary_currency", "area_name", "published_at"];
        assert!(resolve_schema(&duplicate).is_err());
    }

    #[test]
    fn test_columns_per_schema() {
        assert_eq!(Schema::Full.columns().len(), 9);
        assert_eq!(
            Schema::Condensed.columns(),
            vec![
                FieldKey::Name,
                FieldKey::Salary,
                FieldKey::AreaName,
                FieldKey::PublishedAt
            ]
        );
    }
}
